use regex::Regex;
use std::sync::LazyLock;

use super::{charts, classify_track};
use crate::parser::fields::{num_or_zero, objects, str_or_empty};
use crate::record::{ByTrack, ExamenPoint};

static CHART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<examencijfers-trend-line-chart[^>]*examencijfers="([^"]+)"[^>]*chart-title="([^"]+)""#,
    )
    .unwrap()
});

/// Average central exam, school exam and final grades per year.
pub fn extract(content: &str) -> ByTrack<ExamenPoint> {
    let mut out = ByTrack::new();
    for chart in charts("examencijfers", &CHART_RE, content) {
        let Some(track) = classify_track(&chart.title) else {
            continue;
        };
        let points = objects(&chart.data)
            .map(|item| ExamenPoint {
                schooljaar: str_or_empty(item, "schooljaar"),
                centraal_examen: num_or_zero(item, "centraalExamencijfer"),
                centraal_examen_vergelijking: num_or_zero(
                    item,
                    "centraalExamencijferVergelijking",
                ),
                school_examen: num_or_zero(item, "schoolExamencijfer"),
                eindcijfer: num_or_zero(item, "eindcijfer"),
            })
            .collect();
        out.insert(track.to_string(), points);
    }
    out
}
