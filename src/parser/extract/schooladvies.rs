use regex::Regex;
use std::sync::LazyLock;

use super::{charts, classify_track};
use crate::parser::fields::{num_or_zero, objects, str_or_empty};
use crate::record::{AdviesPoint, ByTrack};

static CHART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<vergelijking-schooladvies-bar-chart[^>]*vergelijkingen="([^"]+)"[^>]*chart-title="([^"]+)""#,
    )
    .unwrap()
});

/// How pupils' positions compare to their primary-school advice, per track.
pub fn extract(content: &str) -> ByTrack<AdviesPoint> {
    let mut out = ByTrack::new();
    for chart in charts("schooladvies", &CHART_RE, content) {
        let Some(track) = classify_track(&chart.title) else {
            continue;
        };
        let points = objects(&chart.data)
            .map(|item| AdviesPoint {
                positie: str_or_empty(item, "positieVergelekenMetSchooladvies"),
                percentage: num_or_zero(item, "percentage"),
                vergelijking: num_or_zero(item, "percentageVergelijking"),
            })
            .collect();
        out.insert(track.to_string(), points);
    }
    out
}
