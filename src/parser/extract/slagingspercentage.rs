use regex::Regex;
use std::sync::LazyLock;

use super::{charts, classify_track};
use crate::parser::fields::{num_or_zero, objects, str_or_empty};
use crate::record::{ByTrack, SlagingPoint};

static CHART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<slaagpercentage-trend-line-chart[^>]*slagingspercentages="([^"]+)"[^>]*chart-title="([^"]+)""#,
    )
    .unwrap()
});

pub fn extract(content: &str) -> ByTrack<SlagingPoint> {
    let mut out = ByTrack::new();
    for chart in charts("slagingspercentage", &CHART_RE, content) {
        let Some(track) = classify_track(&chart.title) else {
            continue;
        };
        let points = objects(&chart.data)
            .map(|item| SlagingPoint {
                schooljaar: str_or_empty(item, "schooljaar"),
                percentage: num_or_zero(item, "percentage"),
                vergelijking: num_or_zero(item, "vergelijking"),
            })
            .collect();
        out.insert(track.to_string(), points);
    }
    out
}
