use regex::Regex;
use std::sync::LazyLock;

use super::{charts, classify_track};
use crate::record::Doorstroom;

static CHART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<doorstroom-line-chart[^>]*periodes="([^"]+)"[^>]*chart-title="([^"]+)""#)
        .unwrap()
});

/// Progression charts: "onderbouw" is one combined series, "bovenbouw"
/// charts are split per track. Untracked bovenbouw charts are dropped.
/// Payloads are stored as decoded.
pub fn extract(content: &str) -> Doorstroom {
    let mut doorstroom = Doorstroom::default();

    for chart in charts("doorstroom", &CHART_RE, content) {
        if chart.title.contains("onderbouw") {
            doorstroom.onderbouw.insert("combined".into(), chart.data);
        } else if chart.title.contains("bovenbouw") {
            if let Some(track) = classify_track(&chart.title) {
                doorstroom.bovenbouw.insert(track.into(), chart.data);
            }
        }
    }

    doorstroom
}
