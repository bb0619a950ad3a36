//! Extraction rules. Each rule scans the whole page text for one kind of
//! fragment and returns its own typed result; a rule that finds nothing
//! returns an empty value.

pub mod doorstroom;
pub mod examencijfers;
pub mod geslaagden;
pub mod inspectie;
pub mod schooladvies;
pub mod school;
pub mod slagingspercentage;
pub mod tevredenheid;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use super::codec::decode_attr;

/// Track keywords in precedence order.
pub const TRACKS: [&str; 3] = ["havo", "vwo", "vmbo"];

/// First track keyword found in a (lower-cased) chart title.
pub fn classify_track(title_lower: &str) -> Option<&'static str> {
    TRACKS.into_iter().find(|t| title_lower.contains(t))
}

/// A chart element with its decoded payload and lower-cased title.
pub struct Chart {
    pub data: Value,
    pub title: String,
}

/// Collect every chart matched by `re`, where group 1 is the escaped
/// payload and group 2 the chart title. Payloads that fail to decode are
/// skipped.
pub fn charts(rule: &str, re: &Regex, content: &str) -> Vec<Chart> {
    let mut out = Vec::new();
    for caps in re.captures_iter(content) {
        match decode_attr(&caps[1]) {
            Ok(data) => out.push(Chart {
                data,
                title: caps[2].to_lowercase(),
            }),
            Err(e) => warn!(rule, error = %e, "skipping chart with undecodable payload"),
        }
    }
    if out.is_empty() {
        debug!(rule, "no charts found");
    }
    out
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::Value;

    use crate::parser::codec::encode_attr;

    /// `<tag attr="payload" chart-title="title">` the way the site renders it.
    pub fn chart(tag: &str, attr: &str, payload: &Value, title: &str) -> String {
        format!(
            r#"<{tag} class="chart" {attr}="{}" chart-title="{title}"></{tag}>"#,
            encode_attr(payload)
        )
    }
}
