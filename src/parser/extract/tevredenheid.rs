//! Satisfaction page: trend charts (pupils, parents, atmosphere, safety)
//! and the per-question score tables.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::warn;

use super::charts;
use crate::parser::codec::{decode_attr, decode_entities};
use crate::parser::fields::{objects, opt_num, parse_decimal_comma, str_or_empty};
use crate::record::{TrendPoint, Vraag, Vragen};

static TREND_CHART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<tevredenheid-vergelijking-line-chart[^>]*periodes="([^"]+)"[^>]*chart-title="([^"]+)"[^>]*>"#,
    )
    .unwrap()
});
static SFEER_RE: LazyLock<Regex> = LazyLock::new(|| heading_chart("Sfeer in de afgelopen jaren"));
static VEILIGHEID_RE: LazyLock<Regex> =
    LazyLock::new(|| heading_chart("Veiligheid in de afgelopen jaren"));

static PUPIL_DIALOG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Hoe tevreden zijn de leerlingen in \d{4}-\d{4}, uitgesplitst per vraag\?.*?</dialog>")
        .unwrap()
});
static PARENT_DIALOG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Hoe tevreden zijn de ouders in \d{4}-\d{4}, uitgesplitst per vraag\?.*?</dialog>")
        .unwrap()
});
static VWO_SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<h4>vwo</h4>(.*?)(?:</section>|</dialog>)").unwrap());
static QUESTION_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<tr><td>([^<]+)</td><td class=numeric[^>]*>([^<]*)</td>").unwrap()
});

/// The first trend chart after a fixed heading.
fn heading_chart(heading: &str) -> Regex {
    Regex::new(&format!(
        r#"(?s){}.*?<tevredenheid-vergelijking-line-chart[^>]*periodes="([^"]+)""#,
        regex::escape(heading)
    ))
    .unwrap()
}

pub fn extract_trends(content: &str) -> BTreeMap<String, Vec<TrendPoint>> {
    let mut trends = BTreeMap::new();

    for chart in charts("tevredenheid", &TREND_CHART_RE, content) {
        let metric = if chart.title.contains("vwo") && chart.title.contains("leerlingen") {
            "leerlingen"
        } else if chart.title.contains("ouders") {
            "ouders"
        } else {
            continue;
        };
        trends.insert(metric.to_string(), trend_points(&chart.data));
    }

    for (metric, re) in [("sfeer", &*SFEER_RE), ("veiligheid", &*VEILIGHEID_RE)] {
        let Some(caps) = re.captures(content) else {
            continue;
        };
        match decode_attr(&caps[1]) {
            Ok(data) => {
                trends.insert(metric.to_string(), trend_points(&data));
            }
            Err(e) => warn!(rule = metric, error = %e, "skipping trend chart"),
        }
    }

    trends
}

fn trend_points(data: &Value) -> Vec<TrendPoint> {
    objects(data)
        .map(|item| TrendPoint {
            schooljaar: str_or_empty(item, "schooljaar"),
            cijfer: opt_num(item, "cijfer"),
            vergelijking: opt_num(item, "cijferVergelijking"),
        })
        .collect()
}

/// Per-question scores. Pupil answers are limited to the vwo section of
/// their dialog; parent answers are not split by track.
pub fn extract_questions(content: &str) -> Vragen {
    let mut vragen = Vragen::default();

    if let Some(dialog) = PUPIL_DIALOG_RE.find(content) {
        if let Some(section) = VWO_SECTION_RE.captures(dialog.as_str()) {
            vragen.leerling = question_rows(&section[1]);
        }
    }
    if let Some(dialog) = PARENT_DIALOG_RE.find(content) {
        vragen.ouder = question_rows(dialog.as_str());
    }

    vragen
}

fn question_rows(scope: &str) -> Vec<Vraag> {
    QUESTION_ROW_RE
        .captures_iter(scope)
        .filter_map(|row| {
            let vraag = decode_entities(row[1].trim());
            if vraag.is_empty() {
                return None;
            }
            Some(Vraag {
                vraag,
                cijfer: parse_decimal_comma(&row[2]),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::codec::encode_attr;
    use serde_json::{json, Number};

    fn trend_chart(title: &str, data: &Value) -> String {
        format!(
            r#"<tevredenheid-vergelijking-line-chart periodes="{}" chart-title="{title}"></tevredenheid-vergelijking-line-chart>"#,
            encode_attr(data)
        )
    }

    #[test]
    fn titled_trends() {
        let page = [
            trend_chart(
                "Hoe tevreden waren de leerlingen de afgelopen jaren op het vwo?",
                &json!([{"schooljaar": "2022-2023", "cijfer": 6.9, "cijferVergelijking": 6.7}]),
            ),
            trend_chart(
                "Hoe tevreden waren de ouders de afgelopen jaren?",
                &json!([{"schooljaar": "2022-2023"}]),
            ),
            trend_chart(
                "Hoe tevreden waren de leerlingen de afgelopen jaren op de havo?",
                &json!([{"schooljaar": "2022-2023", "cijfer": 1}]),
            ),
        ]
        .join("\n");
        let t = extract_trends(&page);
        assert_eq!(t.len(), 2);
        assert_eq!(t["leerlingen"][0].cijfer, Number::from_f64(6.9));
        assert_eq!(t["ouders"][0].cijfer, None);
        assert_eq!(t["ouders"][0].vergelijking, None);
    }

    #[test]
    fn heading_anchored_trends_take_next_chart() {
        let page = format!(
            "<h3>Sfeer in de afgelopen jaren</h3>\n<p>uitleg</p>\n{}\n<h3>Veiligheid in de afgelopen jaren</h3>{}",
            trend_chart("Sfeer", &json!([{"schooljaar": "2021-2022", "cijfer": 7.2}])),
            trend_chart("Veiligheid", &json!([{"schooljaar": "2021-2022", "cijfer": 8.1}])),
        );
        let t = extract_trends(&page);
        assert_eq!(t["sfeer"][0].cijfer, Number::from_f64(7.2));
        assert_eq!(t["veiligheid"][0].cijfer, Number::from_f64(8.1));
    }

    #[test]
    fn heading_without_chart() {
        let t = extract_trends("<h3>Sfeer in de afgelopen jaren</h3><p>geen data</p>");
        assert!(t.is_empty());
    }

    const DIALOGS: &str = "<dialog><h3>Hoe tevreden zijn de leerlingen in 2023-2024, uitgesplitst per vraag?</h3>\
<section><h4>havo</h4><table><tr><td>Havo vraag</td><td class=numeric>5,0</td></tr></table></section>\
<section><h4>vwo</h4><table>\
<tr><td>Ik voel me veilig op school</td><td class=numeric data-x=1>7,8</td></tr>\
<tr><td>Lessen zijn &quot;leuk&quot;</td><td class=numeric>-</td></tr>\
</table></section></dialog>\
<dialog><h3>Hoe tevreden zijn de ouders in 2023-2024, uitgesplitst per vraag?</h3>\
<table><tr><td>Communicatie</td><td class=numeric>6,5</td></tr>\
<tr><td>Begeleiding</td><td class=numeric></td></tr></table></dialog>";

    #[test]
    fn questions_per_respondent() {
        let v = extract_questions(DIALOGS);
        assert_eq!(v.leerling.len(), 2);
        assert_eq!(v.leerling[0].vraag, "Ik voel me veilig op school");
        assert_eq!(v.leerling[0].cijfer, Number::from_f64(7.8));
        assert_eq!(v.leerling[1].vraag, "Lessen zijn \"leuk\"");
        assert_eq!(v.leerling[1].cijfer, None);
        assert_eq!(v.ouder.len(), 2);
        assert_eq!(v.ouder[1].cijfer, None);
    }

    #[test]
    fn no_dialogs() {
        assert_eq!(extract_questions("<p></p>"), Vragen::default());
    }
}
