use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::warn;

use crate::parser::codec::decode_attr;
use crate::parser::fields::{num_or_zero, objects, str_or_empty};
use crate::record::{Judgement, OordeelInspectie};

// The indicator is encoded in a `chart-<kind>` class, not in a title.
static CHART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<oordeel-inspectie-bar-chart[^>]*class="[^"]*chart-([^"]+)"[^>]*json-data="([^"]+)""#,
    )
    .unwrap()
});

/// Inspectorate judgements: two school-wide indicators plus upper-years
/// success per track.
pub fn extract(content: &str) -> OordeelInspectie {
    let mut oordeel = OordeelInspectie::default();

    for caps in CHART_RE.captures_iter(content) {
        let kind = &caps[1];
        let data = match decode_attr(&caps[2]) {
            Ok(d) => d,
            Err(e) => {
                warn!(rule = "oordeelInspectie", kind, error = %e, "skipping chart");
                continue;
            }
        };

        match kind {
            "onderwijspositie" => {
                if let Some(first) = objects(&data).next() {
                    oordeel.onderwijspositie = Some(judgement(first));
                }
            }
            "onderbouwsnelheid" => {
                if let Some(first) = objects(&data).next() {
                    oordeel.onderbouwsnelheid = Some(judgement(first));
                }
            }
            "bovenbouwsucces" => oordeel.bovenbouwsucces = Some(per_track(&data)),
            _ => {}
        }
    }

    oordeel
}

fn per_track(data: &Value) -> BTreeMap<String, Judgement> {
    objects(data)
        .filter_map(|item| {
            let level = str_or_empty(item, "onderwijssoort").to_lowercase();
            (!level.is_empty()).then(|| (level, judgement(item)))
        })
        .collect()
}

fn judgement(item: &Map<String, Value>) -> Judgement {
    Judgement {
        inspectienorm: num_or_zero(item, "inspectienorm"),
        schoolwaarde: num_or_zero(item, "schoolwaarde"),
        periode: format!(
            "{} t/m {}",
            str_or_empty(item, "schooljaarVan"),
            str_or_empty(item, "schooljaarTotEnMet")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::codec::encode_attr;
    use serde_json::{json, Number};

    fn chart(kind: &str, data: &Value) -> String {
        format!(
            r#"<oordeel-inspectie-bar-chart class="inspectie chart-{kind}" json-data="{}"></oordeel-inspectie-bar-chart>"#,
            encode_attr(data)
        )
    }

    #[test]
    fn all_three_indicators() {
        let page = [
            chart(
                "onderwijspositie",
                &json!([{"inspectienorm": 0.0, "schoolwaarde": 0.3, "schooljaarVan": "2020-2021", "schooljaarTotEnMet": "2022-2023"}]),
            ),
            chart(
                "onderbouwsnelheid",
                &json!([{"inspectienorm": 90, "schoolwaarde": 97.5, "schooljaarVan": "2020-2021", "schooljaarTotEnMet": "2022-2023"}]),
            ),
            chart(
                "bovenbouwsucces",
                &json!([
                    {"onderwijssoort": "HAVO", "inspectienorm": 75, "schoolwaarde": 80, "schooljaarVan": "2020-2021", "schooljaarTotEnMet": "2022-2023"},
                    {"onderwijssoort": "VWO", "inspectienorm": 80, "schoolwaarde": 88},
                    {"inspectienorm": 1}
                ]),
            ),
        ]
        .join("\n");

        let o = extract(&page);
        let pos = o.onderwijspositie.unwrap();
        assert_eq!(pos.periode, "2020-2021 t/m 2022-2023");
        assert_eq!(pos.schoolwaarde, Number::from_f64(0.3));
        assert_eq!(o.onderbouwsnelheid.unwrap().inspectienorm, Some(Number::from(90)));
        let bb = o.bovenbouwsucces.unwrap();
        assert_eq!(bb.len(), 2);
        assert_eq!(bb["vwo"].periode, " t/m ");
        assert_eq!(bb["havo"].schoolwaarde, Some(Number::from(80)));
    }

    #[test]
    fn null_school_value_is_kept() {
        let o = extract(&chart(
            "onderbouwsnelheid",
            &json!([{"inspectienorm": 90, "schoolwaarde": null, "schooljaarVan": "2021-2022", "schooljaarTotEnMet": "2023-2024"}]),
        ));
        let j = o.onderbouwsnelheid.unwrap();
        assert_eq!(j.schoolwaarde, None);
        assert_eq!(j.inspectienorm, Some(Number::from(90)));
    }

    #[test]
    fn empty_indicator_payload() {
        let o = extract(&chart("onderwijspositie", &json!([])));
        assert!(o.onderwijspositie.is_none());
        let o = extract(&chart("bovenbouwsucces", &json!([])));
        assert_eq!(o.bovenbouwsucces, Some(BTreeMap::new()));
    }

    #[test]
    fn absent() {
        assert_eq!(extract(""), OordeelInspectie::default());
    }
}
