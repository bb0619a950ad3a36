//! Input types of the yearly lottery update files.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// One (school, track) row of `gedetailleerde_schooldata.json`.
///
/// Capacity and placement totals are keyed by year; the preference counts
/// live under per-year keys such as `voorkeuren_2025`. Both are read per
/// year when facts are requested, so one bad value only drops that value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEntry {
    pub school: String,
    pub niveau: String,
    #[serde(default)]
    pub capaciteit: Value,
    #[serde(default)]
    pub geplaatst: Value,
    #[serde(flatten)]
    pub per_year: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Preferences {
    #[serde(deserialize_with = "whole")]
    pub eerste: Option<i64>,
    #[serde(deserialize_with = "whole")]
    pub tweede: Option<i64>,
    #[serde(deserialize_with = "whole")]
    pub derde: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlacedByPreference {
    #[serde(deserialize_with = "whole")]
    pub eerste: Option<i64>,
    #[serde(deserialize_with = "whole")]
    pub tweede: Option<i64>,
    #[serde(deserialize_with = "whole")]
    pub derde: Option<i64>,
    #[serde(deserialize_with = "whole")]
    pub vierde_plus: Option<i64>,
}

/// Counts arrive as integers, whole floats (`112.0`) or null.
fn count(value: &Value) -> Result<Option<i64>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .map(Some)
            .ok_or("not a whole number"),
        _ => Err("not a number"),
    }
}

fn whole<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
    count(&Value::deserialize(de)?).map_err(D::Error::custom)
}

impl PlacedByPreference {
    /// (preference position, count) for positions 1 to 4.
    pub fn ranks(&self) -> [(i64, Option<i64>); 4] {
        [
            (1, self.eerste),
            (2, self.tweede),
            (3, self.derde),
            (4, self.vierde_plus),
        ]
    }
}

/// Everything one entry contributes for a single year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactSet {
    pub capacity: Option<i64>,
    pub preferences: Option<Preferences>,
    pub placed: Option<i64>,
    pub placed_by_preference: Option<PlacedByPreference>,
}

impl UpdateEntry {
    pub fn facts(&self, year: i64) -> FactSet {
        let key = year.to_string();
        FactSet {
            capacity: self.yearly_count("capaciteit", &self.capaciteit, &key),
            preferences: self.year_group(&format!("voorkeuren_{key}")),
            placed: self.yearly_count("geplaatst", &self.geplaatst, &key),
            placed_by_preference: self.year_group(&format!("geplaatst_naar_voorkeur_{key}")),
        }
    }

    /// One year's value of a `{"<year>": count}` object. Anything malformed
    /// is logged and reads as no data.
    fn yearly_count(&self, field: &str, values: &Value, year: &str) -> Option<i64> {
        let value = match values {
            Value::Null => return None,
            Value::Object(by_year) => by_year.get(year)?,
            _ => {
                warn!(school = %self.school, niveau = %self.niveau, field, "expected counts keyed by year");
                return None;
            }
        };
        match count(value) {
            Ok(n) => n,
            Err(e) => {
                warn!(school = %self.school, niveau = %self.niveau, field, year, error = e, "ignoring malformed count");
                None
            }
        }
    }

    /// A per-year object. Missing, null and empty objects all mean "no data".
    fn year_group<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.per_year.get(key)?;
        if value.as_object().map_or(true, |m| m.is_empty()) {
            return None;
        }
        match serde_json::from_value(value.clone()) {
            Ok(group) => Some(group),
            Err(e) => {
                warn!(school = %self.school, niveau = %self.niveau, key, error = %e, "ignoring malformed group");
                None
            }
        }
    }
}

/// One year of `jaar_samenvatting.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct YearSummary {
    pub totaal_deelnemers: Option<i64>,
    pub totaal_capaciteit: Option<i64>,
    pub percentage_eerste_voorkeur: Option<f64>,
    pub percentage_top3: Option<f64>,
}
