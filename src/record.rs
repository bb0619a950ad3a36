//! Shape of the intermediate JSON artifacts (`json/resultaten-*.json`,
//! `json/tevredenheid-*.json`). Field names are part of the on-disk format.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Series keyed by education track ("havo", "vwo", "vmbo", ...).
pub type ByTrack<T> = BTreeMap<String, Vec<T>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "postalCode", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "aantalLeerlingen", skip_serializing_if = "Option::is_none")]
    pub aantal_leerlingen: Option<i64>,
}

// ── Results page ──

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsRecord {
    pub school: SchoolInfo,
    pub doorstroom: Doorstroom,
    pub schooladvies: ByTrack<AdviesPoint>,
    pub slagingspercentage: ByTrack<SlagingPoint>,
    pub examencijfers: ByTrack<ExamenPoint>,
    #[serde(rename = "geslaagdenPerProfiel")]
    pub geslaagden_per_profiel: ByTrack<ProfielRow>,
    #[serde(rename = "oordeelInspectie")]
    pub oordeel_inspectie: OordeelInspectie,
}

/// Null text fields read as empty.
fn text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

/// Progression charts. `onderbouw` holds a single "combined" series,
/// `bovenbouw` one series per track. Payloads are kept exactly as decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Doorstroom {
    pub onderbouw: BTreeMap<String, Value>,
    pub bovenbouw: BTreeMap<String, Value>,
}

// Numeric fields are null when the source gave null; an absent source key
// reads as 0.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviesPoint {
    #[serde(default, deserialize_with = "text")]
    pub positie: String,
    #[serde(default)]
    pub percentage: Option<Number>,
    #[serde(default)]
    pub vergelijking: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlagingPoint {
    #[serde(default, deserialize_with = "text")]
    pub schooljaar: String,
    #[serde(default)]
    pub percentage: Option<Number>,
    #[serde(default)]
    pub vergelijking: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamenPoint {
    #[serde(default, deserialize_with = "text")]
    pub schooljaar: String,
    #[serde(rename = "centraalExamen", default)]
    pub centraal_examen: Option<Number>,
    #[serde(rename = "centraalExamenVergelijking", default)]
    pub centraal_examen_vergelijking: Option<Number>,
    #[serde(rename = "schoolExamen", default)]
    pub school_examen: Option<Number>,
    #[serde(default)]
    pub eindcijfer: Option<Number>,
}

/// Participants and passes per exam profile. Counts stay text because the
/// source prints suppressed values like "<5".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfielRow {
    #[serde(default, deserialize_with = "text")]
    pub profiel: String,
    #[serde(default, deserialize_with = "text")]
    pub deelnemers: String,
    #[serde(default, deserialize_with = "text")]
    pub geslaagden: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OordeelInspectie {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onderwijspositie: Option<Judgement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onderbouwsnelheid: Option<Judgement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bovenbouwsucces: Option<BTreeMap<String, Judgement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgement {
    #[serde(default)]
    pub inspectienorm: Option<Number>,
    #[serde(default)]
    pub schoolwaarde: Option<Number>,
    #[serde(default, deserialize_with = "text")]
    pub periode: String,
}

// ── Satisfaction page ──

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatisfactionRecord {
    pub school: SchoolInfo,
    pub trends: BTreeMap<String, Vec<TrendPoint>>,
    pub vragen: Vragen,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    #[serde(default, deserialize_with = "text")]
    pub schooljaar: String,
    #[serde(default)]
    pub cijfer: Option<Number>,
    #[serde(default)]
    pub vergelijking: Option<Number>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vragen {
    pub leerling: Vec<Vraag>,
    pub ouder: Vec<Vraag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vraag {
    #[serde(default, deserialize_with = "text")]
    pub vraag: String,
    #[serde(default)]
    pub cijfer: Option<Number>,
}
