use regex::Regex;
use std::sync::LazyLock;

use crate::record::SchoolInfo;

static RESULTS_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title>Resultaten - ([^(]+)\s*\(").unwrap());
static SATISFACTION_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title>Tevredenheid - ([^(]+)\s*\(").unwrap());
static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<span class=school-adres>([^<]+)</span>").unwrap());
static POSTCODE_CITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<span class=school-postcode-woonplaats>([^<]+)</span>").unwrap()
});
// Dutch postal code: four digits, two capitals ("1017 RV").
static POSTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}\s*[A-Z]{2})\s+(.*)").unwrap());
static PUPILS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data-dfn="Het aantal leerlingen op de school\.">(\d+)\s*leerlingen"#).unwrap()
});

/// Identity fields of a results page. Every field is optional.
pub fn extract(content: &str) -> SchoolInfo {
    let mut info = SchoolInfo {
        name: capture_trimmed(&RESULTS_TITLE_RE, content),
        address: capture_trimmed(&ADDRESS_RE, content),
        ..Default::default()
    };

    if let Some(postcode_city) = capture_trimmed(&POSTCODE_CITY_RE, content) {
        match POSTCODE_RE.captures(&postcode_city) {
            Some(caps) => {
                info.postal_code = Some(caps[1].to_string());
                info.city = Some(caps[2].to_string());
            }
            None => info.city = Some(postcode_city),
        }
    }

    info.aantal_leerlingen = PUPILS_RE
        .captures(content)
        .and_then(|c| c[1].parse::<i64>().ok());

    info
}

/// A satisfaction page only carries the school name.
pub fn extract_satisfaction(content: &str) -> SchoolInfo {
    SchoolInfo {
        name: capture_trimmed(&SATISFACTION_TITLE_RE, content),
        ..Default::default()
    }
}

fn capture_trimmed(re: &Regex, content: &str) -> Option<String> {
    re.captures(content)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
}
