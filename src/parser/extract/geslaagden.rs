use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use tracing::debug;

use crate::parser::codec::decode_entities;
use crate::record::{ByTrack, ProfielRow};

// Level header rows: <tr><th>vwo</th>, <tr><th>havo</th>, <tr><th>vmbo-(g)t</th>
static LEVEL_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"<tr><th>(havo|vwo|vmbo(?:-\(g\)t)?)</th>")
        .case_insensitive(true)
        .build()
        .unwrap()
});
static SCOPE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</table>|<tr><th>").unwrap());
static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<tr><td>([^<]+)</td><td[^>]*>([^<]+)</td><td[^>]*>([^<]+)</td>").unwrap()
});

/// Exam profiles; subtotal and header rows never contain one of these.
const PROFILE_KEYWORDS: [&str; 6] = [
    "Cultuur",
    "Economie",
    "Natuur",
    "Maatschappij",
    "Techniek",
    "Gezondheid",
];

/// Pass counts per exam profile, read from the results tables. A level's
/// scope runs from its header row to the next header row or the end of the
/// table.
pub fn extract(content: &str) -> ByTrack<ProfielRow> {
    let mut out = ByTrack::new();
    let headers: Vec<_> = LEVEL_HEADER_RE.captures_iter(content).collect();

    for (i, caps) in headers.iter().enumerate() {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let next_start = headers
            .get(i + 1)
            .and_then(|c| c.get(0))
            .map_or(content.len(), |m| m.start());
        let mut scope = &content[whole.end..next_start];
        if let Some(end) = SCOPE_END_RE.find(scope) {
            scope = &scope[..end.start()];
        }

        let rows: Vec<_> = ROW_RE.captures_iter(scope).collect();
        if rows.is_empty() {
            continue;
        }
        let level = caps[1].to_lowercase();
        let profiles = rows
            .iter()
            .filter_map(|row| {
                let profiel = row[1].trim();
                if !is_profile(profiel) {
                    return None;
                }
                Some(ProfielRow {
                    profiel: profiel.to_string(),
                    deelnemers: decode_entities(row[2].trim()),
                    geslaagden: decode_entities(row[3].trim()),
                })
            })
            .collect();
        debug!(level = %level, rows = rows.len(), "profile table");
        out.insert(level, profiles);
    }

    out
}

fn is_profile(name: &str) -> bool {
    !name.is_empty()
        && name != "Profiel"
        && name != "Totaal"
        && PROFILE_KEYWORDS.iter().any(|k| name.contains(k))
}
