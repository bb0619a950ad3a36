/// Track labels in the update files that the lottery catalog spells
/// differently.
const TRACK_SYNONYMS: [(&str, &str); 2] = [("havo", "v.a. havo"), ("vmbo-g-t", "v.a. vmbo-g-t")];

/// Canonical track label: lower-cased, trimmed, synonyms collapsed.
pub fn normalize_track(label: &str) -> String {
    let lower = label.trim().to_lowercase();
    TRACK_SYNONYMS
        .iter()
        .find(|(from, _)| *from == lower)
        .map(|(_, to)| to.to_string())
        .unwrap_or(lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms() {
        assert_eq!(normalize_track("havo"), "v.a. havo");
        assert_eq!(normalize_track(" Havo "), "v.a. havo");
        assert_eq!(normalize_track("VMBO-G-T"), "v.a. vmbo-g-t");
    }

    #[test]
    fn unmapped_passes_through_lowercased() {
        assert_eq!(normalize_track("VWO"), "vwo");
        assert_eq!(normalize_track("v.a. vmbo-b "), "v.a. vmbo-b");
        assert_eq!(normalize_track(""), "");
    }

    #[test]
    fn idempotent() {
        for label in ["havo", "HAVO", "vwo", "vmbo-g-t", "v.a. havo", " v.a. vmbo-k", "Gymnasium"] {
            let once = normalize_track(label);
            assert_eq!(normalize_track(&once), once, "{label}");
        }
    }
}
