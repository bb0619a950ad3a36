//! Hand-maintained links from update-file school names to catalog
//! departments, for names the heuristic gets wrong or cannot decide.

use std::collections::HashMap;

use super::normalize::normalize_track;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
    /// Department display name in the catalog.
    Department(&'static str),
    /// Name is shared by several schools; never match it.
    Ambiguous,
}

use Override::{Ambiguous, Department};

/// (school as written in the update file, track, target)
const OVERRIDES: &[(&str, &str, Override)] = &[
    ("Berlage Lyceum - tto", "vwo", Department("Berlage Lyceum - Tweetalig - vwo")),
    ("Berlage Lyceum - tto", "v.a. havo", Department("Berlage Lyceum - Tweetalig - v.a. havo")),
    ("College", "v.a. havo", Ambiguous),
    ("College", "vwo", Ambiguous),
    ("Het Lyceum", "v.a. havo", Department("Cartesius Amsterdam - Het Lyceum - v.a. havo")),
    ("Het Lyceum", "vwo", Department("Cartesius Amsterdam - Het Lyceum - vwo")),
    ("College de Meer", "havo", Department("College De Meer - Havo potentie - v.a. vmbo-g-t")),
    ("College de Meer", "v.a. vmbo-b", Department("College De Meer - v.a. vmbo-b")),
    ("Comenius Lyceum", "v.a. havo", Department("Comenius Lyceum Amsterdam - v.a. havo")),
    ("Comenius Lyceum", "vwo", Department("Comenius Lyceum Amsterdam - vwo")),
    ("Lyceum", "v.a. havo", Ambiguous),
    ("Lyceum", "vwo", Ambiguous),
    ("Lyceum - Coderclass", "v.a. havo", Department("Metis Montessori Lyceum - Coderclass of Kunst & Co. - v.a. havo")),
    ("Lyceum - Coderclass", "vwo", Department("Metis Montessori Lyceum - Coderclass of Kunst & Co. - vwo")),
    ("Lyceum - Technasium", "v.a. havo", Department("Metis Montessori Lyceum - Technasium - v.a. havo")),
    ("Lyceum - Technasium", "vwo", Department("Metis Montessori Lyceum - Technasium - vwo")),
    ("Montessori Lyceum Amsterdam", "v.a. havo", Department("Montessori Lyceum Amsterdam - v.a. havo")),
    ("Montessori Lyceum Amsterdam", "vwo", Department("Montessori Lyceum Amsterdam - vwo")),
    ("Montessori Lyceum Amsterdam - Gymnasium", "vwo", Department("Montessori Lyceum Amsterdam - Gymnasium - vwo")),
    ("Montessori Lyceum Oostpoort", "v.a. havo", Department("Montessori Lyceum Oostpoort - v.a. havo")),
    ("Montessori Lyceum Oostpoort", "v.a. vmbo-b", Department("Montessori Lyceum Oostpoort - v.a. vmbo-b")),
    ("Montessori Lyceum Terra Nova", "v.a. havo", Department("Montessori Lyceum Terra Nova - v.a. havo")),
    ("Montessori Lyceum Terra Nova", "v.a. vmbo-b", Department("Montessori Lyceum Terra Nova - v.a. vmbo-b")),
    ("Montessori Lyceum Terra Nova", "v.a. vmbo-k", Department("Montessori Lyceum Terra Nova - v.a. vmbo-k")),
    ("Montessori Lyceum Terra Nova", "vwo", Department("Montessori Lyceum Terra Nova - vwo")),
    ("Cartesius Amsterdam - Het Lyceum", "v.a. havo", Department("Cartesius Amsterdam - Het Lyceum - v.a. havo")),
    ("Cartesius Amsterdam - Het Lyceum", "vwo", Department("Cartesius Amsterdam - Het Lyceum - vwo")),
    ("Cornelius Haga Lyceum", "v.a. havo", Department("Cornelius Haga Lyceum - v.a. havo")),
    ("Cornelius Haga Lyceum", "vwo", Department("Cornelius Haga Lyceum - vwo")),
    ("Gerrit van der Veen College", "v.a. havo", Department("Gerrit van der Veen College - v.a. havo")),
    ("Gerrit van der Veen College", "vwo", Department("Gerrit van der Veen College - vwo")),
    ("Pieter Nieuwland College", "v.a. havo", Department("Pieter Nieuwland College - v.a. havo")),
    ("Pieter Nieuwland College", "vwo", Department("Pieter Nieuwland College - vwo")),
    ("Havo de Hof", "v.a. havo", Department("Havo de Hof - v.a. havo")),
    ("Hervormd Lyceum West", "v.a. havo", Department("Hervormd Lyceum West - v.a. havo")),
    ("St. Nicolaaslyceum - Tweetalig Onderwijs", "v.a. havo", Department("St. Nicolaaslyceum - Tweetalig Onderwijs - v.a. havo")),
    ("St. Nicolaaslyceum - Tweetalig Onderwijs", "vwo", Department("St. Nicolaaslyceum - Tweetalig Onderwijs - vwo")),
    ("Hervormd Lyceum", "v.a. havo", Department("HLZ (Hervormd Lyceum Zuid) - v.a. havo")),
    ("Hervormd Lyceum", "vwo", Department("HLZ (Hervormd Lyceum Zuid) - vwo")),
    ("Mediacollege", "v.a. vmbo-b", Department("Mediacollege Amsterdam - v.a. vmbo-b")),
    ("Mediacollege", "v.a. vmbo-k", Department("Mediacollege Amsterdam - v.a. vmbo-k")),
    ("Yuverta VMBO", "v.a. vmbo-b", Department("Yuverta VMBO Amsterdam Oost - v.a. vmbo-b")),
    ("Yuverta VMBO", "vmbo-g-t", Department("Yuverta VMBO Amsterdam West - vmbo-g-t")),
    ("Damstede Lyceum", "v.a. havo", Department("Damstede - v.a. havo")),
    ("Damstede Lyceum", "vwo", Department("Damstede - vwo")),
    // The catalog spells these without "v.a.", unlike the normalized track.
    ("Mundus College", "vmbo-g-t", Department("Mundus College - vmbo-g-t")),
    ("TASC", "vmbo-g-t", Department("TASC - vmbo-g-t")),
];

/// Override lookup keyed by (school, normalized track).
#[derive(Debug, Clone)]
pub struct OverrideTable {
    entries: HashMap<(String, String), Override>,
}

impl OverrideTable {
    pub fn builtin() -> Self {
        Self::from_entries(OVERRIDES.iter().copied())
    }

    /// Tracks are normalized on insert so lookups only ever see canonical
    /// labels.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, &'static str, Override)>,
    {
        let entries = entries
            .into_iter()
            .map(|(school, track, target)| ((school.to_string(), normalize_track(track)), target))
            .collect();
        OverrideTable { entries }
    }

    pub fn get(&self, school: &str, normalized_track: &str) -> Option<Override> {
        self.entries
            .get(&(school.to_string(), normalized_track.to_string()))
            .copied()
    }
}
