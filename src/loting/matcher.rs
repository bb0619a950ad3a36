//! Resolve free-text (school, track) pairs from the update file to a
//! department id in the lottery catalog.

use std::collections::HashMap;

use super::normalize::normalize_track;
use super::overrides::{Override, OverrideTable};
use crate::error::Unresolved;

/// One row of the department catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: i64,
    pub naam: String,
    pub school_naam: String,
}

/// Departments in ascending id order, with lower-cased names cached for
/// the substring scans.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<(String, CatalogEntry)>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(mut entries: Vec<CatalogEntry>) -> Self {
        entries.sort_by_key(|e| e.id);
        let entries: Vec<(String, CatalogEntry)> = entries
            .into_iter()
            .map(|e| (e.naam.to_lowercase(), e))
            .collect();

        let mut by_name = HashMap::new();
        for (idx, (lower, _)) in entries.iter().enumerate() {
            by_name.entry(lower.clone()).or_insert(idx);
        }
        Catalog { entries, by_name }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive exact name lookup. Duplicate names resolve to the
    /// lowest id.
    fn by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&idx| &self.entries[idx].1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    Override,
    Exact,
    Heuristic,
}

impl MatchMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMethod::Override => "override",
            MatchMethod::Exact => "exact",
            MatchMethod::Heuristic => "heuristic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentMatch<'a> {
    pub department: &'a CatalogEntry,
    pub method: MatchMethod,
}

pub struct Matcher {
    catalog: Catalog,
    overrides: OverrideTable,
}

impl Matcher {
    pub fn new(catalog: Catalog, overrides: OverrideTable) -> Self {
        Matcher { catalog, overrides }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Overrides first, then the literal "<school> - <track>" name, then the
    /// substring heuristic. An ambiguous override never falls through.
    pub fn resolve(&self, school: &str, track: &str) -> Result<DepartmentMatch<'_>, Unresolved> {
        let track = normalize_track(track);

        match self.overrides.get(school, &track) {
            Some(Override::Ambiguous) => return Err(Unresolved::Ambiguous),
            Some(Override::Department(name)) => {
                return self
                    .catalog
                    .by_name(name)
                    .map(|department| DepartmentMatch {
                        department,
                        method: MatchMethod::Override,
                    })
                    .ok_or(Unresolved::NotFound);
            }
            None => {}
        }

        if let Some(department) = self.catalog.by_name(&format!("{school} - {track}")) {
            return Ok(DepartmentMatch {
                department,
                method: MatchMethod::Exact,
            });
        }

        self.heuristic(school, &track)
            .map(|department| DepartmentMatch {
                department,
                method: MatchMethod::Heuristic,
            })
            .ok_or(Unresolved::NotFound)
    }

    /// First department (by id) whose name carries the track and either
    /// contains the whole school name, or its first two words and ends in
    /// exactly this track.
    fn heuristic(&self, school: &str, track: &str) -> Option<&CatalogEntry> {
        let school = school.to_lowercase();
        let words: Vec<&str> = school.split_whitespace().collect();

        self.catalog
            .entries
            .iter()
            .filter(|(lower, _)| lower.contains(track))
            .find(|(lower, _)| {
                lower.contains(&school)
                    || (words.len() >= 2
                        && words[..2].iter().all(|w| lower.contains(w))
                        && track_suffix(lower) == track)
            })
            .map(|(_, entry)| entry)
    }
}

/// Text after the last " - " separator of a department name.
fn track_suffix(name: &str) -> &str {
    name.rsplit_once(" - ").map_or(name, |(_, suffix)| suffix)
}
