pub mod entry;
pub mod matcher;
pub mod normalize;
pub mod overrides;
pub mod store;

use anyhow::{Context, Result};
use itertools::Itertools;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::documents::read_json;
use crate::error::Unresolved;
use entry::{UpdateEntry, YearSummary};
use matcher::{Catalog, Matcher};
use normalize::normalize_track;
use overrides::OverrideTable;

const ENTRIES_FILE: &str = "gedetailleerde_schooldata.json";
const SUMMARY_FILE: &str = "jaar_samenvatting.json";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub updated: usize,
    pub skipped_ambiguous: usize,
    /// "<school> - <normalized track>" for every entry without a department.
    pub not_found: Vec<String>,
    pub year_summary_applied: bool,
}

impl RunSummary {
    pub fn print(&self, year: i64) {
        if self.year_summary_applied {
            println!("\n  Updated jaar_samenvatting for {}", year);
        }
        println!("\n--- Summary ---");
        println!("  Updated: {} entries", self.updated);
        println!("  Skipped (ambiguous): {} entries", self.skipped_ambiguous);
        println!("  Not found in DB: {} entries", self.not_found.len());

        if !self.not_found.is_empty() {
            println!("\nEntries not found in database:");
            for name in self.not_found.iter().sorted().dedup() {
                println!("  - {}", name);
            }
        }
    }
}

/// Apply the update files in `update_dir` to the existing store at
/// `db_path` for one year.
pub fn update_store(db_path: &Path, update_dir: &Path, year: i64) -> Result<RunSummary> {
    let conn = store::open(db_path)?;

    let entries: Vec<UpdateEntry> = read_json(&update_dir.join(ENTRIES_FILE))?;
    let summaries: BTreeMap<String, YearSummary> = read_json(&update_dir.join(SUMMARY_FILE))?;

    let catalog = Catalog::new(store::fetch_catalog(&conn).context("Failed to read department catalog")?);
    if catalog.is_empty() {
        warn!(path = ?db_path, "department catalog is empty; nothing can match");
    }
    let matcher = Matcher::new(catalog, OverrideTable::builtin());
    info!(entries = entries.len(), departments = matcher.catalog().len(), year, "starting update");

    run_update(&conn, &matcher, &entries, &summaries, year)
}

/// Resolve and apply every entry, one transaction each. Unresolved entries
/// are counted and skipped.
pub fn run_update(
    conn: &Connection,
    matcher: &Matcher,
    entries: &[UpdateEntry],
    summaries: &BTreeMap<String, YearSummary>,
    year: i64,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for entry in entries {
        let track = normalize_track(&entry.niveau);
        let department = match matcher.resolve(&entry.school, &entry.niveau) {
            Ok(m) => m,
            Err(Unresolved::Ambiguous) => {
                debug!(school = %entry.school, niveau = %track, "skipped: explicitly ambiguous");
                summary.skipped_ambiguous += 1;
                continue;
            }
            Err(Unresolved::NotFound) => {
                debug!(school = %entry.school, niveau = %track, "no department found");
                summary.not_found.push(format!("{} - {}", entry.school, track));
                continue;
            }
        };
        debug!(
            school = %entry.school,
            niveau = %track,
            afdeling = %department.department.naam,
            loting_school = %department.department.school_naam,
            method = department.method.as_str(),
            "resolved"
        );

        let tx = conn.unchecked_transaction()?;
        store::apply(&tx, department.department.id, year, &entry.facts(year))
            .with_context(|| format!("Failed to update {} - {}", entry.school, track))?;
        tx.commit()?;

        summary.updated += 1;
        println!("  {} - {}", entry.school, track);
    }

    if let Some(totals) = summaries.get(&year.to_string()) {
        store::upsert_year_summary(conn, year, totals)?;
        summary.year_summary_applied = true;
    }

    Ok(summary)
}
