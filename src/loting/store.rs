//! The lottery/matching SQLite store. It holds previous years' data, so it
//! is only ever opened, read and updated, never created.

use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;

use super::entry::{FactSet, YearSummary};
use super::matcher::CatalogEntry;
use crate::error::StoreError;

pub fn open(path: &Path) -> Result<Connection, StoreError> {
    if !path.is_file() {
        return Err(StoreError::Missing(path.to_path_buf()));
    }
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

pub fn fetch_catalog(conn: &Connection) -> Result<Vec<CatalogEntry>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.naam, s.naam
         FROM afdeling a
         JOIN loting_school s ON a.school_id = s.id
         ORDER BY a.id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CatalogEntry {
                id: row.get(0)?,
                naam: row.get(1)?,
                school_naam: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Department facts ──

/// Upsert the four fact groups of one department for one year. Scalar
/// groups merge field by field; the preference breakdown is replaced as a
/// whole.
pub fn apply(conn: &Connection, afdeling_id: i64, jaar: i64, facts: &FactSet) -> Result<(), StoreError> {
    if let Some(capacity) = facts.capacity {
        if exists(conn, "capaciteit", afdeling_id, jaar)? {
            conn.execute(
                "UPDATE capaciteit SET definitieve_capaciteit = ?3
                 WHERE afdeling_id = ?1 AND jaar = ?2",
                params![afdeling_id, jaar, capacity],
            )?;
        } else {
            conn.execute(
                "INSERT INTO capaciteit (afdeling_id, jaar, definitieve_capaciteit)
                 VALUES (?1, ?2, ?3)",
                params![afdeling_id, jaar, capacity],
            )?;
        }
    }

    if let Some(pref) = &facts.preferences {
        if exists(conn, "voorkeuren", afdeling_id, jaar)? {
            conn.execute(
                "UPDATE voorkeuren SET
                    eerste_voorkeur = COALESCE(?3, eerste_voorkeur),
                    tweede_voorkeur = COALESCE(?4, tweede_voorkeur),
                    derde_voorkeur  = COALESCE(?5, derde_voorkeur)
                 WHERE afdeling_id = ?1 AND jaar = ?2",
                params![afdeling_id, jaar, pref.eerste, pref.tweede, pref.derde],
            )?;
        } else {
            conn.execute(
                "INSERT INTO voorkeuren (afdeling_id, jaar, eerste_voorkeur, tweede_voorkeur, derde_voorkeur)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![afdeling_id, jaar, pref.eerste, pref.tweede, pref.derde],
            )?;
        }
    }

    if let Some(placed) = facts.placed {
        if exists(conn, "plaatsingen", afdeling_id, jaar)? {
            conn.execute(
                "UPDATE plaatsingen SET totaal_geplaatst = ?3
                 WHERE afdeling_id = ?1 AND jaar = ?2",
                params![afdeling_id, jaar, placed],
            )?;
        } else {
            conn.execute(
                "INSERT INTO plaatsingen (afdeling_id, jaar, totaal_geplaatst)
                 VALUES (?1, ?2, ?3)",
                params![afdeling_id, jaar, placed],
            )?;
        }
    }

    if let Some(breakdown) = &facts.placed_by_preference {
        conn.execute(
            "DELETE FROM plaatsing_per_voorkeur WHERE afdeling_id = ?1 AND jaar = ?2",
            params![afdeling_id, jaar],
        )?;
        let mut insert = conn.prepare(
            "INSERT INTO plaatsing_per_voorkeur (afdeling_id, jaar, voorkeur_positie, aantal)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (positie, aantal) in breakdown.ranks() {
            if let Some(aantal) = aantal.filter(|&n| n > 0) {
                insert.execute(params![afdeling_id, jaar, positie, aantal])?;
            }
        }
    }

    Ok(())
}

/// `table` is always one of the fixed table names above.
fn exists(conn: &Connection, table: &str, afdeling_id: i64, jaar: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE afdeling_id = ?1 AND jaar = ?2)"),
        params![afdeling_id, jaar],
        |row| row.get(0),
    )
}

// ── Year summary ──

pub fn upsert_year_summary(conn: &Connection, jaar: i64, s: &YearSummary) -> Result<(), StoreError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM jaar_samenvatting WHERE jaar = ?1)",
        params![jaar],
        |row| row.get(0),
    )?;
    if exists {
        conn.execute(
            "UPDATE jaar_samenvatting SET
                totaal_deelnemers          = COALESCE(?2, totaal_deelnemers),
                totaal_capaciteit          = COALESCE(?3, totaal_capaciteit),
                percentage_eerste_voorkeur = COALESCE(?4, percentage_eerste_voorkeur),
                percentage_top3            = COALESCE(?5, percentage_top3)
             WHERE jaar = ?1",
            params![
                jaar,
                s.totaal_deelnemers,
                s.totaal_capaciteit,
                s.percentage_eerste_voorkeur,
                s.percentage_top3
            ],
        )?;
    } else {
        conn.execute(
            "INSERT INTO jaar_samenvatting
                (jaar, totaal_deelnemers, totaal_capaciteit, percentage_eerste_voorkeur, percentage_top3)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                jaar,
                s.totaal_deelnemers,
                s.totaal_capaciteit,
                s.percentage_eerste_voorkeur,
                s.percentage_top3
            ],
        )?;
    }
    Ok(())
}

/// Schema of the tables this module touches, for tests.
#[cfg(test)]
pub(crate) fn fixture_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE loting_school (id INTEGER PRIMARY KEY, naam TEXT NOT NULL);
        CREATE TABLE afdeling (
            id        INTEGER PRIMARY KEY,
            naam      TEXT NOT NULL,
            school_id INTEGER NOT NULL REFERENCES loting_school(id)
        );
        CREATE TABLE capaciteit (afdeling_id INTEGER, jaar INTEGER, definitieve_capaciteit INTEGER);
        CREATE TABLE voorkeuren (
            afdeling_id     INTEGER,
            jaar            INTEGER,
            eerste_voorkeur INTEGER,
            tweede_voorkeur INTEGER,
            derde_voorkeur  INTEGER
        );
        CREATE TABLE plaatsingen (afdeling_id INTEGER, jaar INTEGER, totaal_geplaatst INTEGER);
        CREATE TABLE plaatsing_per_voorkeur (
            afdeling_id     INTEGER,
            jaar            INTEGER,
            voorkeur_positie INTEGER,
            aantal          INTEGER
        );
        CREATE TABLE jaar_samenvatting (
            jaar                       INTEGER PRIMARY KEY,
            totaal_deelnemers          INTEGER,
            totaal_capaciteit          INTEGER,
            percentage_eerste_voorkeur REAL,
            percentage_top3            REAL
        );
        ",
    )
}
