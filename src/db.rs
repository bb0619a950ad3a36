//! The scholen store: a VWO-only SQLite view over the parsed artifacts,
//! rebuilt from scratch on every load.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde_json::Number;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::documents::{discover, read_json};
use crate::parser::fields::{objects, opt_num, str_or_empty};
use crate::parser::DocumentKind;
use crate::record::{Judgement, ResultsRecord, SatisfactionRecord};

/// Track whose series are loaded from the per-track categories.
const TRACK: &str = "vwo";

pub const TABLES: [&str; 10] = [
    "schools",
    "doorstroom_onderbouw",
    "doorstroom_bovenbouw",
    "schooladvies",
    "slagingspercentage",
    "examencijfers",
    "geslaagden_per_profiel",
    "oordeel_inspectie",
    "tevredenheid_trend",
    "tevredenheid_vragen",
];

/// Remove any previous database at `path` and open a fresh one.
pub fn recreate(path: &Path) -> Result<Connection> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {:?}", path))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE schools (
            id                INTEGER PRIMARY KEY,
            name              TEXT NOT NULL,
            address           TEXT,
            postal_code       TEXT,
            city              TEXT,
            aantal_leerlingen INTEGER
        );

        CREATE TABLE doorstroom_onderbouw (
            school_id  INTEGER NOT NULL REFERENCES schools(id),
            schooljaar TEXT NOT NULL,
            percentage REAL
        );

        CREATE TABLE doorstroom_bovenbouw (
            school_id  INTEGER NOT NULL REFERENCES schools(id),
            schooljaar TEXT NOT NULL,
            percentage REAL
        );

        CREATE TABLE schooladvies (
            school_id    INTEGER NOT NULL REFERENCES schools(id),
            positie      TEXT NOT NULL,
            percentage   REAL,
            vergelijking REAL
        );

        CREATE TABLE slagingspercentage (
            school_id    INTEGER NOT NULL REFERENCES schools(id),
            schooljaar   TEXT NOT NULL,
            percentage   REAL,
            vergelijking REAL
        );

        CREATE TABLE examencijfers (
            school_id                    INTEGER NOT NULL REFERENCES schools(id),
            schooljaar                   TEXT NOT NULL,
            centraal_examen              REAL,
            centraal_examen_vergelijking REAL,
            school_examen                REAL,
            eindcijfer                   REAL
        );

        -- Counts stay text: the source prints suppressed values such as '<5'
        CREATE TABLE geslaagden_per_profiel (
            school_id  INTEGER NOT NULL REFERENCES schools(id),
            profiel    TEXT NOT NULL,
            deelnemers TEXT,
            geslaagden TEXT
        );

        CREATE TABLE oordeel_inspectie (
            school_id     INTEGER NOT NULL REFERENCES schools(id),
            indicator     TEXT NOT NULL,
            inspectienorm REAL,
            schoolwaarde  REAL,
            periode       TEXT
        );

        CREATE TABLE tevredenheid_trend (
            school_id    INTEGER NOT NULL REFERENCES schools(id),
            metric       TEXT NOT NULL,
            schooljaar   TEXT NOT NULL,
            cijfer       REAL,
            vergelijking REAL
        );

        CREATE TABLE tevredenheid_vragen (
            school_id  INTEGER NOT NULL REFERENCES schools(id),
            respondent TEXT NOT NULL,
            vraag      TEXT NOT NULL,
            cijfer     REAL
        );
        ",
    )?;
    Ok(())
}

fn real(n: Option<&Number>) -> Option<f64> {
    n.and_then(Number::as_f64)
}

// ── Results ──

pub fn insert_school(conn: &Connection, school_id: i64, rec: &ResultsRecord) -> Result<()> {
    let s = &rec.school;
    conn.execute(
        "INSERT INTO schools (id, name, address, postal_code, city, aantal_leerlingen)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            school_id,
            s.name.as_deref().unwrap_or("Unknown"),
            s.address,
            s.postal_code,
            s.city,
            s.aantal_leerlingen
        ],
    )?;

    let mut stmt = conn.prepare(
        "INSERT INTO doorstroom_onderbouw (school_id, schooljaar, percentage) VALUES (?1, ?2, ?3)",
    )?;
    for p in rec.doorstroom.onderbouw.get("combined").into_iter().flat_map(objects) {
        let percentage = opt_num(p, "percentage");
        stmt.execute(params![school_id, str_or_empty(p, "schooljaar"), real(percentage.as_ref())])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO doorstroom_bovenbouw (school_id, schooljaar, percentage) VALUES (?1, ?2, ?3)",
    )?;
    for p in rec.doorstroom.bovenbouw.get(TRACK).into_iter().flat_map(objects) {
        let percentage = opt_num(p, "percentage");
        stmt.execute(params![school_id, str_or_empty(p, "schooljaar"), real(percentage.as_ref())])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO schooladvies (school_id, positie, percentage, vergelijking) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for p in rec.schooladvies.get(TRACK).into_iter().flatten() {
        stmt.execute(params![school_id, p.positie, real(p.percentage.as_ref()), real(p.vergelijking.as_ref())])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO slagingspercentage (school_id, schooljaar, percentage, vergelijking)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for p in rec.slagingspercentage.get(TRACK).into_iter().flatten() {
        stmt.execute(params![school_id, p.schooljaar, real(p.percentage.as_ref()), real(p.vergelijking.as_ref())])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO examencijfers (school_id, schooljaar, centraal_examen,
                                    centraal_examen_vergelijking, school_examen, eindcijfer)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for p in rec.examencijfers.get(TRACK).into_iter().flatten() {
        stmt.execute(params![
            school_id,
            p.schooljaar,
            real(p.centraal_examen.as_ref()),
            real(p.centraal_examen_vergelijking.as_ref()),
            real(p.school_examen.as_ref()),
            real(p.eindcijfer.as_ref())
        ])?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO geslaagden_per_profiel (school_id, profiel, deelnemers, geslaagden)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for row in rec.geslaagden_per_profiel.get(TRACK).into_iter().flatten() {
        stmt.execute(params![school_id, row.profiel, row.deelnemers, row.geslaagden])?;
    }

    let oordeel = &rec.oordeel_inspectie;
    let judgements = [
        ("onderwijspositie", oordeel.onderwijspositie.as_ref()),
        ("onderbouwsnelheid", oordeel.onderbouwsnelheid.as_ref()),
        (
            "bovenbouwsucces",
            oordeel.bovenbouwsucces.as_ref().and_then(|m| m.get(TRACK)),
        ),
    ];
    for (indicator, judgement) in judgements {
        if let Some(j) = judgement {
            insert_judgement(conn, school_id, indicator, j)?;
        }
    }

    Ok(())
}

fn insert_judgement(conn: &Connection, school_id: i64, indicator: &str, j: &Judgement) -> Result<()> {
    conn.execute(
        "INSERT INTO oordeel_inspectie (school_id, indicator, inspectienorm, schoolwaarde, periode)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![school_id, indicator, real(j.inspectienorm.as_ref()), real(j.schoolwaarde.as_ref()), j.periode],
    )?;
    Ok(())
}

// ── Satisfaction ──

pub fn insert_satisfaction(conn: &Connection, school_id: i64, rec: &SatisfactionRecord) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO tevredenheid_trend (school_id, metric, schooljaar, cijfer, vergelijking)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (metric, points) in &rec.trends {
        for p in points {
            stmt.execute(params![
                school_id,
                metric,
                p.schooljaar,
                real(p.cijfer.as_ref()),
                real(p.vergelijking.as_ref())
            ])?;
        }
    }

    let mut stmt = conn.prepare(
        "INSERT INTO tevredenheid_vragen (school_id, respondent, vraag, cijfer) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (respondent, vragen) in [("leerling", &rec.vragen.leerling), ("ouder", &rec.vragen.ouder)] {
        for v in vragen {
            stmt.execute(params![school_id, respondent, v.vraag, real(v.cijfer.as_ref())])?;
        }
    }
    Ok(())
}

// ── Loader ──

pub fn table_counts(conn: &Connection) -> Result<Vec<(&'static str, i64)>> {
    TABLES
        .iter()
        .map(|&table| -> Result<(&'static str, i64)> {
            let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
            Ok((table, n))
        })
        .collect()
}

/// Rebuild the database at `db_path` from the artifacts in `json_dir`.
/// School ids follow sorted artifact order, starting at 1. Satisfaction
/// artifacts attach to the school with exactly the same name. Artifacts
/// that cannot be read are reported and skipped; they take no id.
pub fn load(json_dir: &Path, db_path: &Path) -> Result<()> {
    let conn = recreate(db_path)?;
    let tx = conn.unchecked_transaction()?;

    let mut ids: HashMap<String, i64> = HashMap::new();
    let mut next_id = 1;
    for path in discover(json_dir, DocumentKind::Results.prefix(), "json")? {
        println!("Loading: {}", display_name(&path));
        let Some(rec) = read_artifact::<ResultsRecord>(&path) else {
            continue;
        };
        let school_id = next_id;
        insert_school(&tx, school_id, &rec)
            .with_context(|| format!("Failed to load {:?}", path))?;
        next_id += 1;
        let name = rec.school.name.unwrap_or_else(|| "Unknown".to_string());
        println!("  -> {}", name);
        ids.insert(name, school_id);
    }

    println!("\n--- Loading Tevredenheid Data ---");
    for path in discover(json_dir, DocumentKind::Satisfaction.prefix(), "json")? {
        println!("Loading: {}", display_name(&path));
        let Some(rec) = read_artifact::<SatisfactionRecord>(&path) else {
            continue;
        };
        let name = rec.school.name.as_deref().unwrap_or("");
        match ids.get(name) {
            Some(&school_id) => {
                insert_satisfaction(&tx, school_id, &rec)
                    .with_context(|| format!("Failed to load {:?}", path))?;
                println!("  -> {}", name);
            }
            None => {
                warn!(school = name, "satisfaction artifact has no matching school");
                println!("  -> Warning: No matching school found for '{}'", name);
            }
        }
    }

    tx.commit()?;

    println!("\n--- Database Summary ---");
    for (table, n) in table_counts(&conn)? {
        println!("{}: {} rows", table, n);
    }
    println!("\nDatabase saved to: {}", db_path.display());
    Ok(())
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    match read_json(path) {
        Ok(rec) => Some(rec),
        Err(e) => {
            warn!(path = ?path, error = %e, "skipping unreadable artifact");
            println!("  -> Error: {:#}", e);
            None
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::write_json;
    use serde_json::json;

    fn memory() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        table_counts(conn)
            .unwrap()
            .into_iter()
            .find(|(t, _)| *t == table)
            .map(|(_, n)| n)
            .unwrap()
    }

    fn results() -> ResultsRecord {
        serde_json::from_value(json!({
            "school": {"name": "Test Lyceum", "city": "Amsterdam", "aantalLeerlingen": 900},
            "doorstroom": {
                "onderbouw": {"combined": [{"schooljaar": "2022-2023", "percentage": 91.2}]},
                "bovenbouw": {
                    "vwo": [{"schooljaar": "2022-2023", "percentage": 88}],
                    "havo": [{"schooljaar": "2022-2023", "percentage": 80}]
                }
            },
            "schooladvies": {"vwo": [{"positie": "boven", "percentage": 12.5, "vergelijking": 10}]},
            "slagingspercentage": {
                "vwo": [{"schooljaar": "2023-2024", "percentage": 95, "vergelijking": 91.1}],
                "havo": [{"schooljaar": "2023-2024", "percentage": 85, "vergelijking": 88.0}]
            },
            "examencijfers": {},
            "geslaagdenPerProfiel": {"vwo": [{"profiel": "Natuur en Techniek", "deelnemers": "<5", "geslaagden": "<5"}]},
            "oordeelInspectie": {
                "onderwijspositie": {"inspectienorm": 0, "schoolwaarde": 0.4, "periode": "2021-2022 t/m 2023-2024"},
                "bovenbouwsucces": {
                    "havo": {"inspectienorm": 80, "schoolwaarde": 85, "periode": "x"},
                    "vwo": {"inspectienorm": 82, "schoolwaarde": 90, "periode": "x"}
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn only_vwo_series_are_loaded() {
        let conn = memory();
        insert_school(&conn, 1, &results()).unwrap();

        assert_eq!(count(&conn, "schools"), 1);
        assert_eq!(count(&conn, "doorstroom_onderbouw"), 1);
        assert_eq!(count(&conn, "doorstroom_bovenbouw"), 1);
        assert_eq!(count(&conn, "slagingspercentage"), 1);
        assert_eq!(count(&conn, "examencijfers"), 0);
        assert_eq!(count(&conn, "oordeel_inspectie"), 2);

        let norm: f64 = conn
            .query_row(
                "SELECT inspectienorm FROM oordeel_inspectie WHERE indicator = 'bovenbouwsucces'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(norm, 82.0);
        let deelnemers: String = conn
            .query_row("SELECT deelnemers FROM geslaagden_per_profiel", [], |r| r.get(0))
            .unwrap();
        assert_eq!(deelnemers, "<5");
    }

    #[test]
    fn load_assigns_ids_and_joins_satisfaction_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let json_dir = dir.path().join("json");
        fs::create_dir_all(&json_dir).unwrap();

        let mut b = results();
        b.school.name = Some("B College".into());
        write_json(&json_dir.join("resultaten-b.json"), &b).unwrap();
        write_json(&json_dir.join("resultaten-a.json"), &results()).unwrap();

        let sat = |name: &str| -> SatisfactionRecord {
            serde_json::from_value(json!({
                "school": {"name": name},
                "trends": {"leerlingen": [{"schooljaar": "2023-2024", "cijfer": 6.8, "vergelijking": null}]},
                "vragen": {"leerling": [{"vraag": "Veilig?", "cijfer": 7.5}], "ouder": []}
            }))
            .unwrap()
        };
        write_json(&json_dir.join("tevredenheid-b.json"), &sat("B College")).unwrap();
        write_json(&json_dir.join("tevredenheid-z.json"), &sat("Zomaar School")).unwrap();

        let db_path = dir.path().join("scholen.sqlite");
        fs::write(&db_path, "stale").unwrap();
        load(&json_dir, &db_path).unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let id: i64 = conn
            .query_row("SELECT id FROM schools WHERE name = 'B College'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(id, 2);
        let trend_school: i64 = conn
            .query_row("SELECT school_id FROM tevredenheid_trend", [], |r| r.get(0))
            .unwrap();
        assert_eq!(trend_school, 2);
        assert_eq!(count(&conn, "tevredenheid_vragen"), 1);
    }

    #[test]
    fn nulls_load_and_broken_artifacts_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let json_dir = dir.path().join("json");
        fs::create_dir_all(&json_dir).unwrap();

        fs::write(json_dir.join("resultaten-a.json"), "{ not json").unwrap();
        fs::write(
            json_dir.join("resultaten-b.json"),
            json!({
                "school": {"name": "Null College"},
                "doorstroom": {"onderbouw": {"combined": [
                    {"schooljaar": "2022-2023", "percentageVergelijking": 88.0},
                    {"schooljaar": null, "percentage": 50}
                ]}},
                "slagingspercentage": {"vwo": [{"schooljaar": "2023-2024", "percentage": null, "vergelijking": 90}]},
                "examencijfers": {"vwo": [{"schooljaar": "2023-2024", "centraalExamen": null,
                    "centraalExamenVergelijking": 6.4, "schoolExamen": 6.9, "eindcijfer": 6.6}]}
            })
            .to_string(),
        )
        .unwrap();
        fs::write(json_dir.join("tevredenheid-a.json"), "").unwrap();

        let db_path = dir.path().join("scholen.sqlite");
        load(&json_dir, &db_path).unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let (id, name): (i64, String) = conn
            .query_row("SELECT id, name FROM schools", [], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap();
        assert_eq!((id, name.as_str()), (1, "Null College"));

        let pct: Option<f64> = conn
            .query_row("SELECT percentage FROM slagingspercentage", [], |r| r.get(0))
            .unwrap();
        assert_eq!(pct, None);
        let ce: Option<f64> = conn
            .query_row("SELECT centraal_examen FROM examencijfers", [], |r| r.get(0))
            .unwrap();
        assert_eq!(ce, None);

        let mut stmt = conn
            .prepare("SELECT schooljaar, percentage FROM doorstroom_onderbouw ORDER BY rowid")
            .unwrap();
        let rows: Vec<(String, Option<f64>)> = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows, [("2022-2023".to_string(), None), (String::new(), Some(50.0))]);
    }
}
