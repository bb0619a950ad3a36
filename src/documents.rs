//! Scraped pages in, JSON artifacts out.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::parser::{self, DocumentKind, RawDocument};

/// `<dir>/<prefix>*.<ext>`, sorted by file name.
pub fn discover(dir: &Path, prefix: &str, ext: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read {:?}", dir))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| p.extension().is_some_and(|e| e == ext))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect();
    files.sort();
    Ok(files)
}

pub fn read_document(path: &Path, kind: DocumentKind) -> Result<RawDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(RawDocument {
        kind,
        label: stem(path),
        content,
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).with_context(|| format!("Failed to write {:?}", path))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {:?}", path))
}

pub struct ParseCounts {
    pub saved: usize,
    pub failed: usize,
}

/// Parse every results and satisfaction page in `html_dir` into
/// `json_dir/<stem>.json`. A page that fails is reported and skipped.
pub fn parse_all(html_dir: &Path, json_dir: &Path) -> Result<ParseCounts> {
    fs::create_dir_all(json_dir).with_context(|| format!("Failed to create {:?}", json_dir))?;

    let mut files = Vec::new();
    for kind in [DocumentKind::Results, DocumentKind::Satisfaction] {
        for path in discover(html_dir, kind.prefix(), "html")? {
            files.push((kind, path));
        }
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );

    let mut counts = ParseCounts { saved: 0, failed: 0 };
    for (kind, path) in files {
        let outcome = parse_one(&path, kind, json_dir);
        match outcome {
            Ok(_) => counts.saved += 1,
            Err(_) => counts.failed += 1,
        }
        // Printed around the bar so the lines also appear when it is hidden.
        let lines = report_lines(&path, &outcome);
        pb.suspend(|| {
            for line in &lines {
                println!("{}", line);
            }
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(counts)
}

fn report_lines(path: &Path, outcome: &Result<(PathBuf, Option<String>)>) -> Vec<String> {
    let mut lines = vec![format!("Processing: {}", file_name(path))];
    match outcome {
        Ok((out, name)) => {
            lines.push(format!("  -> Saved: {}", file_name(out)));
            lines.push(format!("     School: {}", name.as_deref().unwrap_or("Unknown")));
        }
        Err(e) => lines.push(format!("  -> Error: {:#}", e)),
    }
    lines
}

fn parse_one(path: &Path, kind: DocumentKind, json_dir: &Path) -> Result<(PathBuf, Option<String>)> {
    let doc = read_document(path, kind)?;
    let parsed = parser::process_document(&doc);
    let out = json_dir.join(format!("{}.json", doc.label));
    write_json(&out, &parsed)?;
    Ok((out, parsed.school_name().map(str::to_string)))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
