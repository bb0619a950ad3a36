pub mod codec;
pub mod extract;
pub mod fields;

use serde::Serialize;

use crate::record::{ResultsRecord, SatisfactionRecord};
use extract::{
    doorstroom, examencijfers, geslaagden, inspectie, school, schooladvies, slagingspercentage,
    tevredenheid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Results,
    Satisfaction,
}

impl DocumentKind {
    /// File name prefix of scraped pages of this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            DocumentKind::Results => "resultaten-",
            DocumentKind::Satisfaction => "tevredenheid-",
        }
    }
}

/// One scraped page.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub kind: DocumentKind,
    pub label: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedDocument {
    Results(ResultsRecord),
    Satisfaction(SatisfactionRecord),
}

impl ParsedDocument {
    pub fn school_name(&self) -> Option<&str> {
        match self {
            ParsedDocument::Results(r) => r.school.name.as_deref(),
            ParsedDocument::Satisfaction(s) => s.school.name.as_deref(),
        }
    }
}

pub fn process_document(doc: &RawDocument) -> ParsedDocument {
    match doc.kind {
        DocumentKind::Results => ParsedDocument::Results(assemble_results(&doc.content)),
        DocumentKind::Satisfaction => {
            ParsedDocument::Satisfaction(assemble_satisfaction(&doc.content))
        }
    }
}

/// Run every results rule once. Categories without fragments come back
/// empty, so the record shape never depends on the page.
pub fn assemble_results(content: &str) -> ResultsRecord {
    ResultsRecord {
        school: school::extract(content),
        doorstroom: doorstroom::extract(content),
        schooladvies: schooladvies::extract(content),
        slagingspercentage: slagingspercentage::extract(content),
        examencijfers: examencijfers::extract(content),
        geslaagden_per_profiel: geslaagden::extract(content),
        oordeel_inspectie: inspectie::extract(content),
    }
}

pub fn assemble_satisfaction(content: &str) -> SatisfactionRecord {
    SatisfactionRecord {
        school: school::extract_satisfaction(content),
        trends: tevredenheid::extract_trends(content),
        vragen: tevredenheid::extract_questions(content),
    }
}
