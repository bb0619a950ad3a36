use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn an attribute payload into a JSON value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("attribute payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why an update entry could not be tied to a department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Unresolved {
    #[error("explicitly ambiguous")]
    Ambiguous,
    #[error("not found")]
    NotFound,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("lottery database not found at {0:?}; it holds historical data and must exist")]
    Missing(PathBuf),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
