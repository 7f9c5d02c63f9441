//! Error types shared across the tracker.
//!
//! Validation problems with user input, store failures and selection
//! mismatches are kept apart so each caller can decide which ones are fatal.

use std::path::PathBuf;

/// A user-entered scalar field could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid boolean value: '{0}'")]
    InvalidBool(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD or 'current'")]
    InvalidDate(String),
    #[error("invalid number: '{0}'")]
    InvalidNumber(String),
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Reading or writing the database failed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize database: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// An action could not be applied to the current selection.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(" Must select a project!")]
    NotAProject,
    #[error(" Must select a subproject!")]
    NotASubproject,
    #[error("no item selected")]
    NothingSelected,
    #[error("no {kind} named '{name}'")]
    NotFound { kind: &'static str, name: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}
