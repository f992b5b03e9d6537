//! Error taxonomy for the import pipeline
//!
//! Row-level problems are not errors in this sense: they are collected as
//! [`crate::violation::ValidationError`] values. The types here describe
//! failures that stop a step of the pipeline.

use thiserror::Error;

/// Fatal problem with the uploaded file itself. Raised before validation,
/// so no partial row data exists when one of these is returned.
#[derive(Debug, Error)]
pub enum FileFormatError {
    #[error("file is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("file could not be parsed: {0}")]
    Unreadable(String),

    #[error("no header row found")]
    MissingHeaders,

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("workbook has no sheet to read menu items from")]
    SheetNotFound,

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by a [`crate::store::MenuStore`]. The message coming
/// from the backing store is kept verbatim.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("{0}")]
    Store(String),

    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store data is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors returned by [`crate::importer::ImportSession`] transitions.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    #[error("import blocked by {count} validation error(s)")]
    ValidationFailed { count: usize },

    #[error("file contains no menu items")]
    NothingToImport,

    #[error("an import is already in progress")]
    AlreadyImporting,

    #[error(transparent)]
    FileFormat(#[from] FileFormatError),

    #[error("import failed: {0}")]
    Persistence(#[from] PersistenceError),
}

impl ImportError {
    /// Whether the caller can retry the same action without re-uploading.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ImportError::Persistence(_))
    }
}
