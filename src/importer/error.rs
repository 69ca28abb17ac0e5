// ==========================================
// Windpark Settlement - Import Error Types
// ==========================================
// Tool: thiserror derive
// Row numbers are 1-based file lines (header = line 1)
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// Import layer error
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (only .csv)")]
    UnsupportedFormat(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    // ===== Mapping errors =====
    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("missing value (row {row}, field {field})")]
    MissingField { row: usize, field: String },

    #[error("unknown plot area category (row {row}): '{value}'")]
    UnknownCategory { row: usize, value: String },

    #[error("lease {lease_id} has conflicting lessor (row {row}): expected {expected}, found {found}")]
    InconsistentLessor {
        row: usize,
        lease_id: String,
        expected: String,
        found: String,
    },

    // ===== Persistence =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;
