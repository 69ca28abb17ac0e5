// ==========================================
// Windpark Settlement - API Error Types
// ==========================================
// Responsibility: map engine / repository errors to caller-facing errors
// Every variant names the offending park, field or record
// ==========================================

use crate::engine::error::SettlementError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API layer error
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Settlement errors
    // ==========================================
    #[error("invalid settlement configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid lease data: {0}")]
    InvalidData(String),

    #[error("settlement calculation failed: {0}")]
    CalculationFailed(String),

    #[error("no settlement configuration for park {park_id}, year {year}")]
    SettlementNotConfigured { park_id: String, year: i32 },

    #[error("settlement run exceeded {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    // ==========================================
    // Data access errors
    // ==========================================
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("import failed: {0}")]
    ImportError(String),

    // ==========================================
    // Generic
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<SettlementError> for ApiError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::Configuration(e) => ApiError::InvalidConfiguration(e.to_string()),
            SettlementError::Data(e) => ApiError::InvalidData(e.to_string()),
            SettlementError::Calculation(e) => ApiError::CalculationFailed(e.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("lock not acquired: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::UniqueConstraintViolation(msg)
            | RepositoryError::ForeignKeyViolation(msg) => ApiError::DatabaseError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidData(format!("stored field {}: {}", field, message))
            }
            RepositoryError::Data(e) => ApiError::InvalidData(e.to_string()),
            RepositoryError::Other(e) => ApiError::Other(e),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Repository(e) => e.into(),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl ApiError {
    /// Errors the caller can fix by changing inputs.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidConfiguration(_)
                | ApiError::InvalidData(_)
                | ApiError::SettlementNotConfigured { .. }
                | ApiError::ImportError(_)
        )
    }
}

/// Result alias
pub type ApiResult<T> = Result<T, ApiError>;
