// ==========================================
// Windpark Settlement - Engine Error Types
// ==========================================
// Tool: thiserror derive
// A run either yields a full result or fails as a whole.
// ==========================================

use crate::domain::types::UnknownAreaCategory;
use thiserror::Error;

/// Invalid settlement configuration. Requires operator correction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("total revenue must not be negative: {0}")]
    NegativeRevenue(String),

    #[error("minimum rent per turbine must not be negative: {0}")]
    NegativeMinimumRent(String),

    #[error("{field} must be within [0, 100], got {value}")]
    PercentageOutOfRange { field: &'static str, value: String },

    #[error("WEA share ({wea}) + Pool share ({pool}) exceed 100 percent")]
    SharesExceedTotal { wea: String, pool: String },

    #[error("{field} is not representable in cents: {value}")]
    AmountOutOfRange { field: &'static str, value: String },
}

/// Invalid lease data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("lease {lease_id}: {source}")]
    UnknownAreaCategory {
        lease_id: String,
        #[source]
        source: UnknownAreaCategory,
    },

    #[error("lease id occurs more than once: {0}")]
    DuplicateLease(String),
}

/// Internal arithmetic fault. Never coerced to zero.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculationError {
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("negative intermediate amount in {context}: {cents} cents")]
    NegativeAmount { context: &'static str, cents: i64 },

    #[error("rounding reconciliation failed: rows sum to {rows} cents, park total is {park} cents")]
    ReconciliationMismatch { rows: i64, park: i64 },

    #[error("settlement worker failed: {0}")]
    WorkerFailed(String),
}

/// Top-level settlement error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("calculation error: {0}")]
    Calculation(#[from] CalculationError),
}

impl SettlementError {
    /// Configuration errors need operator action, not a retry.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SettlementError::Configuration(_))
    }
}

pub type SettlementResult<T> = Result<T, SettlementError>;
