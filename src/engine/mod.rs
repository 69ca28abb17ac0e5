// ==========================================
// Windpark Settlement - Engine Layer
// ==========================================
// Responsibility: settlement business rules, no SQL, no formatting
// Rule: integer cents internally, Decimal only at the boundary
// ==========================================

pub mod aggregator;
pub mod classifier;
pub mod entitlement;
pub mod error;
pub mod fixed_point;
pub mod payout;
pub mod settlement;

// Re-export core engines
pub use aggregator::SettlementAggregator;
pub use classifier::{ParcelClassification, ParcelClassifier};
pub use entitlement::{
    CategoryPool, EntitlementCalculator, PoolShares, PoolTable, ValidatedConfiguration,
};
pub use error::{
    CalculationError, ConfigurationError, DataError, SettlementError, SettlementResult,
};
pub use payout::{Payout, PayoutResolver};
pub use settlement::SettlementEngine;
