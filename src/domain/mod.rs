// ==========================================
// Windpark Settlement - Domain Layer
// ==========================================
// Responsibility: entities, value types, settlement records
// Rule: no data access, no engine logic
// ==========================================

pub mod lease;
pub mod money;
pub mod settlement;
pub mod types;

// Re-exports
pub use lease::{Lease, PlotArea};
pub use money::Money;
pub use settlement::{
    LeaseCalculationResult, PoolSummary, SettlementCalculationResult, SettlementConfiguration,
    SettlementTotals,
};
pub use types::{AreaCategory, UnknownAreaCategory};
