// ==========================================
// Windpark Settlement - Repository Layer
// ==========================================
// Rule: repositories hold no business logic
// Responsibility: load settlement inputs (configuration, leases)
// Constraint: parameterized queries only
// ==========================================

pub mod error;
pub mod lease_repo;
pub mod settlement_config_repo;

// Re-exports
pub use error::{RepositoryError, RepositoryResult};
pub use lease_repo::LeaseRepository;
pub use settlement_config_repo::SettlementConfigRepository;
