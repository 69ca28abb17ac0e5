// ==========================================
// Windpark Settlement - API Layer
// ==========================================
// Responsibility: business entry points for CLI and embedding hosts
// ==========================================

pub mod error;
pub mod settlement_api;

// Re-exports
pub use error::{ApiError, ApiResult};
pub use settlement_api::SettlementApi;
