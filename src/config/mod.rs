// ==========================================
// Windpark Settlement - Configuration Layer
// ==========================================
// Responsibility: engine settings (run deadline, worker tasks)
// Storage: config_kv table
// Park settlement terms live in settlement_config (repository layer)
// ==========================================

pub mod config_manager;
pub mod settlement_config_trait;
pub mod settlement_settings;

// Re-exports
pub use config_manager::{config_keys, ConfigManager};
pub use settlement_config_trait::SettlementConfigReader;
pub use settlement_settings::SettlementSettings;
