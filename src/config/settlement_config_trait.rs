// ==========================================
// Windpark Settlement - Settings Reader Trait
// ==========================================
// Responsibility: read-only access to engine settings
// Rule: no writes, no business logic
// ==========================================

use crate::config::settlement_settings::SettlementSettings;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// SettlementConfigReader
// ==========================================
// Implementor: ConfigManager (config_kv table)
#[async_trait]
pub trait SettlementConfigReader: Send + Sync {
    /// Run deadline in ms.
    ///
    /// # Default
    /// - 30000
    async fn get_run_timeout_ms(&self) -> RepositoryResult<u64>;

    /// Leases per worker task.
    ///
    /// # Default
    /// - 64
    async fn get_concurrency_chunk_size(&self) -> RepositoryResult<usize>;

    /// Minimum lease count before a run uses worker tasks.
    ///
    /// # Default
    /// - 256
    async fn get_concurrent_min_leases(&self) -> RepositoryResult<usize>;

    /// All settings in one struct.
    async fn load_settings(&self) -> RepositoryResult<SettlementSettings> {
        Ok(SettlementSettings {
            run_timeout_ms: self.get_run_timeout_ms().await?,
            concurrency_chunk_size: self.get_concurrency_chunk_size().await?,
            concurrent_min_leases: self.get_concurrent_min_leases().await?,
        })
    }
}
