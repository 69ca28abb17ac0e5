use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default run deadline (ms)
pub const DEFAULT_RUN_TIMEOUT_MS: u64 = 30_000;

/// Default leases per worker task
pub const DEFAULT_CONCURRENCY_CHUNK_SIZE: usize = 64;

/// Below this lease count a run stays on the calling task
pub const DEFAULT_CONCURRENT_MIN_LEASES: usize = 256;

/// Engine tuning read from config_kv (scope_id='global').
///
/// None of these change results, only how a run is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSettings {
    /// Deadline for one settlement run; a late run is discarded
    #[serde(default = "default_run_timeout_ms")]
    pub run_timeout_ms: u64,

    #[serde(default = "default_chunk_size")]
    pub concurrency_chunk_size: usize,

    #[serde(default = "default_concurrent_min_leases")]
    pub concurrent_min_leases: usize,
}

fn default_run_timeout_ms() -> u64 {
    DEFAULT_RUN_TIMEOUT_MS
}

fn default_chunk_size() -> usize {
    DEFAULT_CONCURRENCY_CHUNK_SIZE
}

fn default_concurrent_min_leases() -> usize {
    DEFAULT_CONCURRENT_MIN_LEASES
}

impl Default for SettlementSettings {
    fn default() -> Self {
        Self {
            run_timeout_ms: DEFAULT_RUN_TIMEOUT_MS,
            concurrency_chunk_size: DEFAULT_CONCURRENCY_CHUNK_SIZE,
            concurrent_min_leases: DEFAULT_CONCURRENT_MIN_LEASES,
        }
    }
}

impl SettlementSettings {
    pub fn run_timeout(&self) -> Duration {
        Duration::from_millis(self.run_timeout_ms)
    }

    /// Whether a run with `lease_count` leases goes to worker tasks.
    pub fn use_concurrent(&self, lease_count: usize) -> bool {
        lease_count >= self.concurrent_min_leases.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: SettlementSettings = serde_json::from_str(r#"{"runTimeoutMs": 500}"#).unwrap();
        assert_eq!(settings.run_timeout(), Duration::from_millis(500));
        assert_eq!(settings.concurrency_chunk_size, DEFAULT_CONCURRENCY_CHUNK_SIZE);
        assert_eq!(settings.concurrent_min_leases, DEFAULT_CONCURRENT_MIN_LEASES);
    }

    #[test]
    fn test_use_concurrent_threshold() {
        let settings = SettlementSettings {
            concurrent_min_leases: 10,
            ..Default::default()
        };
        assert!(!settings.use_concurrent(9));
        assert!(settings.use_concurrent(10));
    }
}
