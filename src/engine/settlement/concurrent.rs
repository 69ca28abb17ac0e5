// ==========================================
// Windpark Settlement - Settlement Engine (concurrent)
// ==========================================
// Per-lease classification and minimum rent run on blocking worker
// tasks; pool allocation and aggregation stay a single fold.
// Produces exactly the same result as SettlementEngine::calculate.
// ==========================================

use super::core::{LeaseEvaluation, SettlementEngine};
use crate::domain::lease::Lease;
use crate::domain::settlement::{SettlementCalculationResult, SettlementConfiguration};
use crate::engine::error::{CalculationError, SettlementResult};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, instrument};

impl SettlementEngine {
    /// Runs a settlement with per-lease work spread over worker tasks.
    ///
    /// # Arguments
    /// - `chunk_size`: leases per worker task (values below 1 are treated as 1)
    ///
    /// # Errors
    /// Same as [`SettlementEngine::calculate`]; a panicked or cancelled worker
    /// surfaces as `CalculationError::WorkerFailed`.
    #[instrument(skip(self, config, leases), fields(
        park_id = %config.park_id,
        year = config.year,
        lease_count = leases.len()
    ))]
    pub async fn calculate_concurrent(
        &self,
        config: &SettlementConfiguration,
        leases: Arc<Vec<Lease>>,
        chunk_size: usize,
        calculated_at: DateTime<Utc>,
    ) -> SettlementResult<SettlementCalculationResult> {
        let validated = Self::validate_inputs(config, &leases)?;
        let chunk_size = chunk_size.max(1);
        let engine = *self;

        let workers = (0..leases.len()).step_by(chunk_size).map(|start| {
            let leases = Arc::clone(&leases);
            tokio::task::spawn_blocking(move || {
                let end = (start + chunk_size).min(leases.len());
                leases[start..end]
                    .iter()
                    .map(|lease| engine.evaluate_lease(&validated, lease))
                    .collect::<Result<Vec<LeaseEvaluation>, CalculationError>>()
            })
        });

        let chunks = try_join_all(workers)
            .await
            .map_err(|e| CalculationError::WorkerFailed(e.to_string()))?;
        debug!(chunk_count = chunks.len(), chunk_size, "lease workers joined");

        let mut classifications = Vec::with_capacity(leases.len());
        let mut minimums = Vec::with_capacity(leases.len());
        for chunk in chunks {
            for (classification, minimum_rent) in chunk? {
                classifications.push(classification);
                minimums.push(minimum_rent);
            }
        }

        self.finish(config, &validated, &leases, classifications, minimums, calculated_at)
    }
}
