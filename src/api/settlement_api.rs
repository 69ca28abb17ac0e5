// ==========================================
// Windpark Settlement - Settlement API
// ==========================================
// Responsibility: load inputs, run the engine, enforce the run deadline
// Callers: CLI, integration tests
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, SettlementConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::lease::Lease;
use crate::domain::settlement::{SettlementCalculationResult, SettlementConfiguration};
use crate::engine::entitlement::ValidatedConfiguration;
use crate::engine::error::{CalculationError, SettlementError};
use crate::engine::SettlementEngine;
use crate::importer::{ImportSummary, PlotAreaCsvImporter};
use crate::repository::{LeaseRepository, RepositoryError, SettlementConfigRepository};
use chrono::Utc;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

// ==========================================
// SettlementApi
// ==========================================
pub struct SettlementApi {
    config_repo: Arc<SettlementConfigRepository>,
    lease_repo: Arc<LeaseRepository>,
    settings_reader: Arc<dyn SettlementConfigReader>,
    engine: SettlementEngine,
}

impl SettlementApi {
    pub fn new(
        config_repo: Arc<SettlementConfigRepository>,
        lease_repo: Arc<LeaseRepository>,
        settings_reader: Arc<dyn SettlementConfigReader>,
    ) -> Self {
        Self {
            config_repo,
            lease_repo,
            settings_reader,
            engine: SettlementEngine::new(),
        }
    }

    /// Opens (and if needed creates) the database at `db_path` and wires
    /// all repositories onto one shared connection.
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(RepositoryError::from)?;
        init_schema(&conn).map_err(RepositoryError::from)?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = ConfigManager::from_connection(conn.clone())?;

        Ok(Self::new(
            Arc::new(SettlementConfigRepository::from_connection(conn.clone())),
            Arc::new(LeaseRepository::from_connection(conn)),
            Arc::new(config_manager),
        ))
    }

    // ==========================================
    // Input maintenance
    // ==========================================

    /// Stores the configuration of a park year after validating it.
    ///
    /// Invalid configurations are never written.
    pub fn save_configuration(&self, config: &SettlementConfiguration) -> ApiResult<()> {
        ValidatedConfiguration::validate(config).map_err(SettlementError::from)?;
        self.config_repo.upsert(config)?;
        Ok(())
    }

    pub fn get_configuration(&self, park_id: &str, year: i32) -> ApiResult<SettlementConfiguration> {
        self.config_repo
            .find(park_id, year)?
            .ok_or_else(|| ApiError::SettlementNotConfigured {
                park_id: park_id.to_string(),
                year,
            })
    }

    /// Replaces the leases of a park year with the contents of a plot area CSV.
    pub fn import_plot_areas(&self, path: &Path, park_id: &str, year: i32) -> ApiResult<ImportSummary> {
        let summary = PlotAreaCsvImporter::new().import_file(path, &self.lease_repo, park_id, year)?;
        Ok(summary)
    }

    // ==========================================
    // Settlement
    // ==========================================

    /// Runs the settlement of a stored park year.
    ///
    /// # Arguments
    /// - `park_id`, `year`: selects configuration and leases
    ///
    /// # Returns
    /// The full result; nothing is persisted
    ///
    /// # Errors
    /// - `SettlementNotConfigured`: no configuration row
    /// - `Timeout`: run exceeded the configured deadline, partial work is discarded
    #[instrument(skip(self))]
    pub async fn run_settlement(&self, park_id: &str, year: i32) -> ApiResult<SettlementCalculationResult> {
        let settings = self.settings_reader.load_settings().await?;
        let config = self.get_configuration(park_id, year)?;
        let leases = Arc::new(self.lease_repo.find_by_park_year(park_id, year)?);

        let concurrent = settings.use_concurrent(leases.len());
        info!(
            lease_count = leases.len(),
            concurrent,
            timeout_ms = settings.run_timeout_ms,
            "settlement run started"
        );

        let calculated_at = Utc::now();
        let engine = self.engine;
        let run = async {
            if concurrent {
                engine
                    .calculate_concurrent(&config, leases, settings.concurrency_chunk_size, calculated_at)
                    .await
            } else {
                let config = config.clone();
                match tokio::task::spawn_blocking(move || engine.calculate(&config, &leases, calculated_at)).await {
                    Ok(result) => result,
                    Err(e) => Err(SettlementError::from(CalculationError::WorkerFailed(e.to_string()))),
                }
            }
        };

        match tokio::time::timeout(settings.run_timeout(), run).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!(timeout_ms = settings.run_timeout_ms, "settlement run timed out");
                Err(ApiError::Timeout {
                    timeout_ms: settings.run_timeout_ms,
                })
            }
        }
    }

    /// Runs a settlement on caller-supplied inputs without touching the database.
    pub fn preview_settlement(
        &self,
        config: &SettlementConfiguration,
        leases: &[Lease],
    ) -> ApiResult<SettlementCalculationResult> {
        Ok(self.engine.calculate_now(config, leases)?)
    }
}
