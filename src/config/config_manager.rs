// ==========================================
// Windpark Settlement - Config Manager
// ==========================================
// Responsibility: load, query and snapshot engine settings
// Storage: config_kv table (key-value + scope)
// ==========================================

use crate::config::settlement_config_trait::SettlementConfigReader;
use crate::config::settlement_settings::{
    DEFAULT_CONCURRENCY_CHUNK_SIZE, DEFAULT_CONCURRENT_MIN_LEASES, DEFAULT_RUN_TIMEOUT_MS,
};
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Opens the settings store at `db_path`.
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Builds a ConfigManager on an existing connection.
    ///
    /// Re-applies the shared PRAGMAs (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Reads a value from config_kv (scope_id='global').
    fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Public read of a global value.
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        self.get_config_value(key)
    }

    /// Writes a global value (upsert).
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// Parses a numeric setting; missing or unparsable values fall back to `default`.
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> RepositoryResult<T>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };

        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "invalid setting, using default"
                );
                Ok(default)
            }
        }
    }

    /// Snapshot of all global settings as JSON.
    ///
    /// Stored next to exported settlement results so a run can be explained later.
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let config_map: BTreeMap<String, String> = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<_, _>>()?;

        serde_json::to_string(&json!(config_map)).map_err(|e| RepositoryError::Other(e.into()))
    }

    /// Restores global settings from a snapshot.
    ///
    /// # Returns
    /// Number of keys written
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> RepositoryResult<usize> {
        let config_map: BTreeMap<String, String> =
            serde_json::from_str(snapshot_json).map_err(|e| RepositoryError::FieldValueError {
                field: "config_snapshot".to_string(),
                message: e.to_string(),
            })?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut count = 0;
        for (key, value) in &config_map {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
        }
        tx.commit()?;

        Ok(count)
    }
}

// ==========================================
// SettlementConfigReader implementation
// ==========================================
#[async_trait]
impl SettlementConfigReader for ConfigManager {
    async fn get_run_timeout_ms(&self) -> RepositoryResult<u64> {
        self.get_parsed_or_default(config_keys::RUN_TIMEOUT_MS, DEFAULT_RUN_TIMEOUT_MS)
    }

    async fn get_concurrency_chunk_size(&self) -> RepositoryResult<usize> {
        let size =
            self.get_parsed_or_default(config_keys::CONCURRENCY_CHUNK_SIZE, DEFAULT_CONCURRENCY_CHUNK_SIZE)?;
        Ok(size.max(1))
    }

    async fn get_concurrent_min_leases(&self) -> RepositoryResult<usize> {
        self.get_parsed_or_default(config_keys::CONCURRENT_MIN_LEASES, DEFAULT_CONCURRENT_MIN_LEASES)
    }
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    // Run deadline
    pub const RUN_TIMEOUT_MS: &str = "settlement_run_timeout_ms";

    // Worker tasks
    pub const CONCURRENCY_CHUNK_SIZE: &str = "settlement_concurrency_chunk_size";
    pub const CONCURRENT_MIN_LEASES: &str = "settlement_concurrent_min_leases";
}
