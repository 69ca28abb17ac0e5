// ==========================================
// Windpark Settlement - SQLite Connection Setup
// ==========================================
// Goals:
// - every Connection::open goes through the same PRAGMA setup
// - one busy_timeout for all connections
// - one place that creates the settlement input schema
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// Default busy_timeout (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Schema version created by [`init_schema`]
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Applies the shared PRAGMAs.
///
/// foreign_keys and busy_timeout are per connection.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Opens a SQLite connection with the shared configuration.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Creates the settlement input tables (idempotent).
///
/// Tables:
/// - config_kv: engine settings (scope_id = 'global')
/// - settlement_config: one row per park and year
/// - lease / plot_area: lease contracts and their parcels
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS settlement_config (
            park_id TEXT NOT NULL,
            year INTEGER NOT NULL,
            total_revenue TEXT NOT NULL,
            minimum_rent_per_turbine TEXT NOT NULL,
            wea_share_percentage TEXT NOT NULL,
            pool_share_percentage TEXT NOT NULL,
            revenue_phase_percentage TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (park_id, year)
        );

        CREATE TABLE IF NOT EXISTS lease (
            lease_id TEXT NOT NULL,
            park_id TEXT NOT NULL,
            year INTEGER NOT NULL,
            lessor_id TEXT NOT NULL,
            lessor_name TEXT NOT NULL,
            PRIMARY KEY (park_id, year, lease_id)
        );

        CREATE TABLE IF NOT EXISTS plot_area (
            park_id TEXT NOT NULL,
            year INTEGER NOT NULL,
            lease_id TEXT NOT NULL,
            seq_no INTEGER NOT NULL,
            district TEXT NOT NULL,
            plot_number TEXT NOT NULL,
            category TEXT NOT NULL,
            PRIMARY KEY (park_id, year, lease_id, seq_no),
            FOREIGN KEY (park_id, year, lease_id)
                REFERENCES lease(park_id, year, lease_id) ON DELETE CASCADE
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Reads schema_version (None when the table does not exist).
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// Default database location.
///
/// `WINDPARK_SETTLEMENT_DB_PATH` wins when set; otherwise the user data
/// directory, falling back to the working directory.
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("WINDPARK_SETTLEMENT_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./windpark_settlement.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("windpark-settlement");
        // best-effort: on failure the open below reports the real error
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("windpark_settlement.db");
        }
    }

    path.to_string_lossy().to_string()
}
