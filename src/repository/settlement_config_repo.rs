// ==========================================
// Windpark Settlement - Settlement Configuration Repository
// ==========================================
// Table: settlement_config (one row per park and year)
// Rule: no business logic; amounts stored as decimal TEXT
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::settlement::SettlementConfiguration;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

pub(crate) fn parse_decimal(field: &str, raw: &str) -> RepositoryResult<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| RepositoryError::FieldValueError {
        field: field.to_string(),
        message: format!("'{}' is not a decimal: {}", raw, e),
    })
}

// ==========================================
// SettlementConfigRepository
// ==========================================
pub struct SettlementConfigRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SettlementConfigRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Inserts or replaces the configuration of (park_id, year).
    pub fn upsert(&self, config: &SettlementConfiguration) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO settlement_config (
                park_id, year, total_revenue, minimum_rent_per_turbine,
                wea_share_percentage, pool_share_percentage, revenue_phase_percentage
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(park_id, year) DO UPDATE SET
                total_revenue = ?3,
                minimum_rent_per_turbine = ?4,
                wea_share_percentage = ?5,
                pool_share_percentage = ?6,
                revenue_phase_percentage = ?7,
                updated_at = datetime('now')
            "#,
            params![
                config.park_id,
                config.year,
                config.total_revenue.to_string(),
                config.minimum_rent_per_turbine.to_string(),
                config.wea_share_percentage.to_string(),
                config.pool_share_percentage.to_string(),
                config.revenue_phase_percentage.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Loads the configuration of (park_id, year).
    ///
    /// # Returns
    /// - Ok(Some(_)): configuration found
    /// - Ok(None): park/year not configured
    /// - Err: database error or a stored value that is not a decimal
    pub fn find(&self, park_id: &str, year: i32) -> RepositoryResult<Option<SettlementConfiguration>> {
        let conn = self.get_conn()?;
        let raw = conn
            .query_row(
                r#"
                SELECT total_revenue, minimum_rent_per_turbine,
                       wea_share_percentage, pool_share_percentage, revenue_phase_percentage
                FROM settlement_config
                WHERE park_id = ?1 AND year = ?2
                "#,
                params![park_id, year],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((revenue, minimum_rent, wea, pool, phase)) = raw else {
            return Ok(None);
        };

        Ok(Some(SettlementConfiguration {
            park_id: park_id.to_string(),
            year,
            total_revenue: parse_decimal("total_revenue", &revenue)?,
            minimum_rent_per_turbine: parse_decimal("minimum_rent_per_turbine", &minimum_rent)?,
            wea_share_percentage: parse_decimal("wea_share_percentage", &wea)?,
            pool_share_percentage: parse_decimal("pool_share_percentage", &pool)?,
            revenue_phase_percentage: parse_decimal("revenue_phase_percentage", &phase)?,
        }))
    }

    /// Settlement years configured for a park, ascending.
    pub fn list_years(&self, park_id: &str) -> RepositoryResult<Vec<i32>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT year FROM settlement_config WHERE park_id = ?1 ORDER BY year")?;
        let years = stmt
            .query_map(params![park_id], |row| row.get::<_, i32>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(years)
    }
}
