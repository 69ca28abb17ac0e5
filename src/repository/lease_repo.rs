// ==========================================
// Windpark Settlement - Lease Repository
// ==========================================
// Tables: lease, plot_area
// Rule: no business logic; plot areas keep contract order (seq_no)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::lease::{Lease, PlotArea};
use crate::engine::classifier::ParcelClassifier;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Transaction};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// LeaseRepository
// ==========================================
pub struct LeaseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LeaseRepository {
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

    fn insert_in_tx(tx: &Transaction<'_>, park_id: &str, year: i32, lease: &Lease) -> RepositoryResult<()> {
        tx.execute(
            r#"
            INSERT INTO lease (lease_id, park_id, year, lessor_id, lessor_name)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![lease.lease_id, park_id, year, lease.lessor_id, lease.lessor_name],
        )?;

        let mut stmt = tx.prepare(
            r#"
            INSERT INTO plot_area (park_id, year, lease_id, seq_no, district, plot_number, category)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )?;
        for (seq_no, area) in lease.plot_areas.iter().enumerate() {
            stmt.execute(params![
                park_id,
                year,
                lease.lease_id,
                seq_no as i64,
                area.district,
                area.plot_number,
                area.category.as_str(),
            ])?;
        }
        Ok(())
    }

    /// Inserts one lease with its plot areas.
    pub fn insert(&self, park_id: &str, year: i32, lease: &Lease) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        Self::insert_in_tx(&tx, park_id, year, lease)?;
        tx.commit()?;
        Ok(())
    }

    /// Replaces all leases of (park_id, year) in one transaction.
    ///
    /// # Returns
    /// Number of leases written
    pub fn replace_all(&self, park_id: &str, year: i32, leases: &[Lease]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM lease WHERE park_id = ?1 AND year = ?2",
            params![park_id, year],
        )?;
        for lease in leases {
            Self::insert_in_tx(&tx, park_id, year, lease)?;
        }
        tx.commit()?;
        Ok(leases.len())
    }

    /// All leases of a park and year, ordered by lease_id, plot areas in contract order.
    ///
    /// # Errors
    /// - `RepositoryError::Data` when a stored category is unknown
    pub fn find_by_park_year(&self, park_id: &str, year: i32) -> RepositoryResult<Vec<Lease>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT lease_id, lessor_id, lessor_name
            FROM lease
            WHERE park_id = ?1 AND year = ?2
            ORDER BY lease_id
            "#,
        )?;
        let mut leases = stmt
            .query_map(params![park_id, year], |row| {
                Ok(Lease {
                    lease_id: row.get(0)?,
                    lessor_id: row.get(1)?,
                    lessor_name: row.get(2)?,
                    plot_areas: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let index: HashMap<String, usize> = leases
            .iter()
            .enumerate()
            .map(|(i, l)| (l.lease_id.clone(), i))
            .collect();

        let mut stmt = conn.prepare(
            r#"
            SELECT lease_id, district, plot_number, category
            FROM plot_area
            WHERE park_id = ?1 AND year = ?2
            ORDER BY lease_id, seq_no
            "#,
        )?;
        let rows = stmt
            .query_map(params![park_id, year], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (lease_id, district, plot_number, raw_category) in rows {
            let category = ParcelClassifier::parse_category(&lease_id, &raw_category)?;
            let Some(&i) = index.get(&lease_id) else {
                return Err(RepositoryError::NotFound {
                    entity: "lease".to_string(),
                    id: lease_id,
                });
            };
            leases[i].plot_areas.push(PlotArea {
                district,
                plot_number,
                category,
            });
        }

        Ok(leases)
    }

    pub fn count(&self, park_id: &str, year: i32) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM lease WHERE park_id = ?1 AND year = ?2",
            params![park_id, year],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }
}
