// ==========================================
// Windpark Settlement - Plot Area CSV Importer
// ==========================================
// Input: one row per plot area
//   lease_id,lessor_id,lessor_name,district,plot_number,category
// Output: leases in first-seen order, plot areas in row order
// ==========================================

use crate::domain::lease::{Lease, PlotArea};
use crate::domain::types::AreaCategory;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::LeaseRepository;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, instrument};

const REQUIRED_COLUMNS: [&str; 6] = [
    "lease_id",
    "lessor_id",
    "lessor_name",
    "district",
    "plot_number",
    "category",
];

/// Outcome of writing an imported file into the lease tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub park_id: String,
    pub year: i32,
    pub lease_count: usize,
    pub plot_area_count: usize,
}

// ==========================================
// PlotAreaCsvImporter
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct PlotAreaCsvImporter;

impl PlotAreaCsvImporter {
    pub fn new() -> Self {
        Self
    }

    /// Parses a plot area file from disk.
    ///
    /// # Errors
    /// - `FileNotFound` / `UnsupportedFormat` before any row is read
    /// - row-level errors carry the file line number
    pub fn parse_file(&self, path: &Path) -> ImportResult<Vec<Lease>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !ext.eq_ignore_ascii_case("csv") {
            return Err(ImportError::UnsupportedFormat(ext.to_string()));
        }

        let file = File::open(path)?;
        self.parse_reader(file)
    }

    /// Parses plot area rows from any reader.
    pub fn parse_reader<R: Read>(&self, reader: R) -> ImportResult<Vec<Lease>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let columns = ColumnIndex::from_headers(reader.headers()?)?;

        let mut leases: Vec<Lease> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);

            // Fully blank rows (e.g. trailing ",,,,,") are skipped
            if record.iter().all(str::is_empty) {
                continue;
            }

            let lease_id = columns.required(&record, row, "lease_id")?;
            let lessor_id = columns.required(&record, row, "lessor_id")?;
            let lessor_name = columns.optional(&record, "lessor_name");
            let district = columns.required(&record, row, "district")?;
            let plot_number = columns.required(&record, row, "plot_number")?;
            let raw_category = columns.required(&record, row, "category")?;

            let category: AreaCategory =
                raw_category
                    .parse()
                    .map_err(|_| ImportError::UnknownCategory {
                        row,
                        value: raw_category.to_string(),
                    })?;

            let position = match positions.get(lease_id) {
                Some(&pos) => {
                    let existing = &leases[pos];
                    if existing.lessor_id != lessor_id {
                        return Err(ImportError::InconsistentLessor {
                            row,
                            lease_id: lease_id.to_string(),
                            expected: existing.lessor_id.clone(),
                            found: lessor_id.to_string(),
                        });
                    }
                    pos
                }
                None => {
                    leases.push(Lease::new(lease_id, lessor_id, lessor_name));
                    positions.insert(lease_id.to_string(), leases.len() - 1);
                    leases.len() - 1
                }
            };

            leases[position]
                .plot_areas
                .push(PlotArea::new(district, plot_number, category));
        }

        Ok(leases)
    }

    /// Parses `path` and replaces the stored leases of the park and year.
    #[instrument(skip(self, repo))]
    pub fn import_file(
        &self,
        path: &Path,
        repo: &LeaseRepository,
        park_id: &str,
        year: i32,
    ) -> ImportResult<ImportSummary> {
        let leases = self.parse_file(path)?;
        let plot_area_count = leases.iter().map(|l| l.plot_areas.len()).sum();
        let lease_count = repo.replace_all(park_id, year, &leases)?;

        info!(lease_count, plot_area_count, "plot area import finished");

        Ok(ImportSummary {
            park_id: park_id.to_string(),
            year,
            lease_count,
            plot_area_count,
        })
    }
}

// ==========================================
// Header mapping
// ==========================================
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> ImportResult<Self> {
        let normalized: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

        let mut positions = HashMap::new();
        for column in REQUIRED_COLUMNS {
            let idx = normalized
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| ImportError::MissingColumn(column.to_string()))?;
            positions.insert(column, idx);
        }

        Ok(Self { positions })
    }

    fn optional<'r>(&self, record: &'r StringRecord, column: &'static str) -> &'r str {
        self.positions
            .get(column)
            .and_then(|&idx| record.get(idx))
            .unwrap_or("")
    }

    fn required<'r>(
        &self,
        record: &'r StringRecord,
        row: usize,
        column: &'static str,
    ) -> ImportResult<&'r str> {
        let value = self.optional(record, column);
        if value.is_empty() {
            return Err(ImportError::MissingField {
                row,
                field: column.to_string(),
            });
        }
        Ok(value)
    }
}
