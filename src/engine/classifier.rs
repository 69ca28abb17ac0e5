// ==========================================
// Windpark Settlement - Parcel Classifier
// ==========================================
// Responsibility: count plot area records per category, group plot
//                 numbers per cadastral district
// Input: one lease
// Output: ParcelClassification
// ==========================================
// Rule: pure record count, no weighting by area size
// ==========================================

use crate::domain::lease::Lease;
use crate::domain::types::AreaCategory;
use crate::engine::error::DataError;
use std::collections::BTreeMap;

/// Classified view of one lease's plot areas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParcelClassification {
    pub wea_count: u32,
    pub pool_count: u32,
    pub other_count: u32,
    /// District -> distinct plot numbers (first-seen order)
    pub districts: BTreeMap<String, Vec<String>>,
}

impl ParcelClassification {
    pub fn count(&self, category: AreaCategory) -> u32 {
        match category {
            AreaCategory::Wea => self.wea_count,
            AreaCategory::Pool => self.pool_count,
            AreaCategory::Other => self.other_count,
        }
    }

    pub fn total_count(&self) -> u32 {
        self.wea_count + self.pool_count + self.other_count
    }
}

// ==========================================
// ParcelClassifier
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ParcelClassifier;

impl ParcelClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classifies a lease's plot areas.
    ///
    /// A lessor may hold several area records on the same physical parcel;
    /// every record counts, but the district listing shows the parcel once.
    pub fn classify(&self, lease: &Lease) -> ParcelClassification {
        let mut classification = ParcelClassification::default();

        for area in &lease.plot_areas {
            match area.category {
                AreaCategory::Wea => classification.wea_count += 1,
                AreaCategory::Pool => classification.pool_count += 1,
                AreaCategory::Other => classification.other_count += 1,
            }

            let plots = classification
                .districts
                .entry(area.district.trim().to_string())
                .or_default();
            let plot_number = area.plot_number.trim();
            if !plots.iter().any(|p| p == plot_number) {
                plots.push(plot_number.to_string());
            }
        }

        classification
    }

    /// Parses a stored/imported category code for a lease.
    pub fn parse_category(lease_id: &str, raw: &str) -> Result<AreaCategory, DataError> {
        raw.parse()
            .map_err(|source| DataError::UnknownAreaCategory {
                lease_id: lease_id.to_string(),
                source,
            })
    }
}
