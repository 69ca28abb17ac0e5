// ==========================================
// Windpark Settlement - Lease & Plot Area
// ==========================================
// One lease = one lessor contract for a park in a settlement year.
// Immutable once handed to the engine.
// ==========================================

use crate::domain::types::AreaCategory;
use serde::{Deserialize, Serialize};

/// A cadastral parcel assignment (Flurstück) held under a lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotArea {
    /// Cadastral district (Gemarkung)
    pub district: String,
    /// Plot number within the district, e.g. "112/4"
    pub plot_number: String,
    pub category: AreaCategory,
}

impl PlotArea {
    pub fn new(district: &str, plot_number: &str, category: AreaCategory) -> Self {
        Self {
            district: district.to_string(),
            plot_number: plot_number.to_string(),
            category,
        }
    }
}

/// Lease contract between the park operator and one lessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    pub lease_id: String,
    pub lessor_id: String,
    pub lessor_name: String,
    /// Plot areas in contract order
    #[serde(default)]
    pub plot_areas: Vec<PlotArea>,
}

impl Lease {
    pub fn new(lease_id: &str, lessor_id: &str, lessor_name: &str) -> Self {
        Self {
            lease_id: lease_id.to_string(),
            lessor_id: lessor_id.to_string(),
            lessor_name: lessor_name.to_string(),
            plot_areas: Vec::new(),
        }
    }

    /// Builder-style helper used by importers and fixtures.
    pub fn with_plot_area(mut self, district: &str, plot_number: &str, category: AreaCategory) -> Self {
        self.plot_areas
            .push(PlotArea::new(district, plot_number, category));
        self
    }

    pub fn has_plot_areas(&self) -> bool {
        !self.plot_areas.is_empty()
    }
}
