// ==========================================
// Windpark Settlement - Import Layer
// ==========================================
// Responsibility: external plot area files -> Lease inputs
// Supported: CSV
// ==========================================

pub mod error;
pub mod plot_area_csv;

// Re-exports
pub use error::{ImportError, ImportResult};
pub use plot_area_csv::{ImportSummary, PlotAreaCsvImporter};
