// ==========================================
// Windpark Settlement - Core Library
// ==========================================
// Annual lease revenue settlement for wind parks:
// classify leased plot areas, compute minimum rent and revenue shares,
// resolve the payout per lease, aggregate park totals.
// Stack: Rust + SQLite
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain layer - entities and value types
pub mod domain;

// Engine layer - settlement rules
pub mod engine;

// Repository layer - data access
pub mod repository;

// Import layer - external files
pub mod importer;

// Config layer - engine settings
pub mod config;

// Database infrastructure (connection setup / schema)
pub mod db;

// Logging
pub mod logging;

// API layer - entry points
pub mod api;

// ==========================================
// Re-exports
// ==========================================

// Domain types
pub use domain::{
    AreaCategory, Lease, LeaseCalculationResult, Money, PlotArea, PoolSummary,
    SettlementCalculationResult, SettlementConfiguration, SettlementTotals,
};

// Engines
pub use engine::{
    EntitlementCalculator, ParcelClassifier, PayoutResolver, SettlementAggregator,
    SettlementEngine, SettlementError,
};

// API
pub use api::{ApiError, SettlementApi};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Windpark Lease Settlement";
