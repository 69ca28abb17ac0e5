// Dev utility: seed a demo park (configuration + plot areas) into a settlement database.
//
// Usage:
//   cargo run --bin seed_demo_park -- [db_path] [year]
//
// Leases come from tests/fixtures/demo_plot_areas.csv.

use rust_decimal::Decimal;
use std::path::PathBuf;
use windpark_settlement::{logging, SettlementApi, SettlementConfiguration};

const DEMO_PARK_ID: &str = "WP-NORDHEIDE";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let db_path = args
        .next()
        .unwrap_or_else(|| "windpark_settlement.db".to_string());
    let year: i32 = match args.next() {
        Some(raw) => raw.trim().parse()?,
        None => 2024,
    };

    let api = SettlementApi::open(&db_path)?;

    api.save_configuration(&SettlementConfiguration {
        park_id: DEMO_PARK_ID.to_string(),
        year,
        total_revenue: Decimal::new(100_000, 0),
        minimum_rent_per_turbine: Decimal::new(2_000, 0),
        wea_share_percentage: Decimal::new(70, 0),
        pool_share_percentage: Decimal::new(20, 0),
        revenue_phase_percentage: Decimal::new(100, 0),
    })?;

    let csv_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("demo_plot_areas.csv");
    let summary = api.import_plot_areas(&csv_path, DEMO_PARK_ID, year)?;

    println!(
        "seeded park={} year={} leases={} plot_areas={} db={}",
        summary.park_id, summary.year, summary.lease_count, summary.plot_area_count, db_path
    );
    Ok(())
}
