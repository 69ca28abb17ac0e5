// ==========================================
// Windpark Settlement - CLI entry
// ==========================================
// Usage:
//   windpark-settlement run <park_id> <year> [db_path]
//   windpark-settlement import <csv_path> <park_id> <year> [db_path]
//   windpark-settlement configure <park_id> <year> <total_revenue> <minimum_rent_per_turbine>
//                                 <wea_pct> <pool_pct> <phase_pct> [db_path]
//
// db_path defaults to WINDPARK_SETTLEMENT_DB_PATH or the user data directory.
// Results are printed as JSON on stdout, logs go to stderr.
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use windpark_settlement::db::get_default_db_path;
use windpark_settlement::{logging, SettlementApi, SettlementConfiguration};

const USAGE: &str = "usage:
  windpark-settlement run <park_id> <year> [db_path]
  windpark-settlement import <csv_path> <park_id> <year> [db_path]
  windpark-settlement configure <park_id> <year> <total_revenue> <minimum_rent_per_turbine> <wea_pct> <pool_pct> <phase_pct> [db_path]";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!(USAGE);
    };

    match command.as_str() {
        "run" => run(&args[1..]).await,
        "import" => import(&args[1..]),
        "configure" => configure(&args[1..]),
        other => Err(anyhow!("unknown command '{}'\n{}", other, USAGE)),
    }
}

fn arg<'a>(args: &'a [String], idx: usize, name: &str) -> Result<&'a str> {
    args.get(idx)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("missing argument <{}>\n{}", name, USAGE))
}

fn parse_year(raw: &str) -> Result<i32> {
    raw.parse().with_context(|| format!("invalid year '{}'", raw))
}

fn parse_decimal(raw: &str, name: &str) -> Result<Decimal> {
    Decimal::from_str(raw).with_context(|| format!("invalid {} '{}'", name, raw))
}

fn open_api(args: &[String], idx: usize) -> Result<SettlementApi> {
    let db_path = args
        .get(idx)
        .cloned()
        .unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, "opening settlement database");

    SettlementApi::open(&db_path).context("failed to open settlement database")
}

async fn run(args: &[String]) -> Result<()> {
    let park_id = arg(args, 0, "park_id")?;
    let year = parse_year(arg(args, 1, "year")?)?;
    let api = open_api(args, 2)?;

    let result = api.run_settlement(park_id, year).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn import(args: &[String]) -> Result<()> {
    let csv_path = arg(args, 0, "csv_path")?;
    let park_id = arg(args, 1, "park_id")?;
    let year = parse_year(arg(args, 2, "year")?)?;
    let api = open_api(args, 3)?;

    let summary = api.import_plot_areas(Path::new(csv_path), park_id, year)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn configure(args: &[String]) -> Result<()> {
    let config = SettlementConfiguration {
        park_id: arg(args, 0, "park_id")?.to_string(),
        year: parse_year(arg(args, 1, "year")?)?,
        total_revenue: parse_decimal(arg(args, 2, "total_revenue")?, "total_revenue")?,
        minimum_rent_per_turbine: parse_decimal(
            arg(args, 3, "minimum_rent_per_turbine")?,
            "minimum_rent_per_turbine",
        )?,
        wea_share_percentage: parse_decimal(arg(args, 4, "wea_pct")?, "wea_pct")?,
        pool_share_percentage: parse_decimal(arg(args, 5, "pool_pct")?, "pool_pct")?,
        revenue_phase_percentage: parse_decimal(arg(args, 6, "phase_pct")?, "phase_pct")?,
    };
    let api = open_api(args, 7)?;

    api.save_configuration(&config)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
