use super::SettlementEngine;
use crate::domain::lease::Lease;
use crate::domain::money::Money;
use crate::domain::settlement::SettlementConfiguration;
use crate::domain::types::AreaCategory;
use crate::engine::error::{ConfigurationError, DataError, SettlementError};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

// ==========================================
// Test helpers
// ==========================================

fn example_config() -> SettlementConfiguration {
    SettlementConfiguration {
        park_id: "WP-NORDHEIDE".to_string(),
        year: 2024,
        total_revenue: dec!(100000),
        minimum_rent_per_turbine: dec!(2000),
        wea_share_percentage: dec!(70),
        pool_share_percentage: dec!(20),
        revenue_phase_percentage: dec!(100),
    }
}

fn example_leases() -> Vec<Lease> {
    vec![
        Lease::new("A", "P-100", "Hof Brandt")
            .with_plot_area("Nordheide", "12", AreaCategory::Wea)
            .with_plot_area("Nordheide", "13", AreaCategory::Wea),
        Lease::new("B", "P-200", "Familie Voss")
            .with_plot_area("Nordheide", "40", AreaCategory::Wea)
            .with_plot_area("Südfeld", "7/2", AreaCategory::Pool),
    ]
}

fn stamp() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap()
}

fn cents(c: i64) -> Money {
    Money::from_cents(c)
}

// ==========================================
// Worked example
// ==========================================

#[test]
fn test_example_two_leases() {
    let result = SettlementEngine::new()
        .calculate(&example_config(), &example_leases(), stamp())
        .unwrap();

    assert_eq!(result.recognizable_revenue, cents(10_000_000));

    let a = &result.leases[0];
    assert_eq!(a.lease_id, "A");
    assert_eq!(a.wea_revenue_share, cents(4_666_667));
    assert_eq!(a.total_minimum_rent, cents(400_000));
    assert_eq!(a.total_payment, cents(4_666_667));
    assert_eq!(a.total_difference, cents(4_266_667));
    assert!(!a.guarantee_applied);

    let b = &result.leases[1];
    assert_eq!(b.wea_revenue_share, cents(2_333_333));
    assert_eq!(b.pool_revenue_share, cents(2_000_000));
    assert_eq!(b.total_revenue_share, cents(4_333_333));
    assert_eq!(b.total_minimum_rent, cents(200_000));
    assert_eq!(b.total_payment, cents(4_333_333));

    assert_eq!(result.totals.lease_count, 2);
    assert_eq!(result.totals.total_payment, cents(9_000_000));
    assert_eq!(result.totals.total_revenue_share, cents(9_000_000));
    assert_eq!(result.totals.total_minimum_rent, cents(600_000));
    assert_eq!(result.totals.unallocated_revenue, cents(1_000_000));

    let other = result.pool(AreaCategory::Other).unwrap();
    assert_eq!(other.park_count, 0);
    assert_eq!(other.amount, cents(1_000_000));
    assert_eq!(other.allocated, Money::ZERO);
}

#[test]
fn test_configuration_echo() {
    let result = SettlementEngine::new()
        .calculate(&example_config(), &example_leases(), stamp())
        .unwrap();

    assert_eq!(result.park_id, "WP-NORDHEIDE");
    assert_eq!(result.year, 2024);
    assert_eq!(result.total_revenue, cents(10_000_000));
    assert_eq!(result.minimum_rent_per_turbine, cents(200_000));
    assert_eq!(result.wea_share_percentage, dec!(70));
    assert_eq!(result.pool_share_percentage, dec!(20));
    assert_eq!(result.revenue_phase_percentage, dec!(100));
    assert_eq!(result.calculated_at, stamp());
}

#[test]
fn test_configuration_echo_shows_applied_percentages() {
    let mut config = example_config();
    config.wea_share_percentage = dec!(33.33335);
    config.revenue_phase_percentage = dec!(87.50004);

    let result = SettlementEngine::new()
        .calculate(&config, &example_leases(), stamp())
        .unwrap();

    assert_eq!(result.wea_share_percentage, dec!(33.3334));
    assert_eq!(result.revenue_phase_percentage, dec!(87.5));
    assert_eq!(
        result.pool(AreaCategory::Wea).unwrap().percentage,
        result.wea_share_percentage
    );
}

#[test]
fn test_districts_listed_per_lease() {
    let result = SettlementEngine::new()
        .calculate(&example_config(), &example_leases(), stamp())
        .unwrap();

    let b = &result.leases[1];
    assert_eq!(b.districts.len(), 2);
    assert_eq!(b.districts["Südfeld"], vec!["7/2".to_string()]);
    assert_eq!(b.plot_areas.len(), 2);
}

// ==========================================
// Guarantee and totals
// ==========================================

#[test]
fn test_minimum_rent_tops_up_weak_year() {
    let mut config = example_config();
    config.total_revenue = dec!(3000);

    let result = SettlementEngine::new()
        .calculate(&config, &example_leases(), stamp())
        .unwrap();

    for lease in &result.leases {
        assert!(lease.total_payment >= lease.total_minimum_rent);
        assert!(lease.guarantee_applied);
    }
    // A: 2 turbines, B: 1 turbine
    assert_eq!(result.leases[0].total_payment, cents(400_000));
    assert_eq!(result.leases[1].total_payment, cents(200_000));
    assert_eq!(result.totals.guaranteed_lease_count, 2);
    assert_eq!(result.totals.total_payment, cents(600_000));
    assert!(result.totals.total_difference.is_negative());
}

#[test]
fn test_totals_equal_sum_of_rows_with_odd_amounts() {
    let mut config = example_config();
    config.total_revenue = dec!(123456.79);
    config.wea_share_percentage = dec!(61.7);
    config.pool_share_percentage = dec!(27.15);
    config.revenue_phase_percentage = dec!(83.3333);

    let leases: Vec<Lease> = (0..7)
        .map(|i| {
            let mut lease = Lease::new(&format!("L{}", i), &format!("P{}", i), "Lessor");
            for w in 0..(i % 3 + 1) {
                lease = lease.with_plot_area("Ostmoor", &format!("{}-{}", i, w), AreaCategory::Wea);
            }
            if i % 2 == 0 {
                lease = lease.with_plot_area("Ostmoor", &format!("p{}", i), AreaCategory::Pool);
            }
            if i % 3 == 0 {
                lease = lease.with_plot_area("Westmoor", &format!("o{}", i), AreaCategory::Other);
            }
            lease
        })
        .collect();

    let result = SettlementEngine::new()
        .calculate(&config, &leases, stamp())
        .unwrap();

    let payment_rows: i64 = result.leases.iter().map(|l| l.total_payment.cents()).sum();
    let share_rows: i64 = result.leases.iter().map(|l| l.total_revenue_share.cents()).sum();
    assert_eq!(result.totals.total_payment.cents(), payment_rows);
    assert_eq!(result.totals.total_revenue_share.cents(), share_rows);
    // every pool has holders, so all recognizable revenue is distributed
    assert_eq!(share_rows, result.recognizable_revenue.cents());
    assert_eq!(result.totals.unallocated_revenue, Money::ZERO);

    for lease in &result.leases {
        assert!(lease.total_payment >= lease.total_minimum_rent);
        assert_eq!(
            lease.total_difference.cents(),
            lease.total_revenue_share.cents() - lease.total_minimum_rent.cents()
        );
    }
}

#[test]
fn test_phase_does_not_scale_minimum_rent() {
    let mut config = example_config();
    config.revenue_phase_percentage = dec!(50);

    let result = SettlementEngine::new()
        .calculate(&config, &example_leases(), stamp())
        .unwrap();

    assert_eq!(result.recognizable_revenue, cents(5_000_000));
    assert_eq!(result.leases[0].total_minimum_rent, cents(400_000));
    assert_eq!(result.leases[0].total_revenue_share, cents(2_333_334));
}

// ==========================================
// Monotonicity and determinism
// ==========================================

#[test]
fn test_more_revenue_never_lowers_a_share() {
    let leases = vec![
        Lease::new("A", "P1", "A").with_plot_area("D", "1", AreaCategory::Wea),
        Lease::new("B", "P2", "B")
            .with_plot_area("D", "2", AreaCategory::Wea)
            .with_plot_area("D", "3", AreaCategory::Wea)
            .with_plot_area("D", "4", AreaCategory::Other),
        Lease::new("C", "P3", "C")
            .with_plot_area("D", "5", AreaCategory::Wea)
            .with_plot_area("D", "6", AreaCategory::Pool)
            .with_plot_area("D", "7", AreaCategory::Other),
    ];
    let engine = SettlementEngine::new();
    let mut config = example_config();
    config.minimum_rent_per_turbine = dec!(0.05);
    config.wea_share_percentage = dec!(33.3333);
    config.pool_share_percentage = dec!(14.2857);

    let mut previous: Option<Vec<(Money, Money)>> = None;
    for revenue_cents in 0..600_i64 {
        config.total_revenue = Decimal::new(revenue_cents, 2);
        let result = engine.calculate(&config, &leases, stamp()).unwrap();
        let current: Vec<(Money, Money)> = result
            .leases
            .iter()
            .map(|l| (l.total_revenue_share, l.total_payment))
            .collect();

        if let Some(prev) = &previous {
            for (before, after) in prev.iter().zip(current.iter()) {
                assert!(after.0 >= before.0, "share dropped at {} cents", revenue_cents);
                assert!(after.1 >= before.1, "payment dropped at {} cents", revenue_cents);
            }
        }
        previous = Some(current);
    }
}

#[test]
fn test_identical_inputs_identical_results() {
    let engine = SettlementEngine::new();
    let first = engine.calculate(&example_config(), &example_leases(), stamp()).unwrap();
    let second = engine.calculate(&example_config(), &example_leases(), stamp()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_concurrent_matches_sequential() {
    let leases: Vec<Lease> = (0..41)
        .map(|i| {
            let category = match i % 4 {
                0 | 1 => AreaCategory::Wea,
                2 => AreaCategory::Pool,
                _ => AreaCategory::Other,
            };
            Lease::new(&format!("L{:03}", i), &format!("P{}", i % 9), "Lessor")
                .with_plot_area("Nordheide", &format!("{}", i), category)
        })
        .collect();
    let engine = SettlementEngine::new();

    let sequential = engine.calculate(&example_config(), &leases, stamp()).unwrap();
    for chunk_size in [0, 1, 5, 64] {
        let concurrent = engine
            .calculate_concurrent(&example_config(), Arc::new(leases.clone()), chunk_size, stamp())
            .await
            .unwrap();
        assert_eq!(concurrent, sequential, "chunk_size={}", chunk_size);
    }
}

// ==========================================
// Edge cases
// ==========================================

#[test]
fn test_no_wea_parcels_anywhere() {
    let leases = vec![
        Lease::new("A", "P1", "A").with_plot_area("D", "1", AreaCategory::Pool),
        Lease::new("B", "P2", "B").with_plot_area("D", "2", AreaCategory::Other),
    ];
    let result = SettlementEngine::new()
        .calculate(&example_config(), &leases, stamp())
        .unwrap();

    assert!(result.leases.iter().all(|l| l.wea_revenue_share == Money::ZERO));
    assert!(result.leases.iter().all(|l| l.total_minimum_rent == Money::ZERO));
    assert_eq!(result.leases[0].total_payment, cents(2_000_000));
    assert_eq!(result.leases[1].total_payment, cents(1_000_000));
    assert_eq!(result.totals.unallocated_revenue, cents(7_000_000));
}

#[test]
fn test_lease_without_plots_still_listed() {
    let mut leases = example_leases();
    leases.push(Lease::new("C", "P-300", "Erbengemeinschaft Kühl"));

    let result = SettlementEngine::new()
        .calculate(&example_config(), &leases, stamp())
        .unwrap();

    assert_eq!(result.leases.len(), 3);
    let c = &result.leases[2];
    assert_eq!(c.total_payment, Money::ZERO);
    assert_eq!(c.total_revenue_share, Money::ZERO);
    assert_eq!(c.total_difference, Money::ZERO);
    assert!(c.districts.is_empty());
    assert_eq!(result.totals.lease_count, 2);
    assert_eq!(result.totals.total_payment, cents(9_000_000));
}

#[test]
fn test_no_leases_is_empty_result() {
    let result = SettlementEngine::new()
        .calculate(&example_config(), &[], stamp())
        .unwrap();

    assert!(result.leases.is_empty());
    assert_eq!(result.totals.lease_count, 0);
    assert_eq!(result.totals.total_payment, Money::ZERO);
    assert_eq!(result.totals.total_revenue_share, Money::ZERO);
    assert_eq!(result.totals.unallocated_revenue, cents(10_000_000));
}

#[test]
fn test_zero_revenue() {
    let mut config = example_config();
    config.total_revenue = dec!(0);
    let result = SettlementEngine::new()
        .calculate(&config, &example_leases(), stamp())
        .unwrap();
    assert_eq!(result.totals.total_revenue_share, Money::ZERO);
    assert_eq!(result.totals.total_payment, cents(600_000));
}

// ==========================================
// Errors
// ==========================================

#[test]
fn test_negative_revenue_fails_whole_run() {
    let mut config = example_config();
    config.total_revenue = dec!(-100);
    let err = SettlementEngine::new()
        .calculate(&config, &example_leases(), stamp())
        .unwrap_err();

    assert!(err.is_configuration());
    assert_eq!(
        err,
        SettlementError::Configuration(ConfigurationError::NegativeRevenue("-100".to_string()))
    );
}

#[test]
fn test_pool_share_out_of_range() {
    let mut config = example_config();
    config.pool_share_percentage = dec!(101);
    let err = SettlementEngine::new()
        .calculate(&config, &example_leases(), stamp())
        .unwrap_err();
    assert!(matches!(
        err,
        SettlementError::Configuration(ConfigurationError::PercentageOutOfRange {
            field: "poolSharePercentage",
            ..
        })
    ));
}

#[test]
fn test_duplicate_lease_rejected() {
    let mut leases = example_leases();
    leases.push(Lease::new("A", "P-999", "Doppelt"));
    let err = SettlementEngine::new()
        .calculate(&example_config(), &leases, stamp())
        .unwrap_err();
    assert_eq!(err, SettlementError::Data(DataError::DuplicateLease("A".to_string())));
}
