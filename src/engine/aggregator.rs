// ==========================================
// Windpark Settlement - Settlement Aggregator
// ==========================================
// Responsibility: fold per-lease results into park totals
// Rounding reconciliation: pools are rounded once at pool level and
// apportioned to whole cents, so rows add up exactly. The share total
// is cross-checked against the park-level figure from the PoolTable.
// ==========================================

use crate::domain::money::Money;
use crate::domain::settlement::{LeaseCalculationResult, PoolSummary, SettlementTotals};
use crate::engine::entitlement::PoolTable;
use crate::engine::error::CalculationError;
use crate::engine::fixed_point::ppm_to_percentage;

fn add(acc: Money, value: Money, what: &'static str) -> Result<Money, CalculationError> {
    acc.checked_add(value).ok_or(CalculationError::Overflow(what))
}

fn add_count(acc: u32, value: u32) -> Result<u32, CalculationError> {
    acc.checked_add(value)
        .ok_or(CalculationError::Overflow("plot area count"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementAggregator;

impl SettlementAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Sums lease rows into totals.
    ///
    /// # Errors
    /// - `Overflow` when a sum leaves the i64 cent range
    /// - `ReconciliationMismatch` when the rows do not add up to the
    ///   park-level allocated revenue
    pub fn aggregate(
        &self,
        leases: &[LeaseCalculationResult],
        table: &PoolTable,
    ) -> Result<SettlementTotals, CalculationError> {
        let mut totals = SettlementTotals::default();

        for lease in leases {
            if !lease.plot_areas.is_empty() {
                totals.lease_count += 1;
            }
            if lease.guarantee_applied {
                totals.guaranteed_lease_count += 1;
            }
            totals.wea_count = add_count(totals.wea_count, lease.wea_count)?;
            totals.pool_count = add_count(totals.pool_count, lease.pool_count)?;
            totals.other_count = add_count(totals.other_count, lease.other_count)?;

            totals.total_minimum_rent =
                add(totals.total_minimum_rent, lease.total_minimum_rent, "minimum rent total")?;
            totals.total_revenue_share =
                add(totals.total_revenue_share, lease.total_revenue_share, "revenue share total")?;
            totals.total_payment = add(totals.total_payment, lease.total_payment, "payment total")?;
            totals.total_difference =
                add(totals.total_difference, lease.total_difference, "difference total")?;
        }

        let park_share = table.allocated_total()?;
        if totals.total_revenue_share != park_share {
            return Err(CalculationError::ReconciliationMismatch {
                rows: totals.total_revenue_share.cents(),
                park: park_share.cents(),
            });
        }
        totals.unallocated_revenue = table.unallocated_total()?;

        Ok(totals)
    }

    /// Per-category pool listing for the result record.
    ///
    /// # Errors
    /// - `Overflow` when a park-wide count does not fit the u32 result field
    pub fn pool_summaries(&self, table: &PoolTable) -> Result<Vec<PoolSummary>, CalculationError> {
        table
            .pools()
            .iter()
            .map(|pool| -> Result<PoolSummary, CalculationError> {
                Ok(PoolSummary {
                    category: pool.category,
                    percentage: ppm_to_percentage(pool.share_ppm),
                    park_count: u32::try_from(pool.park_count)
                        .map_err(|_| CalculationError::Overflow("park count"))?,
                    amount: pool.amount,
                    allocated: pool.allocated(),
                    unallocated: pool.unallocated(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lease::PlotArea;
    use crate::domain::types::AreaCategory;
    use crate::engine::classifier::ParcelClassification;
    use crate::engine::entitlement::ValidatedConfiguration;
    use crate::domain::settlement::SettlementConfiguration;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn row(share: i64, minimum: i64, plots: usize) -> LeaseCalculationResult {
        let payment = share.max(minimum);
        LeaseCalculationResult {
            lease_id: "L".to_string(),
            lessor_id: "P".to_string(),
            lessor_name: "Lessor".to_string(),
            wea_count: plots as u32,
            pool_count: 0,
            other_count: 0,
            districts: BTreeMap::new(),
            wea_revenue_share: Money::from_cents(share),
            pool_revenue_share: Money::ZERO,
            other_revenue_share: Money::ZERO,
            total_minimum_rent: Money::from_cents(minimum),
            total_revenue_share: Money::from_cents(share),
            total_payment: Money::from_cents(payment),
            total_difference: Money::from_cents(share - minimum),
            guarantee_applied: minimum > share,
            plot_areas: vec![PlotArea::new("Nordheide", "1", AreaCategory::Wea); plots],
        }
    }

    fn table(revenue: rust_decimal::Decimal, wea_count: u32) -> PoolTable {
        let config = SettlementConfiguration {
            park_id: "WP".to_string(),
            year: 2024,
            total_revenue: revenue,
            minimum_rent_per_turbine: dec!(0),
            wea_share_percentage: dec!(100),
            pool_share_percentage: dec!(0),
            revenue_phase_percentage: dec!(100),
        };
        let validated = ValidatedConfiguration::validate(&config).unwrap();
        let classification = ParcelClassification {
            wea_count,
            ..Default::default()
        };
        PoolTable::build(&validated, &[classification]).unwrap()
    }

    #[test]
    fn test_totals_sum_rows() {
        let rows = vec![row(600, 100, 1), row(400, 500, 1), row(0, 0, 0)];
        let totals = SettlementAggregator::new()
            .aggregate(&rows, &table(dec!(10), 2))
            .unwrap();

        assert_eq!(totals.lease_count, 2);
        assert_eq!(totals.guaranteed_lease_count, 1);
        assert_eq!(totals.total_revenue_share, Money::from_cents(1_000));
        assert_eq!(totals.total_minimum_rent, Money::from_cents(600));
        assert_eq!(totals.total_payment, Money::from_cents(1_100));
        assert_eq!(totals.total_difference, Money::from_cents(400));
        assert_eq!(totals.unallocated_revenue, Money::ZERO);
    }

    #[test]
    fn test_mismatch_is_reported() {
        let rows = vec![row(999, 0, 1)];
        let err = SettlementAggregator::new()
            .aggregate(&rows, &table(dec!(10), 1))
            .unwrap_err();
        assert_eq!(err, CalculationError::ReconciliationMismatch { rows: 999, park: 1_000 });
    }

    #[test]
    fn test_no_leases() {
        let totals = SettlementAggregator::new()
            .aggregate(&[], &table(dec!(10), 0))
            .unwrap();
        assert_eq!(totals.lease_count, 0);
        assert_eq!(totals.total_payment, Money::ZERO);
        assert_eq!(totals.unallocated_revenue, Money::from_cents(1_000));
    }

    #[test]
    fn test_pool_summaries() {
        let summaries = SettlementAggregator::new()
            .pool_summaries(&table(dec!(10), 0))
            .unwrap();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].percentage, dec!(100));
        assert_eq!(summaries[0].unallocated, Money::from_cents(1_000));
        assert_eq!(summaries[2].amount, Money::ZERO);
    }

    #[test]
    fn test_park_count_beyond_u32_is_overflow() {
        let config = SettlementConfiguration {
            park_id: "WP".to_string(),
            year: 2024,
            total_revenue: dec!(10),
            minimum_rent_per_turbine: dec!(0),
            wea_share_percentage: dec!(100),
            pool_share_percentage: dec!(0),
            revenue_phase_percentage: dec!(100),
        };
        let validated = ValidatedConfiguration::validate(&config).unwrap();
        let huge = ParcelClassification {
            wea_count: u32::MAX,
            ..Default::default()
        };
        let table = PoolTable::build(&validated, &[huge.clone(), huge]).unwrap();

        let err = SettlementAggregator::new().pool_summaries(&table).unwrap_err();
        assert_eq!(err, CalculationError::Overflow("park count"));
    }
}
