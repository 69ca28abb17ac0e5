// ==========================================
// Windpark Settlement - Entitlement Calculator
// ==========================================
// Responsibility: turn classified counts + park configuration into
//                 (a) guaranteed minimum rent per lease
//                 (b) pro-rata revenue share per lease
// ==========================================
// Rule: park-wide counts and pool amounts are computed once
//       (PoolTable), then one pass per category over all leases
// Rule: minimum rent is a full-year guarantee, only the revenue
//       side is phase-scaled
// ==========================================

use crate::domain::money::Money;
use crate::domain::settlement::SettlementConfiguration;
use crate::domain::types::AreaCategory;
use crate::engine::classifier::ParcelClassification;
use crate::engine::error::{CalculationError, ConfigurationError};
use crate::engine::fixed_point::{apportion, percentage_to_ppm, scale_half_up, FULL_SHARE_PPM};
use rust_decimal::Decimal;
use tracing::debug;

// ==========================================
// ValidatedConfiguration - fixed point view of the configuration
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedConfiguration {
    pub total_revenue: Money,
    pub minimum_rent_per_turbine: Money,
    pub wea_ppm: u32,
    pub pool_ppm: u32,
    pub phase_ppm: u32,
}

impl ValidatedConfiguration {
    /// Validates amounts and percentages. Nothing is allocated on failure.
    pub fn validate(config: &SettlementConfiguration) -> Result<Self, ConfigurationError> {
        if config.total_revenue < Decimal::ZERO {
            return Err(ConfigurationError::NegativeRevenue(
                config.total_revenue.to_string(),
            ));
        }
        if config.minimum_rent_per_turbine < Decimal::ZERO {
            return Err(ConfigurationError::NegativeMinimumRent(
                config.minimum_rent_per_turbine.to_string(),
            ));
        }

        let total_revenue = Money::from_decimal(config.total_revenue).ok_or_else(|| {
            ConfigurationError::AmountOutOfRange {
                field: "totalRevenue",
                value: config.total_revenue.to_string(),
            }
        })?;
        let minimum_rent_per_turbine = Money::from_decimal(config.minimum_rent_per_turbine)
            .ok_or_else(|| ConfigurationError::AmountOutOfRange {
                field: "minimumRentPerTurbine",
                value: config.minimum_rent_per_turbine.to_string(),
            })?;

        let wea_ppm = percentage_to_ppm("weaSharePercentage", config.wea_share_percentage)?;
        let pool_ppm = percentage_to_ppm("poolSharePercentage", config.pool_share_percentage)?;
        let phase_ppm =
            percentage_to_ppm("revenuePhasePercentage", config.revenue_phase_percentage)?;

        if wea_ppm + pool_ppm > FULL_SHARE_PPM {
            return Err(ConfigurationError::SharesExceedTotal {
                wea: config.wea_share_percentage.to_string(),
                pool: config.pool_share_percentage.to_string(),
            });
        }

        Ok(Self {
            total_revenue,
            minimum_rent_per_turbine,
            wea_ppm,
            pool_ppm,
            phase_ppm,
        })
    }

    /// Implicit residual share of the Other pool.
    pub fn other_ppm(&self) -> u32 {
        FULL_SHARE_PPM - self.wea_ppm - self.pool_ppm
    }

    pub fn share_ppm(&self, category: AreaCategory) -> u32 {
        match category {
            AreaCategory::Wea => self.wea_ppm,
            AreaCategory::Pool => self.pool_ppm,
            AreaCategory::Other => self.other_ppm(),
        }
    }

    /// Revenue counted for this settlement: total revenue × phase.
    pub fn recognizable_revenue(&self) -> Result<Money, CalculationError> {
        scale_half_up(self.total_revenue.cents(), self.phase_ppm).map(Money::from_cents)
    }
}

// ==========================================
// PoolTable - category -> (park-wide count, pool amount)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryPool {
    pub category: AreaCategory,
    pub share_ppm: u32,
    pub park_count: u64,
    pub amount: Money,
}

impl CategoryPool {
    /// Amount that actually reaches lessors.
    pub fn allocated(&self) -> Money {
        if self.park_count == 0 {
            Money::ZERO
        } else {
            self.amount
        }
    }

    pub fn unallocated(&self) -> Money {
        if self.park_count == 0 {
            self.amount
        } else {
            Money::ZERO
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolTable {
    pub recognizable_revenue: Money,
    pools: [CategoryPool; 3],
}

impl PoolTable {
    /// Splits recognizable revenue into the WEA / Pool / Other pools.
    ///
    /// The three pools always sum to the recognizable revenue.
    pub fn build(
        config: &ValidatedConfiguration,
        classifications: &[ParcelClassification],
    ) -> Result<Self, CalculationError> {
        let recognizable_revenue = config.recognizable_revenue()?;

        let weights: Vec<u64> = AreaCategory::ALL
            .iter()
            .map(|&c| u64::from(config.share_ppm(c)))
            .collect();
        let amounts = apportion(recognizable_revenue.cents(), &weights)?;

        let pools = AreaCategory::ALL.map(|category| {
            let park_count = classifications
                .iter()
                .map(|c| u64::from(c.count(category)))
                .sum();
            CategoryPool {
                category,
                share_ppm: config.share_ppm(category),
                park_count,
                amount: Money::from_cents(amounts[category.index()]),
            }
        });

        for pool in &pools {
            debug!(
                category = %pool.category,
                share_ppm = pool.share_ppm,
                park_count = pool.park_count,
                amount = %pool.amount,
                "revenue pool"
            );
        }

        Ok(Self {
            recognizable_revenue,
            pools,
        })
    }

    pub fn pool(&self, category: AreaCategory) -> &CategoryPool {
        &self.pools[category.index()]
    }

    pub fn pools(&self) -> &[CategoryPool] {
        &self.pools
    }

    /// Park-level share total, computed directly from the pools.
    pub fn allocated_total(&self) -> Result<Money, CalculationError> {
        self.pools.iter().try_fold(Money::ZERO, |acc, p| {
            acc.checked_add(p.allocated())
                .ok_or(CalculationError::Overflow("pool total"))
        })
    }

    pub fn unallocated_total(&self) -> Result<Money, CalculationError> {
        self.pools.iter().try_fold(Money::ZERO, |acc, p| {
            acc.checked_add(p.unallocated())
                .ok_or(CalculationError::Overflow("pool total"))
        })
    }
}

// ==========================================
// PoolShares - one lease's allocation per pool
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolShares {
    pub wea: Money,
    pub pool: Money,
    pub other: Money,
}

impl PoolShares {
    pub fn get(&self, category: AreaCategory) -> Money {
        match category {
            AreaCategory::Wea => self.wea,
            AreaCategory::Pool => self.pool,
            AreaCategory::Other => self.other,
        }
    }

    fn set(&mut self, category: AreaCategory, amount: Money) {
        match category {
            AreaCategory::Wea => self.wea = amount,
            AreaCategory::Pool => self.pool = amount,
            AreaCategory::Other => self.other = amount,
        }
    }

    pub fn total(&self) -> Result<Money, CalculationError> {
        self.wea
            .checked_add(self.pool)
            .and_then(|m| m.checked_add(self.other))
            .ok_or(CalculationError::Overflow("lease revenue share"))
    }
}

// ==========================================
// EntitlementCalculator
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct EntitlementCalculator;

impl EntitlementCalculator {
    pub fn new() -> Self {
        Self
    }

    /// `wea_count × minimum_rent_per_turbine`. Pool and Other plots carry no minimum.
    pub fn minimum_rent(
        &self,
        config: &ValidatedConfiguration,
        classification: &ParcelClassification,
    ) -> Result<Money, CalculationError> {
        config
            .minimum_rent_per_turbine
            .checked_mul_count(classification.wea_count)
            .ok_or(CalculationError::Overflow("minimum rent"))
    }

    /// Distributes every pool pro rata over the leases holding plots of its category.
    ///
    /// # Arguments
    /// - `table`: pool amounts and park-wide counts
    /// - `classifications`: one entry per lease, in lease order
    ///
    /// # Returns
    /// One `PoolShares` per lease, same order. Rows of a pool sum exactly to
    /// the pool amount; a pool with no holders allocates nothing.
    pub fn allocate(
        &self,
        table: &PoolTable,
        classifications: &[ParcelClassification],
    ) -> Result<Vec<PoolShares>, CalculationError> {
        let mut shares = vec![PoolShares::default(); classifications.len()];

        for pool in table.pools() {
            if pool.park_count == 0 {
                continue;
            }

            let weights: Vec<u64> = classifications
                .iter()
                .map(|c| u64::from(c.count(pool.category)))
                .collect();
            let parts = apportion(pool.amount.cents(), &weights)?;

            for (share, cents) in shares.iter_mut().zip(parts) {
                share.set(pool.category, Money::from_cents(cents));
            }
        }

        Ok(shares)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config(revenue: Decimal, wea: Decimal, pool: Decimal, phase: Decimal) -> SettlementConfiguration {
        SettlementConfiguration {
            park_id: "WP-NORD".to_string(),
            year: 2024,
            total_revenue: revenue,
            minimum_rent_per_turbine: dec!(2000),
            wea_share_percentage: wea,
            pool_share_percentage: pool,
            revenue_phase_percentage: phase,
        }
    }

    fn classification(wea: u32, pool: u32, other: u32) -> ParcelClassification {
        ParcelClassification {
            wea_count: wea,
            pool_count: pool,
            other_count: other,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_rejects_negative_revenue() {
        let err = ValidatedConfiguration::validate(&config(dec!(-1), dec!(70), dec!(20), dec!(100)))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::NegativeRevenue(_)));
    }

    #[test]
    fn test_validate_rejects_negative_minimum_rent() {
        let mut cfg = config(dec!(1000), dec!(70), dec!(20), dec!(100));
        cfg.minimum_rent_per_turbine = dec!(-0.01);
        let err = ValidatedConfiguration::validate(&cfg).unwrap_err();
        assert!(matches!(err, ConfigurationError::NegativeMinimumRent(_)));
    }

    #[test]
    fn test_validate_rejects_phase_above_100() {
        let err = ValidatedConfiguration::validate(&config(dec!(1000), dec!(70), dec!(20), dec!(120)))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::PercentageOutOfRange {
                field: "revenuePhasePercentage",
                value: "120".to_string()
            }
        );
    }

    #[test]
    fn test_validate_rejects_shares_above_100() {
        let err = ValidatedConfiguration::validate(&config(dec!(1000), dec!(80), dec!(30), dec!(100)))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::SharesExceedTotal { .. }));
    }

    #[test]
    fn test_other_is_residual() {
        let v = ValidatedConfiguration::validate(&config(dec!(1000), dec!(70), dec!(20), dec!(100)))
            .unwrap();
        assert_eq!(v.other_ppm(), 100_000);
    }

    #[test]
    fn test_phase_scales_revenue_only() {
        let v = ValidatedConfiguration::validate(&config(dec!(100000), dec!(70), dec!(20), dec!(25)))
            .unwrap();
        assert_eq!(v.recognizable_revenue().unwrap(), Money::from_cents(2_500_000));

        let c = classification(3, 0, 0);
        let minimum = EntitlementCalculator::new().minimum_rent(&v, &c).unwrap();
        assert_eq!(minimum, Money::from_cents(600_000));
    }

    #[test]
    fn test_pool_table_sums_to_recognizable_revenue() {
        let v = ValidatedConfiguration::validate(&config(dec!(33333.33), dec!(33.3333), dec!(33.3333), dec!(100)))
            .unwrap();
        let table = PoolTable::build(&v, &[classification(1, 1, 1)]).unwrap();
        let sum: i64 = table.pools().iter().map(|p| p.amount.cents()).sum();
        assert_eq!(sum, table.recognizable_revenue.cents());
    }

    #[test]
    fn test_allocate_pro_rata_with_zero_count_pool() {
        let v = ValidatedConfiguration::validate(&config(dec!(100000), dec!(70), dec!(20), dec!(100)))
            .unwrap();
        let classes = vec![classification(2, 0, 0), classification(1, 1, 0)];
        let table = PoolTable::build(&v, &classes).unwrap();

        assert_eq!(table.pool(AreaCategory::Other).park_count, 0);
        assert_eq!(table.unallocated_total().unwrap(), Money::from_cents(1_000_000));
        assert_eq!(table.allocated_total().unwrap(), Money::from_cents(9_000_000));

        let shares = EntitlementCalculator::new().allocate(&table, &classes).unwrap();
        assert_eq!(shares[0].wea, Money::from_cents(4_666_667));
        assert_eq!(shares[1].wea, Money::from_cents(2_333_333));
        assert_eq!(shares[1].pool, Money::from_cents(2_000_000));
        assert_eq!(shares[0].other, Money::ZERO);
        assert_eq!(shares[1].total().unwrap(), Money::from_cents(4_333_333));
    }

    #[test]
    fn test_no_wea_anywhere() {
        let v = ValidatedConfiguration::validate(&config(dec!(50000), dec!(70), dec!(20), dec!(100)))
            .unwrap();
        let classes = vec![classification(0, 2, 0), classification(0, 0, 1)];
        let table = PoolTable::build(&v, &classes).unwrap();
        let shares = EntitlementCalculator::new().allocate(&table, &classes).unwrap();

        assert!(shares.iter().all(|s| s.wea == Money::ZERO));
        assert_eq!(shares[0].pool, Money::from_cents(1_000_000));
        assert_eq!(shares[1].other, Money::from_cents(500_000));
    }
}
