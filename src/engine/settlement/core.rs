// ==========================================
// Windpark Settlement - Settlement Engine (sequential)
// ==========================================

use crate::domain::lease::Lease;
use crate::domain::money::Money;
use crate::domain::settlement::{
    LeaseCalculationResult, SettlementCalculationResult, SettlementConfiguration,
};
use crate::engine::aggregator::SettlementAggregator;
use crate::engine::classifier::{ParcelClassification, ParcelClassifier};
use crate::engine::entitlement::{EntitlementCalculator, PoolShares, PoolTable, ValidatedConfiguration};
use crate::engine::error::{CalculationError, DataError, SettlementResult};
use crate::engine::fixed_point::ppm_to_percentage;
use crate::engine::payout::PayoutResolver;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

/// Per-lease work that has no dependency on other leases.
pub(super) type LeaseEvaluation = (ParcelClassification, Money);

// ==========================================
// SettlementEngine
// ==========================================
// Stateless: every component is a pure function holder
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementEngine {
    classifier: ParcelClassifier,
    calculator: EntitlementCalculator,
    resolver: PayoutResolver,
    aggregator: SettlementAggregator,
}

impl SettlementEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================
    // Core methods
    // ==========================================

    /// Runs a settlement with an explicit timestamp.
    ///
    /// Same inputs and timestamp always produce the same result.
    ///
    /// # Arguments
    /// - `config`: park configuration for the settlement year
    /// - `leases`: all leases of the park and year, in report order
    /// - `calculated_at`: stamp written into the result
    ///
    /// # Errors
    /// - `Configuration`: invalid amounts or percentages
    /// - `Data`: duplicate lease ids
    /// - `Calculation`: arithmetic fault
    #[instrument(skip(self, config, leases), fields(
        park_id = %config.park_id,
        year = config.year,
        lease_count = leases.len()
    ))]
    pub fn calculate(
        &self,
        config: &SettlementConfiguration,
        leases: &[Lease],
        calculated_at: DateTime<Utc>,
    ) -> SettlementResult<SettlementCalculationResult> {
        let validated = Self::validate_inputs(config, leases)?;

        let (classifications, minimums): (Vec<_>, Vec<_>) = leases
            .iter()
            .map(|lease| self.evaluate_lease(&validated, lease))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .unzip();

        self.finish(config, &validated, leases, classifications, minimums, calculated_at)
    }

    /// Runs a settlement stamped with the current time.
    pub fn calculate_now(
        &self,
        config: &SettlementConfiguration,
        leases: &[Lease],
    ) -> SettlementResult<SettlementCalculationResult> {
        self.calculate(config, leases, Utc::now())
    }

    // ==========================================
    // Pipeline steps (shared with the concurrent path)
    // ==========================================

    pub(super) fn validate_inputs(
        config: &SettlementConfiguration,
        leases: &[Lease],
    ) -> SettlementResult<ValidatedConfiguration> {
        let validated = ValidatedConfiguration::validate(config).map_err(|e| {
            warn!(park_id = %config.park_id, year = config.year, error = %e, "settlement configuration rejected");
            e
        })?;

        let mut seen = HashSet::with_capacity(leases.len());
        for lease in leases {
            if !seen.insert(lease.lease_id.as_str()) {
                return Err(DataError::DuplicateLease(lease.lease_id.clone()).into());
            }
        }

        Ok(validated)
    }

    pub(super) fn evaluate_lease(
        &self,
        config: &ValidatedConfiguration,
        lease: &Lease,
    ) -> Result<LeaseEvaluation, CalculationError> {
        let classification = self.classifier.classify(lease);
        let minimum_rent = self.calculator.minimum_rent(config, &classification)?;
        Ok((classification, minimum_rent))
    }

    pub(super) fn finish(
        &self,
        config: &SettlementConfiguration,
        validated: &ValidatedConfiguration,
        leases: &[Lease],
        classifications: Vec<ParcelClassification>,
        minimums: Vec<Money>,
        calculated_at: DateTime<Utc>,
    ) -> SettlementResult<SettlementCalculationResult> {
        let table = PoolTable::build(validated, &classifications)?;
        let shares = self.calculator.allocate(&table, &classifications)?;

        let rows = leases
            .iter()
            .zip(classifications)
            .zip(minimums.into_iter().zip(shares))
            .map(|((lease, classification), (minimum_rent, share))| {
                self.lease_result(lease, classification, minimum_rent, share)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let totals = self.aggregator.aggregate(&rows, &table)?;

        info!(
            park_id = %config.park_id,
            year = config.year,
            lease_count = totals.lease_count,
            guaranteed_lease_count = totals.guaranteed_lease_count,
            total_payment = %totals.total_payment,
            unallocated_revenue = %totals.unallocated_revenue,
            "settlement calculated"
        );

        Ok(SettlementCalculationResult {
            park_id: config.park_id.clone(),
            year: config.year,
            total_revenue: validated.total_revenue,
            minimum_rent_per_turbine: validated.minimum_rent_per_turbine,
            wea_share_percentage: ppm_to_percentage(validated.wea_ppm),
            pool_share_percentage: ppm_to_percentage(validated.pool_ppm),
            revenue_phase_percentage: ppm_to_percentage(validated.phase_ppm),
            calculated_at,
            recognizable_revenue: table.recognizable_revenue,
            pools: self.aggregator.pool_summaries(&table)?,
            leases: rows,
            totals,
        })
    }

    fn lease_result(
        &self,
        lease: &Lease,
        classification: ParcelClassification,
        minimum_rent: Money,
        share: PoolShares,
    ) -> Result<LeaseCalculationResult, CalculationError> {
        let revenue_share = share.total()?;
        let payout = self.resolver.resolve(minimum_rent, revenue_share)?;

        Ok(LeaseCalculationResult {
            lease_id: lease.lease_id.clone(),
            lessor_id: lease.lessor_id.clone(),
            lessor_name: lease.lessor_name.clone(),
            wea_count: classification.wea_count,
            pool_count: classification.pool_count,
            other_count: classification.other_count,
            districts: classification.districts,
            wea_revenue_share: share.wea,
            pool_revenue_share: share.pool,
            other_revenue_share: share.other,
            total_minimum_rent: minimum_rent,
            total_revenue_share: revenue_share,
            total_payment: payout.payment,
            total_difference: payout.difference,
            guarantee_applied: payout.guarantee_applied(),
            plot_areas: lease.plot_areas.clone(),
        })
    }
}
