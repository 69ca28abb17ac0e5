// ==========================================
// Windpark Settlement - Settlement Input & Result
// ==========================================
// Input: SettlementConfiguration (park + year)
// Output: SettlementCalculationResult, consumed read-only by
//         report rendering, invoicing and UI summaries
// ==========================================
// Every monetary field is required. No "k.A." placeholders.
// ==========================================

use crate::domain::lease::PlotArea;
use crate::domain::money::Money;
use crate::domain::types::AreaCategory;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// SettlementConfiguration - one per park and settlement year
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementConfiguration {
    pub park_id: String,
    pub year: i32,

    /// Net park revenue of the period
    pub total_revenue: Decimal,

    /// Guaranteed minimum rent per turbine (Mindestpacht je WEA)
    pub minimum_rent_per_turbine: Decimal,

    /// Share of recognizable revenue distributed over WEA plots, 0..=100
    pub wea_share_percentage: Decimal,

    /// Share of recognizable revenue distributed over Pool plots, 0..=100
    pub pool_share_percentage: Decimal,

    /// Fraction of the period's revenue recognized for this settlement, 0..=100
    pub revenue_phase_percentage: Decimal,
}

// ==========================================
// LeaseCalculationResult - per lease, never mutated after creation
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseCalculationResult {
    pub lease_id: String,
    pub lessor_id: String,
    pub lessor_name: String,

    pub wea_count: u32,
    pub pool_count: u32,
    pub other_count: u32,

    /// District -> distinct plot numbers, for the report's parcel listing
    pub districts: BTreeMap<String, Vec<String>>,

    pub wea_revenue_share: Money,
    pub pool_revenue_share: Money,
    pub other_revenue_share: Money,

    pub total_minimum_rent: Money,
    pub total_revenue_share: Money,
    /// max(total_minimum_rent, total_revenue_share)
    pub total_payment: Money,
    /// total_revenue_share - total_minimum_rent (signed)
    pub total_difference: Money,
    /// true when the minimum rent tops up the revenue share
    pub guarantee_applied: bool,

    pub plot_areas: Vec<PlotArea>,
}

// ==========================================
// PoolSummary - one entry per area category
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummary {
    pub category: AreaCategory,
    /// Applied share; for Other this is the implicit residual
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
    /// Park-wide plot area count in this category
    pub park_count: u32,
    pub amount: Money,
    pub allocated: Money,
    /// Pool amount with no holder (park_count == 0); not paid out
    pub unallocated: Money,
}

// ==========================================
// SettlementTotals
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementTotals {
    /// Leases with at least one plot area
    pub lease_count: u32,
    pub guaranteed_lease_count: u32,
    pub wea_count: u32,
    pub pool_count: u32,
    pub other_count: u32,
    pub total_minimum_rent: Money,
    pub total_revenue_share: Money,
    pub total_payment: Money,
    pub total_difference: Money,
    pub unallocated_revenue: Money,
}

// ==========================================
// SettlementCalculationResult - park level aggregate
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementCalculationResult {
    pub park_id: String,
    pub year: i32,
    pub total_revenue: Money,

    // configuration echo, as applied (percentages rounded to 4 places)
    pub minimum_rent_per_turbine: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub wea_share_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pool_share_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue_phase_percentage: Decimal,

    pub calculated_at: DateTime<Utc>,

    /// total_revenue scaled by the phase percentage
    pub recognizable_revenue: Money,
    pub pools: Vec<PoolSummary>,

    /// Same order as the input leases
    pub leases: Vec<LeaseCalculationResult>,
    pub totals: SettlementTotals,
}

impl SettlementCalculationResult {
    /// Result rows for one lessor (a lessor may hold several leases).
    pub fn leases_of_lessor<'a>(
        &'a self,
        lessor_id: &'a str,
    ) -> impl Iterator<Item = &'a LeaseCalculationResult> + 'a {
        self.leases.iter().filter(move |l| l.lessor_id == lessor_id)
    }

    pub fn pool(&self, category: AreaCategory) -> Option<&PoolSummary> {
        self.pools.iter().find(|p| p.category == category)
    }
}
