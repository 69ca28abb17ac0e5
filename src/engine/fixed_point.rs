// ==========================================
// Windpark Settlement - Fixed Point Arithmetic
// ==========================================
// Percentages: parts per million of the whole (100 % = 1_000_000)
// Money: whole cents (i64), products widened to i128/u128
// Apportionment: highest averages (D'Hondt), exact to the cent
// ==========================================

use crate::engine::error::{CalculationError, ConfigurationError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// 100 % expressed in parts per million.
pub const FULL_SHARE_PPM: u32 = 1_000_000;

/// ppm per percentage point.
const PPM_PER_PERCENT: i64 = 10_000;

/// Converts a percentage in [0, 100] into ppm.
///
/// Precision beyond four decimal places is rounded half away from zero.
pub fn percentage_to_ppm(field: &'static str, value: Decimal) -> Result<u32, ConfigurationError> {
    let out_of_range = || ConfigurationError::PercentageOutOfRange {
        field,
        value: value.to_string(),
    };

    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(out_of_range());
    }

    (value * Decimal::from(PPM_PER_PERCENT))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .filter(|ppm| *ppm <= FULL_SHARE_PPM)
        .ok_or_else(out_of_range)
}

/// Converts ppm back to a percentage for the configuration echo.
pub fn ppm_to_percentage(ppm: u32) -> Decimal {
    Decimal::new(i64::from(ppm), 4).normalize()
}

/// `amount × ppm / 1_000_000`, rounded half up.
pub fn scale_half_up(amount_cents: i64, ppm: u32) -> Result<i64, CalculationError> {
    if amount_cents < 0 {
        return Err(CalculationError::NegativeAmount {
            context: "phase scaling",
            cents: amount_cents,
        });
    }

    let full = i128::from(FULL_SHARE_PPM);
    let scaled = (i128::from(amount_cents) * i128::from(ppm) + full / 2) / full;
    i64::try_from(scaled).map_err(|_| CalculationError::Overflow("phase scaling"))
}

// ==========================================
// Highest averages apportionment
// ==========================================

/// Next-seat candidate. Ordered by `weight / divisor`, ties go to the lower index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    index: usize,
    weight: u128,
    divisor: u128,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weight * other.divisor)
            .cmp(&(other.weight * self.divisor))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Splits `total_cents` over `weights` so that the parts sum to `total_cents` exactly.
///
/// Every part first receives the floor of its exact quota; the remaining
/// cents (fewer than the number of positive weights) go one at a time to the
/// part with the largest `weight / (allocated + 1)`. This is D'Hondt seeded at
/// the lower quota, which makes every part non-decreasing in `total_cents`.
///
/// All weights zero means nobody holds a claim: every part is zero.
pub fn apportion(total_cents: i64, weights: &[u64]) -> Result<Vec<i64>, CalculationError> {
    if total_cents < 0 {
        return Err(CalculationError::NegativeAmount {
            context: "apportionment",
            cents: total_cents,
        });
    }

    let weight_sum: u128 = weights.iter().map(|&w| u128::from(w)).sum();
    if weight_sum == 0 || total_cents == 0 {
        return Ok(vec![0; weights.len()]);
    }

    let total = total_cents as u128;
    let mut parts: Vec<u128> = weights
        .iter()
        .map(|&w| total * u128::from(w) / weight_sum)
        .collect();

    let floored: u128 = parts.iter().sum();
    let mut remaining = total - floored;

    if remaining > 0 {
        let mut heap: BinaryHeap<Candidate> = weights
            .iter()
            .enumerate()
            .filter(|(_, &w)| w > 0)
            .map(|(index, &w)| Candidate {
                index,
                weight: u128::from(w),
                divisor: parts[index] + 1,
            })
            .collect();

        while remaining > 0 {
            let Some(mut best) = heap.pop() else {
                return Err(CalculationError::Overflow("apportionment"));
            };
            parts[best.index] += 1;
            best.divisor += 1;
            heap.push(best);
            remaining -= 1;
        }
    }

    parts
        .into_iter()
        .map(|p| i64::try_from(p).map_err(|_| CalculationError::Overflow("apportionment")))
        .collect()
}
