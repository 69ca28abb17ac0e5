// ==========================================
// Windpark Settlement - Payout Resolver
// ==========================================
// Guarantee rule: payment = max(minimum rent, revenue share)
// difference = share - minimum (signed, for transparency)
// ==========================================

use crate::domain::money::Money;
use crate::engine::error::CalculationError;

/// Payment decision for one lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    pub payment: Money,
    pub difference: Money,
}

impl Payout {
    /// The minimum rent tops up the revenue share.
    pub fn guarantee_applied(&self) -> bool {
        self.difference.is_negative()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PayoutResolver;

impl PayoutResolver {
    pub fn new() -> Self {
        Self
    }

    /// Applies the minimum rent guarantee.
    ///
    /// Negative inputs mean an upstream fault and are rejected.
    pub fn resolve(&self, minimum_rent: Money, revenue_share: Money) -> Result<Payout, CalculationError> {
        if minimum_rent.is_negative() {
            return Err(CalculationError::NegativeAmount {
                context: "minimum rent",
                cents: minimum_rent.cents(),
            });
        }
        if revenue_share.is_negative() {
            return Err(CalculationError::NegativeAmount {
                context: "revenue share",
                cents: revenue_share.cents(),
            });
        }

        let difference = revenue_share
            .checked_sub(minimum_rent)
            .ok_or(CalculationError::Overflow("payout difference"))?;

        Ok(Payout {
            payment: minimum_rent.max(revenue_share),
            difference,
        })
    }
}
