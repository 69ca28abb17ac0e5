// ==========================================
// Windpark Settlement - Settlement Engine
// ==========================================
// Flow: ParcelClassifier -> EntitlementCalculator -> PayoutResolver
//       (per lease) -> SettlementAggregator (single fold)
// ==========================================
// Input: SettlementConfiguration + leases (immutable snapshots)
// Output: SettlementCalculationResult
// A run is atomic: full result or error, never partial.
// ==========================================

mod concurrent;
mod core;

#[cfg(test)]
mod tests;

pub use self::core::SettlementEngine;
