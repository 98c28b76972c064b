//! Derived escrow projection.
//!
//! Never persisted, never mutated directly: the view is recomputed from
//! the milestone ledger on every read, so it cannot drift from the
//! payment transitions that define it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::ContractId;

use super::ledger::MilestoneLedger;

/// Funds summary for one contract, derived from its milestones.
///
/// Conservation law, testable on every state: `funds_in_escrow +
/// released_to_milestones == budget`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowView {
    /// The contract this view summarizes.
    pub contract_id: ContractId,
    /// The contract's total budget.
    pub budget: Decimal,
    /// Budget not yet released to any milestone.
    pub funds_in_escrow: Decimal,
    /// Sum of paid milestone amounts.
    pub released_to_milestones: Decimal,
    /// Sum of verified milestone amounts (work accepted and paid out).
    pub completed_payout: Decimal,
    /// Verified milestones as a share of all milestones, rounded to whole
    /// percent; 0 for a contract with no milestones.
    pub progress_percent: u8,
}

impl EscrowView {
    /// Computes the view from a ledger snapshot.
    pub fn compute(ledger: &MilestoneLedger) -> Self {
        let budget = ledger.contract().total_budget.amount();

        let released_to_milestones: Decimal = ledger
            .list()
            .iter()
            .filter(|m| m.is_paid())
            .map(|m| m.amount.amount())
            .sum();

        let completed_payout: Decimal = ledger
            .list()
            .iter()
            .filter(|m| m.is_verified())
            .map(|m| m.amount.amount())
            .sum();

        let total = ledger.len();
        let verified = ledger.list().iter().filter(|m| m.is_verified()).count();
        let progress_percent = if total == 0 {
            0
        } else {
            ((verified as f64 / total as f64) * 100.0).round() as u8
        };

        Self {
            contract_id: ledger.contract().id,
            budget,
            funds_in_escrow: budget - released_to_milestones,
            released_to_milestones,
            completed_payout,
            progress_percent,
        }
    }
}
