//! Validation errors for the shared record types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while constructing shared records.
///
/// These cover construction-time validation only; lifecycle errors
/// (authorization, state transitions, budget checks) are defined in the
/// engine crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// Monetary amounts must be strictly positive.
    #[error("Amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },

    /// The contract deadline cannot precede its start date.
    #[error("Deadline {deadline} is before start date {start_date}")]
    DeadlineBeforeStart {
        start_date: NaiveDate,
        deadline: NaiveDate,
    },

    /// Client and freelancer must be distinct parties.
    #[error("Client and freelancer cannot be the same party")]
    SameParty,
}
