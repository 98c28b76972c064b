//! Escrow engine error types.
//!
//! One variant per failure kind in the lifecycle protocol. Every validation
//! and invariant failure is reported synchronously with its specific kind;
//! `Conflict` is the only variant a caller should retry automatically
//! (after re-reading state), all others require a corrected command.

use rust_decimal::Decimal;
use shared_types::{ContractError, ContractId, MilestoneId, PartyId};
use std::fmt;
use thiserror::Error;

/// The entity class a [`EscrowError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A contract aggregate.
    Contract,
    /// A milestone within a contract.
    Milestone,
    /// A submission attached to a milestone.
    Submission,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Contract => "Contract",
            Self::Milestone => "Milestone",
            Self::Submission => "Submission",
        };
        f.write_str(name)
    }
}

/// Escrow engine error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    /// The actor is not authorized for this command (wrong party or role,
    /// or identity could not be resolved).
    #[error("Unauthorized: party {party} cannot {action}")]
    Unauthorized {
        party: PartyId,
        action: &'static str,
    },

    /// The contract already holds the maximum number of milestones.
    #[error("Milestone capacity exceeded: contract already has {limit} milestones")]
    CapacityExceeded { limit: usize },

    /// The requested days do not fit in the schedule before the deadline.
    #[error("Day budget exceeded: requested {requested} days, only {available} available")]
    DayBudgetExceeded { requested: u32, available: u32 },

    /// Milestone amount must be a positive decimal.
    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: Decimal },

    /// Command payload failed validation (missing feedback, bad submission
    /// payload shape, zero days, empty title).
    #[error("Invalid payload: {reason}")]
    InvalidPayload { reason: String },

    /// Work was submitted against a milestone that has not been paid.
    #[error("Milestone {milestone_id} is not funded; work cannot be submitted")]
    NotFunded { milestone_id: MilestoneId },

    /// A live submission is already awaiting review.
    #[error("Milestone {milestone_id} already has a submission pending review")]
    DuplicateSubmission { milestone_id: MilestoneId },

    /// A concurrent writer committed first; re-read and retry.
    #[error(
        "Write conflict on contract {contract_id}: expected version {expected}, found {actual}"
    )]
    Conflict {
        contract_id: ContractId,
        expected: u64,
        actual: u64,
    },

    /// Unknown contract, milestone, or submission.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// The command is not legal in the milestone's current state.
    #[error("Illegal state transition: cannot {action} milestone {milestone_id} in state {state}")]
    IllegalStateTransition {
        milestone_id: MilestoneId,
        state: &'static str,
        action: &'static str,
    },

    /// Storage adapter failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl EscrowError {
    /// Convenience constructor for contract lookups.
    pub fn contract_not_found(id: ContractId) -> Self {
        Self::NotFound {
            kind: EntityKind::Contract,
            id: id.to_string(),
        }
    }

    /// Convenience constructor for milestone lookups.
    pub fn milestone_not_found(id: MilestoneId) -> Self {
        Self::NotFound {
            kind: EntityKind::Milestone,
            id: id.to_string(),
        }
    }

    /// Convenience constructor for submission lookups.
    pub fn submission_not_found(milestone_id: MilestoneId) -> Self {
        Self::NotFound {
            kind: EntityKind::Submission,
            id: milestone_id.to_string(),
        }
    }

    /// Whether the caller should re-read state and retry this command.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<ContractError> for EscrowError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::NonPositiveAmount { amount } => Self::InvalidAmount { amount },
            other => Self::InvalidPayload {
                reason: other.to_string(),
            },
        }
    }
}
