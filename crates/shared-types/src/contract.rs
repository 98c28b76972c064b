//! The contract record binding one client and one freelancer to a budget
//! and deadline for a job.
//!
//! Contracts are created by the job-acceptance process upstream of the
//! engine and are immutable here: the engine reads the budget and deadline
//! but never edits them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ContractError;
use crate::ids::{ContractId, PartyId};
use crate::money::Money;

/// The role a party plays on a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Funds milestones and reviews delivered work.
    Client,
    /// Proposes milestones and delivers work.
    Freelancer,
}

impl Role {
    /// Human-readable role name, used in error messages and logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Freelancer => "freelancer",
        }
    }
}

/// The agreement between one client and one freelancer for one job.
///
/// Immutable once created. Both parties may read it; neither may edit the
/// budget or deadline through the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Contract identifier.
    pub id: ContractId,
    /// The party paying for the work.
    pub client: PartyId,
    /// The party delivering the work.
    pub freelancer: PartyId,
    /// Total budget; milestone payments must never exceed it in sum.
    pub total_budget: Money,
    /// Date the contract took effect.
    pub start_date: NaiveDate,
    /// Date all work must be finished by; bounds the milestone day-budget.
    pub deadline: NaiveDate,
}

impl Contract {
    /// Creates a validated contract record.
    ///
    /// # Errors
    /// - [`ContractError::DeadlineBeforeStart`] if `deadline < start_date`
    /// - [`ContractError::SameParty`] if client and freelancer coincide
    pub fn new(
        id: ContractId,
        client: PartyId,
        freelancer: PartyId,
        total_budget: Money,
        start_date: NaiveDate,
        deadline: NaiveDate,
    ) -> Result<Self, ContractError> {
        if deadline < start_date {
            return Err(ContractError::DeadlineBeforeStart {
                start_date,
                deadline,
            });
        }
        if client == freelancer {
            return Err(ContractError::SameParty);
        }
        Ok(Self {
            id,
            client,
            freelancer,
            total_budget,
            start_date,
            deadline,
        })
    }

    /// Returns the role `party` plays on this contract, if any.
    pub fn role_of(&self, party: &PartyId) -> Option<Role> {
        if *party == self.client {
            Some(Role::Client)
        } else if *party == self.freelancer {
            Some(Role::Freelancer)
        } else {
            None
        }
    }

    /// Whether `party` is one of the two contract parties.
    pub fn is_party(&self, party: &PartyId) -> bool {
        self.role_of(party).is_some()
    }
}
