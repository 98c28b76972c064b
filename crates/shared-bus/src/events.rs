//! Escrow lifecycle events.
//!
//! One variant per externally-meaningful transition. Payloads carry the
//! identifiers and figures a notification consumer needs to render a
//! message without re-reading the ledger.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{ContractId, MilestoneId};

/// All events the lifecycle engine publishes to the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EscrowEvent {
    /// The freelancer proposed a new milestone; awaiting client approval.
    MilestoneCreated {
        contract_id: ContractId,
        milestone_id: MilestoneId,
        /// Ledger-assigned 1-based sequence number.
        sequence: u32,
        amount: Decimal,
        due_date: NaiveDate,
    },

    /// The client approved the milestone and its amount left escrow.
    MilestoneFunded {
        contract_id: ContractId,
        milestone_id: MilestoneId,
        amount: Decimal,
    },

    /// The client rejected the milestone proposal pre-payment.
    MilestoneRejected {
        contract_id: ContractId,
        milestone_id: MilestoneId,
        feedback: String,
    },

    /// The freelancer delivered work for a funded milestone.
    SubmissionReceived {
        contract_id: ContractId,
        milestone_id: MilestoneId,
        /// True when the delivery is an uploaded document, false for a URL.
        is_document: bool,
    },

    /// The client accepted delivered work; the milestone is verified.
    MilestoneCompleted {
        contract_id: ContractId,
        milestone_id: MilestoneId,
        amount: Decimal,
    },

    /// The client rejected delivered work; the freelancer may resubmit.
    SubmissionRejected {
        contract_id: ContractId,
        milestone_id: MilestoneId,
        remark: String,
    },
}

impl EscrowEvent {
    /// The coarse topic this event belongs to, for subscription filtering.
    pub const fn topic(&self) -> EventTopic {
        match self {
            Self::MilestoneCreated { .. } | Self::MilestoneRejected { .. } => {
                EventTopic::Milestones
            }
            Self::MilestoneFunded { .. } | Self::MilestoneCompleted { .. } => EventTopic::Payments,
            Self::SubmissionReceived { .. } | Self::SubmissionRejected { .. } => {
                EventTopic::Submissions
            }
        }
    }

    /// The contract this event concerns.
    pub const fn contract_id(&self) -> ContractId {
        match self {
            Self::MilestoneCreated { contract_id, .. }
            | Self::MilestoneFunded { contract_id, .. }
            | Self::MilestoneRejected { contract_id, .. }
            | Self::SubmissionReceived { contract_id, .. }
            | Self::MilestoneCompleted { contract_id, .. }
            | Self::SubmissionRejected { contract_id, .. } => *contract_id,
        }
    }
}

/// Coarse event categories for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTopic {
    /// Proposal lifecycle: created, rejected pre-payment.
    Milestones,
    /// Money movement: funded, completed.
    Payments,
    /// Deliverable review cycle.
    Submissions,
}

/// Filter describing which events a subscriber wants.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to receive; empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Restrict to a single contract; `None` means all contracts.
    pub contract: Option<ContractId>,
}

impl EventFilter {
    /// Matches every event.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches only the given topics.
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            contract: None,
        }
    }

    /// Matches only events for one contract.
    pub fn contract(contract_id: ContractId) -> Self {
        Self {
            topics: Vec::new(),
            contract: Some(contract_id),
        }
    }

    /// Whether `event` passes this filter.
    pub fn matches(&self, event: &EscrowEvent) -> bool {
        if let Some(contract_id) = self.contract {
            if event.contract_id() != contract_id {
                return false;
            }
        }
        self.topics.is_empty() || self.topics.contains(&event.topic())
    }
}
