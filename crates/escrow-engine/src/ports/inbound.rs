//! Inbound (driving) port: the engine's command API.
//!
//! Commands are structured payloads, not loose argument lists: everything
//! a transition needs (including mandatory feedback/remark text) travels
//! on the command itself, so there is no mid-transition prompting.
//!
//! ## Authorization
//!
//! | Command | Authorized actor |
//! |---------|------------------|
//! | `create_milestone`, `update_milestone`, `submit_work` | freelancer party |
//! | `approve_and_pay`, `reject_milestone`, `review_submission` | client party |
//! | `list_milestones`, `get_escrow_view` | either contract party |

use serde::{Deserialize, Serialize};
use shared_types::{ContractId, MilestoneId, PartyId};

use crate::domain::{
    EscrowError, EscrowView, Milestone, MilestoneDraft, RawSubmissionPayload,
};

/// Propose a new milestone (freelancer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMilestone {
    pub contract_id: ContractId,
    pub actor: PartyId,
    pub draft: MilestoneDraft,
}

/// Rework a milestone the client sent back for changes (freelancer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMilestone {
    pub contract_id: ContractId,
    pub milestone_id: MilestoneId,
    pub actor: PartyId,
    pub draft: MilestoneDraft,
}

/// Approve a proposed milestone and release its amount from escrow
/// (client). Idempotent: retrying on a paid milestone succeeds without a
/// second charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveAndPay {
    pub contract_id: ContractId,
    pub milestone_id: MilestoneId,
    pub actor: PartyId,
}

/// Reject a proposed milestone pre-payment, with mandatory feedback
/// (client).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectMilestone {
    pub contract_id: ContractId,
    pub milestone_id: MilestoneId,
    pub actor: PartyId,
    pub feedback: String,
}

/// Deliver work for a funded milestone (freelancer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitWork {
    pub contract_id: ContractId,
    pub milestone_id: MilestoneId,
    pub actor: PartyId,
    /// Exactly one of document / URL; validated on conversion.
    pub payload: RawSubmissionPayload,
    /// Freelancer notes accompanying the delivery.
    #[serde(default)]
    pub notes: String,
}

/// Accept or reject a pending submission (client). `remark` is mandatory
/// when rejecting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub contract_id: ContractId,
    pub milestone_id: MilestoneId,
    pub actor: PartyId,
    pub accept: bool,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Primary API of the escrow lifecycle engine.
///
/// Every operation authorizes the actor against the contract's parties,
/// applies the transition under the per-contract single-writer model, and
/// reports failures with the specific [`EscrowError`] kind. Only
/// [`EscrowError::Conflict`] should be retried automatically.
pub trait EscrowApi: Send + Sync {
    /// Proposes a new milestone on a contract.
    ///
    /// # Errors
    /// - `Unauthorized`: actor is not the contract's freelancer
    /// - `CapacityExceeded`: the contract already has the maximum milestones
    /// - `DayBudgetExceeded`: days do not fit before the deadline
    /// - `InvalidAmount` / `InvalidPayload`: field validation
    fn create_milestone(&self, cmd: CreateMilestone) -> Result<Milestone, EscrowError>;

    /// Rewrites a milestone that is awaiting changes, returning it to the
    /// proposed state for re-approval.
    ///
    /// # Errors
    /// - `Unauthorized`, `NotFound`
    /// - `IllegalStateTransition`: milestone is not awaiting changes
    /// - the same validation errors as `create_milestone`
    fn update_milestone(&self, cmd: UpdateMilestone) -> Result<Milestone, EscrowError>;

    /// Approves a proposed milestone and releases its amount from escrow.
    ///
    /// Idempotent: invoking this twice on the same milestone returns the
    /// same success, and the released total reflects the amount exactly
    /// once. Payment callers retrying after ambiguous failures rely on
    /// this.
    ///
    /// # Errors
    /// - `Unauthorized`: actor is not the contract's client
    /// - `NotFound`, `IllegalStateTransition`
    fn approve_and_pay(&self, cmd: ApproveAndPay) -> Result<Milestone, EscrowError>;

    /// Rejects a proposed milestone pre-payment with mandatory feedback.
    ///
    /// # Errors
    /// - `Unauthorized`, `NotFound`, `IllegalStateTransition`
    /// - `InvalidPayload`: blank feedback
    fn reject_milestone(&self, cmd: RejectMilestone) -> Result<Milestone, EscrowError>;

    /// Delivers work for a funded milestone.
    ///
    /// # Errors
    /// - `Unauthorized`, `NotFound`
    /// - `NotFunded`: milestone has not been paid
    /// - `DuplicateSubmission`: a delivery is already awaiting review
    /// - `InvalidPayload`: payload is not exactly one of document / URL
    /// - `IllegalStateTransition`: milestone already verified
    fn submit_work(&self, cmd: SubmitWork) -> Result<Milestone, EscrowError>;

    /// Accepts or rejects a pending submission. Acceptance verifies the
    /// milestone (terminal); rejection records the remark and allows
    /// resubmission.
    ///
    /// # Errors
    /// - `Unauthorized`, `NotFound`, `IllegalStateTransition`
    /// - `InvalidPayload`: rejecting without a remark
    fn review_submission(&self, cmd: ReviewSubmission) -> Result<Milestone, EscrowError>;

    /// Ordered, read-only milestone listing for a contract party.
    fn list_milestones(
        &self,
        contract_id: ContractId,
        actor: PartyId,
    ) -> Result<Vec<Milestone>, EscrowError>;

    /// Derived escrow summary for a contract party. Always recomputed,
    /// never stored.
    fn get_escrow_view(
        &self,
        contract_id: ContractId,
        actor: PartyId,
    ) -> Result<EscrowView, EscrowError>;
}
