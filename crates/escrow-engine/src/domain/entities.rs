//! Milestone entity and its lifecycle state machine.
//!
//! The reference data model carried three semi-independent flags per
//! milestone (`status`, `paymentStatus`, `verificationStatus`) of which only
//! a handful of combinations were meaningful. Here the combinations are
//! collapsed into one tagged enum, [`MilestoneState`], so that invalid
//! combinations cannot be represented at all. The legacy flag views are
//! recovered through derived projections.
//!
//! State machine:
//! ```text
//!                approve_and_pay
//! [PROPOSED] ────────────────────→ [IN_PROGRESS] ──review(accept)──→ [VERIFIED]
//!     │  ↑                            │      ↑                        (terminal)
//!     │  │ update (freelancer)        │      │ submit / resubmit
//!     ▼  │                            ▼      │
//! [CHANGES_REQUESTED]            submission PENDING_REVIEW
//!  (reject w/ feedback)          └─review(reject)─→ submission REJECTED
//! ```
//!
//! `approve_and_pay` is the single irreversible, idempotent transition:
//! re-invoking it on a paid milestone is a no-op success so that payment
//! callers can retry after ambiguous failures.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{MilestoneId, Money};

use super::errors::EscrowError;
use super::submission::{Submission, SubmissionPayload};

/// Derived payment view of a milestone state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// No funds released for this milestone yet.
    NotPaid,
    /// The milestone amount left escrow.
    Paid,
}

/// Derived verification view of a milestone state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Awaiting a client decision (on the proposal or on delivered work).
    PendingReview,
    /// The client rejected the proposal pre-payment; freelancer may edit.
    ChangesRequested,
    /// The client accepted delivered work. Terminal.
    Verified,
}

/// The milestone lifecycle state machine.
///
/// The engine is the sole writer; every transition goes through the
/// methods on [`Milestone`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MilestoneState {
    /// Unpaid, awaiting the client's approve-or-reject decision.
    Proposed,
    /// Rejected pre-payment with mandatory feedback; the freelancer may
    /// update the milestone, which returns it to `Proposed`.
    ChangesRequested {
        /// Why the client rejected the proposal.
        feedback: String,
    },
    /// Funded. Work is underway; at most one submission record exists and
    /// it is either awaiting review or rejected (awaiting resubmission).
    InProgress {
        /// The live submission record, if any work has been delivered.
        submission: Option<Submission>,
    },
    /// Delivered work was accepted. Terminal; no further mutation.
    Verified {
        /// The approved submission, kept for the record.
        submission: Submission,
    },
}

impl MilestoneState {
    /// Short state name for error messages and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Proposed => "PROPOSED",
            Self::ChangesRequested { .. } => "CHANGES_REQUESTED",
            Self::InProgress { .. } => "IN_PROGRESS",
            Self::Verified { .. } => "VERIFIED",
        }
    }
}

/// A funded sub-deliverable of a contract with its own amount, schedule,
/// and approval cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone identifier.
    pub id: MilestoneId,
    /// 1-based position within the contract, assigned by the ledger.
    pub sequence: u32,
    /// Short name shown to both parties.
    pub title: String,
    /// What the milestone delivers.
    pub description: String,
    /// Amount released from escrow when the client approves and pays.
    pub amount: Money,
    /// Working days this milestone consumes from the contract schedule.
    pub days_required: u32,
    /// Derived: creation (or last update) date plus `days_required`.
    pub due_date: NaiveDate,
    /// When the milestone was proposed.
    pub created_at: DateTime<Utc>,
    /// Lifecycle state.
    pub state: MilestoneState,
}

impl Milestone {
    /// Creates a freshly proposed milestone. Field validation is the
    /// ledger's job; this constructor only assembles the record.
    pub(crate) fn new(
        id: MilestoneId,
        sequence: u32,
        title: String,
        description: String,
        amount: Money,
        days_required: u32,
        due_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sequence,
            title,
            description,
            amount,
            days_required,
            due_date,
            created_at,
            state: MilestoneState::Proposed,
        }
    }

    // ------------------------------------------------------------------
    // Derived projections
    // ------------------------------------------------------------------

    /// Whether the milestone amount has left escrow.
    pub const fn is_paid(&self) -> bool {
        matches!(
            self.state,
            MilestoneState::InProgress { .. } | MilestoneState::Verified { .. }
        )
    }

    /// Whether the milestone reached its terminal state.
    pub const fn is_verified(&self) -> bool {
        matches!(self.state, MilestoneState::Verified { .. })
    }

    /// Legacy payment flag view.
    pub const fn payment_status(&self) -> PaymentStatus {
        if self.is_paid() {
            PaymentStatus::Paid
        } else {
            PaymentStatus::NotPaid
        }
    }

    /// Legacy verification flag view.
    pub const fn verification_status(&self) -> VerificationStatus {
        match self.state {
            MilestoneState::Proposed | MilestoneState::InProgress { .. } => {
                VerificationStatus::PendingReview
            }
            MilestoneState::ChangesRequested { .. } => VerificationStatus::ChangesRequested,
            MilestoneState::Verified { .. } => VerificationStatus::Verified,
        }
    }

    /// Single user-facing status label, as the dashboard renders it.
    pub const fn display_status(&self) -> &'static str {
        match self.state {
            MilestoneState::Proposed => "PENDING",
            MilestoneState::ChangesRequested { .. } => "REJECTED",
            MilestoneState::InProgress { .. } => "PAYMENT COMPLETED",
            MilestoneState::Verified { .. } => "COMPLETED",
        }
    }

    /// The client's feedback from a pre-payment rejection, if any.
    pub fn client_feedback(&self) -> Option<&str> {
        match &self.state {
            MilestoneState::ChangesRequested { feedback } => Some(feedback),
            _ => None,
        }
    }

    /// The current submission record, if any.
    pub fn submission(&self) -> Option<&Submission> {
        match &self.state {
            MilestoneState::InProgress { submission } => submission.as_ref(),
            MilestoneState::Verified { submission } => Some(submission),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Transitions (engine-only writers)
    // ------------------------------------------------------------------

    /// Client approval with payment: `Proposed → InProgress`, funds leave
    /// escrow.
    ///
    /// Idempotent: a milestone that is already paid returns `Ok(false)`
    /// without any effect, so payment callers may retry after ambiguous
    /// failures. Returns `Ok(true)` when this call performed the payment.
    ///
    /// # Errors
    /// `IllegalStateTransition` when the milestone is awaiting changes
    /// (the client already rejected the proposal).
    pub fn approve_and_pay(&mut self) -> Result<bool, EscrowError> {
        match self.state {
            MilestoneState::Proposed => {
                self.state = MilestoneState::InProgress { submission: None };
                Ok(true)
            }
            MilestoneState::InProgress { .. } | MilestoneState::Verified { .. } => Ok(false),
            MilestoneState::ChangesRequested { .. } => Err(self.illegal("approve and pay")),
        }
    }

    /// Client rejection of the proposal: `Proposed → ChangesRequested`.
    /// Payment status is unchanged (`NOT_PAID`).
    ///
    /// # Errors
    /// - `InvalidPayload` when `feedback` is blank (feedback is mandatory)
    /// - `IllegalStateTransition` outside `Proposed`
    pub fn reject(&mut self, feedback: String) -> Result<(), EscrowError> {
        if feedback.trim().is_empty() {
            return Err(EscrowError::InvalidPayload {
                reason: "rejection feedback must not be empty".into(),
            });
        }
        match self.state {
            MilestoneState::Proposed => {
                self.state = MilestoneState::ChangesRequested { feedback };
                Ok(())
            }
            _ => Err(self.illegal("reject")),
        }
    }

    /// Freelancer delivery: creates the submission in `PendingReview`, or
    /// replaces a rejected one.
    ///
    /// # Errors
    /// - `NotFunded` before payment
    /// - `DuplicateSubmission` while a delivery is already awaiting review
    /// - `IllegalStateTransition` once verified
    pub fn submit(
        &mut self,
        payload: SubmissionPayload,
        notes: String,
        now: DateTime<Utc>,
    ) -> Result<&Submission, EscrowError> {
        match &mut self.state {
            MilestoneState::Proposed | MilestoneState::ChangesRequested { .. } => {
                Err(EscrowError::NotFunded {
                    milestone_id: self.id,
                })
            }
            MilestoneState::Verified { .. } => Err(EscrowError::IllegalStateTransition {
                milestone_id: self.id,
                state: "VERIFIED",
                action: "submit work for",
            }),
            MilestoneState::InProgress { submission } => match submission {
                Some(existing) if existing.is_pending_review() => {
                    Err(EscrowError::DuplicateSubmission {
                        milestone_id: self.id,
                    })
                }
                Some(existing) => {
                    existing.resubmit(payload, notes, now);
                    Ok(existing)
                }
                None => {
                    let created = Submission::new(payload, notes, now);
                    Ok(submission.insert(created))
                }
            },
        }
    }

    /// Client review of a pending submission.
    ///
    /// On accept the submission is approved and the milestone becomes
    /// `Verified` (terminal). On reject the remark is recorded and the
    /// milestone stays `InProgress`, permitting resubmission.
    ///
    /// # Errors
    /// - `NotFound` (submission) when nothing was ever delivered
    /// - `InvalidPayload` when rejecting without a remark
    /// - `IllegalStateTransition` when no delivery is awaiting review
    pub fn review(&mut self, accept: bool, remark: Option<String>) -> Result<(), EscrowError> {
        match &mut self.state {
            MilestoneState::InProgress { submission } => {
                let Some(current) = submission.as_mut() else {
                    return Err(EscrowError::submission_not_found(self.id));
                };
                if !current.is_pending_review() {
                    return Err(EscrowError::IllegalStateTransition {
                        milestone_id: self.id,
                        state: "IN_PROGRESS",
                        action: "review a non-pending submission for",
                    });
                }
                if accept {
                    if let Some(mut approved) = submission.take() {
                        approved.approve();
                        self.state = MilestoneState::Verified {
                            submission: approved,
                        };
                    }
                    Ok(())
                } else {
                    let remark = remark.map(|r| r.trim().to_string()).unwrap_or_default();
                    if remark.is_empty() {
                        return Err(EscrowError::InvalidPayload {
                            reason: "rejection remark must not be empty".into(),
                        });
                    }
                    current.reject(remark);
                    Ok(())
                }
            }
            MilestoneState::Proposed | MilestoneState::ChangesRequested { .. } => {
                Err(EscrowError::submission_not_found(self.id))
            }
            MilestoneState::Verified { .. } => Err(self.illegal("review a submission for")),
        }
    }

    fn illegal(&self, action: &'static str) -> EscrowError {
        EscrowError::IllegalStateTransition {
            milestone_id: self.id,
            state: self.state.name(),
            action,
        }
    }
}
