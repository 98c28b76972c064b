//! Milestone ledger: the ordered milestone collection for one contract.
//!
//! The ledger owns the structural invariants that span milestones:
//!
//! - at most `max_milestones_per_contract` milestones (default 3)
//! - non-verified milestones' `days_required` must fit between today and
//!   the contract deadline (inclusive boundary)
//! - the sum of all milestone amounts never exceeds the contract budget,
//!   which makes the paid-sum invariant unbreakable by construction
//! - sequence numbers are contiguous, 1-based, and ledger-assigned
//!
//! Entity-level transitions (approve/reject/submit/review) are delegated
//! to [`Milestone`]; the ledger adds lookup and the creation/update rules.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{Contract, MilestoneId, Money};

use super::config::EngineConfig;
use super::entities::{Milestone, MilestoneState};
use super::errors::EscrowError;
use super::submission::SubmissionPayload;

/// Caller-supplied milestone fields, before ledger validation.
///
/// Used for both creation and update; the ledger assigns everything else
/// (id, sequence, due date, state).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneDraft {
    /// Short name shown to both parties.
    pub title: String,
    /// What the milestone delivers.
    pub description: String,
    /// Working days the milestone needs.
    pub days_required: u32,
    /// Proposed amount; validated to a positive decimal.
    pub amount: Decimal,
}

/// The ordered set of milestones for one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneLedger {
    contract: Contract,
    milestones: Vec<Milestone>,
}

impl MilestoneLedger {
    /// Creates an empty ledger for a contract.
    pub fn new(contract: Contract) -> Self {
        Self {
            contract,
            milestones: Vec::new(),
        }
    }

    /// The contract this ledger belongs to.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Ordered, read-only milestone sequence.
    pub fn list(&self) -> &[Milestone] {
        &self.milestones
    }

    /// Number of milestones on the ledger.
    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    /// Whether the ledger has no milestones yet.
    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    /// Looks up a milestone by id.
    pub fn get(&self, id: &MilestoneId) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == *id)
    }

    fn get_mut(&mut self, id: &MilestoneId) -> Result<&mut Milestone, EscrowError> {
        self.milestones
            .iter_mut()
            .find(|m| m.id == *id)
            .ok_or_else(|| EscrowError::milestone_not_found(*id))
    }

    // ------------------------------------------------------------------
    // Day-budget accounting
    // ------------------------------------------------------------------

    /// Whole days between today and the deadline, clamped at zero.
    pub fn remaining_days(&self, today: NaiveDate) -> u32 {
        let days = (self.contract.deadline - today).num_days();
        u32::try_from(days).unwrap_or(0)
    }

    /// Days already committed to milestones that still consume schedule.
    ///
    /// Verified milestones release their days; everything else (including
    /// milestones awaiting changes) keeps its reservation until verified.
    /// `exclude` drops one milestone's own allocation, for update checks.
    pub fn used_days(&self, exclude: Option<&MilestoneId>) -> u32 {
        self.milestones
            .iter()
            .filter(|m| !m.is_verified())
            .filter(|m| exclude != Some(&m.id))
            .map(|m| m.days_required)
            .sum()
    }

    /// Days still available for new commitments.
    pub fn available_days(&self, today: NaiveDate, exclude: Option<&MilestoneId>) -> u32 {
        self.remaining_days(today)
            .saturating_sub(self.used_days(exclude))
    }

    /// Sum of amounts already committed to milestones, excluding one.
    fn committed_amount(&self, exclude: Option<&MilestoneId>) -> Decimal {
        self.milestones
            .iter()
            .filter(|m| exclude != Some(&m.id))
            .map(|m| m.amount.amount())
            .sum()
    }

    fn validate_draft(
        &self,
        draft: &MilestoneDraft,
        today: NaiveDate,
        exclude: Option<&MilestoneId>,
    ) -> Result<Money, EscrowError> {
        if draft.title.trim().is_empty() {
            return Err(EscrowError::InvalidPayload {
                reason: "milestone title must not be empty".into(),
            });
        }
        if draft.description.trim().is_empty() {
            return Err(EscrowError::InvalidPayload {
                reason: "milestone description must not be empty".into(),
            });
        }
        if draft.days_required == 0 {
            return Err(EscrowError::InvalidPayload {
                reason: "days required must be at least 1".into(),
            });
        }

        let amount = Money::new(draft.amount)
            .map_err(|_| EscrowError::InvalidAmount {
                amount: draft.amount,
            })?;

        // Committed amounts may never outgrow the budget, so the paid sum
        // cannot either.
        let committed = self.committed_amount(exclude) + amount.amount();
        if committed > self.contract.total_budget.amount() {
            return Err(EscrowError::InvalidAmount {
                amount: draft.amount,
            });
        }

        let available = self.available_days(today, exclude);
        if draft.days_required > available {
            return Err(EscrowError::DayBudgetExceeded {
                requested: draft.days_required,
                available,
            });
        }

        Ok(amount)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Adds a freshly proposed milestone.
    ///
    /// # Errors
    /// - `CapacityExceeded` at the milestone limit
    /// - `InvalidPayload` for blank fields or zero days
    /// - `InvalidAmount` for non-positive amounts or amounts that would
    ///   push the committed total past the contract budget
    /// - `DayBudgetExceeded` when the days do not fit before the deadline
    pub fn create_milestone(
        &mut self,
        draft: MilestoneDraft,
        today: NaiveDate,
        now: DateTime<Utc>,
        config: &EngineConfig,
    ) -> Result<&Milestone, EscrowError> {
        if self.milestones.len() >= config.max_milestones_per_contract {
            return Err(EscrowError::CapacityExceeded {
                limit: config.max_milestones_per_contract,
            });
        }

        let amount = self.validate_draft(&draft, today, None)?;
        let sequence = u32::try_from(self.milestones.len()).unwrap_or(u32::MAX) + 1;
        let due_date = today + chrono::Duration::days(i64::from(draft.days_required));

        let milestone = Milestone::new(
            MilestoneId::generate(),
            sequence,
            draft.title,
            draft.description,
            amount,
            draft.days_required,
            due_date,
            now,
        );
        let idx = self.milestones.len();
        self.milestones.push(milestone);
        Ok(&self.milestones[idx])
    }

    /// Rewrites a milestone the client sent back for changes.
    ///
    /// Allowed only in `ChangesRequested`; re-applies the creation checks
    /// with the milestone's own prior day allocation excluded from the
    /// used total, then returns the milestone to `Proposed` with a fresh
    /// due date.
    pub fn update_milestone(
        &mut self,
        id: &MilestoneId,
        draft: MilestoneDraft,
        today: NaiveDate,
    ) -> Result<&Milestone, EscrowError> {
        {
            let milestone = self.get_mut(id)?;
            if milestone.client_feedback().is_none() {
                return Err(EscrowError::IllegalStateTransition {
                    milestone_id: *id,
                    state: milestone.state.name(),
                    action: "update",
                });
            }
        }

        let amount = self.validate_draft(&draft, today, Some(id))?;
        let due_date = today + chrono::Duration::days(i64::from(draft.days_required));

        let milestone = self.get_mut(id)?;
        milestone.title = draft.title;
        milestone.description = draft.description;
        milestone.amount = amount;
        milestone.days_required = draft.days_required;
        milestone.due_date = due_date;
        milestone.state = MilestoneState::Proposed;
        Ok(&*milestone)
    }

    /// Client approval with payment; see [`Milestone::approve_and_pay`].
    ///
    /// Returns the milestone snapshot and whether this call performed the
    /// payment (false on an idempotent retry).
    pub fn approve_and_pay(&mut self, id: &MilestoneId) -> Result<(Milestone, bool), EscrowError> {
        let milestone = self.get_mut(id)?;
        let newly_paid = milestone.approve_and_pay()?;
        Ok((milestone.clone(), newly_paid))
    }

    /// Client rejection of a proposal; see [`Milestone::reject`].
    pub fn reject_milestone(
        &mut self,
        id: &MilestoneId,
        feedback: String,
    ) -> Result<Milestone, EscrowError> {
        let milestone = self.get_mut(id)?;
        milestone.reject(feedback)?;
        Ok(milestone.clone())
    }

    /// Freelancer delivery; see [`Milestone::submit`].
    pub fn submit_work(
        &mut self,
        id: &MilestoneId,
        payload: SubmissionPayload,
        notes: String,
        now: DateTime<Utc>,
    ) -> Result<Milestone, EscrowError> {
        let milestone = self.get_mut(id)?;
        milestone.submit(payload, notes, now)?;
        Ok(milestone.clone())
    }

    /// Client review of a pending submission; see [`Milestone::review`].
    pub fn review_submission(
        &mut self,
        id: &MilestoneId,
        accept: bool,
        remark: Option<String>,
    ) -> Result<Milestone, EscrowError> {
        let milestone = self.get_mut(id)?;
        milestone.review(accept, remark)?;
        Ok(milestone.clone())
    }
}
