//! The lifecycle engine: authorization, transition, commit, publish.
//!
//! Every command follows the same shape:
//!
//! 1. verify the actor against the identity provider
//! 2. load the contract's ledger snapshot with its version
//! 3. check the actor's role on the contract
//! 4. apply the domain transition on the snapshot
//! 5. commit with the loaded version (stale version -> `Conflict`)
//! 6. publish the lifecycle event and log
//!
//! The commit-with-expected-version step is what enforces the
//! one-writer-per-contract model without holding any lock across the
//! transition. Callers retry on `Conflict` (the only retryable error);
//! commands on different contracts never contend.

use std::sync::Arc;

use shared_bus::EscrowEvent;
use shared_types::{Contract, ContractId, PartyId, Role};
use tracing::info;

use crate::domain::{EngineConfig, EscrowError, EscrowView, Milestone, MilestoneLedger, SubmissionPayload};
use crate::ports::inbound::{
    ApproveAndPay, CreateMilestone, EscrowApi, RejectMilestone, ReviewSubmission, SubmitWork,
    UpdateMilestone,
};
use crate::ports::outbound::{Clock, ContractStore, EventSink, IdentityProvider};

/// Engine core, generic over its outbound ports.
///
/// Cheap to clone behind `Arc`s; the store is the only shared mutable
/// state.
pub struct LifecycleEngine {
    store: Arc<dyn ContractStore>,
    identity: Arc<dyn IdentityProvider>,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl LifecycleEngine {
    pub fn new(
        store: Arc<dyn ContractStore>,
        identity: Arc<dyn IdentityProvider>,
        events: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            identity,
            events,
            clock,
            config,
        }
    }

    /// Registers a contract created by the upstream job-acceptance flow.
    ///
    /// # Errors
    /// - `Storage` when the contract id is already registered
    pub fn register_contract(&self, contract: Contract) -> Result<(), EscrowError> {
        let contract_id = contract.id;
        self.store.insert_contract(contract)?;
        info!(contract_id = %contract_id, "contract registered");
        Ok(())
    }

    /// Loads the ledger and checks the actor holds `required` on the
    /// contract. Non-parties and wrong-role parties both come back as
    /// `Unauthorized`.
    fn load_as(
        &self,
        contract_id: &ContractId,
        actor: &PartyId,
        required: Role,
        action: &'static str,
    ) -> Result<(MilestoneLedger, u64), EscrowError> {
        self.identity.verify(actor, action)?;
        let loaded = self.store.load(contract_id)?;
        match loaded.ledger.contract().role_of(actor) {
            Some(role) if role == required => Ok((loaded.ledger, loaded.version)),
            _ => Err(EscrowError::Unauthorized {
                party: *actor,
                action,
            }),
        }
    }

    /// Read path: either contract party may look.
    fn load_as_party(
        &self,
        contract_id: &ContractId,
        actor: &PartyId,
        action: &'static str,
    ) -> Result<MilestoneLedger, EscrowError> {
        self.identity.verify(actor, action)?;
        let loaded = self.store.load(contract_id)?;
        if !loaded.ledger.contract().is_party(actor) {
            return Err(EscrowError::Unauthorized {
                party: *actor,
                action,
            });
        }
        Ok(loaded.ledger)
    }
}

impl EscrowApi for LifecycleEngine {
    fn create_milestone(&self, cmd: CreateMilestone) -> Result<Milestone, EscrowError> {
        let (mut ledger, version) =
            self.load_as(&cmd.contract_id, &cmd.actor, Role::Freelancer, "create_milestone")?;

        let milestone = ledger
            .create_milestone(cmd.draft, self.clock.today(), self.clock.now(), &self.config)?
            .clone();
        self.store.commit(&cmd.contract_id, ledger, version)?;

        info!(
            contract_id = %cmd.contract_id,
            milestone_id = %milestone.id,
            sequence = milestone.sequence,
            actor = %cmd.actor,
            "milestone proposed"
        );
        self.events.emit(EscrowEvent::MilestoneCreated {
            contract_id: cmd.contract_id,
            milestone_id: milestone.id,
            sequence: milestone.sequence,
            amount: milestone.amount.amount(),
            due_date: milestone.due_date,
        });
        Ok(milestone)
    }

    fn update_milestone(&self, cmd: UpdateMilestone) -> Result<Milestone, EscrowError> {
        let (mut ledger, version) =
            self.load_as(&cmd.contract_id, &cmd.actor, Role::Freelancer, "update_milestone")?;

        let milestone = ledger
            .update_milestone(&cmd.milestone_id, cmd.draft, self.clock.today())?
            .clone();
        self.store.commit(&cmd.contract_id, ledger, version)?;

        info!(
            contract_id = %cmd.contract_id,
            milestone_id = %milestone.id,
            actor = %cmd.actor,
            "milestone reworked and re-proposed"
        );
        // A rework lands back in the proposed state, so the client gets
        // the same notification as for a fresh proposal.
        self.events.emit(EscrowEvent::MilestoneCreated {
            contract_id: cmd.contract_id,
            milestone_id: milestone.id,
            sequence: milestone.sequence,
            amount: milestone.amount.amount(),
            due_date: milestone.due_date,
        });
        Ok(milestone)
    }

    fn approve_and_pay(&self, cmd: ApproveAndPay) -> Result<Milestone, EscrowError> {
        let (mut ledger, version) =
            self.load_as(&cmd.contract_id, &cmd.actor, Role::Client, "approve_and_pay")?;

        let (milestone, newly_paid) = ledger.approve_and_pay(&cmd.milestone_id)?;
        self.store.commit(&cmd.contract_id, ledger, version)?;

        info!(
            contract_id = %cmd.contract_id,
            milestone_id = %milestone.id,
            actor = %cmd.actor,
            newly_paid,
            "milestone approved and funded"
        );
        // An idempotent retry released nothing, so it notifies nothing.
        if newly_paid {
            self.events.emit(EscrowEvent::MilestoneFunded {
                contract_id: cmd.contract_id,
                milestone_id: milestone.id,
                amount: milestone.amount.amount(),
            });
        }
        Ok(milestone)
    }

    fn reject_milestone(&self, cmd: RejectMilestone) -> Result<Milestone, EscrowError> {
        let (mut ledger, version) =
            self.load_as(&cmd.contract_id, &cmd.actor, Role::Client, "reject_milestone")?;

        let milestone = ledger.reject_milestone(&cmd.milestone_id, cmd.feedback.clone())?;
        self.store.commit(&cmd.contract_id, ledger, version)?;

        info!(
            contract_id = %cmd.contract_id,
            milestone_id = %milestone.id,
            actor = %cmd.actor,
            "milestone rejected pre-payment"
        );
        self.events.emit(EscrowEvent::MilestoneRejected {
            contract_id: cmd.contract_id,
            milestone_id: milestone.id,
            feedback: cmd.feedback,
        });
        Ok(milestone)
    }

    fn submit_work(&self, cmd: SubmitWork) -> Result<Milestone, EscrowError> {
        let (mut ledger, version) =
            self.load_as(&cmd.contract_id, &cmd.actor, Role::Freelancer, "submit_work")?;

        let payload = SubmissionPayload::try_from(cmd.payload)?;
        let is_document = payload.is_document();
        let milestone =
            ledger.submit_work(&cmd.milestone_id, payload, cmd.notes, self.clock.now())?;
        self.store.commit(&cmd.contract_id, ledger, version)?;

        info!(
            contract_id = %cmd.contract_id,
            milestone_id = %milestone.id,
            actor = %cmd.actor,
            is_document,
            "work submitted for review"
        );
        self.events.emit(EscrowEvent::SubmissionReceived {
            contract_id: cmd.contract_id,
            milestone_id: milestone.id,
            is_document,
        });
        Ok(milestone)
    }

    fn review_submission(&self, cmd: ReviewSubmission) -> Result<Milestone, EscrowError> {
        let (mut ledger, version) =
            self.load_as(&cmd.contract_id, &cmd.actor, Role::Client, "review_submission")?;

        let milestone = ledger.review_submission(&cmd.milestone_id, cmd.accept, cmd.remark)?;
        self.store.commit(&cmd.contract_id, ledger, version)?;

        info!(
            contract_id = %cmd.contract_id,
            milestone_id = %milestone.id,
            actor = %cmd.actor,
            accepted = cmd.accept,
            "submission reviewed"
        );
        if cmd.accept {
            self.events.emit(EscrowEvent::MilestoneCompleted {
                contract_id: cmd.contract_id,
                milestone_id: milestone.id,
                amount: milestone.amount.amount(),
            });
        } else {
            let remark = milestone
                .submission()
                .and_then(|s| s.client_remark.clone())
                .unwrap_or_default();
            self.events.emit(EscrowEvent::SubmissionRejected {
                contract_id: cmd.contract_id,
                milestone_id: milestone.id,
                remark,
            });
        }
        Ok(milestone)
    }

    fn list_milestones(
        &self,
        contract_id: ContractId,
        actor: PartyId,
    ) -> Result<Vec<Milestone>, EscrowError> {
        let ledger = self.load_as_party(&contract_id, &actor, "list_milestones")?;
        Ok(ledger.list().to_vec())
    }

    fn get_escrow_view(
        &self,
        contract_id: ContractId,
        actor: PartyId,
    ) -> Result<EscrowView, EscrowError> {
        let ledger = self.load_as_party(&contract_id, &actor, "get_escrow_view")?;
        Ok(EscrowView::compute(&ledger))
    }
}
