//! Shared fixture: a lifecycle engine wired to the real in-memory
//! adapters and the shared bus, pinned to a fixed clock.

use std::sync::{Arc, Once};

use chrono::{DateTime, NaiveDate, Utc};
use marketplace_telemetry::{init_telemetry, TelemetryConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared_bus::InMemoryEventBus;
use shared_types::{Contract, ContractId, MilestoneId, Money, PartyId};

use escrow_engine::{
    ApproveAndPay, BusEventSink, CreateMilestone, EngineConfig, EscrowApi, EscrowError,
    FixedClock, InMemoryAttachmentStore, InMemoryContractStore, InMemoryIdentityProvider,
    LifecycleEngine, Milestone, MilestoneDraft, RawSubmissionPayload, RejectMilestone,
    ReviewSubmission, SubmitWork, UpdateMilestone,
};

static TELEMETRY: Once = Once::new();

/// Installs the tracing subscriber once for the whole test binary, so
/// `RUST_LOG=debug cargo test` shows the engine's structured logs.
fn init_test_telemetry() {
    TELEMETRY.call_once(|| {
        let _ = init_telemetry(&TelemetryConfig::from_env());
    });
}

/// The pinned "today" every harness starts at.
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-03-01T08:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Engine, bus, and one registered contract with both parties known.
pub struct Harness {
    pub engine: LifecycleEngine,
    pub bus: Arc<InMemoryEventBus>,
    pub store: Arc<InMemoryContractStore>,
    pub identity: Arc<InMemoryIdentityProvider>,
    pub attachments: Arc<InMemoryAttachmentStore>,
    pub contract_id: ContractId,
    pub client: PartyId,
    pub freelancer: PartyId,
}

impl Harness {
    /// Budget 9000, contract 2025-03-01 through 2025-03-31 (30 remaining
    /// days at the fixed clock).
    pub fn new() -> Self {
        Self::with_contract(dec!(9000), date(2025, 3, 1), date(2025, 3, 31))
    }

    pub fn with_contract(budget: Decimal, start: NaiveDate, deadline: NaiveDate) -> Self {
        init_test_telemetry();
        let client = PartyId::generate();
        let freelancer = PartyId::generate();
        let contract = Contract::new(
            ContractId::generate(),
            client,
            freelancer,
            Money::new(budget).unwrap(),
            start,
            deadline,
        )
        .unwrap();
        let contract_id = contract.id;

        let store = Arc::new(InMemoryContractStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let attachments = Arc::new(InMemoryAttachmentStore::new());
        let identity = Arc::new(
            InMemoryIdentityProvider::new()
                .with_party(client)
                .with_party(freelancer),
        );
        let engine = LifecycleEngine::new(
            store.clone(),
            identity.clone(),
            Arc::new(BusEventSink::new(bus.clone())),
            Arc::new(FixedClock(fixed_now())),
            EngineConfig::default(),
        );
        engine.register_contract(contract).unwrap();

        Self {
            engine,
            bus,
            store,
            identity,
            attachments,
            contract_id,
            client,
            freelancer,
        }
    }

    /// Registers a second, independent contract on the same engine and
    /// returns its id and parties.
    pub fn add_contract(&self, budget: Decimal) -> (ContractId, PartyId, PartyId) {
        let client = PartyId::generate();
        let freelancer = PartyId::generate();
        let contract = Contract::new(
            ContractId::generate(),
            client,
            freelancer,
            Money::new(budget).unwrap(),
            date(2025, 3, 1),
            date(2025, 3, 31),
        )
        .unwrap();
        let id = contract.id;
        // Parties must be known identities before they can act.
        self.identity.register(client);
        self.identity.register(freelancer);
        self.engine.register_contract(contract).unwrap();
        (id, client, freelancer)
    }

    pub fn draft(days: u32, amount: Decimal) -> MilestoneDraft {
        MilestoneDraft {
            title: format!("Milestone ({days}d)"),
            description: "Agreed deliverable".into(),
            days_required: days,
            amount,
        }
    }

    pub fn create(&self, days: u32, amount: Decimal) -> Result<Milestone, EscrowError> {
        self.engine.create_milestone(CreateMilestone {
            contract_id: self.contract_id,
            actor: self.freelancer,
            draft: Self::draft(days, amount),
        })
    }

    pub fn update(
        &self,
        id: MilestoneId,
        days: u32,
        amount: Decimal,
    ) -> Result<Milestone, EscrowError> {
        self.engine.update_milestone(UpdateMilestone {
            contract_id: self.contract_id,
            milestone_id: id,
            actor: self.freelancer,
            draft: Self::draft(days, amount),
        })
    }

    pub fn pay(&self, id: MilestoneId) -> Result<Milestone, EscrowError> {
        self.engine.approve_and_pay(ApproveAndPay {
            contract_id: self.contract_id,
            milestone_id: id,
            actor: self.client,
        })
    }

    pub fn reject(&self, id: MilestoneId, feedback: &str) -> Result<Milestone, EscrowError> {
        self.engine.reject_milestone(RejectMilestone {
            contract_id: self.contract_id,
            milestone_id: id,
            actor: self.client,
            feedback: feedback.into(),
        })
    }

    pub fn submit_url(&self, id: MilestoneId, url: &str) -> Result<Milestone, EscrowError> {
        self.engine.submit_work(SubmitWork {
            contract_id: self.contract_id,
            milestone_id: id,
            actor: self.freelancer,
            payload: RawSubmissionPayload::url(url),
            notes: String::new(),
        })
    }

    pub fn review(
        &self,
        id: MilestoneId,
        accept: bool,
        remark: Option<&str>,
    ) -> Result<Milestone, EscrowError> {
        self.engine.review_submission(ReviewSubmission {
            contract_id: self.contract_id,
            milestone_id: id,
            actor: self.client,
            accept,
            remark: remark.map(str::to_string),
        })
    }

    /// Drives a fresh milestone all the way to verified.
    pub fn verified_milestone(&self, days: u32, amount: Decimal) -> Milestone {
        let m = self.create(days, amount).unwrap();
        self.pay(m.id).unwrap();
        self.submit_url(m.id, "https://example.com/work").unwrap();
        self.review(m.id, true, None).unwrap()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
