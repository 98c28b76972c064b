//! Milestone and escrow lifecycle engine.
//!
//! Manages the bilateral workflow between a client and a freelancer on a
//! fixed-budget contract: the freelancer proposes milestones, the client
//! funds them from escrow, work is delivered and reviewed, and a derived
//! escrow view summarizes where the money stands at all times.
//!
//! # State machine
//!
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
//! # Structural invariants
//!
//! - at most 3 milestones per contract (configurable)
//! - milestone day-budgets fit between today and the contract deadline
//! - the paid-milestone sum never exceeds the contract budget
//! - `funds_in_escrow + released_to_milestones == budget`, always
//! - `approve_and_pay` is idempotent; `VERIFIED` is immutable
//!
//! # Architecture
//!
//! Hexagonal, mirroring the rest of the workspace:
//!
//! - [`domain`]: entities, the state machine, the per-contract ledger,
//!   and the derived escrow view. Pure and deterministic.
//! - [`ports`]: the inbound command API ([`ports::inbound::EscrowApi`])
//!   and the outbound dependency traits (store, identity, attachments,
//!   clock, event sink).
//! - [`adapters`]: in-memory implementations of the outbound ports.
//! - [`engine`]: [`engine::LifecycleEngine`], the application service
//!   tying the layers together with optimistic per-contract versioning.

pub mod adapters;
pub mod domain;
pub mod engine;
pub mod ports;

pub use adapters::{
    BusEventSink, InMemoryAttachmentStore, InMemoryContractStore, InMemoryIdentityProvider,
};
pub use domain::{
    AttachmentRef, EngineConfig, EscrowError, EscrowView, Milestone, MilestoneDraft,
    MilestoneLedger, MilestoneState, PaymentStatus, RawSubmissionPayload, ReviewExpiryPolicy,
    Submission, SubmissionPayload, SubmissionStatus, VerificationStatus,
};
pub use engine::LifecycleEngine;
pub use ports::inbound::{
    ApproveAndPay, CreateMilestone, EscrowApi, RejectMilestone, ReviewSubmission, SubmitWork,
    UpdateMilestone,
};
pub use ports::outbound::{
    AttachmentStore, Clock, ContractStore, EventSink, FixedClock, IdentityProvider, NullEventSink,
    SystemClock, VersionedLedger,
};
