//! Hexagonal boundary: inbound command API and outbound dependencies.

pub mod inbound;
pub mod outbound;

pub use inbound::{
    ApproveAndPay, CreateMilestone, EscrowApi, RejectMilestone, ReviewSubmission, SubmitWork,
    UpdateMilestone,
};
pub use outbound::{
    AttachmentStore, Clock, ContractStore, EventSink, FixedClock, IdentityProvider, NullEventSink,
    SystemClock, VersionedLedger,
};
