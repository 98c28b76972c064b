//! Inner layer: entities, state machine, ledger, and derived views.

pub mod config;
pub mod entities;
pub mod errors;
pub mod escrow_view;
pub mod ledger;
pub mod submission;

pub use config::{EngineConfig, ReviewExpiryPolicy, DEFAULT_MAX_MILESTONES};
pub use entities::{Milestone, MilestoneState, PaymentStatus, VerificationStatus};
pub use errors::{EntityKind, EscrowError};
pub use escrow_view::EscrowView;
pub use ledger::{MilestoneDraft, MilestoneLedger};
pub use submission::{
    AttachmentRef, RawSubmissionPayload, Submission, SubmissionPayload, SubmissionStatus,
};
