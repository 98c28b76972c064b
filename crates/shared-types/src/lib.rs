//! # Shared Types Crate
//!
//! Domain identifiers, the `Money` newtype, and the `Contract` record shared
//! across the escrow subsystem crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses the engine boundary
//!   (commands in, milestones/views/events out) is defined here.
//! - **Validated at Construction**: `Money` and `Contract` cannot be built in
//!   an invalid state; downstream code never re-checks budget positivity or
//!   deadline ordering.
//! - **No Behavior**: lifecycle transitions live in `escrow-engine`; this
//!   crate holds data only.

pub mod contract;
pub mod errors;
pub mod ids;
pub mod money;

pub use contract::{Contract, Role};
pub use errors::ContractError;
pub use ids::{ContractId, MilestoneId, PartyId};
pub use money::Money;
