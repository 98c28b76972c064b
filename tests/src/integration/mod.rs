//! Cross-crate integration tests.

pub mod harness;

mod events;
mod lifecycle;
mod serialization;
