//! # Shared Bus - Event Bus for Escrow Lifecycle Events
//!
//! Carries the engine's logical lifecycle events to whoever cares about them
//! (notification delivery, chat, audit trails). Delivery and formatting are
//! the subscriber's problem; the engine only announces what happened.
//!
//! ## Pattern
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Lifecycle    │                    │ Notification │
//! │ Engine       │    publish()       │ Consumer     │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Guarantees
//!
//! - Publishing never blocks and never fails the originating command; an
//!   event with no subscribers is dropped (and logged at debug level).
//! - Subscribers that lag beyond the channel capacity lose the oldest
//!   events, not the newest.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EscrowEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
