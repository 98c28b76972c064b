//! Outer layer: concrete implementations of the outbound ports.

pub mod attachments;
pub mod bus_sink;
pub mod identity;
pub mod memory_store;

pub use attachments::InMemoryAttachmentStore;
pub use bus_sink::BusEventSink;
pub use identity::InMemoryIdentityProvider;
pub use memory_store::InMemoryContractStore;
