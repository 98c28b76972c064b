//! Event sink backed by the shared bus.

use std::sync::Arc;

use shared_bus::{EscrowEvent, EventPublisher};

use crate::ports::outbound::EventSink;

/// Forwards engine events to an [`EventPublisher`].
///
/// Delivery counts are the bus's concern; the sink never propagates a
/// failure back into the transition that produced the event.
pub struct BusEventSink {
    bus: Arc<dyn EventPublisher>,
}

impl BusEventSink {
    pub fn new(bus: Arc<dyn EventPublisher>) -> Self {
        Self { bus }
    }
}

impl EventSink for BusEventSink {
    fn emit(&self, event: EscrowEvent) {
        self.bus.publish(event);
    }
}
