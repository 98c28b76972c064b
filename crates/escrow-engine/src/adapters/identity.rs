//! In-memory identity registry.

use std::collections::HashSet;

use parking_lot::RwLock;
use shared_types::PartyId;

use crate::domain::EscrowError;
use crate::ports::outbound::IdentityProvider;

/// Registry of known parties.
///
/// Stands in for an external auth service; a production deployment would
/// put a token verifier behind the same trait.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    known: RwLock<HashSet<PartyId>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with_party(self, party: PartyId) -> Self {
        self.known.write().insert(party);
        self
    }

    /// Registers a party after construction.
    pub fn register(&self, party: PartyId) {
        self.known.write().insert(party);
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    fn verify(&self, party: &PartyId, action: &'static str) -> Result<(), EscrowError> {
        if self.known.read().contains(party) {
            Ok(())
        } else {
            Err(EscrowError::Unauthorized {
                party: *party,
                action,
            })
        }
    }
}
