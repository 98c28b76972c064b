//! Outbound (driven) ports: the engine's dependencies.
//!
//! Identity verification, attachment storage, contract persistence, time,
//! and event emission all live behind traits so the engine core stays
//! deterministic and testable.

use chrono::{DateTime, NaiveDate, Utc};
use shared_bus::EscrowEvent;
use shared_types::{Contract, ContractId, PartyId};

use crate::domain::{AttachmentRef, EscrowError, MilestoneLedger};

/// Verifies that an acting party is a known identity.
///
/// The engine separately checks the party's role on the contract; this
/// port only answers "does this party exist".
pub trait IdentityProvider: Send + Sync {
    /// Confirms the party exists.
    ///
    /// # Errors
    /// - `Unauthorized` when the party is unknown
    fn verify(&self, party: &PartyId, action: &'static str) -> Result<(), EscrowError>;
}

/// Stores submission documents and returns opaque references.
///
/// The engine never inspects document bytes; it records only the
/// reference the store hands back.
pub trait AttachmentStore: Send + Sync {
    /// Persists a document and returns its reference.
    ///
    /// # Errors
    /// - `Storage` when the backend cannot persist the bytes
    fn store(&self, file_name: &str, bytes: &[u8]) -> Result<AttachmentRef, EscrowError>;
}

/// A ledger snapshot paired with its store version.
///
/// Commits carry the version they loaded; a mismatch at commit time means
/// another writer got there first.
#[derive(Debug, Clone)]
pub struct VersionedLedger {
    pub ledger: MilestoneLedger,
    pub version: u64,
}

/// Persistence for contracts and their milestone ledgers.
///
/// One writer per contract at a time: `commit` succeeds only when the
/// expected version still matches, and a [`EscrowError::Conflict`] tells
/// the caller to reload and retry. Writers on different contracts never
/// conflict.
pub trait ContractStore: Send + Sync {
    /// Registers a new contract with an empty ledger at version 0.
    ///
    /// # Errors
    /// - `Storage` when the contract id is already registered
    fn insert_contract(&self, contract: Contract) -> Result<(), EscrowError>;

    /// Loads the current ledger snapshot and its version.
    ///
    /// # Errors
    /// - `NotFound` for an unknown contract
    fn load(&self, contract_id: &ContractId) -> Result<VersionedLedger, EscrowError>;

    /// Writes back a mutated ledger, bumping the version.
    ///
    /// # Errors
    /// - `NotFound` for an unknown contract
    /// - `Conflict` when `expected_version` is stale
    fn commit(
        &self,
        contract_id: &ContractId,
        ledger: MilestoneLedger,
        expected_version: u64,
    ) -> Result<(), EscrowError>;
}

/// Time source, abstracted for deterministic tests.
pub trait Clock: Send + Sync {
    /// Current instant, for created/submitted timestamps.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date, for day-budget checks.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, for tests that exercise the
/// day-budget boundary.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Receives lifecycle events after a transition commits.
///
/// Emission is best-effort: the transition has already been persisted, so
/// sink failures are not surfaced to the caller.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EscrowEvent);
}

/// Sink that drops every event; for callers that do not observe the bus.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _event: EscrowEvent) {}
}
