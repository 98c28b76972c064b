//! In-memory contract store with optimistic versioning.

use std::collections::HashMap;

use parking_lot::RwLock;
use shared_types::{Contract, ContractId};

use crate::domain::{EscrowError, MilestoneLedger};
use crate::ports::outbound::{ContractStore, VersionedLedger};

struct StoredLedger {
    ledger: MilestoneLedger,
    version: u64,
}

/// Process-local [`ContractStore`].
///
/// Each record carries a version that `commit` checks and bumps; the map
/// lock is held only for the copy in/out, so contention between contracts
/// is negligible.
#[derive(Default)]
pub struct InMemoryContractStore {
    contracts: RwLock<HashMap<ContractId, StoredLedger>>,
}

impl InMemoryContractStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContractStore for InMemoryContractStore {
    fn insert_contract(&self, contract: Contract) -> Result<(), EscrowError> {
        let mut contracts = self.contracts.write();
        if contracts.contains_key(&contract.id) {
            return Err(EscrowError::Storage(format!(
                "contract {} already registered",
                contract.id
            )));
        }
        contracts.insert(
            contract.id,
            StoredLedger {
                ledger: MilestoneLedger::new(contract),
                version: 0,
            },
        );
        Ok(())
    }

    fn load(&self, contract_id: &ContractId) -> Result<VersionedLedger, EscrowError> {
        let contracts = self.contracts.read();
        let stored = contracts
            .get(contract_id)
            .ok_or_else(|| EscrowError::contract_not_found(*contract_id))?;
        Ok(VersionedLedger {
            ledger: stored.ledger.clone(),
            version: stored.version,
        })
    }

    fn commit(
        &self,
        contract_id: &ContractId,
        ledger: MilestoneLedger,
        expected_version: u64,
    ) -> Result<(), EscrowError> {
        let mut contracts = self.contracts.write();
        let stored = contracts
            .get_mut(contract_id)
            .ok_or_else(|| EscrowError::contract_not_found(*contract_id))?;
        if stored.version != expected_version {
            return Err(EscrowError::Conflict {
                contract_id: *contract_id,
                expected: expected_version,
                actual: stored.version,
            });
        }
        stored.ledger = ledger;
        stored.version += 1;
        Ok(())
    }
}
