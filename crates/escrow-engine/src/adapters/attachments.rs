//! In-memory attachment storage.

use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::{AttachmentRef, EscrowError};
use crate::ports::outbound::AttachmentStore;

/// Keeps uploaded documents in a map keyed by generated reference.
///
/// The reference format (`mem://<uuid>/<file-name>`) is opaque to the
/// engine; only this adapter can resolve it back to bytes.
#[derive(Default)]
pub struct InMemoryAttachmentStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryAttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a reference back to its bytes, if this store holds it.
    pub fn fetch(&self, reference: &AttachmentRef) -> Option<Vec<u8>> {
        self.blobs.read().get(reference.as_str()).cloned()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

impl AttachmentStore for InMemoryAttachmentStore {
    fn store(&self, file_name: &str, bytes: &[u8]) -> Result<AttachmentRef, EscrowError> {
        if file_name.trim().is_empty() {
            return Err(EscrowError::Storage("attachment file name is empty".into()));
        }
        let key = format!("mem://{}/{}", Uuid::new_v4(), file_name.trim());
        self.blobs.write().insert(key.clone(), bytes.to_vec());
        Ok(AttachmentRef::new(key))
    }
}
