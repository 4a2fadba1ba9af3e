//! In-memory document store.

use super::{DocumentStore, StoredDocument};
use crate::document::SpecificationDocument;
use crate::error::StorageError;
use crate::types::Fingerprint;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-local store; concurrent readers share a read lock.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<Fingerprint, StoredDocument>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn load(&self, fingerprint: &Fingerprint) -> Result<StoredDocument, StorageError> {
        self.documents
            .read()
            .get(fingerprint)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(fingerprint.to_string()))
    }

    fn save(
        &self,
        fingerprint: &Fingerprint,
        document: &SpecificationDocument,
    ) -> Result<(), StorageError> {
        let mut documents = self.documents.write();
        documents
            .entry(fingerprint.clone())
            .or_insert_with(|| StoredDocument {
                fingerprint: fingerprint.clone(),
                stored_at: chrono::Utc::now(),
                document: document.clone(),
            });
        Ok(())
    }

    fn contains(&self, fingerprint: &Fingerprint) -> Result<bool, StorageError> {
        Ok(self.documents.read().contains_key(fingerprint))
    }

    fn list(&self) -> Result<Vec<Fingerprint>, StorageError> {
        let mut keys: Vec<_> = self.documents.read().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
