//! Sled-backed document store.

use super::{DocumentStore, StoredDocument};
use crate::document::SpecificationDocument;
use crate::error::StorageError;
use crate::types::Fingerprint;
use std::path::Path;

const DOCUMENTS_TREE: &str = "documents";

/// Durable document store. Records are YAML-encoded under the fingerprint.
pub struct SledDocumentStore {
    documents: sled::Tree,
}

impl SledDocumentStore {
    /// Open (or create) a store at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &sled::Db) -> Result<Self, StorageError> {
        Ok(Self {
            documents: db.open_tree(DOCUMENTS_TREE)?,
        })
    }

    fn decode(fingerprint: &str, bytes: &[u8]) -> Result<StoredDocument, StorageError> {
        serde_yaml::from_slice(bytes).map_err(|e| {
            StorageError::Serialization(format!(
                "Failed to decode stored document {}: {}",
                fingerprint, e
            ))
        })
    }
}

impl DocumentStore for SledDocumentStore {
    fn load(&self, fingerprint: &Fingerprint) -> Result<StoredDocument, StorageError> {
        let bytes = self
            .documents
            .get(fingerprint.as_str())?
            .ok_or_else(|| StorageError::NotFound(fingerprint.to_string()))?;
        Self::decode(fingerprint.as_str(), &bytes)
    }

    fn save(
        &self,
        fingerprint: &Fingerprint,
        document: &SpecificationDocument,
    ) -> Result<(), StorageError> {
        let record = StoredDocument {
            fingerprint: fingerprint.clone(),
            stored_at: chrono::Utc::now(),
            document: document.clone(),
        };
        let encoded = serde_yaml::to_string(&record).map_err(|e| {
            StorageError::Serialization(format!(
                "Failed to encode document {}: {}",
                fingerprint, e
            ))
        })?;

        // Insert only when absent so the first stored record is never replaced.
        let outcome = self.documents.compare_and_swap(
            fingerprint.as_str(),
            None as Option<&[u8]>,
            Some(encoded.into_bytes()),
        )?;
        match outcome {
            Ok(()) => {
                tracing::debug!(fingerprint = %fingerprint, "Stored specification document");
            }
            Err(_) => {
                tracing::debug!(
                    fingerprint = %fingerprint,
                    "Specification document already stored, keeping existing record"
                );
            }
        }
        self.documents.flush()?;
        Ok(())
    }

    fn contains(&self, fingerprint: &Fingerprint) -> Result<bool, StorageError> {
        Ok(self.documents.contains_key(fingerprint.as_str())?)
    }

    fn list(&self) -> Result<Vec<Fingerprint>, StorageError> {
        let mut fingerprints = Vec::new();
        for key in self.documents.iter().keys() {
            let key = key?;
            let text = String::from_utf8_lossy(&key);
            match text.parse::<Fingerprint>() {
                Ok(fp) => fingerprints.push(fp),
                Err(_) => tracing::warn!(key = %text, "Ignoring unrecognized store key"),
            }
        }
        Ok(fingerprints)
    }
}
