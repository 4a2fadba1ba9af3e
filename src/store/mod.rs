//! Document Store
//!
//! Keyed persistence for specification documents. Keys are content
//! fingerprints; records are written once and never mutated.

pub mod memory;
pub mod persistence;

pub use memory::MemoryDocumentStore;
pub use persistence::SledDocumentStore;

use crate::document::SpecificationDocument;
use crate::error::StorageError;
use crate::types::Fingerprint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// StoredDocument: a specification document and its storage metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub fingerprint: Fingerprint,
    pub stored_at: DateTime<Utc>,
    pub document: SpecificationDocument,
}

/// Document store interface
///
/// `save` on an existing fingerprint keeps the first stored record.
pub trait DocumentStore: Send + Sync {
    fn load(&self, fingerprint: &Fingerprint) -> Result<StoredDocument, StorageError>;
    fn save(
        &self,
        fingerprint: &Fingerprint,
        document: &SpecificationDocument,
    ) -> Result<(), StorageError>;
    fn contains(&self, fingerprint: &Fingerprint) -> Result<bool, StorageError>;
    fn list(&self) -> Result<Vec<Fingerprint>, StorageError>;
}
