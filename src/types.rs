//! Core types shared across the scaffold pipeline.

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hash: Generic 256-bit hash value
pub type Hash = [u8; 32];

/// Fingerprint: content hash of the raw input a specification document was
/// translated from. Rendered as 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn from_hash(hash: Hash) -> Self {
        Fingerprint(hex::encode(hash))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for human-readable output.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl FromStr for Fingerprint {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let decoded = hex::decode(&normalized)
            .map_err(|_| StorageError::InvalidFingerprint(s.to_string()))?;
        if decoded.len() != 32 {
            return Err(StorageError::InvalidFingerprint(s.to_string()));
        }
        Ok(Fingerprint(normalized))
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
