//! Content fingerprints for raw specification input.

use crate::types::Fingerprint;

/// Deterministic BLAKE3 fingerprint of the raw input a document came from.
pub fn fingerprint(raw: &[u8]) -> Fingerprint {
    Fingerprint::from_hash(*blake3::hash(raw).as_bytes())
}
