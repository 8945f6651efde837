//! # Export Verification
//!
//! Checksums over the canonical persistence bytes.
//!
//! The binary persistence format is deterministic (BTreeMap ordering plus
//! postcard), so hashing its bytes gives a stable fingerprint of a store's
//! entire content. The fingerprint is the source of truth for verifying
//! that an exported dump arrived intact.

use crate::formats::persistence::dump_to_bytes;
use crate::{TripleDump, TripleStore, TrigraphError};

/// BLAKE3 hex checksum of a dump's canonical bytes.
pub fn dump_checksum(dump: &TripleDump) -> Result<String, TrigraphError> {
    let bytes = dump_to_bytes(dump)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// BLAKE3 hex checksum of a store's current content.
pub fn store_checksum(store: &TripleStore) -> Result<String, TrigraphError> {
    dump_checksum(&store.to_dump())
}

/// Whether a dump's canonical bytes hash to the expected checksum.
pub fn verify_dump(dump: &TripleDump, expected: &str) -> Result<bool, TrigraphError> {
    Ok(dump_checksum(dump)? == expected)
}

// =============================================================================
// TESTS
// =============================================================================
