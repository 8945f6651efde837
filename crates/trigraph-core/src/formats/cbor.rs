//! # CBOR Codec
//!
//! CBOR encoding of triple-store dumps, for interchange with non-Rust
//! tooling. Round-trips the transfer representation exactly, digest bytes
//! preserved bit-for-bit.

use crate::{TripleDump, TrigraphError};

/// Encode a dump as CBOR bytes.
pub fn dump_to_cbor(dump: &TripleDump) -> Result<Vec<u8>, TrigraphError> {
    let mut buffer = Vec::new();
    ciborium::into_writer(dump, &mut buffer)
        .map_err(|e| TrigraphError::Serialization(e.to_string()))?;
    Ok(buffer)
}

/// Decode a dump from CBOR bytes.
pub fn dump_from_cbor(bytes: &[u8]) -> Result<TripleDump, TrigraphError> {
    ciborium::from_reader(bytes).map_err(|e| TrigraphError::Deserialization(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
