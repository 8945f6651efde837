//! # Persistence Format
//!
//! The canonical binary format for triple-store dumps.
//!
//! Format: Header (5 bytes) + postcard-serialized dump.
//! - 4 bytes: Magic ("TRIG")
//! - 1 byte: Version
//!
//! Deserialization validates the size bounds and the header before touching
//! the payload, so corrupted or hostile data is rejected without large
//! allocations.

use crate::{TripleDump, TrigraphError};

/// Magic bytes for the Trigraph binary format header.
pub const MAGIC_BYTES: &[u8; 4] = b"TRIG";

/// Current serialization format version.
///
/// Increment this when making breaking changes to the serialization format.
pub const FORMAT_VERSION: u8 = 1;

/// Maximum allowed payload size.
///
/// This prevents memory exhaustion from malicious or corrupted data; 500 MB
/// is a generous upper bound for dump data.
pub const MAX_PAYLOAD_SIZE: usize = 500 * 1024 * 1024;

/// Minimum valid data size (header only).
const MIN_DATA_SIZE: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The persistence header precedes all dump data.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a new header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *MAGIC_BYTES,
            version: FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), TrigraphError> {
        if &self.magic != MAGIC_BYTES {
            return Err(TrigraphError::Deserialization(
                "invalid magic bytes".to_string(),
            ));
        }
        if self.version != FORMAT_VERSION {
            return Err(TrigraphError::Deserialization(format!(
                "unsupported version: {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write the header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut bytes = [0u8; 5];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read a header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrigraphError> {
        if bytes.len() < MIN_DATA_SIZE {
            return Err(TrigraphError::Deserialization(
                "header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a dump to bytes (header + payload).
pub fn dump_to_bytes(dump: &TripleDump) -> Result<Vec<u8>, TrigraphError> {
    let header = PersistenceHeader::new();
    let payload =
        postcard::to_stdvec(dump).map_err(|e| TrigraphError::Serialization(e.to_string()))?;

    let mut result = Vec::with_capacity(MIN_DATA_SIZE + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Deserialize a dump from bytes.
///
/// Validates minimum size, maximum payload size and the header before the
/// payload is parsed.
pub fn dump_from_bytes(bytes: &[u8]) -> Result<TripleDump, TrigraphError> {
    if bytes.len() < MIN_DATA_SIZE {
        return Err(TrigraphError::Deserialization(
            "data too short: minimum 5 bytes required".to_string(),
        ));
    }
    if bytes.len() > MAX_PAYLOAD_SIZE {
        return Err(TrigraphError::Deserialization(format!(
            "data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[MIN_DATA_SIZE..];
    postcard::from_bytes(payload)
        .map_err(|e| TrigraphError::Deserialization(format!("failed to parse dump data: {e}")))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TripleStore;

    fn sample() -> TripleDump {
        let mut store = TripleStore::new();
        store.assert_triple("RO", "capital", "Bucharest").expect("assert");
        store.assert_triple("RO", "area_size", 238_391i64).expect("assert");
        store.to_dump()
    }

    #[test]
    fn header_roundtrip() {
        let header = PersistenceHeader::new();
        let bytes = header.to_bytes();
        let restored = PersistenceHeader::from_bytes(&bytes).expect("parse header");

        assert_eq!(restored.magic, *MAGIC_BYTES);
        assert_eq!(restored.version, FORMAT_VERSION);
        assert!(restored.validate().is_ok());
    }

    #[test]
    fn bytes_roundtrip_bit_exact() {
        let dump = sample();

        let bytes1 = dump_to_bytes(&dump).expect("first serialize");
        let restored = dump_from_bytes(&bytes1).expect("deserialize");
        let bytes2 = dump_to_bytes(&restored).expect("second serialize");

        assert_eq!(restored, dump);
        assert_eq!(
            bytes1, bytes2,
            "save -> load -> save must produce identical bytes"
        );
    }

    #[test]
    fn invalid_magic_rejected() {
        let mut bytes = dump_to_bytes(&sample()).expect("serialize");
        bytes[0..4].copy_from_slice(b"XXXX");

        assert!(dump_from_bytes(&bytes).is_err());
    }

    #[test]
    fn unsupported_version_rejected() {
        let mut bytes = dump_to_bytes(&sample()).expect("serialize");
        bytes[4] = FORMAT_VERSION + 1;

        assert!(dump_from_bytes(&bytes).is_err());
    }

    #[test]
    fn short_data_rejected() {
        assert!(dump_from_bytes(b"TRI").is_err());
        assert!(dump_from_bytes(&[]).is_err());
    }
}
