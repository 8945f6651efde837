//! # Core Type Definitions
//!
//! This module contains the foundation types for the Trigraph engine:
//! - Content-derived identifiers (`Digest`)
//! - Node payloads (`ScalarValue`)
//! - Insertion contracts (`InsertMode`, `Insertion`)
//! - Error types (`TrigraphError`)
//!
//! ## Determinism Guarantees
//!
//! All identity in the system is derived from content: equal inputs always
//! produce equal digests, across processes and across runs. Types here
//! implement `Ord` so they can key `BTreeMap`/`BTreeSet` collections with
//! deterministic enumeration order.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// DIGEST
// =============================================================================

/// Size in bytes of every digest produced by the content addresser.
pub const DIGEST_SIZE: usize = 32;

/// A fixed-size content-derived identifier.
///
/// Digests stand in for nodes and edges everywhere in the engine: the maps
/// that own node and edge records are keyed by digest, adjacency sets hold
/// edge digests, and the triple layer's auxiliary indices are keyed by
/// composite digests. Two invocations of the addresser on equal input always
/// yield the same digest; distinct inputs are assumed not to collide.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Digest(pub [u8; DIGEST_SIZE]);

impl Digest {
    /// Borrow the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Build a digest from a byte slice of exactly [`DIGEST_SIZE`] bytes.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; DIGEST_SIZE]>::try_from(bytes).ok().map(Self)
    }

    /// Render the digest as lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// Parse a digest from its lowercase-or-uppercase hex rendering.
    pub fn from_hex(hex: &str) -> Result<Self, TrigraphError> {
        let raw = hex.as_bytes();
        if raw.len() != DIGEST_SIZE * 2 {
            return Err(TrigraphError::Deserialization(format!(
                "digest hex must be {} characters, got {}",
                DIGEST_SIZE * 2,
                raw.len()
            )));
        }
        let mut out = [0u8; DIGEST_SIZE];
        for (i, pair) in raw.chunks_exact(2).enumerate() {
            out[i] = (decode_nibble(pair[0])? << 4) | decode_nibble(pair[1])?;
        }
        Ok(Self(out))
    }
}

fn decode_nibble(ch: u8) -> Result<u8, TrigraphError> {
    match ch {
        b'0'..=b'9' => Ok(ch - b'0'),
        b'a'..=b'f' => Ok(ch - b'a' + 10),
        b'A'..=b'F' => Ok(ch - b'A' + 10),
        _ => Err(TrigraphError::Deserialization(format!(
            "invalid hex character: {:?}",
            char::from(ch)
        ))),
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self})")
    }
}

// =============================================================================
// SCALAR VALUE
// =============================================================================

/// An immutable node payload.
///
/// The closed set of variants is the whole universe of addressable content:
/// there is no "unsupported type" error class because unsupported types are
/// unrepresentable.
///
/// Values are stored exactly as given. Numeric values are addressed through
/// their canonical textual rendering, so `Int(1)` and `Float(1.0)` are
/// distinct nodes.
///
/// Values are totally ordered (floats through `f64::total_cmp`) so they can
/// key deterministic collections; equality follows the same total order,
/// which keeps it aligned with digest identity (`-0.0` and `0.0` render
/// differently and are distinct values).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub enum ScalarValue {
    /// The null sentinel.
    #[default]
    Null,
    /// UTF-8 text.
    Text(String),
    /// An opaque binary blob.
    Bytes(Vec<u8>),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
}

impl ScalarValue {
    /// Build a text value.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Build a binary value.
    #[must_use]
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(b.into())
    }

    /// Borrow the text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Variant rank for ordering across variants.
    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Text(_) => 1,
            Self::Bytes(_) => 2,
            Self::Int(_) => 3,
            Self::Float(_) => 4,
        }
    }
}

impl Ord for ScalarValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => std::cmp::Ordering::Equal,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Bytes(a), Self::Bytes(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for ScalarValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScalarValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for ScalarValue {}

impl From<&ScalarValue> for ScalarValue {
    fn from(value: &ScalarValue) -> Self {
        value.clone()
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for ScalarValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for ScalarValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<Vec<u8>> for ScalarValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

// =============================================================================
// INSERTION CONTRACT
// =============================================================================

/// Duplicate handling for node and edge insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertMode {
    /// Re-inserting existing content is a success that returns the existing
    /// digest.
    Idempotent,
    /// Re-inserting existing content is a reportable duplicate. Used by
    /// callers that must detect collisions, e.g. uniqueness constraints for
    /// table and document names.
    StrictUnique,
}

/// The outcome of a successful insertion.
///
/// "Created" and "already existed" are distinct, exhaustively-matched
/// outcomes rather than an ambiguous sentinel; the duplicate-under-strict
/// case is a third outcome, surfaced as [`TrigraphError::DuplicateNode`] or
/// [`TrigraphError::DuplicateEdge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The content was not present; a record was created.
    Created(Digest),
    /// The content was already present; nothing changed.
    Existing(Digest),
}

impl Insertion {
    /// The digest of the record, freshly created or pre-existing.
    #[must_use]
    pub const fn digest(self) -> Digest {
        match self {
            Self::Created(d) | Self::Existing(d) => d,
        }
    }

    /// Whether this insertion created a new record.
    #[must_use]
    pub const fn is_created(self) -> bool {
        matches!(self, Self::Created(_))
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the Trigraph engine.
///
/// Every variant is a local, synchronous, recoverable outcome returned to
/// the immediate caller; none is escalated as process-fatal. Operations are
/// either fully applied or not applied at all.
#[derive(Debug, Error)]
pub enum TrigraphError {
    /// A node with this content already exists (strict-unique insertion).
    #[error("node already exists: {0}")]
    DuplicateNode(Digest),

    /// An edge between these endpoints already exists (strict-unique
    /// insertion).
    #[error("edge already exists: {0}")]
    DuplicateEdge(Digest),

    /// An edge insertion referenced a digest with no corresponding node.
    /// The edge was not created.
    #[error("unknown edge endpoint: {0}")]
    UnknownEndpoint(Digest),

    /// A triple query left the predicate as a wildcard. Predicates cannot be
    /// searched directly: no index is keyed purely by predicate.
    #[error("triple query requires a concrete predicate")]
    WildcardPredicate,

    /// A triple query left every term as a wildcard.
    #[error("triple query must bind at least one term")]
    UnboundPattern,

    /// A graph generator was asked for an unsupported size.
    #[error("invalid generator size: {0}")]
    InvalidSize(usize),

    /// A serialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A deserialization error occurred.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// An I/O error occurred in a storage adapter.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================
