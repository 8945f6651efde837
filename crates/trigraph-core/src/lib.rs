//! # trigraph-core
//!
//! The content-addressed graph engine for Trigraph - THE ENGINE.
//!
//! Nodes and edges are identified by a cryptographic digest of their
//! content rather than by externally assigned identifiers, and a
//! triple-indexed semantic layer answers subject/predicate/object queries
//! over the graph without scanning all edges.
//!
//! ## Architectural Constraints
//!
//! The ENGINE:
//! - Is single-threaded, synchronous and non-blocking: every operation
//!   runs to completion on the caller's thread with no suspension points
//! - Derives every identity from content (BLAKE3, 32-byte digests)
//! - Only grows: nodes, edges and triples are immutable and never deleted
//! - Keeps I/O behind the key-value storage adapters; everything above
//!   them is pure in-memory computation
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod addresser;
pub mod document;
pub mod export;
pub mod formats;
pub mod generators;
pub mod graph;
pub mod matcher;
pub mod storage;
pub mod triple;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{DIGEST_SIZE, Digest, InsertMode, Insertion, ScalarValue, TrigraphError};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use addresser::{digest_keys, digest_value, digest_values};
pub use document::{DocFields, DocumentStore};
pub use export::{dump_checksum, store_checksum, verify_dump};
pub use generators::{complete_graph, ladder_graph, line_graph, polygon_graph, star_graph};
pub use graph::{GraphDump, GraphStore};
pub use matcher::ValueMatch;
pub use storage::{KvStore, MemoryStore, RedbStore, persist_dump, restore_dump};
pub use triple::{TripleDump, TripleStore};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{dump_from_bytes, dump_from_cbor, dump_to_bytes, dump_to_cbor, graph_from_csv,
    graph_to_csv};
