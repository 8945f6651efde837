//! # Serialization Formats
//!
//! Byte-level codecs for the transfer representations. Each codec is a pure
//! transformation between a [`crate::TripleDump`] (or, for the delimited
//! text format, a [`crate::GraphStore`]) and bytes; file I/O lives in the
//! app layer.

pub mod cbor;
pub mod csv;
pub mod persistence;

pub use cbor::{dump_from_cbor, dump_to_cbor};
pub use csv::{graph_from_csv, graph_to_csv};
pub use persistence::{PersistenceHeader, dump_from_bytes, dump_to_bytes};
