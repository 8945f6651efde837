//! # Pluggable Storage
//!
//! The key-value adapter contract, its in-memory and redb implementations,
//! and the persistence path that spills a triple-store dump through any
//! adapter.

pub mod kv;
pub mod redb_store;

pub use kv::{KvStore, MemoryStore};
pub use redb_store::RedbStore;

use std::collections::{BTreeMap, BTreeSet};

use crate::{DIGEST_SIZE, Digest, ScalarValue, TripleDump, TrigraphError};

// =============================================================================
// DUMP <-> KV STORE
// =============================================================================

/// Entry-key prefixes: nodes, edges, subject+predicate buckets,
/// predicate+object buckets.
const NODE_PREFIX: u8 = b'n';
const EDGE_PREFIX: u8 = b'e';
const SP_PREFIX: u8 = b's';
const PO_PREFIX: u8 = b'p';

fn entry_key(prefix: u8, digest: &Digest) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 + DIGEST_SIZE);
    key.push(prefix);
    key.push(b':');
    key.extend_from_slice(digest.as_bytes());
    key
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, TrigraphError> {
    postcard::to_stdvec(value).map_err(|e| TrigraphError::Serialization(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, TrigraphError> {
    postcard::from_bytes(bytes).map_err(|e| TrigraphError::Deserialization(e.to_string()))
}

/// Write a dump into a key-value store under prefixed digest keys.
///
/// Existing entries for the same digests are overwritten; content
/// addressing makes that harmless (equal key, equal payload).
pub fn persist_dump(store: &mut dyn KvStore, dump: &TripleDump) -> Result<(), TrigraphError> {
    for (digest, value) in &dump.graph.nodes {
        store.put(&entry_key(NODE_PREFIX, digest), &encode(value)?, true)?;
    }
    for (digest, endpoints) in &dump.graph.edges {
        store.put(&entry_key(EDGE_PREFIX, digest), &encode(endpoints)?, true)?;
    }
    for (key, bucket) in &dump.subject_predicate {
        store.put(&entry_key(SP_PREFIX, key), &encode(bucket)?, true)?;
    }
    for (key, bucket) in &dump.predicate_object {
        store.put(&entry_key(PO_PREFIX, key), &encode(bucket)?, true)?;
    }
    Ok(())
}

/// Read a dump back out of a key-value store.
///
/// Walks every key in the store; entries with malformed keys are reported
/// rather than skipped, since a store holding foreign data is not a valid
/// dump.
pub fn restore_dump(store: &dyn KvStore) -> Result<TripleDump, TrigraphError> {
    let mut nodes: BTreeMap<Digest, ScalarValue> = BTreeMap::new();
    let mut edges: BTreeMap<Digest, (Digest, Digest)> = BTreeMap::new();
    let mut subject_predicate: BTreeMap<Digest, BTreeSet<Digest>> = BTreeMap::new();
    let mut predicate_object: BTreeMap<Digest, BTreeSet<Digest>> = BTreeMap::new();

    for key in store.keys()? {
        let digest = match (key.first(), key.get(1)) {
            (Some(_), Some(&b':')) if key.len() == 2 + DIGEST_SIZE => {
                Digest::from_slice(&key[2..]).ok_or_else(|| {
                    TrigraphError::Deserialization("malformed storage key".to_string())
                })?
            }
            _ => {
                return Err(TrigraphError::Deserialization(format!(
                    "malformed storage key: {} bytes",
                    key.len()
                )));
            }
        };
        let Some(payload) = store.get(&key)? else {
            continue;
        };
        match key[0] {
            NODE_PREFIX => {
                nodes.insert(digest, decode(&payload)?);
            }
            EDGE_PREFIX => {
                edges.insert(digest, decode(&payload)?);
            }
            SP_PREFIX => {
                subject_predicate.insert(digest, decode(&payload)?);
            }
            PO_PREFIX => {
                predicate_object.insert(digest, decode(&payload)?);
            }
            other => {
                return Err(TrigraphError::Deserialization(format!(
                    "unknown storage key prefix: {other:#04x}"
                )));
            }
        }
    }

    Ok(TripleDump {
        graph: crate::GraphDump { nodes, edges },
        subject_predicate,
        predicate_object,
    })
}

// =============================================================================
// TESTS
// =============================================================================
