//! # Key-Value Store Contract
//!
//! The pluggable backing-store boundary. The engine's own maps are plain
//! `BTreeMap`s; persistence goes through this contract so the store choice
//! (in-memory, redb, anything else) is swappable without touching the graph
//! or triple logic above it.

use std::collections::BTreeMap;

use crate::TrigraphError;

// =============================================================================
// CONTRACT
// =============================================================================

/// A byte-keyed, byte-valued store.
///
/// All operations are fallible so disk-backed implementations can surface
/// I/O errors through the same signatures as the in-memory one.
pub trait KvStore {
    /// Fetch the value stored under a key, if any.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, TrigraphError>;

    /// Store a value under a key.
    ///
    /// With `overwrite` false, a pre-existing key is left untouched and the
    /// call is a silent no-op.
    fn put(&mut self, key: &[u8], value: &[u8], overwrite: bool) -> Result<(), TrigraphError>;

    /// Remove a key. Removing an absent key is a no-op.
    fn delete(&mut self, key: &[u8]) -> Result<(), TrigraphError>;

    /// Whether a key is present.
    fn contains(&self, key: &[u8]) -> Result<bool, TrigraphError>;

    /// Every key in the store.
    fn keys(&self) -> Result<Vec<Vec<u8>>, TrigraphError>;

    /// Number of entries.
    fn len(&self) -> Result<usize, TrigraphError>;

    /// Whether the store holds no entries.
    fn is_empty(&self) -> Result<bool, TrigraphError> {
        Ok(self.len()? == 0)
    }
}

// =============================================================================
// IN-MEMORY IMPLEMENTATION
// =============================================================================

/// The in-memory store: a `BTreeMap` behind the [`KvStore`] contract.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, TrigraphError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8], overwrite: bool) -> Result<(), TrigraphError> {
        if !overwrite && self.entries.contains_key(key) {
            return Ok(());
        }
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), TrigraphError> {
        self.entries.remove(key);
        Ok(())
    }

    fn contains(&self, key: &[u8]) -> Result<bool, TrigraphError> {
        Ok(self.entries.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<Vec<u8>>, TrigraphError> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn len(&self) -> Result<usize, TrigraphError> {
        Ok(self.entries.len())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_delete() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty().expect("is_empty"));

        store.put(b"k", b"v", true).expect("put");
        assert_eq!(store.get(b"k").expect("get"), Some(b"v".to_vec()));
        assert!(store.contains(b"k").expect("contains"));
        assert_eq!(store.len().expect("len"), 1);

        store.delete(b"k").expect("delete");
        assert_eq!(store.get(b"k").expect("get"), None);
        store.delete(b"k").expect("delete absent");
    }

    #[test]
    fn put_without_overwrite_keeps_existing() {
        let mut store = MemoryStore::new();
        store.put(b"k", b"first", false).expect("put");
        store.put(b"k", b"second", false).expect("put");
        assert_eq!(store.get(b"k").expect("get"), Some(b"first".to_vec()));

        store.put(b"k", b"third", true).expect("put");
        assert_eq!(store.get(b"k").expect("get"), Some(b"third".to_vec()));
    }

    #[test]
    fn keys_enumerates_everything() {
        let mut store = MemoryStore::new();
        store.put(b"b", b"2", true).expect("put");
        store.put(b"a", b"1", true).expect("put");

        let keys = store.keys().expect("keys");
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec()]);
    }
}
