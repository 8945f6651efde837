//! # redb-backed Key-Value Store
//!
//! A disk-backed [`KvStore`] using the redb embedded database: ACID
//! transactions, crash safety through copy-on-write B-trees, zero
//! configuration. Drop-in for [`crate::MemoryStore`] wherever the contract
//! is accepted.

use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;

use crate::TrigraphError;
use crate::storage::kv::KvStore;

/// The single entries table: key bytes -> value bytes.
const KV: TableDefinition<&[u8], &[u8]> = TableDefinition::new("kv");

/// A disk-backed key-value store.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TrigraphError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| TrigraphError::Io(e.to_string()))?;

        // Make sure the table exists so first reads don't fail.
        let write_txn = db
            .begin_write()
            .map_err(|e| TrigraphError::Io(e.to_string()))?;
        {
            let _ = write_txn
                .open_table(KV)
                .map_err(|e| TrigraphError::Io(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| TrigraphError::Io(e.to_string()))?;

        Ok(Self { db })
    }

    /// Compact the database file.
    pub fn compact(&mut self) -> Result<(), TrigraphError> {
        self.db
            .compact()
            .map_err(|e| TrigraphError::Io(e.to_string()))?;
        Ok(())
    }
}

impl KvStore for RedbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, TrigraphError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| TrigraphError::Io(e.to_string()))?;
        let table = read_txn
            .open_table(KV)
            .map_err(|e| TrigraphError::Io(e.to_string()))?;
        Ok(table
            .get(key)
            .map_err(|e| TrigraphError::Io(e.to_string()))?
            .map(|guard| guard.value().to_vec()))
    }

    fn put(&mut self, key: &[u8], value: &[u8], overwrite: bool) -> Result<(), TrigraphError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| TrigraphError::Io(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(KV)
                .map_err(|e| TrigraphError::Io(e.to_string()))?;
            let present = table
                .get(key)
                .map_err(|e| TrigraphError::Io(e.to_string()))?
                .is_some();
            if overwrite || !present {
                table
                    .insert(key, value)
                    .map_err(|e| TrigraphError::Io(e.to_string()))?;
            }
        }
        write_txn
            .commit()
            .map_err(|e| TrigraphError::Io(e.to_string()))?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), TrigraphError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| TrigraphError::Io(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(KV)
                .map_err(|e| TrigraphError::Io(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| TrigraphError::Io(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| TrigraphError::Io(e.to_string()))?;
        Ok(())
    }

    fn contains(&self, key: &[u8]) -> Result<bool, TrigraphError> {
        Ok(self.get(key)?.is_some())
    }

    fn keys(&self) -> Result<Vec<Vec<u8>>, TrigraphError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| TrigraphError::Io(e.to_string()))?;
        let table = read_txn
            .open_table(KV)
            .map_err(|e| TrigraphError::Io(e.to_string()))?;
        let mut keys = Vec::new();
        for entry in table
            .iter()
            .map_err(|e| TrigraphError::Io(e.to_string()))?
        {
            let (key, _) = entry.map_err(|e| TrigraphError::Io(e.to_string()))?;
            keys.push(key.value().to_vec());
        }
        Ok(keys)
    }

    fn len(&self) -> Result<usize, TrigraphError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| TrigraphError::Io(e.to_string()))?;
        let table = read_txn
            .open_table(KV)
            .map_err(|e| TrigraphError::Io(e.to_string()))?;
        let len = table
            .len()
            .map_err(|e| TrigraphError::Io(e.to_string()))?;
        Ok(len as usize)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_put_get_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.redb");

        {
            let mut store = RedbStore::open(&path).expect("open");
            store.put(b"k", b"v", true).expect("put");
            assert_eq!(store.get(b"k").expect("get"), Some(b"v".to_vec()));
        }

        let store = RedbStore::open(&path).expect("reopen");
        assert_eq!(store.get(b"k").expect("get"), Some(b"v".to_vec()));
        assert_eq!(store.len().expect("len"), 1);
    }

    #[test]
    fn contract_matches_memory_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = RedbStore::open(dir.path().join("contract.redb")).expect("open");

        store.put(b"k", b"first", false).expect("put");
        store.put(b"k", b"second", false).expect("put");
        assert_eq!(store.get(b"k").expect("get"), Some(b"first".to_vec()));

        store.put(b"k", b"third", true).expect("put");
        assert_eq!(store.get(b"k").expect("get"), Some(b"third".to_vec()));

        store.put(b"other", b"x", true).expect("put");
        let keys = store.keys().expect("keys");
        assert_eq!(keys, vec![b"k".to_vec(), b"other".to_vec()]);

        store.delete(b"k").expect("delete");
        assert!(!store.contains(b"k").expect("contains"));
        assert_eq!(store.len().expect("len"), 1);
    }
}
