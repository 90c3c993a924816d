//! # Staged Writes
//!
//! The write set of one ledger operation.
//!
//! Reads see the operation's own staged writes first and fall back to the
//! store. Nothing reaches the store until `commit`, which hands the whole set
//! to `atomic_batch_write` in a single call. Dropping an uncommitted set
//! discards it, so an operation that fails midway leaves no trace.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

use super::helpers::decode_record;
use crate::domain::errors::LedgerError;
use crate::ports::outbound::{BatchOperation, KeyValueStore};

pub struct StagedWrites<'a, KV: KeyValueStore> {
    store: &'a mut KV,
    pending: BTreeMap<String, Vec<u8>>,
}

impl<'a, KV: KeyValueStore> StagedWrites<'a, KV> {
    pub fn new(store: &'a mut KV) -> Self {
        Self {
            store,
            pending: BTreeMap::new(),
        }
    }

    /// Raw bytes under `key`, staged value first.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        if let Some(value) = self.pending.get(key) {
            return Ok(Some(value.clone()));
        }
        self.store
            .get(key.as_bytes())
            .map_err(LedgerError::store_read)
    }

    /// Decoded record under `key`, staged value first.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, LedgerError> {
        self.get(key)?
            .map(|bytes| decode_record(key, &bytes))
            .transpose()
    }

    /// Stage `value` as JSON under `key`, replacing any earlier staged value.
    pub fn put_json<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), LedgerError> {
        let key = key.into();
        let bytes = serde_json::to_vec(value).map_err(|e| LedgerError::StoreWriteFailure {
            message: format!("failed to encode {key}: {e}"),
        })?;
        self.pending.insert(key, bytes);
        Ok(())
    }

    /// Number of staged keys.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply every staged write in one atomic batch, returning how many keys
    /// were written.
    pub fn commit(self) -> Result<usize, LedgerError> {
        let count = self.pending.len();
        let operations: Vec<_> = self
            .pending
            .into_iter()
            .map(|(key, value)| BatchOperation::put(key, value))
            .collect();

        self.store
            .atomic_batch_write(operations)
            .map_err(LedgerError::store_write)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryKVStore;

    #[test]
    fn test_reads_see_staged_writes() {
        let mut store = InMemoryKVStore::new();
        store.put(b"B_num", b"6").unwrap();

        let mut writes = StagedWrites::new(&mut store);
        assert_eq!(writes.get_json::<u64>("B_num").unwrap(), Some(6));

        writes.put_json("B_num", &8u64).unwrap();
        assert_eq!(writes.get_json::<u64>("B_num").unwrap(), Some(8));
        assert_eq!(writes.len(), 1);
    }

    #[test]
    fn test_nothing_written_before_commit() {
        let mut store = InMemoryKVStore::new();

        {
            let mut writes = StagedWrites::new(&mut store);
            writes.put_json("b_1", &"bond").unwrap();
            writes.put_json("B_num", &1u64).unwrap();
            // dropped without commit
        }
        assert!(store.is_empty());

        let mut writes = StagedWrites::new(&mut store);
        writes.put_json("B_num", &1u64).unwrap();
        assert_eq!(writes.commit().unwrap(), 1);
        assert_eq!(store.get(b"B_num").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn test_corrupt_value_reported_with_key() {
        let mut store = InMemoryKVStore::new();
        store.put(b"T_num", b"not-json").unwrap();

        let writes = StagedWrites::new(&mut store);
        match writes.get_json::<u64>("T_num") {
            Err(LedgerError::CorruptRecord { key, .. }) => assert_eq!(key, "T_num"),
            other => panic!("Expected CorruptRecord, got {other:?}"),
        }
    }
}
