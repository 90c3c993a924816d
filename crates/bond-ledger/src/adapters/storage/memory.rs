use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use std::collections::HashMap;

/// In-memory key-value store for tests and ephemeral ledgers.
///
/// Batches are applied under `&mut self`, so no reader can observe half of
/// one.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKVStore {
    data: HashMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    self.data.insert(key, value);
                }
            }
        }
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        let results: Vec<_> = self
            .data
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_kv_store() {
        let mut store = InMemoryKVStore::new();

        store.put(b"B_num", b"6").unwrap();
        store.put(b"b_1", b"{}").unwrap();

        assert_eq!(store.get(b"B_num").unwrap(), Some(b"6".to_vec()));
        assert_eq!(store.get(b"T_num").unwrap(), None);

        assert!(store.exists(b"b_1").unwrap());
        assert!(!store.exists(b"b_2").unwrap());
    }

    #[test]
    fn test_in_memory_kv_batch_write() {
        let mut store = InMemoryKVStore::new();

        let ops = vec![
            BatchOperation::put("b_7", "bond"),
            BatchOperation::put("transaction7", "tx"),
            BatchOperation::put("B_num", "7"),
        ];

        store.atomic_batch_write(ops).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(b"B_num").unwrap(), Some(b"7".to_vec()));
    }

    #[test]
    fn test_prefix_scan() {
        let mut store = InMemoryKVStore::new();

        store.put(b"t_1", b"a").unwrap();
        store.put(b"t_2", b"b").unwrap();
        store.put(b"transaction1", b"c").unwrap();
        store.put(b"T_num", b"2").unwrap();

        assert_eq!(store.prefix_scan(b"t_").unwrap().len(), 2);
        assert_eq!(store.prefix_scan(b"transaction").unwrap().len(), 1);
    }
}
