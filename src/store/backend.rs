//! Sorted key-value backend boundary
//!
//! The backend orders records purely by unsigned lexicographic key
//! comparison; every producer of keys must uphold the order-preservation
//! and prefix-freeness invariants of the key codec. Real connectors
//! (bulk-load pipelines, distributed stores) implement this trait
//! externally; the in-memory implementation here backs the built-in
//! handlers and tests.

use crate::core::error::Result;
use crate::key::KeyValue;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// A store of Key/Value pairs iterated in unsigned lexicographic key order
pub trait SortedBackend: Send + Sync {
    /// Write a batch of records; an existing key is overwritten
    fn put(&self, pairs: &[KeyValue]) -> Result<()>;

    /// All records in key order
    fn scan_all(&self) -> Result<Vec<KeyValue>>;

    /// All records whose key starts with `prefix`, in key order
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KeyValue>>;

    /// Number of stored records
    fn len(&self) -> usize;

    /// Whether the backend holds no records
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory sorted backend over a `BTreeMap`
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }
}

impl SortedBackend for MemoryBackend {
    fn put(&self, pairs: &[KeyValue]) -> Result<()> {
        let mut records = self.records.write();
        for pair in pairs {
            records.insert(pair.key.clone(), pair.value.clone());
        }
        Ok(())
    }

    fn scan_all(&self) -> Result<Vec<KeyValue>> {
        let records = self.records.read();
        Ok(records
            .iter()
            .map(|(key, value)| KeyValue {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KeyValue>> {
        let records = self.records.read();
        Ok(records
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| KeyValue {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.records.read().len()
    }
}
