//! In-process store using `cached::UnboundCache`.
//!
//! Entries never expire on their own; freshness is decided by the policy,
//! and stale entries must stay available as fallbacks.

use std::sync::Mutex;

use async_trait::async_trait;
use cached::{Cached, UnboundCache};

use crate::store::{CacheEntry, EntryStore, StoreError};

/// Memory-backed store with the same partition rules as the disk store.
pub struct MemoryStore {
    partition_names: Vec<String>,
    store: Mutex<UnboundCache<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new(partition_names: Vec<String>) -> Self {
        Self {
            partition_names,
            store: Mutex::new(UnboundCache::new()),
        }
    }

    fn slot(&self, partition: &str, key: &str) -> Result<String, StoreError> {
        if !self.partition_names.iter().any(|name| name == partition) {
            return Err(StoreError::PartitionMissing(partition.to_string()));
        }
        Ok(format!("{}:{}", partition, key))
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, partition: &str, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let slot = self.slot(partition, key)?;
        let mut store = self
            .store
            .lock()
            .map_err(|e| StoreError::Operation(e.to_string()))?;
        Ok(store.cache_get(&slot).cloned())
    }

    async fn put(&self, partition: &str, entry: &CacheEntry) -> Result<(), StoreError> {
        let slot = self.slot(partition, &entry.key)?;
        let mut store = self
            .store
            .lock()
            .map_err(|e| StoreError::Operation(e.to_string()))?;
        store.cache_set(slot, entry.clone());
        Ok(())
    }

    async fn delete(&self, partition: &str, key: &str) -> Result<(), StoreError> {
        let slot = self.slot(partition, key)?;
        let mut store = self
            .store
            .lock()
            .map_err(|e| StoreError::Operation(e.to_string()))?;
        store.cache_remove(&slot);
        Ok(())
    }
}
