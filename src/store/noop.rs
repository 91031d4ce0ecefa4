//! NoOp store implementation.
//!
//! Used when storage is disabled. Nothing is ever stored, so every fetch
//! goes to the network.

use async_trait::async_trait;

use crate::store::{CacheEntry, EntryStore, StoreError};

/// A store that doesn't keep anything.
///
/// Used when `storage.enabled = false` in configuration.
pub struct NoOpStore;

impl NoOpStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryStore for NoOpStore {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn get(&self, _partition: &str, _key: &str) -> Result<Option<CacheEntry>, StoreError> {
        Ok(None)
    }

    async fn put(&self, _partition: &str, _entry: &CacheEntry) -> Result<(), StoreError> {
        Ok(())
    }

    async fn delete(&self, _partition: &str, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}
