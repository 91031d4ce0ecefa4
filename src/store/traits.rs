//! EntryStore trait definition.

use async_trait::async_trait;

use crate::store::{CacheEntry, StoreError};

/// Trait for partitioned entry storage.
///
/// Every backend keys entries by `(partition, key)`. Backends without real
/// partitions simply ignore the partition name.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Open the backend. Must be idempotent.
    async fn open(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Get the entry stored under `key`.
    async fn get(&self, partition: &str, key: &str) -> Result<Option<CacheEntry>, StoreError>;

    /// Replace the entry stored under `entry.key`.
    async fn put(&self, partition: &str, entry: &CacheEntry) -> Result<(), StoreError>;

    /// Delete the entry stored under `key`. Deleting a missing key succeeds.
    async fn delete(&self, partition: &str, key: &str) -> Result<(), StoreError>;
}
