//! Test doubles for storage.

use async_trait::async_trait;

use crate::store::{CacheEntry, EntryStore, StoreError};

/// A store whose every operation fails, as if it could not be opened.
pub struct FailingStore;

#[async_trait]
impl EntryStore for FailingStore {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn open(&self) -> Result<(), StoreError> {
        Err(StoreError::Connection("store is unavailable".to_string()))
    }

    async fn get(&self, _partition: &str, _key: &str) -> Result<Option<CacheEntry>, StoreError> {
        Err(StoreError::NotInitialized)
    }

    async fn put(&self, _partition: &str, _entry: &CacheEntry) -> Result<(), StoreError> {
        Err(StoreError::Operation("quota exceeded".to_string()))
    }

    async fn delete(&self, _partition: &str, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::NotInitialized)
    }
}
