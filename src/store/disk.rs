//! Partitioned disk store.
//!
//! Each partition is its own `cached` disk store (sled database) inside the
//! storage directory, so opening or creating one partition never touches the
//! data of another. Partitions are opened lazily on first use and the handles
//! are reused afterwards.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use cached::IOCached;
use cached::stores::DiskCache as CachedDiskCache;
use tokio::sync::{Mutex, OnceCell};

use crate::store::{CacheEntry, EntryStore, StoreError};

type Partition = Mutex<CachedDiskCache<String, Vec<u8>>>;

/// Disk-backed store with one database per partition.
pub struct DiskStore {
    directory: PathBuf,
    partition_names: Vec<String>,
    partitions: OnceCell<HashMap<String, Partition>>,
}

impl DiskStore {
    /// Describe a store; nothing is opened until the first operation.
    pub fn new(directory: impl Into<PathBuf>, partition_names: Vec<String>) -> Self {
        Self {
            directory: directory.into(),
            partition_names,
            partitions: OnceCell::new(),
        }
    }

    async fn partitions(&self) -> Result<&HashMap<String, Partition>, StoreError> {
        self.partitions
            .get_or_try_init(|| async { self.open_partitions() })
            .await
    }

    fn open_partitions(&self) -> Result<HashMap<String, Partition>, StoreError> {
        std::fs::create_dir_all(&self.directory).map_err(|e| {
            StoreError::Connection(format!(
                "cannot create storage directory {}: {}",
                self.directory.display(),
                e
            ))
        })?;

        let mut partitions = HashMap::with_capacity(self.partition_names.len());
        for name in &self.partition_names {
            let store = CachedDiskCache::new(name)
                .set_disk_directory(&self.directory)
                .set_sync_to_disk_on_cache_change(true)
                .build()
                .map_err(|e| StoreError::Connection(format!("partition '{}': {}", name, e)))?;
            partitions.insert(name.clone(), Mutex::new(store));
        }

        tracing::debug!(
            directory = %self.directory.display(),
            partitions = partitions.len(),
            "Opened disk store"
        );
        Ok(partitions)
    }

    async fn partition(&self, name: &str) -> Result<&Partition, StoreError> {
        self.partitions()
            .await?
            .get(name)
            .ok_or_else(|| StoreError::PartitionMissing(name.to_string()))
    }
}

#[async_trait]
impl EntryStore for DiskStore {
    fn name(&self) -> &'static str {
        "disk"
    }

    async fn open(&self) -> Result<(), StoreError> {
        self.partitions().await.map(|_| ())
    }

    async fn get(&self, partition: &str, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let store = self.partition(partition).await?.lock().await;
        let bytes = store
            .cache_get(&key.to_string())
            .map_err(|e| StoreError::Operation(e.to_string()))?;

        bytes.map(|bytes| CacheEntry::from_bytes(&bytes)).transpose()
    }

    async fn put(&self, partition: &str, entry: &CacheEntry) -> Result<(), StoreError> {
        let bytes = entry.to_bytes()?;
        let store = self.partition(partition).await?.lock().await;
        store
            .cache_set(entry.key.clone(), bytes)
            .map_err(|e| StoreError::Operation(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, partition: &str, key: &str) -> Result<(), StoreError> {
        let store = self.partition(partition).await?.lock().await;
        store
            .cache_remove(&key.to_string())
            .map_err(|e| StoreError::Operation(e.to_string()))?;
        Ok(())
    }
}
