//! Store client combining the two storage tiers.
//!
//! The client is the single place deciding between the partitioned primary
//! store and the flat fallback store. Every operation tries the primary
//! first; on failure it retries against the fallback under the same key, and
//! when that fails too the operation is dropped and logged. Callers never see
//! storage errors from reads, writes or deletes.

use std::sync::Arc;

use crate::config::settings::{StorageBackend, StorageConfig};
use crate::store::disk::DiskStore;
use crate::store::flat_file::FlatFileStore;
use crate::store::memory::MemoryStore;
use crate::store::noop::NoOpStore;
use crate::store::{CacheEntry, EntryStore, StoreError};

/// Where a write or delete ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Primary,
    Fallback,
    Dropped,
}

/// Store client shared by every domain fetcher.
#[derive(Clone)]
pub struct StoreClient {
    primary: Arc<dyn EntryStore>,
    fallback: Option<Arc<dyn EntryStore>>,
}

impl StoreClient {
    /// Build the client described by `config`.
    ///
    /// No I/O happens here; backends open lazily or through [`init`](Self::init).
    /// If storage is disabled, a NoOpStore without fallback is used.
    pub fn from_config(config: &StorageConfig, partitions: Vec<String>) -> Self {
        if !config.enabled {
            return Self::new(Arc::new(NoOpStore::new()), None);
        }

        let primary: Arc<dyn EntryStore> = match config.backend {
            StorageBackend::Disk => Arc::new(DiskStore::new(&config.directory, partitions)),
            StorageBackend::Memory => Arc::new(MemoryStore::new(partitions)),
        };
        let fallback: Arc<dyn EntryStore> =
            Arc::new(FlatFileStore::new(&config.fallback_directory));

        Self::new(primary, Some(fallback))
    }

    pub fn new(primary: Arc<dyn EntryStore>, fallback: Option<Arc<dyn EntryStore>>) -> Self {
        Self { primary, fallback }
    }

    /// Open the primary store ahead of the first operation.
    ///
    /// Failure is not fatal: operations will use the fallback tier.
    pub async fn init(&self) -> Result<(), StoreError> {
        self.primary.open().await.inspect_err(|e| {
            tracing::warn!(
                backend = self.primary.name(),
                error = %e,
                "Primary store unavailable, fallback store will be used"
            );
        })
    }

    /// Read an entry, falling back to the flat store on primary failure.
    pub async fn get(&self, partition: &str, key: &str) -> Option<CacheEntry> {
        let error = match self.primary.get(partition, key).await {
            Ok(entry) => return entry,
            Err(e) => e,
        };
        tracing::warn!(
            backend = self.primary.name(),
            partition,
            key,
            error = %error,
            "Primary store read failed"
        );

        let fallback = self.fallback.as_ref()?;
        match fallback.get(partition, key).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(backend = fallback.name(), key, error = %e, "Fallback store read failed");
                None
            }
        }
    }

    /// Replace an entry. Best effort: failures never reach the caller.
    pub async fn put(&self, partition: &str, entry: &CacheEntry) -> WriteOutcome {
        let error = match self.primary.put(partition, entry).await {
            Ok(()) => return WriteOutcome::Primary,
            Err(e) => e,
        };
        tracing::warn!(
            backend = self.primary.name(),
            partition,
            key = %entry.key,
            error = %error,
            "Primary store write failed"
        );

        let Some(fallback) = self.fallback.as_ref() else {
            return WriteOutcome::Dropped;
        };
        match fallback.put(partition, entry).await {
            Ok(()) => WriteOutcome::Fallback,
            Err(e) => {
                tracing::warn!(
                    backend = fallback.name(),
                    key = %entry.key,
                    error = %e,
                    "Fallback store write failed, entry not cached"
                );
                WriteOutcome::Dropped
            }
        }
    }

    /// Delete an entry from both tiers. Deleting a missing entry is not an
    /// error.
    ///
    /// A copy left in the fallback store by an earlier primary outage is
    /// removed too.
    pub async fn delete(&self, partition: &str, key: &str) -> WriteOutcome {
        let error = match self.primary.delete(partition, key).await {
            Ok(()) => {
                if let Some(fallback) = self.fallback.as_ref()
                    && let Err(e) = fallback.delete(partition, key).await
                {
                    tracing::warn!(
                        backend = fallback.name(),
                        key,
                        error = %e,
                        "Stale fallback copy could not be deleted"
                    );
                }
                return WriteOutcome::Primary;
            }
            Err(e) => e,
        };
        tracing::warn!(
            backend = self.primary.name(),
            partition,
            key,
            error = %error,
            "Primary store delete failed"
        );

        let Some(fallback) = self.fallback.as_ref() else {
            return WriteOutcome::Dropped;
        };
        match fallback.delete(partition, key).await {
            Ok(()) => WriteOutcome::Fallback,
            Err(e) => {
                tracing::warn!(backend = fallback.name(), key, error = %e, "Fallback store delete failed");
                WriteOutcome::Dropped
            }
        }
    }

    pub fn primary_backend(&self) -> &'static str {
        self.primary.name()
    }
}
