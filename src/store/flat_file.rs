//! Flat fallback store.
//!
//! One JSON file per key in a single directory, with no partitions. It is
//! the second tier used when the partitioned store cannot be opened or
//! written. Blobs written by older clients hold a bare feature collection;
//! those load as entries without metadata.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::geo::FeatureCollection;
use crate::store::{CacheEntry, EntryStore, StoreError};

pub struct FlatFileStore {
    directory: PathBuf,
}

impl FlatFileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::Operation(format!("invalid key '{}'", key)));
        }
        Ok(self.directory.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl EntryStore for FlatFileStore {
    fn name(&self) -> &'static str {
        "flat-file"
    }

    async fn get(&self, _partition: &str, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Operation(e.to_string())),
        };

        if let Ok(entry) = CacheEntry::from_bytes(&bytes) {
            return Ok(Some(entry));
        }

        serde_json::from_slice::<FeatureCollection>(&bytes)
            .map(|payload| Some(CacheEntry::payload_only(key, payload)))
            .map_err(|e| StoreError::Serialization(format!("{}: {}", path.display(), e)))
    }

    async fn put(&self, _partition: &str, entry: &CacheEntry) -> Result<(), StoreError> {
        let path = self.path_for(&entry.key)?;
        let bytes = entry.to_bytes()?;

        fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // Write to a temp file, then rename over the target.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))
    }

    async fn delete(&self, _partition: &str, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Operation(e.to_string())),
        }
    }
}
