//! Persisted cache entry.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::geo::FeatureCollection;

/// Bookkeeping stored next to a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// When the entry was written.
    pub stored_at: Timestamp,
    /// Schema version of the payload; must match the domain's current version.
    pub schema_version: String,
    /// Serialized size of the payload before optimization.
    pub size_bytes: u64,
    /// Reserved. Payloads are stored uncompressed.
    #[serde(default)]
    pub compressed: bool,
}

/// One record per domain key.
///
/// Entries are replaced as a whole; there is no partial update. `metadata`
/// is `None` when only a bare payload could be recovered (legacy flat
/// store blobs), which makes the entry unusable as a fresh read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub payload: FeatureCollection,
    #[serde(default)]
    pub metadata: Option<EntryMetadata>,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, payload: FeatureCollection, metadata: EntryMetadata) -> Self {
        Self {
            key: key.into(),
            payload,
            metadata: Some(metadata),
        }
    }

    /// An entry recovered without metadata.
    pub fn payload_only(key: impl Into<String>, payload: FeatureCollection) -> Self {
        Self {
            key: key.into(),
            payload,
            metadata: None,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, super::StoreError> {
        serde_json::to_vec(self).map_err(|e| super::StoreError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, super::StoreError> {
        serde_json::from_slice(bytes).map_err(|e| super::StoreError::Serialization(e.to_string()))
    }
}
