//! Cache inspection and purging.

use jiff::Timestamp;
use serde::Serialize;

use crate::config::DomainConfig;
use crate::store::{StoreClient, WriteOutcome, policy};

/// State of one domain's cache entry.
///
/// Entries without metadata (left by older clients) report `has_cache` and
/// `is_expired` only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheInfo {
    pub has_cache: bool,
    pub is_expired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_minutes: Option<i64>,
    /// Zero once expired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_kb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
}

impl CacheInfo {
    fn empty() -> Self {
        Self {
            has_cache: false,
            is_expired: true,
            stored_at: None,
            age_minutes: None,
            expires_in_minutes: None,
            size_kb: None,
            schema_version: None,
        }
    }
}

#[derive(Clone)]
pub struct CacheAdmin {
    store: StoreClient,
}

impl CacheAdmin {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    pub async fn cache_info(&self, config: &DomainConfig) -> CacheInfo {
        self.cache_info_at(config, Timestamp::now()).await
    }

    /// Inspect the entry as of `now`. Never writes.
    pub async fn cache_info_at(&self, config: &DomainConfig, now: Timestamp) -> CacheInfo {
        let Some(entry) = self.store.get(&config.store_name, &config.cache_key).await else {
            return CacheInfo::empty();
        };
        let Some(metadata) = entry.metadata.as_ref() else {
            return CacheInfo {
                has_cache: true,
                ..CacheInfo::empty()
            };
        };

        let ttl_millis = i64::try_from(config.ttl().as_millis()).unwrap_or(i64::MAX);
        let age_millis = policy::age_millis(metadata, now);
        let is_expired =
            !policy::is_valid(Some(metadata), &config.schema_version, config.ttl(), now);
        let expires_in_minutes = if is_expired {
            0
        } else {
            minutes(ttl_millis.saturating_sub(age_millis))
        };

        CacheInfo {
            has_cache: true,
            is_expired,
            stored_at: Some(metadata.stored_at),
            age_minutes: Some(minutes(age_millis)),
            expires_in_minutes: Some(expires_in_minutes),
            size_kb: Some((metadata.size_bytes as f64 / 1024.0 * 100.0).round() / 100.0),
            schema_version: Some(metadata.schema_version.clone()),
        }
    }

    /// Remove the domain's entry. Missing entries are not an error.
    #[tracing::instrument(name = "purge", skip_all, fields(domain = %config.store_name))]
    pub async fn purge(&self, config: &DomainConfig) -> WriteOutcome {
        let outcome = self.store.delete(&config.store_name, &config.cache_key).await;
        match outcome {
            WriteOutcome::Dropped => tracing::warn!("Cache entry could not be purged"),
            _ => tracing::info!(key = %config.cache_key, "Cache entry purged"),
        }
        outcome
    }
}

fn minutes(millis: i64) -> i64 {
    (millis as f64 / 60_000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::FeatureCollection;
    use crate::store::testing::FailingStore;
    use crate::store::{CacheEntry, EntryMetadata, FlatFileStore, MemoryStore};
    use std::sync::Arc;
    use tempfile::tempdir;

    const NOW_MS: i64 = 1_750_000_000_000;

    fn at(millis: i64) -> Timestamp {
        Timestamp::from_millisecond(millis).unwrap()
    }

    fn client() -> StoreClient {
        StoreClient::new(
            Arc::new(MemoryStore::new(vec!["bosques".to_string()])),
            None,
        )
    }

    fn entry(stored_at: Timestamp, version: &str, size_bytes: u64) -> CacheEntry {
        CacheEntry::new(
            "bosques_data_v1",
            FeatureCollection::new(Vec::new()),
            EntryMetadata {
                stored_at,
                schema_version: version.to_string(),
                size_bytes,
                compressed: false,
            },
        )
    }

    #[tokio::test]
    async fn test_info_without_entry() {
        let info = CacheAdmin::new(client())
            .cache_info(&DomainConfig::bosques())
            .await;
        assert!(!info.has_cache);
        assert!(info.stored_at.is_none());
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            serde_json::json!({"has_cache": false, "is_expired": true})
        );
    }

    #[tokio::test]
    async fn test_info_for_fresh_entry() {
        let store = client();
        store
            .put("bosques", &entry(at(NOW_MS - 90 * 60_000), "1.0", 2048))
            .await;

        let info = CacheAdmin::new(store)
            .cache_info_at(&DomainConfig::bosques(), at(NOW_MS))
            .await;

        assert!(info.has_cache);
        assert!(!info.is_expired);
        assert_eq!(info.age_minutes, Some(90));
        assert_eq!(info.expires_in_minutes, Some(24 * 60 - 90));
        assert_eq!(info.size_kb, Some(2.0));
        assert_eq!(info.schema_version.as_deref(), Some("1.0"));
    }

    #[tokio::test]
    async fn test_info_for_expired_and_mismatched_entries() {
        let store = client();
        let admin = CacheAdmin::new(store.clone());
        let config = DomainConfig::bosques();

        store
            .put("bosques", &entry(at(NOW_MS - 25 * 3_600_000), "1.0", 10))
            .await;
        let info = admin.cache_info_at(&config, at(NOW_MS)).await;
        assert!(info.is_expired);
        assert_eq!(info.expires_in_minutes, Some(0));
        assert_eq!(info.age_minutes, Some(25 * 60));

        store.put("bosques", &entry(at(NOW_MS), "0.9", 10)).await;
        let info = admin.cache_info_at(&config, at(NOW_MS)).await;
        assert!(info.is_expired);
    }

    #[tokio::test]
    async fn test_info_for_legacy_entry() {
        let store = client();
        store
            .put(
                "bosques",
                &CacheEntry::payload_only("bosques_data_v1", FeatureCollection::new(Vec::new())),
            )
            .await;

        let info = CacheAdmin::new(store)
            .cache_info(&DomainConfig::bosques())
            .await;
        assert!(info.has_cache);
        assert!(info.is_expired);
        assert!(info.age_minutes.is_none());
    }

    #[tokio::test]
    async fn test_purge_missing_entry() {
        let admin = CacheAdmin::new(client());
        assert_eq!(
            admin.purge(&DomainConfig::bosques()).await,
            WriteOutcome::Primary
        );
    }

    #[tokio::test]
    async fn test_purge_falls_back_to_flat_store() {
        let dir = tempdir().unwrap();
        let flat = Arc::new(FlatFileStore::new(dir.path()));
        let store = StoreClient::new(Arc::new(FailingStore), Some(flat.clone()));
        store.put("bosques", &entry(at(NOW_MS), "1.0", 10)).await;
        assert!(dir.path().join("bosques_data_v1.json").exists());

        let outcome = CacheAdmin::new(store)
            .purge(&DomainConfig::bosques())
            .await;

        assert_eq!(outcome, WriteOutcome::Fallback);
        assert!(!dir.path().join("bosques_data_v1.json").exists());
    }
}
