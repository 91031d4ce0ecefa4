//! Cache-first fetch of one domain's feature collection.
//!
//! A fetch serves a fresh entry straight from the store. Otherwise it asks
//! the API, optimizes the answer and stores it. When the API cannot deliver,
//! any cached entry (fresh or stale) is returned instead; the error only
//! surfaces when nothing is cached at all.

use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use tokio_util::sync::CancellationToken;

use crate::config::DomainConfig;
use crate::error::{AppError, AppResult};
use crate::external::Transport;
use crate::geo::{FeatureCollection, optimize_with_report};
use crate::store::{CacheEntry, EntryMetadata, StoreClient, WriteOutcome, policy};

/// Generic fetcher shared by every domain.
#[derive(Clone)]
pub struct DomainFetcher {
    store: StoreClient,
    transport: Arc<dyn Transport>,
    base_url: String,
    timeout: Duration,
}

impl DomainFetcher {
    pub fn new(
        store: StoreClient,
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            transport,
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Resolve the collection described by `config`.
    pub async fn fetch(&self, config: &DomainConfig) -> AppResult<FeatureCollection> {
        self.fetch_with_cancel(config, &CancellationToken::new())
            .await
    }

    /// Like [`fetch`](Self::fetch), with a token that aborts the network step.
    ///
    /// Cancellation is treated like a timeout: the cached entry is served if
    /// there is one.
    #[tracing::instrument(name = "fetch", skip_all, fields(domain = %config.store_name))]
    pub async fn fetch_with_cancel(
        &self,
        config: &DomainConfig,
        cancel: &CancellationToken,
    ) -> AppResult<FeatureCollection> {
        let cached = match self.store.get(&config.store_name, &config.cache_key).await {
            Some(entry) if Self::is_fresh(&entry, config) => {
                tracing::debug!(features = entry.payload.len(), "Serving cached collection");
                return Ok(entry.payload);
            }
            other => other,
        };

        let error = match self.refresh(config, cancel).await {
            Ok(collection) => return Ok(collection),
            Err(error) => error,
        };

        match cached {
            Some(entry) if error.is_transient() => {
                tracing::warn!(
                    error = %error,
                    features = entry.payload.len(),
                    "Refresh failed, serving stale collection"
                );
                Ok(entry.payload)
            }
            _ => {
                tracing::error!(error = %error, "Refresh failed and nothing is cached");
                Err(error)
            }
        }
    }

    fn is_fresh(entry: &CacheEntry, config: &DomainConfig) -> bool {
        policy::is_valid(
            entry.metadata.as_ref(),
            &config.schema_version,
            config.ttl(),
            Timestamp::now(),
        )
    }

    fn url_for(&self, config: &DomainConfig) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            config.endpoint_path
        )
    }

    async fn refresh(
        &self,
        config: &DomainConfig,
        cancel: &CancellationToken,
    ) -> AppResult<FeatureCollection> {
        let url = self.url_for(config);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(AppError::Cancelled { url: url.clone() });
            }
            result = tokio::time::timeout(self.timeout, self.transport.get(&url)) => match result {
                Ok(response) => response?,
                Err(_) => {
                    return Err(AppError::Timeout {
                        url: url.clone(),
                        timeout_secs: self.timeout.as_secs(),
                    });
                }
            },
        };

        if !response.is_success() {
            return Err(AppError::HttpStatus {
                url,
                status: response.status,
            });
        }

        let raw = FeatureCollection::from_slice(&response.body)?;
        let (optimized, report) = optimize_with_report(&raw, &config.profile());
        tracing::info!(
            features = optimized.len(),
            original_bytes = report.original_bytes,
            optimized_bytes = report.optimized_bytes,
            reduction_percent = format!("{:.1}", report.reduction_percent),
            "Refreshed collection from network"
        );

        let entry = CacheEntry::new(
            config.cache_key.clone(),
            optimized,
            EntryMetadata {
                stored_at: Timestamp::now(),
                schema_version: config.schema_version.clone(),
                size_bytes: report.original_bytes as u64,
                compressed: false,
            },
        );

        match self.store.put(&config.store_name, &entry).await {
            WriteOutcome::Primary => {}
            WriteOutcome::Fallback => tracing::warn!("Collection cached in fallback store"),
            WriteOutcome::Dropped => tracing::warn!("Collection could not be cached"),
        }

        Ok(entry.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::RawResponse;
    use crate::store::testing::FailingStore;
    use crate::store::{MemoryStore, NoOpStore};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const POLYGON_BODY: &str = r##"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[9.1234567, -68.3456789], [9.2, -68.3], [9.1234567, -68.3456789]]]
            },
            "properties": {"id": 1, "nombre": "Potrero 1", "super_ha": 12.5, "color": "#00ff00"}
        }]
    }"##;

    enum Reply {
        Ok(u16, &'static str),
        Fail,
        Hang,
    }

    struct FakeTransport {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl FakeTransport {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, url: &str) -> AppResult<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Ok(status, body) => Ok(RawResponse::new(status, body)),
                Reply::Fail => Err(AppError::Network {
                    url: url.to_string(),
                    source: anyhow::anyhow!("connection reset"),
                }),
                Reply::Hang => std::future::pending().await,
            }
        }
    }

    fn memory_client() -> StoreClient {
        let partitions = vec!["potreros".to_string(), "suelo".to_string()];
        StoreClient::new(Arc::new(MemoryStore::new(partitions)), None)
    }

    fn fetcher(store: StoreClient, transport: Arc<FakeTransport>) -> DomainFetcher {
        DomainFetcher::new(
            store,
            transport,
            "https://palma.example.test/",
            Duration::from_millis(100),
        )
    }

    fn entry_stored_at(config: &DomainConfig, stored_at: Timestamp, version: &str) -> CacheEntry {
        let payload = FeatureCollection::from_slice(POLYGON_BODY.as_bytes()).unwrap();
        CacheEntry::new(
            config.cache_key.clone(),
            payload,
            EntryMetadata {
                stored_at,
                schema_version: version.to_string(),
                size_bytes: 100,
                compressed: false,
            },
        )
    }

    fn hours_ago(hours: i64) -> Timestamp {
        Timestamp::from_millisecond(Timestamp::now().as_millisecond() - hours * 60 * 60 * 1000)
            .unwrap()
    }

    #[tokio::test]
    async fn test_refresh_optimizes_and_persists() {
        let store = memory_client();
        let transport = FakeTransport::new(Reply::Ok(200, POLYGON_BODY));
        let config = DomainConfig::potreros();

        let collection = fetcher(store.clone(), transport.clone())
            .fetch(&config)
            .await
            .unwrap();

        let feature = &collection.features[0];
        assert_eq!(
            serde_json::to_value(&feature.properties).unwrap(),
            json!({"id": 1, "nombre": "Potrero 1", "super_ha": 12.5})
        );
        let coordinates = serde_json::to_value(&feature.geometry).unwrap()["coordinates"][0][0].clone();
        assert_eq!(coordinates, json!([9.123457, -68.345679]));

        let stored = store.get("potreros", "potreros_data_v1").await.unwrap();
        assert_eq!(stored.payload, collection);
        let metadata = stored.metadata.unwrap();
        assert_eq!(metadata.schema_version, "1.0");
        let unoptimized = FeatureCollection::from_slice(POLYGON_BODY.as_bytes()).unwrap();
        assert_eq!(metadata.size_bytes, unoptimized.serialized_size() as u64);
        assert!(metadata.size_bytes > serde_json::to_vec(&stored.payload).unwrap().len() as u64);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_second_fetch_hits_store() {
        let store = memory_client();
        let transport = FakeTransport::new(Reply::Ok(200, POLYGON_BODY));
        let fetcher = fetcher(store, transport.clone());
        let config = DomainConfig::potreros();

        let first = fetcher.fetch(&config).await.unwrap();
        let second = fetcher.fetch(&config).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_served_on_network_failure() {
        let store = memory_client();
        let config = DomainConfig::potreros();
        let stale = entry_stored_at(&config, hours_ago(25), "1.0");
        store.put("potreros", &stale).await;

        let transport = FakeTransport::new(Reply::Fail);
        let collection = fetcher(store, transport.clone())
            .fetch(&config)
            .await
            .unwrap();

        assert_eq!(collection, stale.payload);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_version_mismatch_refreshes_then_falls_back() {
        let store = memory_client();
        let config = DomainConfig::potreros();
        let old = entry_stored_at(&config, Timestamp::now(), "0.9");
        store.put("potreros", &old).await;

        let transport = FakeTransport::new(Reply::Ok(500, "oops"));
        let collection = fetcher(store, transport.clone())
            .fetch(&config)
            .await
            .unwrap();

        assert_eq!(collection, old.payload);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_total_failure_propagates() {
        let transport = FakeTransport::new(Reply::Fail);
        let err = fetcher(memory_client(), transport)
            .fetch(&DomainConfig::potreros())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Network { .. }));
    }

    #[tokio::test]
    async fn test_http_status_without_cache() {
        let transport = FakeTransport::new(Reply::Ok(404, "not found"));
        let err = fetcher(memory_client(), transport)
            .fetch(&DomainConfig::suelo())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::HttpStatus { url, status: 404 } if url == "https://palma.example.test/suelo"
        ));
    }

    #[tokio::test]
    async fn test_missing_features_is_schema_error() {
        let transport = FakeTransport::new(Reply::Ok(200, r#"{"type":"FeatureCollection"}"#));
        let store = memory_client();
        let err = fetcher(store.clone(), transport)
            .fetch(&DomainConfig::potreros())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::SchemaValidation { .. }));
        assert!(store.get("potreros", "potreros_data_v1").await.is_none());
    }

    #[tokio::test]
    async fn test_timeout_aborts_request() {
        let transport = FakeTransport::new(Reply::Hang);
        let started = std::time::Instant::now();

        let err = fetcher(memory_client(), transport)
            .fetch(&DomainConfig::potreros())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_timeout_falls_back_to_stale_entry() {
        let store = memory_client();
        let config = DomainConfig::potreros();
        let stale = entry_stored_at(&config, hours_ago(48), "1.0");
        store.put("potreros", &stale).await;

        let collection = fetcher(store, FakeTransport::new(Reply::Hang))
            .fetch(&config)
            .await
            .unwrap();
        assert_eq!(collection, stale.payload);
    }

    #[tokio::test]
    async fn test_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let transport = FakeTransport::new(Reply::Hang);

        let err = fetcher(memory_client(), transport)
            .fetch_with_cancel(&DomainConfig::potreros(), &token)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_storage_failure_still_returns_fresh_data() {
        let store = StoreClient::new(Arc::new(FailingStore), Some(Arc::new(FailingStore)));
        let transport = FakeTransport::new(Reply::Ok(200, POLYGON_BODY));

        let collection = fetcher(store, transport)
            .fetch(&DomainConfig::potreros())
            .await
            .unwrap();
        assert_eq!(collection.len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_storage_always_hits_network() {
        let store = StoreClient::new(Arc::new(NoOpStore::new()), None);
        let transport = FakeTransport::new(Reply::Ok(200, POLYGON_BODY));
        let fetcher = fetcher(store, transport.clone());

        fetcher.fetch(&DomainConfig::potreros()).await.unwrap();
        fetcher.fetch(&DomainConfig::potreros()).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_retain_all_keeps_every_property() {
        let body = r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"Point","coordinates":[-68.1234567,9.7654321]},"properties":{"ph":6.2,"textura":"franco","muestra":"S-01"}}]}"#;
        let transport = FakeTransport::new(Reply::Ok(200, body));

        let collection = fetcher(memory_client(), transport)
            .fetch(&DomainConfig::suelo())
            .await
            .unwrap();

        let feature = &collection.features[0];
        assert_eq!(feature.properties.len(), 3);
        assert_eq!(
            serde_json::to_value(&feature.geometry).unwrap()["coordinates"],
            json!([-68.12346, 9.76543])
        );
    }
}
