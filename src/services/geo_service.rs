//! Geo data service for domain fetches and cache administration.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::config::{DomainConfig, DomainSettings, Settings};
use crate::domains::{CacheAdmin, CacheInfo, Domain, DomainFetcher};
use crate::error::AppResult;
use crate::external::{HttpTransport, Transport};
use crate::geo::{CollectionStats, FeatureCollection};
use crate::store::{StoreClient, WriteOutcome};

#[derive(Clone)]
pub struct GeoDataService {
    domains: DomainSettings,
    store: StoreClient,
    fetcher: DomainFetcher,
    admin: CacheAdmin,
}

impl GeoDataService {
    /// Build the service from validated settings. No I/O happens here.
    pub fn new(settings: &Settings) -> AppResult<Self> {
        let transport = Arc::new(HttpTransport::new(&settings.http)?);
        let store = StoreClient::from_config(&settings.storage, settings.domains.store_names());

        Ok(Self::with_parts(
            settings.domains.clone(),
            store,
            transport,
            settings.http.base_url.clone(),
            settings.http.timeout(),
        ))
    }

    pub fn with_parts(
        domains: DomainSettings,
        store: StoreClient,
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let fetcher = DomainFetcher::new(store.clone(), transport, base_url, timeout);
        let admin = CacheAdmin::new(store.clone());
        Self {
            domains,
            store,
            fetcher,
            admin,
        }
    }

    /// Open the store ahead of the first fetch.
    ///
    /// An unavailable primary store is logged by the client and otherwise
    /// ignored; operations then go to the fallback store.
    pub async fn init(&self) {
        if self.store.init().await.is_ok() {
            tracing::debug!(backend = self.store.primary_backend(), "Store ready");
        }
    }

    pub fn config(&self, domain: Domain) -> &DomainConfig {
        self.domains.get(domain)
    }

    pub fn primary_backend(&self) -> &'static str {
        self.store.primary_backend()
    }

    pub async fn fetch(&self, domain: Domain) -> AppResult<FeatureCollection> {
        self.fetcher.fetch(self.config(domain)).await
    }

    pub async fn fetch_with_cancel(
        &self,
        domain: Domain,
        cancel: &CancellationToken,
    ) -> AppResult<FeatureCollection> {
        self.fetcher
            .fetch_with_cancel(self.config(domain), cancel)
            .await
    }

    /// Fetch every domain concurrently. Results are independent per domain.
    pub async fn fetch_all(&self) -> Vec<(Domain, AppResult<FeatureCollection>)> {
        let fetches = Domain::ALL.into_iter().map(|domain| async move {
            (domain, self.fetch(domain).await)
        });
        join_all(fetches).await
    }

    pub async fn cache_info(&self, domain: Domain) -> CacheInfo {
        self.admin.cache_info(self.config(domain)).await
    }

    pub async fn purge(&self, domain: Domain) -> WriteOutcome {
        self.admin.purge(self.config(domain)).await
    }

    pub async fn purge_all(&self) -> Vec<(Domain, WriteOutcome)> {
        let mut outcomes = Vec::with_capacity(Domain::ALL.len());
        for domain in Domain::ALL {
            outcomes.push((domain, self.purge(domain).await));
        }
        outcomes
    }

    /// Resolve the domain's collection and summarize it.
    pub async fn stats(&self, domain: Domain) -> AppResult<CollectionStats> {
        let collection = self.fetch(domain).await?;
        Ok(CollectionStats::compute(
            &collection,
            self.config(domain).area_property.as_deref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::external::RawResponse;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers per endpoint; `/suelo` is always down.
    struct RoutingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for RoutingTransport {
        async fn get(&self, url: &str) -> AppResult<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let body = if url.ends_with("/potreros") {
                r#"{"type":"FeatureCollection","features":[
                    {"type":"Feature","geometry":null,"properties":{"id":1,"super_ha":10.5}},
                    {"type":"Feature","geometry":null,"properties":{"id":2,"super_ha":"4.5"}},
                    {"type":"Feature","geometry":null,"properties":{"id":3,"super_ha":null}}
                ]}"#
            } else if url.ends_with("/suelo") {
                return Err(AppError::Network {
                    url: url.to_string(),
                    source: anyhow::anyhow!("unreachable"),
                });
            } else {
                r#"{"type":"FeatureCollection","features":[]}"#
            };
            Ok(RawResponse::new(200, body))
        }
    }

    fn service() -> (GeoDataService, Arc<RoutingTransport>) {
        let domains = DomainSettings::default();
        let store = StoreClient::new(Arc::new(MemoryStore::new(domains.store_names())), None);
        let transport = Arc::new(RoutingTransport {
            calls: AtomicUsize::new(0),
        });
        let service = GeoDataService::with_parts(
            domains,
            store,
            transport.clone(),
            "https://palma.example.test",
            Duration::from_secs(1),
        );
        (service, transport)
    }

    #[tokio::test]
    async fn test_fetch_all_results_are_independent() {
        let (service, transport) = service();
        service.init().await;

        let results = service.fetch_all().await;

        assert_eq!(results.len(), 4);
        for (domain, result) in &results {
            match domain {
                Domain::Suelo => assert!(result.is_err()),
                _ => assert!(result.is_ok(), "{} should load", domain),
            }
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_stats_sums_area_property() {
        let (service, _) = service();

        let stats = service.stats(Domain::Potreros).await.unwrap();
        assert_eq!(stats.feature_count, 3);
        assert_eq!(stats.total_area_ha, Some(15.0));

        let stats = service.stats(Domain::Perimetro).await.unwrap();
        assert_eq!(stats.feature_count, 0);
        assert_eq!(stats.total_area_ha, None);
    }

    #[tokio::test]
    async fn test_info_and_purge_all() {
        let (service, transport) = service();
        service.fetch(Domain::Bosques).await.unwrap();
        assert!(service.cache_info(Domain::Bosques).await.has_cache);

        let outcomes = service.purge_all().await;
        assert!(outcomes.iter().all(|(_, outcome)| *outcome == WriteOutcome::Primary));
        assert!(!service.cache_info(Domain::Bosques).await.has_cache);

        service.fetch(Domain::Bosques).await.unwrap();
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_new_from_default_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.storage.directory = dir.path().join("db").to_string_lossy().into_owned();
        settings.storage.fallback_directory =
            dir.path().join("flat").to_string_lossy().into_owned();

        let service = GeoDataService::new(&settings).unwrap();
        assert_eq!(service.primary_backend(), "disk");
        assert_eq!(service.config(Domain::Suelo).precision, 5);
    }
}
