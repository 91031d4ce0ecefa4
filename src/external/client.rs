use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL, HeaderMap, HeaderValue};

use crate::config::HttpConfig;
use crate::error::{AppError, AppResult};
use crate::external::transport::{RawResponse, Transport};

/// reqwest-backed transport used against the live API.
///
/// One client per transport, so connections are pooled across domains.
///
/// # Features
/// - **Headers**: `Accept: application/json` and `Cache-Control: no-cache` on every request
/// - **Compression**: gzip, deflate, brotli and zstd
/// - **Timeouts**: request and connect timeouts from `[http]`
/// - **Security**: Rustls for TLS (no OpenSSL dependency)
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(format!("geoportal-cache/{}", crate::pkg_version()))
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .pool_max_idle_per_host(4)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .zstd(true)
            .build()
            .map_err(|e| AppError::Configuration {
                key: "http".to_string(),
                source: e.into(),
            })?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_seconds,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> AppResult<RawResponse> {
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                AppError::Timeout {
                    url: url.to_string(),
                    timeout_secs: self.timeout_secs,
                }
            } else {
                AppError::Network {
                    url: url.to_string(),
                    source: e.into(),
                }
            }
        };

        let response = self.client.get(url).send().await.map_err(map_err)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_err)?;

        tracing::debug!(url, status, bytes = body.len(), "Received API response");
        Ok(RawResponse::new(status, body.to_vec()))
    }
}
