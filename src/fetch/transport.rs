//! HTTP transport used for every page fetch
//!
//! The resolvers only see the [`Transport`] trait; [`HttpTransport`] is the
//! reqwest-backed implementation used in production.

use crate::config::FetchConfig;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-query transport options
///
/// These travel with the execution state of a single query and are applied to
/// every request that query makes, including the root fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetchOptions {
    /// Extra request headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Request timeout overriding the client default (seconds)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl FetchOptions {
    /// Adds a request header, replacing any previous value
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs().max(1));
        self
    }
}

/// Something that can GET a URL and hand back the body as text
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url`, failing on network errors and non-2xx statuses
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, FetchError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport whose client follows the `[fetch]` configuration
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = build_http_client(config).map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, FetchError> {
        tracing::debug!("GET {}", url);

        let mut request = self.client.get(url);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(secs) = options.timeout_secs {
            request = request.timeout(Duration::from_secs(secs));
        }

        let response = request.send().await.map_err(|source| {
            if source.is_timeout() {
                tracing::warn!("Request timeout for {}", url);
            } else if source.is_connect() {
                tracing::warn!("Connection failed for {}", url);
            } else {
                tracing::warn!("Request to {} failed: {}", url, source);
            }
            FetchError::Request {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned HTTP {}", url, status.as_u16());
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The `[fetch]` section of the configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let redirect = if config.max_redirects == 0 {
        Policy::none()
    } else {
        Policy::limited(config.max_redirects)
    };

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}
