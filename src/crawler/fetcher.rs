//! Page fetching
//!
//! The pipeline only needs "URL in, markup out". [`PageFetcher`] is that
//! seam; [`HttpFetcher`] is the production implementation on top of
//! `reqwest`. There is no retry logic here: a failed fetch is reported once
//! and the caller skips the page.

use crate::config::FetcherConfig;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Transport failure for a single URL
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status_code} for {url}")]
    Status { url: String, status_code: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Fetch task for {url} did not complete: {message}")]
    Aborted { url: String, message: String },
}

impl FetchError {
    fn from_reqwest(url: &Url, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            FetchError::Timeout { url }
        } else if error.is_connect() {
            FetchError::Connect {
                url,
                message: error.to_string(),
            }
        } else {
            FetchError::Network {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// Source of page markup
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns its body as text
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Builds an HTTP client from the fetcher configuration
///
/// # Example
///
/// ```no_run
/// use catalog_scout::config::FetcherConfig;
/// use catalog_scout::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }
}
