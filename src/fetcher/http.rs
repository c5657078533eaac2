//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the merger, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests for source bodies
//! - Error classification

use crate::config::FetchConfig;
use crate::fetcher::{check_content, Fetch, FetchResult};
use reqwest::Client;
use std::time::Duration;

/// Connect timeout, capped by the overall request timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use blockmerge::config::FetchConfig;
/// use blockmerge::fetcher::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(CONNECT_TIMEOUT_SECS)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches sources over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from the fetch configuration
    pub fn from_config(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200, plain text | Success |
/// | HTTP 200, `<html>` near the start | ContentRejected |
/// | Any other status | ContentRejected |
/// | Timeout | NetworkError |
/// | Connection refused / TLS error | NetworkError |
/// | Body could not be read | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    tracing::trace!("GET {}", url);

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status_code = response.status().as_u16();
    match response.bytes().await {
        Ok(body) => check_content(status_code, body.to_vec()),
        Err(e) => classify_error(&e),
    }
}

fn classify_error(error: &reqwest::Error) -> FetchResult {
    let error = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    };
    FetchResult::NetworkError { error }
}
