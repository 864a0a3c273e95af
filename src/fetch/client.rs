//! Production [`Fetcher`] backed by a pooled reqwest client.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use tracing::{debug, instrument, warn};

use super::headers::{BROWSER_USER_AGENT, browser_headers};
use super::{FetchOutcome, Fetcher, FetcherConfig};

/// URL substrings marking the source site's anti-scraping redirect.
const BLOCK_SIGNATURES: [&str; 2] = ["abuse-detection", "apology"];

/// HTTP fetcher for document downloads.
///
/// Designed to be created once and reused across requests, taking
/// advantage of connection pooling. Every request carries the browser
/// header set and is preceded by the configured rate-limit pause.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetcherConfig,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Creates a fetcher with the default delay and timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FetcherConfig::default())
    }

    /// Creates a fetcher with explicit delay/timeout configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_config(config: FetcherConfig) -> Self {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(browser_headers())
            .timeout(config.timeout)
            .redirect(Policy::limited(10))
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client, config }
    }

    /// Classifies a reqwest error into a network failure reason.
    fn network_reason(error: &reqwest::Error) -> String {
        if error.is_timeout() {
            "request timed out".to_string()
        } else if error.is_connect() {
            format!("connection failed: {error}")
        } else {
            error.to_string()
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch(&self, url: &str) -> FetchOutcome {
        if !self.config.request_delay.is_zero() {
            tokio::time::sleep(self.config.request_delay).await;
        }

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(error) => {
                return FetchOutcome::NetworkError {
                    reason: Self::network_reason(&error),
                };
            }
        };

        // The site signals blocking by redirecting, not by status code, so
        // the final resolved URL is inspected before anything else.
        let final_url = response.url().to_string();
        if BLOCK_SIGNATURES.iter().any(|sig| final_url.contains(sig)) {
            warn!(final_url = %final_url, "blocked by abuse detection");
            return FetchOutcome::Blocked { final_url };
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        // An HTML body for a URL that doesn't look like a document request
        // means an error or login page was served in place of the file.
        if content_type.contains("text/html") && !url.to_ascii_lowercase().contains("pdf") {
            warn!(content_type = %content_type, "got HTML instead of document");
            return FetchOutcome::WrongContentType { content_type };
        }

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::NetworkError {
                reason: format!("HTTP {status}"),
            };
        }

        match response.bytes().await {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), content_type = %content_type, "fetch succeeded");
                FetchOutcome::Success {
                    bytes: bytes.to_vec(),
                    content_type,
                }
            }
            Err(error) => FetchOutcome::NetworkError {
                reason: Self::network_reason(&error),
            },
        }
    }
}
