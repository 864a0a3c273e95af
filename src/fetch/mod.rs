//! HTTP content fetching with anti-bot response detection.
//!
//! This module provides the [`Fetcher`] trait and its production
//! implementation [`HttpFetcher`]. A fetch never fails with an error:
//! every attempt resolves to a [`FetchOutcome`] that the orchestrator
//! inspects to decide whether to advance to the next candidate URL.
//! Retrying belongs to the caller's URL fallback list, not to this layer.
//!
//! # Example
//!
//! ```no_run
//! use docfetch::fetch::{Fetcher, FetchOutcome, HttpFetcher};
//!
//! # async fn example() {
//! let fetcher = HttpFetcher::new();
//! match fetcher.fetch("https://example.com/doc.pdf").await {
//!     FetchOutcome::Success { bytes, .. } => println!("got {} bytes", bytes.len()),
//!     other => println!("fetch failed: {other}"),
//! }
//! # }
//! ```

mod client;
mod headers;

pub use client::HttpFetcher;
pub use headers::BROWSER_USER_AGENT;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

/// Default pause before each HTTP request, keeping the request rate inside
/// the source site's tolerance. Rate-limiting policy, not correctness.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Upper bound for one fetch attempt.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of one URL fetch attempt.
///
/// Only [`Success`](FetchOutcome::Success) carries bytes; every other
/// variant is a recoverable classification of why the response was not
/// the requested document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response body, with the lowercase content-type header value
    /// (possibly empty).
    Success {
        /// Raw payload bytes.
        bytes: Vec<u8>,
        /// Lowercase content-type header value.
        content_type: String,
    },
    /// Redirected to the site's anti-scraping page.
    Blocked {
        /// The final resolved URL carrying the block signature.
        final_url: String,
    },
    /// The server returned an HTML error/login page instead of the file.
    WrongContentType {
        /// The offending content-type header value.
        content_type: String,
    },
    /// Network-level failure: timeout, connection error, DNS failure, or
    /// a non-success HTTP status.
    NetworkError {
        /// Human-readable failure description.
        reason: String,
    },
}

impl FetchOutcome {
    /// Returns true for a successful fetch.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Consumes the outcome, yielding the payload on success.
    #[must_use]
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Success { bytes, .. } => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { bytes, .. } => write!(f, "success ({} bytes)", bytes.len()),
            Self::Blocked { final_url } => write!(f, "blocked by abuse detection: {final_url}"),
            Self::WrongContentType { content_type } => {
                write!(f, "got HTML instead of document: {content_type}")
            }
            Self::NetworkError { reason } => write!(f, "network error: {reason}"),
        }
    }
}

/// Capability of fetching a URL's raw content.
///
/// Object safe so the orchestrator can hold a `Box<dyn Fetcher>` and tests
/// can substitute stub implementations.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches one URL, classifying the response. Never panics and never
    /// returns an error; failures are [`FetchOutcome`] variants.
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Configuration for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Pause awaited before every request. Zero disables the pause
    /// (useful in tests).
    pub request_delay: Duration,
    /// Per-attempt request timeout.
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_delay: DEFAULT_REQUEST_DELAY,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl FetcherConfig {
    /// Creates a config with the given inter-request delay and the default
    /// timeout.
    #[must_use]
    pub fn with_request_delay(request_delay: Duration) -> Self {
        Self {
            request_delay,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_success_accessors() {
        let outcome = FetchOutcome::Success {
            bytes: vec![1, 2, 3],
            content_type: "application/pdf".to_string(),
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.to_string(), "success (3 bytes)");
        assert_eq!(outcome.into_bytes(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_non_success_outcomes_carry_no_bytes() {
        let outcomes = [
            FetchOutcome::Blocked {
                final_url: "https://site.test/apology".to_string(),
            },
            FetchOutcome::WrongContentType {
                content_type: "text/html".to_string(),
            },
            FetchOutcome::NetworkError {
                reason: "timeout".to_string(),
            },
        ];
        for outcome in outcomes {
            assert!(!outcome.is_success());
            assert_eq!(outcome.into_bytes(), None);
        }
    }

    #[test]
    fn test_default_config_values() {
        let config = FetcherConfig::default();
        assert_eq!(config.request_delay, Duration::from_millis(500));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_with_request_delay_overrides_only_delay() {
        let config = FetcherConfig::with_request_delay(Duration::ZERO);
        assert!(config.request_delay.is_zero());
        assert_eq!(config.timeout, REQUEST_TIMEOUT);
    }
}
