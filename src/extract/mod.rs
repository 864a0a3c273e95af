//! Multi-backend PDF text extraction with ordered fallback.
//!
//! Extraction backends are tried in a fixed priority order; a backend's
//! failure or whitespace-only output is non-fatal and advances the chain.
//! The first backend producing non-empty text wins and later backends are
//! never invoked, so identical input deterministically selects the same
//! backend when all are available.
//!
//! Default order: the fast pure-Rust `pdf-extract` path, then `lopdf` page
//! extraction, then a raw-byte text salvage as last resort.

mod backends;

pub use backends::{LopdfBackend, PdfExtractBackend, RawTextBackend};

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

/// Character count above which extracted text counts as meaningful.
pub const SUFFICIENT_TEXT_CHARS: usize = 100;

/// Error raised by one extraction backend. Always recoverable; the chain
/// advances to the next backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not produce text from the payload.
    #[error("{backend} failed: {message}")]
    Failed {
        /// Name of the failing backend.
        backend: &'static str,
        /// Why extraction failed.
        message: String,
    },
}

impl BackendError {
    /// Creates a backend failure error.
    #[must_use]
    pub fn failed(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            backend,
            message: message.into(),
        }
    }
}

/// Capability of producing text from raw document bytes.
pub trait ExtractionBackend: Send + Sync {
    /// Stable backend name used in logs and results.
    fn name(&self) -> &'static str;

    /// Attempts extraction. Errors are non-fatal to the chain.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the payload cannot be processed.
    fn extract(&self, bytes: &[u8]) -> Result<String, BackendError>;
}

/// Outcome of running the extraction chain on one payload.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted text, possibly empty.
    pub text: String,
    /// Name of the backend that produced the text, when any did.
    pub backend: Option<&'static str>,
    /// True iff the text exceeds [`SUFFICIENT_TEXT_CHARS`].
    pub sufficient: bool,
}

impl ExtractionResult {
    fn from_text(text: String, backend: &'static str) -> Self {
        let sufficient = text.chars().count() > SUFFICIENT_TEXT_CHARS;
        Self {
            text,
            backend: Some(backend),
            sufficient,
        }
    }

    fn empty() -> Self {
        Self {
            text: String::new(),
            backend: None,
            sufficient: false,
        }
    }

    /// Length of the extracted text in characters.
    #[must_use]
    pub fn text_length(&self) -> usize {
        self.text.chars().count()
    }
}

/// Ordered chain of extraction backends.
pub struct TextExtractor {
    backends: Vec<Box<dyn ExtractionBackend>>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor {
    /// Creates the default chain: `pdf-extract`, then `lopdf`, then raw
    /// text salvage.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backends(vec![
            Box::new(PdfExtractBackend),
            Box::new(LopdfBackend),
            Box::new(RawTextBackend),
        ])
    }

    /// Creates a chain with an explicit backend order.
    #[must_use]
    pub fn with_backends(backends: Vec<Box<dyn ExtractionBackend>>) -> Self {
        Self { backends }
    }

    /// Runs the chain over an in-memory payload.
    ///
    /// The first backend yielding non-empty (trimmed) text wins; if every
    /// backend fails or produces nothing, the result is empty and not
    /// sufficient.
    #[must_use]
    pub fn extract(&self, bytes: &[u8]) -> ExtractionResult {
        for backend in &self.backends {
            match backend.extract(bytes) {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(
                        backend = backend.name(),
                        chars = text.chars().count(),
                        "extraction succeeded"
                    );
                    return ExtractionResult::from_text(text, backend.name());
                }
                Ok(_) => {
                    debug!(backend = backend.name(), "backend produced no text, trying next");
                }
                Err(error) => {
                    debug!(backend = backend.name(), error = %error, "backend failed, trying next");
                }
            }
        }
        debug!("all extraction backends exhausted");
        ExtractionResult::empty()
    }

    /// Runs the same chain over a file already on disk.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read; extraction
    /// failures themselves still yield an empty result, not an error.
    pub fn extract_file(&self, path: &Path) -> io::Result<ExtractionResult> {
        let bytes = std::fs::read(path)?;
        Ok(self.extract(&bytes))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Test backend returning fixed text and counting invocations.
    struct CountingBackend {
        name: &'static str,
        output: Result<String, ()>,
        calls: AtomicUsize,
    }

    impl CountingBackend {
        fn returning(name: &'static str, text: &str) -> Arc<Self> {
            Arc::new(Self {
                name,
                output: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                output: Err(()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ExtractionBackend for Arc<CountingBackend> {
        fn name(&self) -> &'static str {
            self.name
        }

        fn extract(&self, _bytes: &[u8]) -> Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.output
                .clone()
                .map_err(|()| BackendError::failed(self.name, "forced failure"))
        }
    }

    fn chain(backends: &[&Arc<CountingBackend>]) -> TextExtractor {
        TextExtractor::with_backends(
            backends
                .iter()
                .map(|b| Box::new(Arc::clone(b)) as Box<dyn ExtractionBackend>)
                .collect(),
        )
    }

    #[test]
    fn test_first_sufficient_backend_short_circuits() {
        let long_text = "x".repeat(101);
        let first = CountingBackend::returning("first", &long_text);
        let second = CountingBackend::returning("second", "unused");
        let third = CountingBackend::returning("third", "unused");
        let extractor = chain(&[&first, &second, &third]);

        let result = extractor.extract(b"payload");

        assert!(result.sufficient);
        assert_eq!(result.backend, Some("first"));
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0, "second backend must not be invoked");
        assert_eq!(third.calls(), 0, "third backend must not be invoked");
    }

    #[test]
    fn test_failure_and_empty_output_advance_the_chain() {
        let failing = CountingBackend::failing("failing");
        let empty = CountingBackend::returning("empty", "   \n ");
        let winner = CountingBackend::returning("winner", "recovered text");
        let extractor = chain(&[&failing, &empty, &winner]);

        let result = extractor.extract(b"payload");

        assert_eq!(result.backend, Some("winner"));
        assert_eq!(result.text, "recovered text");
        assert_eq!(failing.calls(), 1);
        assert_eq!(empty.calls(), 1);
        assert_eq!(winner.calls(), 1);
    }

    #[test]
    fn test_all_backends_exhausted_yields_empty() {
        let a = CountingBackend::failing("a");
        let b = CountingBackend::failing("b");
        let extractor = chain(&[&a, &b]);

        let result = extractor.extract(b"payload");

        assert!(result.text.is_empty());
        assert!(!result.sufficient);
        assert_eq!(result.backend, None);
    }

    #[test]
    fn test_sufficiency_threshold_is_strictly_greater_than_100() {
        let exactly_100 = CountingBackend::returning("a", &"y".repeat(100));
        let result = chain(&[&exactly_100]).extract(b"p");
        assert!(!result.sufficient, "100 chars is not sufficient");
        assert_eq!(result.text_length(), 100);

        let chars_101 = CountingBackend::returning("b", &"y".repeat(101));
        let result = chain(&[&chars_101]).extract(b"p");
        assert!(result.sufficient, "101 chars is sufficient");
    }

    #[test]
    fn test_extract_file_shares_the_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"payload").unwrap();

        let backend = CountingBackend::returning("file", "from file");
        let extractor = chain(&[&backend]);

        let result = extractor.extract_file(&path).unwrap();
        assert_eq!(result.text, "from file");

        let missing = extractor.extract_file(&dir.path().join("absent.pdf"));
        assert!(missing.is_err());
    }
}
