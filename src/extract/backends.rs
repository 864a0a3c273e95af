//! Concrete extraction backends, in default priority order.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::LazyLock;

use regex::Regex;

use super::{BackendError, ExtractionBackend};

/// Pure-Rust extraction via the `pdf-extract` crate. Fast path, tried
/// first.
pub struct PdfExtractBackend;

impl ExtractionBackend for PdfExtractBackend {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, BackendError> {
        // pdf-extract panics on some malformed files; a panic here must
        // stay a recoverable backend failure like any other.
        let outcome = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)));
        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(error)) => Err(BackendError::failed(self.name(), error.to_string())),
            Err(_) => Err(BackendError::failed(self.name(), "panicked on payload")),
        }
    }
}

/// Per-page extraction via `lopdf`. Slower, tolerates some documents the
/// fast path rejects.
pub struct LopdfBackend;

impl ExtractionBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, BackendError> {
        let document = lopdf::Document::load_mem(bytes)
            .map_err(|error| BackendError::failed(self.name(), error.to_string()))?;
        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        if pages.is_empty() {
            return Err(BackendError::failed(self.name(), "document has no pages"));
        }
        document
            .extract_text(&pages)
            .map_err(|error| BackendError::failed(self.name(), error.to_string()))
    }
}

/// Runs of readable ASCII letters, three or more.
#[allow(clippy::expect_used)]
static READABLE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z]{3,}").expect("readable word regex is valid") // Static pattern, safe to panic
});

/// Minimum readable words for the salvage output to count at all.
const MIN_SALVAGED_WORDS: usize = 50;

/// Last-resort salvage: scan the raw bytes for runs of readable letters.
///
/// Useful when a document has a broken structure but its text stream is
/// stored uncompressed. Requires more than [`MIN_SALVAGED_WORDS`] words so
/// binary noise never masquerades as extracted text.
pub struct RawTextBackend;

impl ExtractionBackend for RawTextBackend {
    fn name(&self) -> &'static str {
        "raw-text"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, BackendError> {
        let content = String::from_utf8_lossy(bytes);
        let words: Vec<&str> = READABLE_WORD
            .find_iter(&content)
            .map(|m| m.as_str())
            .collect();
        if words.len() <= MIN_SALVAGED_WORDS {
            return Err(BackendError::failed(
                self.name(),
                format!("only {} readable words found", words.len()),
            ));
        }
        Ok(words.join(" "))
    }
}
