//! Run summary types serialized to `processing_summary.json`.

use serde::{Deserialize, Serialize};

use crate::parser::LinkRecord;

/// One fully processed link, appended to the run summary.
///
/// Records are created exactly once per successful link and never mutated
/// afterwards. Field names match the JSON schema downstream readers
/// consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Position in the (possibly truncated) processing list.
    pub id: usize,
    /// The link's display text.
    pub title: String,
    /// The candidate URL that ultimately succeeded.
    pub url: String,
    /// The link's primary URL, which may differ from `url` when a
    /// fallback candidate won.
    pub original_url: String,
    /// Raw cell text the link came from.
    pub context: String,
    /// Source column label.
    pub column_name: String,
    /// Extracted text length in characters.
    pub text_length: usize,
    /// Where the raw PDF was stored.
    pub pdf_path: String,
    /// Where the extracted text was stored.
    pub text_path: String,
    /// Always true for records in `processed_documents`; kept for schema
    /// compatibility.
    pub success: bool,
}

/// Aggregated outcome of one pipeline run.
///
/// Serialized pretty-printed as `processing_summary.json` in the text
/// directory. Failures are recorded as the originating [`LinkRecord`],
/// not as document records.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Count of successfully processed documents.
    pub total_processed: usize,
    /// Count of links for which every candidate URL failed.
    pub total_failed: usize,
    /// All successful document records, in processing order.
    pub processed_documents: Vec<DocumentRecord>,
    /// Links that exhausted their candidates, in processing order.
    pub failed_downloads: Vec<LinkRecord>,
}

impl RunSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one successful document.
    pub fn add_document(&mut self, record: DocumentRecord) {
        self.processed_documents.push(record);
        self.total_processed = self.processed_documents.len();
    }

    /// Records one exhausted link.
    pub fn add_failure(&mut self, record: LinkRecord) {
        self.failed_downloads.push(record);
        self.total_failed = self.failed_downloads.len();
    }
}
