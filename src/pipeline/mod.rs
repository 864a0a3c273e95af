//! End-to-end pipeline orchestration.
//!
//! Drives the full flow: parse links from CSV, then for each link build
//! its candidate URL list and attempt fetch → persist PDF → extract text →
//! persist text per candidate until one succeeds. Per-candidate failures
//! are absorbed and logged; only a link with every candidate exhausted is
//! recorded as failed. The run always completes and always writes its
//! JSON summary, whatever the individual outcomes.
//!
//! # Example
//!
//! ```no_run
//! use docfetch::pipeline::{Pipeline, PipelineOptions};
//!
//! # async fn example() -> Result<(), docfetch::pipeline::PipelineError> {
//! let pipeline = Pipeline::new(PipelineOptions::default());
//! let summary = pipeline.run_file(std::path::Path::new("./documents.csv")).await?;
//! println!("processed {} documents", summary.total_processed);
//! # Ok(())
//! # }
//! ```

mod candidates;
mod summary;

pub use candidates::candidate_urls;
pub use summary::{DocumentRecord, RunSummary};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::extract::TextExtractor;
use crate::fetch::{FetchOutcome, Fetcher, FetcherConfig, HttpFetcher};
use crate::parser::{LinkRecord, ParseError, extract_links};
use crate::store::{ArtifactStore, StoreError};

/// Filename of the JSON run summary, written into the text directory.
pub const SUMMARY_FILENAME: &str = "processing_summary.json";

/// How many failed links the end-of-run report enumerates.
const FAILURE_PREVIEW_LIMIT: usize = 5;

/// Errors that halt a pipeline run.
///
/// Everything else (fetch failures, insufficient text, save failures,
/// exhausted links) is absorbed into the [`RunSummary`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input file could not be read. Halts before processing begins.
    #[error("cannot read input file {path}: {source}")]
    InputRead {
        /// The input path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The input could not be parsed as CSV.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The output directories could not be created.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The run summary could not be serialized or written.
    #[error("cannot write run summary to {path}: {reason}")]
    SummaryWrite {
        /// The summary path that failed.
        path: PathBuf,
        /// Why the write failed.
        reason: String,
    },
}

impl PipelineError {
    /// Creates an input read error.
    #[must_use]
    pub fn input_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::InputRead {
            path: path.into(),
            source,
        }
    }

    fn summary_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::SummaryWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Cap on how many links are processed. Zero means no cap.
    pub max_documents: usize,
    /// Base output directory.
    pub output_dir: PathBuf,
    /// Subdirectory (under `output_dir`) for raw PDFs.
    pub pdf_subdir: String,
    /// Subdirectory (under `output_dir`) for extracted text and the
    /// summary.
    pub text_subdir: String,
    /// When false, links whose artifact pair already exists are skipped.
    pub reprocess: bool,
    /// Delay between successive links and before each HTTP request.
    /// Rate-limiting policy; zero disables it.
    pub delay: Duration,
    /// Cooperative shutdown flag, checked between links. When set, the
    /// run stops early but still writes its summary.
    pub shutdown: Option<Arc<AtomicBool>>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_documents: 10,
            output_dir: PathBuf::from("./output"),
            pdf_subdir: "raw".to_string(),
            text_subdir: "text".to_string(),
            reprocess: false,
            delay: crate::fetch::DEFAULT_REQUEST_DELAY,
            shutdown: None,
        }
    }
}

/// Terminal state of one link.
enum LinkOutcome {
    Succeeded(DocumentRecord),
    Failed,
    Skipped,
}

/// The document acquisition pipeline.
///
/// Owns its fetcher and extraction chain; the artifact store is created
/// per run from the configured output directories.
pub struct Pipeline {
    fetcher: Box<dyn Fetcher>,
    extractor: TextExtractor,
    options: PipelineOptions,
}

impl Pipeline {
    /// Creates a pipeline with the production fetcher and default
    /// extraction chain. The fetcher inherits the configured delay.
    #[must_use]
    pub fn new(options: PipelineOptions) -> Self {
        let fetcher = HttpFetcher::with_config(FetcherConfig::with_request_delay(options.delay));
        Self::with_components(Box::new(fetcher), TextExtractor::new(), options)
    }

    /// Creates a pipeline with explicit components, the seam tests use to
    /// substitute stub fetchers and extraction chains.
    #[must_use]
    pub fn with_components(
        fetcher: Box<dyn Fetcher>,
        extractor: TextExtractor,
        options: PipelineOptions,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            options,
        }
    }

    /// Reads a CSV file and runs the pipeline over its links.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InputRead`] if the file cannot be read;
    /// otherwise the same errors as [`run`](Self::run).
    pub async fn run_file(&self, path: &Path) -> Result<RunSummary, PipelineError> {
        let csv_content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PipelineError::input_read(path, e))?;
        info!(path = %path.display(), bytes = csv_content.len(), "input file loaded");
        self.run(&csv_content).await
    }

    /// Runs the pipeline over in-memory CSV content.
    ///
    /// # Errors
    ///
    /// Returns an error only for the halting conditions: unparseable
    /// input, output directories that cannot be created, or a summary
    /// that cannot be written. Per-link failures land in the summary.
    #[instrument(skip(self, csv_content))]
    pub async fn run(&self, csv_content: &str) -> Result<RunSummary, PipelineError> {
        let parsed = extract_links(csv_content)?;
        for warning in &parsed.warnings {
            warn!(warning = %warning, "input parse warning");
        }
        info!(links = parsed.len(), "parsed input links");

        let store = ArtifactStore::new(
            self.options.output_dir.join(&self.options.pdf_subdir),
            self.options.output_dir.join(&self.options.text_subdir),
        )
        .await?;

        let mut records: &[LinkRecord] = &parsed.records;
        if self.options.max_documents > 0 && records.len() > self.options.max_documents {
            records = &records[..self.options.max_documents];
            info!(limit = self.options.max_documents, "processing list truncated");
        }

        let total = records.len();
        let mut summary = RunSummary::new();

        for (index, record) in records.iter().enumerate() {
            if self.shutdown_requested() {
                warn!(remaining = total - index, "shutdown requested, stopping early");
                break;
            }

            info!(
                document = index + 1,
                total,
                title = %record.link_text,
                "processing document"
            );
            match self.process_link(&store, index, record).await {
                LinkOutcome::Succeeded(document) => {
                    info!(
                        pdf = %document.pdf_path,
                        text = %document.text_path,
                        chars = document.text_length,
                        "document processing complete"
                    );
                    summary.add_document(document);
                }
                LinkOutcome::Failed => {
                    warn!(title = %record.link_text, "all download attempts failed");
                    summary.add_failure(record.clone());
                }
                LinkOutcome::Skipped => {
                    info!(title = %record.link_text, "artifacts already exist, skipping");
                }
            }

            if index + 1 < total && !self.options.delay.is_zero() {
                tokio::time::sleep(self.options.delay).await;
            }
        }

        self.report(&summary);
        self.write_summary(&store, &summary).await?;
        Ok(summary)
    }

    /// Processes one link through its candidate URLs until one succeeds.
    async fn process_link(
        &self,
        store: &ArtifactStore,
        id: usize,
        record: &LinkRecord,
    ) -> LinkOutcome {
        let safe_name = ArtifactStore::sanitize(&record.link_text);
        if !self.options.reprocess && store.exists(&safe_name).await {
            return LinkOutcome::Skipped;
        }

        for (attempt, url) in candidate_urls(record).iter().enumerate() {
            if attempt > 0 {
                info!(alternative = attempt, url = %url, "trying alternative URL");
            }

            let outcome = self.fetcher.fetch(url).await;
            let bytes = match outcome {
                FetchOutcome::Success { bytes, .. } => bytes,
                other => {
                    warn!(url = %url, outcome = %other, "download failed");
                    continue;
                }
            };
            debug!(url = %url, bytes = bytes.len(), "downloaded document");

            let pdf_path = match store.save_pdf(&bytes, &record.link_text).await {
                Ok(path) => path,
                Err(error) => {
                    warn!(url = %url, error = %error, "failed to save PDF");
                    continue;
                }
            };

            let extraction = self.extractor.extract(&bytes);
            if !extraction.sufficient {
                warn!(
                    url = %url,
                    chars = extraction.text_length(),
                    "text extraction failed or insufficient"
                );
                // Orphaned PDFs would never satisfy the skip check and
                // only accumulate across reruns.
                store.remove_pdf(&pdf_path).await;
                continue;
            }

            let text_path = match store
                .save_text(&extraction.text, &record.link_text, &pdf_path)
                .await
            {
                Ok(path) => path,
                Err(error) => {
                    warn!(url = %url, error = %error, "failed to save text");
                    store.remove_pdf(&pdf_path).await;
                    continue;
                }
            };

            return LinkOutcome::Succeeded(DocumentRecord {
                id,
                title: record.link_text.clone(),
                url: url.clone(),
                original_url: record.link_url.clone(),
                context: record.context.clone(),
                column_name: record.column_name.clone(),
                text_length: extraction.text_length(),
                pdf_path: pdf_path.display().to_string(),
                text_path: text_path.display().to_string(),
                success: true,
            });
        }

        LinkOutcome::Failed
    }

    fn shutdown_requested(&self) -> bool {
        self.options
            .shutdown
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Logs final counts and a capped preview of failed links.
    fn report(&self, summary: &RunSummary) {
        info!(
            processed = summary.total_processed,
            failed = summary.total_failed,
            "processing complete"
        );
        for failed in summary.failed_downloads.iter().take(FAILURE_PREVIEW_LIMIT) {
            warn!(title = %failed.link_text, url = %failed.link_url, "failed download");
        }
        if summary.total_failed > FAILURE_PREVIEW_LIMIT {
            warn!(
                more = summary.total_failed - FAILURE_PREVIEW_LIMIT,
                "additional failed downloads not shown"
            );
        }
    }

    async fn write_summary(
        &self,
        store: &ArtifactStore,
        summary: &RunSummary,
    ) -> Result<(), PipelineError> {
        let path = store.text_dir().join(SUMMARY_FILENAME);
        let json = serde_json::to_string_pretty(summary)
            .map_err(|e| PipelineError::summary_write(path.clone(), e))?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| PipelineError::summary_write(path.clone(), e))?;
        info!(path = %path.display(), "run summary saved");
        Ok(())
    }
}
