//! Docfetch Core Library
//!
//! This library implements a sequential document-acquisition pipeline: it
//! parses a CSV of markdown-style document links, downloads the referenced
//! PDFs over HTTP, extracts their text through an ordered chain of
//! extraction backends, and persists raw and extracted artifacts alongside
//! a JSON run summary.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - CSV input parsing and markdown link extraction
//! - [`fetch`] - HTTP content fetching with anti-bot response detection
//! - [`extract`] - Multi-backend PDF text extraction with fallback
//! - [`store`] - Artifact persistence with timestamped filenames
//! - [`pipeline`] - End-to-end orchestration and run summary

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod extract;
pub mod fetch;
pub mod parser;
pub mod pipeline;
pub mod store;

// Re-export commonly used types
pub use extract::{
    BackendError, ExtractionBackend, ExtractionResult, SUFFICIENT_TEXT_CHARS, TextExtractor,
};
pub use fetch::{FetchOutcome, Fetcher, FetcherConfig, HttpFetcher};
pub use parser::{LinkParseResult, LinkRecord, ParseError, extract_links};
pub use pipeline::{
    DocumentRecord, Pipeline, PipelineError, PipelineOptions, RunSummary, SUMMARY_FILENAME,
};
pub use store::{ArtifactStore, StoreError};
