//! Artifact persistence for downloaded PDFs and extracted text.
//!
//! Each processed document produces a PDF/text artifact pair correlated by
//! filename stem: `<sanitized-title>_<timestamp>.pdf` in the PDF directory
//! and the same stem with `.txt` in the text directory. The timestamp
//! suffix means repeated runs never overwrite, so the existence check used
//! for skip-on-rerun matches on the sanitized prefix rather than an exact
//! name, and requires BOTH artifacts to be present.

use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use tracing::{debug, warn};

/// Timestamp suffix format for artifact filenames.
const FILENAME_TIMESTAMP: &str = "%Y%m%d_%H%M%S";

/// Timestamp format written into text file headers.
const HEADER_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Errors that can occur while persisting artifacts.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File system error while creating directories or writing artifacts.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Creates an IO error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Persists raw PDFs and extracted text to a directory pair.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    pdf_dir: PathBuf,
    text_dir: PathBuf,
}

impl ArtifactStore {
    /// Creates a store, creating both directories if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if either directory cannot be created.
    pub async fn new(
        pdf_dir: impl Into<PathBuf>,
        text_dir: impl Into<PathBuf>,
    ) -> Result<Self, StoreError> {
        let pdf_dir = pdf_dir.into();
        let text_dir = text_dir.into();
        tokio::fs::create_dir_all(&pdf_dir)
            .await
            .map_err(|e| StoreError::io(pdf_dir.clone(), e))?;
        tokio::fs::create_dir_all(&text_dir)
            .await
            .map_err(|e| StoreError::io(text_dir.clone(), e))?;
        Ok(Self { pdf_dir, text_dir })
    }

    /// Directory holding raw PDF artifacts.
    #[must_use]
    pub fn pdf_dir(&self) -> &Path {
        &self.pdf_dir
    }

    /// Directory holding extracted text artifacts and the run summary.
    #[must_use]
    pub fn text_dir(&self) -> &Path {
        &self.text_dir
    }

    /// Reduces a document title to a filesystem-safe name.
    ///
    /// Keeps alphanumerics and underscores, drops every other character
    /// except whitespace and hyphens, which collapse (in runs) to a single
    /// hyphen. Leading and trailing separators are dropped. Deterministic
    /// and idempotent.
    #[must_use]
    pub fn sanitize(name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        let mut pending_separator = false;
        for ch in name.chars() {
            if ch.is_alphanumeric() || ch == '_' {
                if pending_separator && !out.is_empty() {
                    out.push('-');
                }
                pending_separator = false;
                out.push(ch);
            } else if ch.is_whitespace() || ch == '-' {
                pending_separator = true;
            }
            // everything else is stripped without becoming a separator
        }
        out
    }

    /// True iff at least one PDF and at least one text artifact exist
    /// whose filenames start with `safe_name`.
    ///
    /// This is the skip-on-rerun check: reprocessing is skipped only when
    /// both halves of the artifact pair are present, never just one.
    pub async fn exists(&self, safe_name: &str) -> bool {
        if safe_name.is_empty() {
            return false;
        }
        has_artifact(&self.pdf_dir, safe_name, ".pdf").await
            && has_artifact(&self.text_dir, safe_name, ".txt").await
    }

    /// Writes PDF bytes to `<pdf_dir>/<sanitize(name)>_<timestamp>.pdf`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the write fails.
    pub async fn save_pdf(&self, bytes: &[u8], name: &str) -> Result<PathBuf, StoreError> {
        let timestamp = Local::now().format(FILENAME_TIMESTAMP);
        let filename = format!("{}_{timestamp}.pdf", Self::sanitize(name));
        let path = self.pdf_dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StoreError::io(path.clone(), e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "saved PDF artifact");
        Ok(path)
    }

    /// Writes extracted text next to its PDF, reusing the PDF filename
    /// stem so the artifact pair is trivially correlatable.
    ///
    /// The file starts with a fixed header consumed by downstream
    /// readers: title line, extraction timestamp line, an 80-character
    /// separator, then a blank line before the body.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the write fails.
    pub async fn save_text(
        &self,
        text: &str,
        title: &str,
        pdf_path: &Path,
    ) -> Result<PathBuf, StoreError> {
        let stem = pdf_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        let path = self.text_dir.join(format!("{stem}.txt"));

        let timestamp = Local::now().format(HEADER_TIMESTAMP);
        let mut contents = String::with_capacity(text.len() + 128);
        contents.push_str(&format!("Document Title: {title}\n"));
        contents.push_str(&format!("Extracted on: {timestamp}\n"));
        contents.push_str(&"=".repeat(80));
        contents.push_str("\n\n");
        contents.push_str(text);

        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| StoreError::io(path.clone(), e))?;
        debug!(path = %path.display(), "saved text artifact");
        Ok(path)
    }

    /// Best-effort removal of a PDF whose text proved insufficient.
    ///
    /// Leaving the orphan would not satisfy the skip check (which needs
    /// both artifacts) but would accumulate files across reruns.
    pub async fn remove_pdf(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "removed orphaned PDF"),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "could not remove orphaned PDF");
            }
        }
    }
}

/// True iff `dir` holds a file starting with `prefix` and ending with
/// `suffix`. An unreadable directory counts as having no artifacts.
async fn has_artifact(dir: &Path, prefix: &str, suffix: &str) -> bool {
    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return false;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        if let Some(name) = name.to_str()
            && name.starts_with(prefix)
            && name.ends_with(suffix)
        {
            return true;
        }
    }
    false
}
