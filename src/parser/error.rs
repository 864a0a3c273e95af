//! Error types for input parsing operations.

use thiserror::Error;

/// Errors that can occur while parsing CSV input.
///
/// Structural warnings (fewer than two columns, empty cells) are not errors;
/// they degrade to an empty link list and are surfaced on
/// [`LinkParseResult::warnings`](super::LinkParseResult). Only input that
/// cannot be read as CSV at all produces an error.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input could not be read as CSV.
    #[error("malformed CSV input: {source}")]
    Csv {
        /// The underlying CSV reader error.
        #[source]
        source: csv::Error,
    },
}

impl ParseError {
    /// Creates a CSV read error.
    #[must_use]
    pub fn csv(source: csv::Error) -> Self {
        Self::Csv { source }
    }
}
