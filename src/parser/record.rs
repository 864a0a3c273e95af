//! Types representing extracted links and parse results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One markdown-style hyperlink extracted from the input table.
///
/// Records are created once per run by [`extract_links`](super::extract_links)
/// and are immutable thereafter. Failed documents carry their originating
/// record verbatim into the run summary's `failed_downloads` list, so this
/// type serializes with the exact field names downstream readers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Source row position within one parse (zero-based, data rows only).
    pub row_index: usize,
    /// Label of the column the link came from.
    pub column_name: String,
    /// Human-readable label; basis for output filenames after sanitization.
    pub link_text: String,
    /// Primary target URL.
    pub link_url: String,
    /// Full raw cell text the link was extracted from. May contain
    /// additional embedded URLs used as fallback candidates.
    pub context: String,
}

impl fmt::Display for LinkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.link_text, self.link_url)
    }
}

/// Collection of links extracted from one CSV input.
#[derive(Debug, Default)]
pub struct LinkParseResult {
    /// Successfully extracted links, in row order then match order.
    pub records: Vec<LinkRecord>,
    /// Non-fatal conditions encountered while parsing (for logging).
    pub warnings: Vec<String>,
}

impl LinkParseResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an extracted link.
    pub fn add_record(&mut self, record: LinkRecord) {
        self.records.push(record);
    }

    /// Adds a parse warning.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Returns true if no links were extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns count of extracted links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns count of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl fmt::Display for LinkParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extracted {} links ({} warnings)",
            self.records.len(),
            self.warnings.len()
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_record() -> LinkRecord {
        LinkRecord {
            row_index: 0,
            column_name: "PDF Links".to_string(),
            link_text: "Guidance".to_string(),
            link_url: "https://example.com/guidance.pdf".to_string(),
            context: "[Guidance](https://example.com/guidance.pdf)".to_string(),
        }
    }

    #[test]
    fn test_link_record_display() {
        assert_eq!(
            sample_record().to_string(),
            "[Guidance] https://example.com/guidance.pdf"
        );
    }

    #[test]
    fn test_link_record_json_field_names() {
        let json = serde_json::to_value(sample_record()).unwrap();
        for field in [
            "row_index",
            "column_name",
            "link_text",
            "link_url",
            "context",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }

    #[test]
    fn test_parse_result_new_is_empty() {
        let result = LinkParseResult::new();
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn test_parse_result_add_record_and_warning() {
        let mut result = LinkParseResult::new();
        result.add_record(sample_record());
        result.add_warning("something odd");

        assert!(!result.is_empty());
        assert_eq!(result.len(), 1);
        assert_eq!(result.warning_count(), 1);
        assert_eq!(result.to_string(), "Extracted 1 links (1 warnings)");
    }
}
