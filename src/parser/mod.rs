//! Input parsing module for extracting document links from CSV content.
//!
//! The input is tabular: each row's second column may hold one or more
//! markdown-style links (`[text](url)`) pointing at downloadable documents.
//! This module scans that column and produces one [`LinkRecord`] per match,
//! preserving row order and match order within a row.
//!
//! # Example
//!
//! ```
//! use docfetch::parser::extract_links;
//!
//! let csv = "Title,Links\nSome row,\"[Report](https://example.com/report.pdf)\"\n";
//! let result = extract_links(csv).unwrap();
//! assert_eq!(result.len(), 1);
//! assert_eq!(result.records[0].link_text, "Report");
//! ```

mod error;
mod record;

pub use error::ParseError;
pub use record::{LinkParseResult, LinkRecord};

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace, warn};

/// Regex pattern for markdown-style links: display text in brackets
/// immediately followed by a URL in parentheses. Unbalanced brackets do
/// not match.
#[allow(clippy::expect_used)]
static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("markdown link regex is valid")
    // Static pattern, safe to panic
});

/// Column index holding the document links (second column).
const LINK_COLUMN: usize = 1;

/// Parses CSV content and extracts markdown links from the second column.
///
/// # Behavior
///
/// - Inputs with fewer than two columns yield an empty result plus a
///   warning; this is a degraded condition, never an error.
/// - Rows whose second column is missing or blank are skipped.
/// - Each match becomes one [`LinkRecord`]; matches whose text or URL is
///   empty after trimming are dropped (the record invariant requires both
///   to be non-empty).
/// - Ragged rows are tolerated (flexible reader); only input that cannot
///   be read as CSV at all produces [`ParseError::Csv`].
///
/// # Errors
///
/// Returns [`ParseError::Csv`] if a record cannot be read from the input.
#[tracing::instrument(skip(csv_content), fields(input_len = csv_content.len()))]
pub fn extract_links(csv_content: &str) -> Result<LinkParseResult, ParseError> {
    let mut result = LinkParseResult::new();

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_content.as_bytes());

    let headers = reader.headers().map_err(ParseError::csv)?.clone();
    if headers.len() <= LINK_COLUMN {
        warn!(
            columns = headers.len(),
            "input has fewer than 2 columns, cannot extract document URLs from second column"
        );
        result.add_warning(format!(
            "input has {} column(s); document links are expected in the second column",
            headers.len()
        ));
        return Ok(result);
    }

    let column_name = headers
        .get(LINK_COLUMN)
        .unwrap_or("col_1")
        .trim()
        .to_string();

    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(ParseError::csv)?;
        let Some(cell) = record.get(LINK_COLUMN) else {
            trace!(row = row_index, "row has no second column, skipping");
            continue;
        };
        if cell.trim().is_empty() {
            trace!(row = row_index, "empty link cell, skipping");
            continue;
        }

        for captures in MARKDOWN_LINK.captures_iter(cell) {
            let link_text = captures.get(1).map_or("", |m| m.as_str()).trim();
            let link_url = captures.get(2).map_or("", |m| m.as_str()).trim();
            if link_text.is_empty() || link_url.is_empty() {
                debug!(row = row_index, "dropping link with blank text or URL");
                continue;
            }
            trace!(row = row_index, url = %link_url, "found link");
            result.add_record(LinkRecord {
                row_index,
                column_name: column_name.clone(),
                link_text: link_text.to_string(),
                link_url: link_url.to_string(),
                context: cell.to_string(),
            });
        }
    }

    debug!(
        links = result.len(),
        warnings = result.warning_count(),
        "link extraction complete"
    );
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_single_link_with_all_fields() {
        let csv = "Document,PDF Links\nRow one,\"[Label X](https://example.com/files/123.pdf)\"\n";
        let result = extract_links(csv).unwrap();

        assert_eq!(result.len(), 1);
        let record = &result.records[0];
        assert_eq!(record.row_index, 0);
        assert_eq!(record.column_name, "PDF Links");
        assert_eq!(record.link_text, "Label X");
        assert_eq!(record.link_url, "https://example.com/files/123.pdf");
        assert_eq!(
            record.context,
            "[Label X](https://example.com/files/123.pdf)"
        );
    }

    #[test]
    fn test_multiple_links_in_one_cell_preserve_order() {
        let csv = "Doc,Links\nrow,\"[A](https://a.test/a.pdf)[C](https://c.test/c.pdf)\"\n";
        let result = extract_links(csv).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.records[0].link_text, "A");
        assert_eq!(result.records[0].link_url, "https://a.test/a.pdf");
        assert_eq!(result.records[1].link_text, "C");
        assert_eq!(result.records[1].link_url, "https://c.test/c.pdf");
        // Both records share the same originating cell
        assert_eq!(result.records[0].context, result.records[1].context);
    }

    #[test]
    fn test_unbalanced_brackets_yield_no_match() {
        let csv = "Doc,Links\nrow,\"[broken(https://a.test/a.pdf)\"\nrow2,\"[ok](https://b.test)\"\n";
        let result = extract_links(csv).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.records[0].link_text, "ok");
        assert_eq!(result.records[0].row_index, 1);
    }

    #[test]
    fn test_fewer_than_two_columns_warns_and_returns_empty() {
        let csv = "OnlyColumn\nvalue1\nvalue2\n";
        let result = extract_links(csv).unwrap();

        assert!(result.is_empty());
        assert_eq!(result.warning_count(), 1);
        assert!(result.warnings[0].contains("second column"));
    }

    #[test]
    fn test_empty_and_missing_cells_are_skipped() {
        let csv = "Doc,Links\nblank,\nwhitespace,\"   \"\nshort\nok,\"[A](https://a.test)\"\n";
        let result = extract_links(csv).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.records[0].row_index, 3);
    }

    #[test]
    fn test_blank_text_or_url_dropped() {
        let csv = "Doc,Links\nrow,\"[   ](https://a.test) [ok](   ) [keep](https://b.test)\"\n";
        let result = extract_links(csv).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.records[0].link_text, "keep");
    }

    #[test]
    fn test_link_values_are_trimmed() {
        let csv = "Doc,Links\nrow,\"[  Spaced Title ]( https://a.test/doc.pdf )\"\n";
        let result = extract_links(csv).unwrap();

        assert_eq!(result.records[0].link_text, "Spaced Title");
        assert_eq!(result.records[0].link_url, "https://a.test/doc.pdf");
    }

    #[test]
    fn test_rows_without_links_produce_nothing() {
        let csv = "Doc,Links\nrow,\"plain text without any markdown\"\n";
        let result = extract_links(csv).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn test_empty_input_yields_warning_not_error() {
        let result = extract_links("").unwrap();
        assert!(result.is_empty());
        assert_eq!(result.warning_count(), 1);
    }
}
