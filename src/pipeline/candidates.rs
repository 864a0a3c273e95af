//! Candidate URL construction for one link.
//!
//! The primary link URL often points at a landing page while the cell text
//! around it embeds the direct document URL. Each known direct-download
//! shape is scanned for in the link's context and appended, in discovery
//! order, after the primary URL.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::parser::LinkRecord;

/// Patterns matching direct document download URLs embedded in cell text.
/// Ordered most-specific first; discovery order is attempt order.
#[allow(clippy::expect_used)]
static DIRECT_PDF_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Media download endpoints: .../media/<digits>/download
        r"https://www\.fda\.gov/media/\d+/download",
        // Numbered file paths ending in .pdf
        r#"https://www\.fda\.gov/files/\d+/[^\s")\]]*\.pdf"#,
        // Any https URL ending in .pdf
        r#"https://[^\s")\]]+\.pdf"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("direct PDF pattern is valid")) // Static patterns, safe to panic
    .collect()
});

/// Builds the ordered candidate URL list for one link: the primary URL
/// first, then direct document URLs found in the context. Duplicates are
/// dropped, keeping first-seen order, so the same URL is never attempted
/// twice for one link.
#[must_use]
pub fn candidate_urls(record: &LinkRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    let mut push = |url: &str, candidates: &mut Vec<String>| {
        if seen.insert(url.to_string()) {
            candidates.push(url.to_string());
        }
    };

    push(&record.link_url, &mut candidates);
    for pattern in DIRECT_PDF_PATTERNS.iter() {
        for found in pattern.find_iter(&record.context) {
            trace!(url = found.as_str(), "found direct document URL in context");
            push(found.as_str(), &mut candidates);
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(link_url: &str, context: &str) -> LinkRecord {
        LinkRecord {
            row_index: 0,
            column_name: "Links".to_string(),
            link_text: "Doc".to_string(),
            link_url: link_url.to_string(),
            context: context.to_string(),
        }
    }

    #[test]
    fn test_primary_url_always_first() {
        let record = record(
            "https://landing.test/doc",
            "see https://www.fda.gov/media/123/download for the file",
        );
        let candidates = candidate_urls(&record);
        assert_eq!(
            candidates,
            vec![
                "https://landing.test/doc",
                "https://www.fda.gov/media/123/download",
            ]
        );
    }

    #[test]
    fn test_duplicates_dropped_keeping_first_seen_order() {
        // The primary URL reappearing inside its own context must not be
        // attempted twice.
        let record = record(
            "https://www.fda.gov/media/123/download",
            "[Doc](https://www.fda.gov/media/123/download) or https://mirror.test/copy.pdf",
        );
        let candidates = candidate_urls(&record);
        assert_eq!(
            candidates,
            vec![
                "https://www.fda.gov/media/123/download",
                "https://mirror.test/copy.pdf",
            ]
        );
    }

    #[test]
    fn test_generic_pdf_urls_matched() {
        let record = record(
            "https://landing.test/doc",
            "mirror at https://archive.test/files/guidance-2024.pdf today",
        );
        let candidates = candidate_urls(&record);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1], "https://archive.test/files/guidance-2024.pdf");
    }

    #[test]
    fn test_pdf_url_does_not_capture_markdown_terminator() {
        let record = record(
            "https://landing.test/doc",
            "[alt](https://archive.test/a.pdf)",
        );
        let candidates = candidate_urls(&record);
        assert_eq!(candidates[1], "https://archive.test/a.pdf");
    }

    #[test]
    fn test_no_embedded_urls_yields_only_primary() {
        let record = record("https://landing.test/doc", "no embedded urls here");
        assert_eq!(candidate_urls(&record), vec!["https://landing.test/doc"]);
    }

    #[test]
    fn test_specific_patterns_take_precedence_in_ordering() {
        let record = record(
            "https://landing.test/doc",
            "https://other.test/z.pdf then https://www.fda.gov/media/9/download",
        );
        let candidates = candidate_urls(&record);
        // Media endpoint pattern is scanned first, so it precedes the
        // generic .pdf match despite appearing later in the text.
        assert_eq!(
            candidates,
            vec![
                "https://landing.test/doc",
                "https://www.fda.gov/media/9/download",
                "https://other.test/z.pdf",
            ]
        );
    }
}
