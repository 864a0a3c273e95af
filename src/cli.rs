//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Download document PDFs from a CSV link list and extract their text.
///
/// Docfetch reads a CSV whose second column holds markdown-style links,
/// downloads each referenced PDF, extracts its text through a chain of
/// fallback backends, and writes both artifacts plus a JSON run summary.
#[derive(Parser, Debug)]
#[command(name = "docfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Path to the CSV file containing document links
    pub input: PathBuf,

    /// Maximum number of documents to process (0 = no limit)
    #[arg(short = 'm', long, default_value_t = 10)]
    pub max_documents: usize,

    /// Base output directory
    #[arg(short = 'o', long, default_value = "./output")]
    pub output_dir: PathBuf,

    /// Subdirectory for downloaded PDF files
    #[arg(long, default_value = "raw")]
    pub pdf_subdir: String,

    /// Subdirectory for extracted text files and the run summary
    #[arg(long, default_value = "text")]
    pub text_subdir: String,

    /// Re-download documents whose PDF and text artifacts already exist
    #[arg(long)]
    pub reprocess: bool,

    /// Delay between requests in milliseconds (0 to disable, max 60000)
    #[arg(short = 'l', long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub delay_ms: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
