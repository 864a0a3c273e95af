//! CLI entry point for the docfetch tool.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use docfetch::pipeline::{Pipeline, PipelineOptions};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Docfetch starting");

    // Ctrl-C sets the cooperative shutdown flag; the pipeline stops after
    // the current document and still writes its summary.
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, finishing current document");
                flag.store(true, Ordering::SeqCst);
            }
        });
    }

    let options = PipelineOptions {
        max_documents: args.max_documents,
        output_dir: args.output_dir.clone(),
        pdf_subdir: args.pdf_subdir.clone(),
        text_subdir: args.text_subdir.clone(),
        reprocess: args.reprocess,
        delay: Duration::from_millis(args.delay_ms),
        shutdown: Some(shutdown),
    };

    let pipeline = Pipeline::new(options);
    let summary = pipeline
        .run_file(&args.input)
        .await
        .with_context(|| format!("failed to process {}", args.input.display()))?;

    info!(
        processed = summary.total_processed,
        failed = summary.total_failed,
        pdf_dir = %args.output_dir.join(&args.pdf_subdir).display(),
        text_dir = %args.output_dir.join(&args.text_subdir).display(),
        "Docfetch complete"
    );

    Ok(())
}
