//! Main entry point for the zipdiff CLI application.
//!
//! Opens both archives (local paths or HTTP URLs), compares them and
//! prints either a text report or the JSON response payload.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use zipdiff::{
    ArchiveSource, Cli, CompareOptions, CompareResponse, DiffResult, compare_archives, render_text,
};

/// Application entry point.
///
/// Logging goes to stderr and is controlled by `RUST_LOG`
/// (e.g. `RUST_LOG=zipdiff=debug`); per-entry decode problems show up
/// as warnings.
#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = cli.compare_options();
    let started = Instant::now();

    let outcome = run_comparison(&cli, &options).await;

    if cli.json {
        let failed = outcome.is_err();
        let response = CompareResponse::from(outcome.map_err(|e| format!("{:#}", e)));
        let mut payload = serde_json::to_string_pretty(&response)?;
        payload.push('\n');
        write_report(&cli, &payload).await?;
        return Ok(if failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    let result = outcome?;
    write_report(&cli, &render_text(&result, &cli.report_options())).await?;

    if !cli.is_quiet() {
        eprintln!("\nCompared in {:.2?}", started.elapsed());
    }

    Ok(ExitCode::SUCCESS)
}

/// Open both archives and compare them.
///
/// Both sides are opened and extracted concurrently; a failure on either
/// side aborts before any classification happens.
async fn run_comparison(cli: &Cli, options: &CompareOptions) -> Result<DiffResult> {
    let http = cli.http_options();
    let (left, right) = tokio::try_join!(
        ArchiveSource::open(&cli.left, &http),
        ArchiveSource::open(&cli.right, &http)
    )?;
    let (left, right) = (Arc::new(left), Arc::new(right));

    let result = compare_archives(left.clone(), right.clone(), options)
        .await
        .with_context(|| format!("Comparing {} with {}", cli.left, cli.right))?;

    let transferred = left.transferred_bytes() + right.transferred_bytes();
    if transferred > 0 && !cli.is_quiet() {
        eprintln!("Total bytes transferred: {}", format_size(transferred));
    }

    Ok(result)
}

/// Write the report to `-o FILE` or stdout.
async fn write_report(cli: &Cli, report: &str) -> Result<()> {
    match &cli.output {
        Some(path) => tokio::fs::write(path, report)
            .await
            .with_context(|| format!("Failed to write {}", path)),
        None => {
            use tokio::io::AsyncWriteExt;
            let mut stdout = tokio::io::stdout();
            stdout.write_all(report.as_bytes()).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(1048576), "1.00 MB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
