//! CLI entry point for the visit combiner.
//!
//! Joins a mobile-location visit detail file against a ZIP-to-CBSA crosswalk
//! and a per-polygon visitor estimate table, then writes the enriched detail
//! table and two per-ZIP summaries.

use anyhow::Result;
use clap::Parser;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use visit_combiner::config::Config;
use visit_combiner::output::log_final_report;
use visit_combiner::pipeline;

#[derive(Parser)]
#[command(name = "visit_combiner")]
#[command(about = "Combine mobile visit details with CBSA and estimate data", long_about = None)]
struct Cli {
    /// Detail records file (tab-delimited)
    #[arg(short = 'd', long, default_value = "details.tsv")]
    details: PathBuf,

    /// Visitor estimates file (tab-delimited)
    #[arg(short = 'e', long, default_value = "estimates.tsv")]
    estimates: PathBuf,

    /// ZIP-to-CBSA crosswalk file (comma-delimited)
    #[arg(short = 'c', long, default_value = "Zip to CBSA.csv")]
    crosswalk: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/visit_combiner.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("visit_combiner.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::new(cli.details, cli.estimates, cli.crosswalk);

    let report = pipeline::run(&config)?;
    log_final_report(&report);

    Ok(())
}
