//! CLI entry point for the transit performance reporter.
//!
//! Provides subcommands for generating a full report from a trip-record CSV
//! and for validating an upload without producing a report.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use transit_reporter::analyzers::report::generate;
use transit_reporter::config::ReportConfig;
use transit_reporter::error::RejectedRow;
use transit_reporter::fetch::load_source;
use transit_reporter::input::read_rows;
use transit_reporter::normalize::normalize_rows;
use transit_reporter::output::{write_json, write_route_csv, write_summary_text};

#[derive(Parser)]
#[command(name = "transit_reporter")]
#[command(about = "Generates transit performance reports from trip-level CSV data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a performance report from a trip-record CSV file or URL
    Report {
        /// Path to file or URL to fetch (plain or gzipped CSV)
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Path for the JSON report artifact
        #[arg(short, long, default_value = "report.json")]
        json: String,

        /// Also write a human-readable summary report to this path
        #[arg(short, long)]
        summary: Option<String>,

        /// Also write per-route aggregates as CSV to this path
        #[arg(long)]
        routes_csv: Option<String>,

        /// JSON config file overriding thresholds and ranking sizes
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Validate a trip-record CSV and list rejected rows without generating a report
    Validate {
        /// Path to file or URL to fetch (plain or gzipped CSV)
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// JSON config file overriding input limits
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/transit_reporter.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("transit_reporter.log"));

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

    match cli.command {
        Commands::Report {
            source,
            json,
            summary,
            routes_csv,
            config,
        } => {
            let cfg = load_config(config.as_deref())?;
            let bytes = load_source(&source).await?;
            let rows = read_rows(&bytes, &cfg)?;

            let outcome = generate(rows, &cfg)?;
            log_rejections(&outcome.rejected, &outcome.timing_flags);

            let s = &outcome.report.summary;
            info!(
                records = s.total_records,
                routes = s.unique_route_count,
                boardings = s.total_boardings,
                recommendations = outcome.report.recommendations.len(),
                "Report generated"
            );

            write_json(&json, &outcome.report)?;
            if let Some(path) = summary {
                write_summary_text(&path, &outcome.report)?;
            }
            if let Some(path) = routes_csv {
                write_route_csv(&path, &outcome.report)?;
            }
        }
        Commands::Validate { source, config } => {
            let cfg = load_config(config.as_deref())?;
            let bytes = load_source(&source).await?;
            let rows = read_rows(&bytes, &cfg)?;
            let total = rows.len();

            let batch = normalize_rows(rows);
            log_rejections(&batch.rejected, &batch.timing_flags);

            info!(
                total,
                valid = batch.records.len(),
                rejected = batch.rejected.len(),
                flagged = batch.timing_flags.len(),
                "Validation complete"
            );
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<ReportConfig> {
    match path {
        Some(p) => ReportConfig::load(p),
        None => Ok(ReportConfig::default()),
    }
}

fn log_rejections(rejected: &[RejectedRow], timing_flags: &[RejectedRow]) {
    for rej in rejected {
        warn!(row = rej.row, reason = %rej.reason, detail = %rej.detail, "Row rejected");
    }
    for flag in timing_flags {
        warn!(row = flag.row, detail = %flag.detail, "Row excluded from timing aggregates");
    }
}
