//! CLI entry point for the street velocity analysis tool.
//!
//! Provides subcommands for sweeping averaging window sizes over a directory
//! of street runs, inspecting a single run log, and listing the street table.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use street_velocity::{
    analyzers::analyzer::analyze,
    config::{FixFilter, StreetTable, SweepConfig},
    geodesy::{DistanceModel, Geodesic, Haversine},
    output::{self, print_table, write_csv, write_json},
    run::RunRecord,
};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "street_velocity")]
#[command(about = "Evaluate GPS velocity estimates against timed street runs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep averaging window sizes over every run and report velocity errors
    Sweep {
        /// Directory holding one sub-directory of run logs per street
        #[arg(short = 'd', long, default_value = "data/gps/gps_dynamics")]
        data_dir: PathBuf,

        /// JSON file mapping street names to lengths in meters
        #[arg(short, long)]
        streets: Option<String>,

        /// Smallest averaging window (samples)
        #[arg(long, default_value_t = 1)]
        min_window: usize,

        /// Largest averaging window (samples)
        #[arg(long, default_value_t = 9)]
        max_window: usize,

        /// Only use fixes recorded between the start and end markers
        #[arg(long, default_value_t = false)]
        within_markers: bool,

        /// Earth model for distances between fixes
        #[arg(long, value_enum, default_value_t = DistanceArg::Geodesic)]
        distance: DistanceArg,

        /// Optional: CSV file to write per-window statistics to
        #[arg(long)]
        csv: Option<String>,

        /// Optional: JSON file to write the full report to
        #[arg(long)]
        json: Option<String>,

        /// Also log the full report as JSON
        #[arg(long, default_value_t = false)]
        print_json: bool,
    },
    /// Load a single run log and show its reference velocity
    Inspect {
        /// Run log file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Street the run was recorded on
        #[arg(long)]
        street: String,

        /// JSON file mapping street names to lengths in meters
        #[arg(short, long)]
        streets: Option<String>,
    },
    /// List the street table
    Streets {
        /// JSON file mapping street names to lengths in meters
        #[arg(short, long)]
        streets: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DistanceArg {
    /// WGS-84 ellipsoid
    Geodesic,
    /// Spherical earth
    Haversine,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep {
            data_dir,
            streets,
            min_window,
            max_window,
            within_markers,
            distance,
            csv,
            json,
            print_json,
        } => {
            let streets = street_table(streets.as_deref())?;
            let fix_filter = if within_markers {
                FixFilter::WithinMarkers
            } else {
                FixFilter::All
            };
            let config = SweepConfig::new(min_window, max_window, fix_filter)?;
            let model: &dyn DistanceModel = match distance {
                DistanceArg::Geodesic => &Geodesic,
                DistanceArg::Haversine => &Haversine,
            };

            let report = analyze(&data_dir, &streets, &config, model)?;
            print_table(&report);
            if print_json {
                output::print_json(&report)?;
            }

            if let Some(path) = csv {
                write_csv(&path, &report.windows)?;
                info!(path = %path, "Wrote CSV report");
            }
            if let Some(path) = json {
                write_json(&path, &report)?;
                info!(path = %path, "Wrote JSON report");
            }
        }
        Commands::Inspect {
            file,
            street,
            streets,
        } => {
            let streets = street_table(streets.as_deref())?;
            let run = RunRecord::load(&file, &street, &streets)?;

            info!(
                street = run.street(),
                file = %run.source().display(),
                street_length_m = run.street_length_m(),
                start_ms = run.start_ms(),
                end_ms = run.end_ms(),
                points = run.points().len(),
                points_within_markers = run.filtered_points(FixFilter::WithinMarkers).len(),
                reference_velocity = run.reference_velocity(),
                "Run"
            );
        }
        Commands::Streets { streets } => {
            let streets = street_table(streets.as_deref())?;
            for (street, length_m) in streets.iter() {
                info!(street, length_m, "Street");
            }
            info!(total = streets.len(), "Street table");
        }
    }

    Ok(())
}

/// Colored stderr logs plus a JSON rolling log file.
///
/// The returned guard flushes the file writer when dropped.
fn init_tracing() -> WorkerGuard {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/street_velocity.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("street_velocity.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

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

    file_guard
}

fn street_table(path: Option<&str>) -> Result<StreetTable> {
    match path {
        Some(path) => {
            let table = StreetTable::load(path)?;
            info!(path, streets = table.len(), "Loaded street table");
            Ok(table)
        }
        None => Ok(StreetTable::default()),
    }
}
