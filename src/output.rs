//! Output formatting and persistence for sweep results.
//!
//! Supports a log table, JSON serialization, and CSV export.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::analyzers::types::{SweepReport, WindowStatistic};
use csv::WriterBuilder;
use std::fs::File;

/// Logs one line per window size, followed by rejected runs and empty windows.
pub fn print_table(report: &SweepReport) {
    info!(
        runs = report.runs_analyzed,
        rejected = report.rejected_runs.len(),
        distance_model = %report.distance_model,
        fix_filter = ?report.fix_filter,
        "Velocity error by averaging window (m/s)"
    );

    for w in &report.windows {
        info!(
            "W={:<2} n={:<6} mean={:.4} std={:.4} p95={:.4} max={:.4}",
            w.window_size, w.samples, w.mean_error, w.std_error, w.p95_error, w.max_error
        );
    }

    for rejected in &report.rejected_runs {
        warn!(street = %rejected.street, file = %rejected.file, reason = %rejected.reason, "Rejected run");
    }

    if !report.insufficient_windows.is_empty() {
        warn!(windows = ?report.insufficient_windows, "Window sizes without samples");
    }
}

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &SweepReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes the report as pretty-printed JSON to `path`, replacing any existing file.
pub fn write_json(path: &str, report: &SweepReport) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    debug!(path, "JSON report written");
    Ok(())
}

/// Writes one CSV row per window size to `path`, replacing any existing file.
pub fn write_csv(path: &str, windows: &[WindowStatistic]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for window in windows {
        writer.serialize(window)?;
    }
    writer.flush()?;

    debug!(path, rows = windows.len(), "CSV report written");
    Ok(())
}
