//! Data types produced by the window sweep.

use crate::config::FixFilter;
use crate::error::AnalysisError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Error statistics for one averaging window size, in m/s.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowStatistic {
    pub window_size: usize,
    pub samples: usize,
    pub mean_error: f64,
    pub std_error: f64,
    pub p95_error: f64,
    pub max_error: f64,
}

/// Result of evaluating one window size across all runs.
#[derive(Debug)]
pub struct WindowOutcome {
    pub window_size: usize,
    /// Downsampled pairs with a non-positive time difference.
    pub skipped_pairs: usize,
    pub statistic: Result<WindowStatistic, AnalysisError>,
}

/// A run excluded from the sweep.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRun {
    pub street: String,
    pub file: String,
    pub reason: String,
}

/// Complete sweep result, written out as JSON.
#[derive(Debug, Serialize)]
pub struct SweepReport {
    pub generated_at: DateTime<Utc>,
    pub distance_model: String,
    pub fix_filter: FixFilter,
    pub runs_analyzed: usize,
    pub rejected_runs: Vec<RejectedRun>,
    pub skipped_pairs: usize,
    pub windows: Vec<WindowStatistic>,
    pub insufficient_windows: Vec<usize>,
}
