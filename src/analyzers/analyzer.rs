use crate::analyzers::aggregate::aggregate_window;
use crate::analyzers::downsample::downsample;
use crate::analyzers::types::{RejectedRun, SweepReport, WindowOutcome};
use crate::analyzers::velocity::{VelocityErrors, velocity_errors};
use crate::config::{StreetTable, SweepConfig};
use crate::error::AnalysisError;
use crate::geodesy::DistanceModel;
use crate::run::RunRecord;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Runs loaded from a data directory, with the ones that had to be excluded.
#[derive(Debug, Default)]
pub struct RunSet {
    pub runs: Vec<RunRecord>,
    pub rejected: Vec<RejectedRun>,
}

/// Loads every run under `<data_dir>/<street>/` for the streets in `streets`.
///
/// Runs without a usable marker pair are logged and collected in
/// [`RunSet::rejected`]. A malformed record aborts the load.
#[tracing::instrument(skip_all, fields(data_dir = %data_dir.display()))]
pub fn load_runs(data_dir: &Path, streets: &StreetTable) -> Result<RunSet, AnalysisError> {
    let mut set = RunSet::default();

    for (street, _) in streets.iter() {
        let street_dir = data_dir.join(street);
        if !street_dir.is_dir() {
            warn!(street, dir = %street_dir.display(), "No run directory for street");
            continue;
        }

        for path in load_run_files(&street_dir)? {
            match RunRecord::load(&path, street, streets) {
                Ok(run) => set.runs.push(run),
                Err(e @ AnalysisError::InvalidRun { .. }) => {
                    warn!(street, error = %e, "Run rejected");
                    set.rejected.push(RejectedRun {
                        street: street.to_string(),
                        file: path.display().to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    info!(
        runs = set.runs.len(),
        rejected = set.rejected.len(),
        "Runs loaded"
    );
    Ok(set)
}

fn load_run_files(street_dir: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
    let mut files = Vec::new();

    let entries = fs::read_dir(street_dir).map_err(|e| AnalysisError::io(street_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| AnalysisError::io(street_dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Evaluates the downsampling estimator for every configured window size.
///
/// Window sizes are processed in parallel; the outcomes are returned in
/// ascending window order.
pub fn sweep(
    runs: &[RunRecord],
    config: &SweepConfig,
    model: &dyn DistanceModel,
) -> Vec<WindowOutcome> {
    config
        .window_sizes()
        .into_par_iter()
        .map(|window_size| evaluate_window(runs, window_size, config, model))
        .collect()
}

/// Collects error samples for one window size over all runs and offsets.
pub fn evaluate_window(
    runs: &[RunRecord],
    window_size: usize,
    config: &SweepConfig,
    model: &dyn DistanceModel,
) -> WindowOutcome {
    let mut errors = VelocityErrors::default();

    for run in runs {
        let points = run.filtered_points(config.fix_filter);
        for offset in 0..window_size {
            let downsampled = downsample(&points, window_size, offset);
            velocity_errors(&downsampled, run.reference_velocity(), model, &mut errors);
        }
    }

    debug!(
        window_size,
        samples = errors.samples.len(),
        skipped_pairs = errors.skipped_pairs,
        "Window evaluated"
    );

    WindowOutcome {
        window_size,
        skipped_pairs: errors.skipped_pairs,
        statistic: aggregate_window(window_size, errors.samples),
    }
}

/// Loads all runs under `data_dir` and sweeps them into a [`SweepReport`].
pub fn analyze(
    data_dir: &Path,
    streets: &StreetTable,
    config: &SweepConfig,
    model: &dyn DistanceModel,
) -> Result<SweepReport, AnalysisError> {
    let set = load_runs(data_dir, streets)?;
    let outcomes = sweep(&set.runs, config, model);

    let mut report = SweepReport {
        generated_at: chrono::Utc::now(),
        distance_model: model.name().to_string(),
        fix_filter: config.fix_filter,
        runs_analyzed: set.runs.len(),
        rejected_runs: set.rejected,
        skipped_pairs: 0,
        windows: Vec::new(),
        insufficient_windows: Vec::new(),
    };

    for outcome in outcomes {
        report.skipped_pairs += outcome.skipped_pairs;
        match outcome.statistic {
            Ok(statistic) => report.windows.push(statistic),
            Err(e) => {
                warn!(error = %e, "Window has no statistics");
                report.insufficient_windows.push(outcome.window_size);
            }
        }
    }

    Ok(report)
}
