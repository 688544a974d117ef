use crate::analyzers::types::WindowStatistic;
use crate::analyzers::utility::{max, mean, percentile, stddev};
use crate::error::AnalysisError;

/// Percentile reported alongside mean, standard deviation and max.
const TAIL_PERCENTILE: f64 = 95.0;

/// Aggregates the error samples of one window size into a [`WindowStatistic`].
///
/// # Errors
///
/// [`AnalysisError::InsufficientData`] when `samples` is empty.
pub fn aggregate_window(
    window_size: usize,
    mut samples: Vec<f64>,
) -> Result<WindowStatistic, AnalysisError> {
    let insufficient = || AnalysisError::InsufficientData { window_size };

    let mean_error = mean(&samples).ok_or_else(insufficient)?;
    let std_error = stddev(&samples, mean_error).ok_or_else(insufficient)?;
    let max_error = max(&samples).ok_or_else(insufficient)?;

    samples.sort_by(f64::total_cmp);
    let p95_error = percentile(&samples, TAIL_PERCENTILE).ok_or_else(insufficient)?;

    Ok(WindowStatistic {
        window_size,
        samples: samples.len(),
        mean_error,
        std_error,
        p95_error,
        max_error,
    })
}
