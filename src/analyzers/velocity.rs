use crate::analyzers::downsample::DownsampledPoint;
use crate::geodesy::DistanceModel;

/// Deviations of the pairwise velocity estimate from a reference velocity.
#[derive(Debug, Default)]
pub struct VelocityErrors {
    pub samples: Vec<f64>,
    pub skipped_pairs: usize,
}

/// Estimates the velocity between each pair of consecutive downsampled points
/// and records its absolute deviation from `reference_velocity`.
///
/// Velocity is `distance_m * 1000 / elapsed_ms`, i.e. meters per second.
/// Pairs whose time difference is not positive are counted in
/// `skipped_pairs` instead of producing a sample.
pub fn velocity_errors(
    points: &[DownsampledPoint],
    reference_velocity: f64,
    model: &dyn DistanceModel,
    errors: &mut VelocityErrors,
) {
    for pair in points.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let elapsed_ms = to.timestamp_ms - from.timestamp_ms;
        if elapsed_ms <= 0.0 {
            errors.skipped_pairs += 1;
            continue;
        }

        let distance_m = model.distance_m(from.coordinate(), to.coordinate());
        let velocity = distance_m * 1000.0 / elapsed_ms;
        errors.samples.push((velocity - reference_velocity).abs());
    }
}
