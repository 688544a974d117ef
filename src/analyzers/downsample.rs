use crate::geodesy::Coordinate;
use crate::run::FixPoint;

/// The mean of a window of consecutive fixes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownsampledPoint {
    pub timestamp_ms: f64,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl DownsampledPoint {
    /// Averages timestamp, latitude and longitude independently.
    fn mean_of(window: &[FixPoint]) -> Self {
        let n = window.len() as f64;
        let (t, lat, lon) = window.iter().fold((0.0, 0.0, 0.0), |(t, lat, lon), p| {
            (
                t + p.timestamp_ms as f64,
                lat + p.latitude_deg,
                lon + p.longitude_deg,
            )
        });
        Self {
            timestamp_ms: t / n,
            latitude_deg: lat / n,
            longitude_deg: lon / n,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude_deg, self.longitude_deg)
    }
}

/// Collapses `points[offset..]` into consecutive windows of `window` fixes.
///
/// A trailing partial window is dropped, so the result holds
/// `(points.len() - offset) / window` points.
pub fn downsample(points: &[FixPoint], window: usize, offset: usize) -> Vec<DownsampledPoint> {
    if window == 0 || offset >= points.len() {
        return Vec::new();
    }
    points[offset..]
        .chunks_exact(window)
        .map(DownsampledPoint::mean_of)
        .collect()
}
