//! One timed traversal of a street.

use crate::config::{FixFilter, StreetTable};
use crate::error::AnalysisError;
use crate::geodesy::Coordinate;
use crate::parser::{LogRecord, parse_run_log};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A raw GPS fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixPoint {
    pub timestamp_ms: i64,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl FixPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude_deg, self.longitude_deg)
    }
}

/// A run with its ground-truth velocity.
///
/// The reference velocity is fixed at construction from the street length and
/// the marker interval; GPS fixes never influence it.
#[derive(Debug, Clone)]
pub struct RunRecord {
    street: String,
    source: PathBuf,
    street_length_m: f64,
    start_ms: i64,
    end_ms: i64,
    points: Vec<FixPoint>,
    reference_velocity: f64,
}

impl RunRecord {
    /// Builds a run from its markers and fixes.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidRun`] if `end_ms <= start_ms`, the interval does
    /// not fit in an `i64`, or the street length is not a positive finite number.
    pub fn new(
        street: &str,
        source: &Path,
        street_length_m: f64,
        start_ms: i64,
        end_ms: i64,
        points: Vec<FixPoint>,
    ) -> Result<Self, AnalysisError> {
        if end_ms <= start_ms {
            return Err(AnalysisError::InvalidRun {
                file: source.to_path_buf(),
                reason: format!("end marker {end_ms} ms is not after start marker {start_ms} ms"),
            });
        }
        if !street_length_m.is_finite() || street_length_m <= 0.0 {
            return Err(AnalysisError::InvalidRun {
                file: source.to_path_buf(),
                reason: format!("street length {street_length_m} m is not positive"),
            });
        }

        let elapsed_ms = end_ms
            .checked_sub(start_ms)
            .ok_or_else(|| AnalysisError::InvalidRun {
                file: source.to_path_buf(),
                reason: format!("marker interval {start_ms}..{end_ms} ms overflows"),
            })?;
        let reference_velocity = street_length_m * 1000.0 / elapsed_ms as f64;

        Ok(Self {
            street: street.to_string(),
            source: source.to_path_buf(),
            street_length_m,
            start_ms,
            end_ms,
            points,
            reference_velocity,
        })
    }

    /// Builds a run from parsed log records.
    ///
    /// The first marker starts the run and the second ends it; later markers
    /// are ignored. Every fix is kept, including those outside the markers.
    pub fn from_records(
        street: &str,
        source: &Path,
        street_length_m: f64,
        records: &[LogRecord],
    ) -> Result<Self, AnalysisError> {
        let mut start_ms = None;
        let mut end_ms = None;
        let mut points = Vec::new();

        for record in records {
            match *record {
                LogRecord::Marker { timestamp_ms } => match (start_ms, end_ms) {
                    (None, _) => start_ms = Some(timestamp_ms),
                    (Some(_), None) => end_ms = Some(timestamp_ms),
                    (Some(_), Some(_)) => {
                        warn!(file = %source.display(), timestamp_ms, "Ignoring extra marker");
                    }
                },
                LogRecord::Fix(point) => points.push(point),
            }
        }

        let (Some(start_ms), Some(end_ms)) = (start_ms, end_ms) else {
            let found = usize::from(start_ms.is_some()) + usize::from(end_ms.is_some());
            return Err(AnalysisError::InvalidRun {
                file: source.to_path_buf(),
                reason: format!("expected 2 marker records, found {found}"),
            });
        };

        Self::new(street, source, street_length_m, start_ms, end_ms, points)
    }

    /// Parses the run log at `path` for `street`.
    pub fn load(path: &Path, street: &str, streets: &StreetTable) -> Result<Self, AnalysisError> {
        let street_length_m = streets.length_m(street)?;
        let records = parse_run_log(path)?;
        let run = Self::from_records(street, path, street_length_m, &records)?;

        debug!(
            street,
            file = %path.display(),
            points = run.points.len(),
            reference_velocity = run.reference_velocity,
            "Run loaded"
        );
        Ok(run)
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn street_length_m(&self) -> f64 {
        self.street_length_m
    }

    pub fn start_ms(&self) -> i64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> i64 {
        self.end_ms
    }

    /// Ground-truth speed: street length over the marker interval, in m/s.
    pub fn reference_velocity(&self) -> f64 {
        self.reference_velocity
    }

    /// All fixes in file order.
    pub fn points(&self) -> &[FixPoint] {
        &self.points
    }

    /// Fixes selected by `filter`, in file order.
    pub fn filtered_points(&self, filter: FixFilter) -> Cow<'_, [FixPoint]> {
        match filter {
            FixFilter::All => Cow::Borrowed(&self.points),
            FixFilter::WithinMarkers => Cow::Owned(
                self.points
                    .iter()
                    .filter(|p| (self.start_ms..=self.end_ms).contains(&p.timestamp_ms))
                    .copied()
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_run_log_from_reader;
    use approx::assert_relative_eq;

    fn fix(timestamp_ms: i64) -> LogRecord {
        LogRecord::Fix(FixPoint {
            timestamp_ms,
            latitude_deg: 35.9,
            longitude_deg: 14.5,
        })
    }

    fn marker(timestamp_ms: i64) -> LogRecord {
        LogRecord::Marker { timestamp_ms }
    }

    #[test]
    fn test_reference_velocity_for_john_street() {
        let records = [marker(1000), fix(5000), marker(21000)];
        let run = RunRecord::from_records("JOhN", Path::new("JOhN/run"), 41.64, &records).unwrap();

        assert_relative_eq!(run.reference_velocity(), 2.082, epsilon = 1e-12);
        assert_eq!(run.start_ms(), 1000);
        assert_eq!(run.end_ms(), 21000);
    }

    #[test]
    fn test_reference_velocity_formula() {
        let run = RunRecord::new("S", Path::new("s"), 95.74, 250, 30_750, vec![]).unwrap();
        assert_relative_eq!(
            run.reference_velocity(),
            95.74 * 1000.0 / 30_500.0,
            epsilon = f64::EPSILON
        );
    }

    #[test]
    fn test_single_marker_is_invalid() {
        let records = [marker(1000), fix(1500), fix(2500)];
        let err = RunRecord::from_records("JOhN", Path::new("r"), 41.64, &records).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRun { .. }));
    }

    #[test]
    fn test_end_before_start_is_invalid() {
        let records = [marker(5000), marker(5000)];
        let err = RunRecord::from_records("JOhN", Path::new("r"), 41.64, &records).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRun { .. }));
    }

    #[test]
    fn test_extreme_marker_timestamps_are_invalid() {
        let records = parse_run_log_from_reader(
            "P -9223372036854775808\nL 0 35.9 14.5\nP 9223372036854775807\n".as_bytes(),
            Path::new("r"),
        )
        .unwrap();
        assert_eq!(records[0], marker(i64::MIN));
        assert_eq!(records[2], marker(i64::MAX));

        let err = RunRecord::from_records("JOhN", Path::new("r"), 41.64, &records).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRun { .. }));
    }

    #[test]
    fn test_fixes_outside_markers_are_kept() {
        let records = [fix(0), marker(1000), fix(2000), marker(3000), fix(4000)];
        let run = RunRecord::from_records("JOhN", Path::new("r"), 41.64, &records).unwrap();

        assert_eq!(run.points().len(), 3);
        assert_eq!(run.filtered_points(FixFilter::All).len(), 3);

        let inside = run.filtered_points(FixFilter::WithinMarkers);
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].timestamp_ms, 2000);
    }

    #[test]
    fn test_extra_markers_do_not_move_the_end() {
        let records = [marker(1000), marker(11000), marker(90000)];
        let run = RunRecord::from_records("JOhN", Path::new("r"), 41.64, &records).unwrap();
        assert_eq!(run.end_ms(), 11000);
    }
}
