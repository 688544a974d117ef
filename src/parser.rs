//! Parser for space-delimited GPS run logs.
//!
//! Each line holds one record:
//!
//! | Tag | Fields                                            |
//! |-----|---------------------------------------------------|
//! | `P` | `<timestamp_ms> ...` (marker)                     |
//! | `L` | `<timestamp_ms> <latitude_deg> <longitude_deg> ...` (fix) |
//!
//! Trailing fields are ignored, and so are lines with any other tag.

use crate::error::AnalysisError;
use crate::run::FixPoint;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::trace;

/// One parsed line of a run log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogRecord {
    /// Start of the run on first occurrence, end on the second.
    Marker { timestamp_ms: i64 },
    Fix(FixPoint),
}

/// Reads and parses the run log at `path`.
pub fn parse_run_log(path: &Path) -> Result<Vec<LogRecord>, AnalysisError> {
    let file = File::open(path).map_err(|e| AnalysisError::io(path, e))?;
    parse_run_log_from_reader(file, path)
}

/// Parses a run log from any reader. `source` is only used in error messages.
///
/// # Errors
///
/// Returns [`AnalysisError::Parse`] for the first malformed record; nothing is
/// returned for the records before it.
pub fn parse_run_log_from_reader<R: Read>(
    reader: R,
    source: &Path,
) -> Result<Vec<LogRecord>, AnalysisError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut row = StringRecord::new();

    loop {
        let more = rdr.read_record(&mut row).map_err(|e| AnalysisError::Parse {
            file: source.to_path_buf(),
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        if !more {
            break;
        }

        let line = row.position().map(|p| p.line()).unwrap_or(0);
        if row.iter().all(str::is_empty) {
            continue;
        }

        match parse_record(&row) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => trace!(line, tag = &row[0], "Ignoring record with unknown tag"),
            Err(reason) => {
                return Err(AnalysisError::Parse {
                    file: source.to_path_buf(),
                    line,
                    reason,
                });
            }
        }
    }

    Ok(records)
}

/// Parses a single record. Returns `Ok(None)` for tags other than `P` and `L`.
fn parse_record(row: &StringRecord) -> Result<Option<LogRecord>, String> {
    match row.get(0) {
        Some("P") => {
            let timestamp_ms = field(row, 1, "timestamp")?;
            Ok(Some(LogRecord::Marker { timestamp_ms }))
        }
        Some("L") => {
            let timestamp_ms = field(row, 1, "timestamp")?;
            let latitude_deg = field(row, 2, "latitude")?;
            let longitude_deg = field(row, 3, "longitude")?;
            Ok(Some(LogRecord::Fix(FixPoint {
                timestamp_ms,
                latitude_deg,
                longitude_deg,
            })))
        }
        _ => Ok(None),
    }
}

fn field<T>(row: &StringRecord, index: usize, name: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = row
        .get(index)
        .ok_or_else(|| format!("missing {name} field (record has {} fields)", row.len()))?;
    raw.parse()
        .map_err(|e| format!("invalid {name} '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Vec<LogRecord>, AnalysisError> {
        parse_run_log_from_reader(input.as_bytes(), Path::new("run.txt"))
    }

    #[test]
    fn test_parse_markers_and_fixes() {
        let records = parse("P 1000\nL 1500 35.8989 14.5146\nP 21000\n").unwrap();

        assert_eq!(
            records,
            vec![
                LogRecord::Marker { timestamp_ms: 1000 },
                LogRecord::Fix(FixPoint {
                    timestamp_ms: 1500,
                    latitude_deg: 35.8989,
                    longitude_deg: 14.5146,
                }),
                LogRecord::Marker {
                    timestamp_ms: 21000
                },
            ]
        );
    }

    #[test]
    fn test_trailing_fields_are_ignored() {
        let records = parse("P 1000 button\nL 1500 35.5 14.5 12.0 gps\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], LogRecord::Marker { timestamp_ms: 1000 });
    }

    #[test]
    fn test_unknown_tags_and_blank_lines_are_skipped() {
        let records = parse("A 1000 0.1 0.2 9.8\n\nL 1500 35.5 14.5\n").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_non_numeric_field_reports_line() {
        let err = parse("P 1000\nL 1500 35.5 14.5\nL 2000 north 14.5\n").unwrap_err();

        match err {
            AnalysisError::Parse { file, line, reason } => {
                assert_eq!(file, Path::new("run.txt"));
                assert_eq!(line, 3);
                assert!(reason.contains("latitude"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let err = parse("L 1500 35.5\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_fractional_timestamp_is_an_error() {
        assert!(parse("P 1000.5\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = parse_run_log(Path::new("/nonexistent/run.txt")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
    }
}
