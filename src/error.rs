//! Error type shared by the parsing, loading and analysis stages.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A record in a run log could not be parsed.
    #[error("{}:{}: {}", .file.display(), .line, .reason)]
    Parse {
        file: PathBuf,
        line: u64,
        reason: String,
    },

    /// A run cannot produce a reference velocity (missing markers or a
    /// non-positive duration).
    #[error("invalid run {}: {}", .file.display(), .reason)]
    InvalidRun { file: PathBuf, reason: String },

    /// No velocity samples were collected for a window size.
    #[error("window size {window_size}: no velocity samples to aggregate")]
    InsufficientData { window_size: usize },

    #[error("street '{0}' is not in the street table")]
    UnknownStreet(String),

    #[error("invalid window range {min}..={max}: window sizes start at 1")]
    InvalidWindowRange { min: usize, max: usize },

    #[error("street '{street}' has invalid length {length_m} m")]
    InvalidStreetLength { street: String, length_m: f64 },

    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }
}
