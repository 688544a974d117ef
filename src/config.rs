//! Street-length table and sweep settings.

use crate::error::AnalysisError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Streets of the study and their measured lengths in meters.
static DEFAULT_STREETS: &[(&str, f64)] = &[
    ("DOMinic", 47.63),
    ("FReDerick", 142.10),
    ("ARChbishop", 48.49),
    ("REPublic", 141.00),
    ("STRaight", 95.74),
    ("MeLiTa", 43.27),
    ("iFRaN", 97.01),
    ("JOhN", 41.64),
    ("SouTH", 58.88),
    ("ZEKka", 341.40),
    ("THEatre", 58.36),
    ("BAKery", 341.59),
];

/// Maps street names to their physical length in meters.
///
/// Can be loaded from a plain JSON object on disk:
/// ```json
/// {
///   "JOhN": 41.64,
///   "SouTH": 58.88
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StreetTable {
    lengths: BTreeMap<String, f64>,
}

impl StreetTable {
    /// Builds a table, rejecting non-finite or non-positive lengths.
    pub fn new(lengths: BTreeMap<String, f64>) -> Result<Self, AnalysisError> {
        if let Some((street, &length_m)) = lengths
            .iter()
            .find(|(_, length)| !length.is_finite() || **length <= 0.0)
        {
            return Err(AnalysisError::InvalidStreetLength {
                street: street.clone(),
                length_m,
            });
        }
        Ok(Self { lengths })
    }

    /// Loads the table from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let lengths: BTreeMap<String, f64> = serde_json::from_str(&content)?;
        Ok(Self::new(lengths)?)
    }

    /// Returns the length in meters for `street`.
    pub fn length_m(&self, street: &str) -> Result<f64, AnalysisError> {
        self.lengths
            .get(street)
            .copied()
            .ok_or_else(|| AnalysisError::UnknownStreet(street.to_string()))
    }

    /// Iterates over all `(street, length_m)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.lengths.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

impl Default for StreetTable {
    fn default() -> Self {
        Self {
            lengths: DEFAULT_STREETS
                .iter()
                .map(|(name, length)| (name.to_string(), *length))
                .collect(),
        }
    }
}

/// Which fix events of a run feed the velocity estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixFilter {
    /// Every fix in the file, including those outside the marker interval.
    #[default]
    All,
    /// Only fixes with `start_ms <= timestamp <= end_ms`.
    WithinMarkers,
}

/// Window sizes to evaluate and how fixes are selected.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    min_window: usize,
    max_window: usize,
    pub fix_filter: FixFilter,
}

impl SweepConfig {
    pub fn new(
        min_window: usize,
        max_window: usize,
        fix_filter: FixFilter,
    ) -> Result<Self, AnalysisError> {
        if min_window == 0 || min_window > max_window {
            return Err(AnalysisError::InvalidWindowRange {
                min: min_window,
                max: max_window,
            });
        }
        Ok(Self {
            min_window,
            max_window,
            fix_filter,
        })
    }

    pub fn window_sizes(&self) -> RangeInclusive<usize> {
        self.min_window..=self.max_window
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_window: 1,
            max_window: 9,
            fix_filter: FixFilter::All,
        }
    }
}
