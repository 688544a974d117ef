//! Velocity-estimator evaluation.
//!
//! This module loads run logs for every configured street, downsamples each
//! run with a sweep of averaging window sizes, compares the velocity derived
//! from consecutive downsampled points with the run's reference velocity, and
//! aggregates the deviations into per-window error statistics.

pub mod aggregate;
pub mod analyzer;
pub mod downsample;
pub mod types;
pub mod utility;
pub mod velocity;
