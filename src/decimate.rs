// src/decimate.rs
//! Sample-rate reduction.
//!
//! A recording is decimated by splitting its samples into consecutive
//! groups of `factor` and collapsing each group to one value. The final
//! group may be shorter than `factor`; it is collapsed over its actual
//! length, never padded.

use crate::error::RtxError;
use std::fmt;
use std::str::FromStr;

/// How a group of consecutive samples collapses to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReductionMode {
    /// Arithmetic mean of the group. Smooths noise; the default.
    #[default]
    Mean,
    /// First sample of the group, the rest are discarded. Cheap, and keeps
    /// every surviving value bit-identical to a recorded one.
    Drop,
}

impl ReductionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReductionMode::Mean => "mean",
            ReductionMode::Drop => "drop",
        }
    }
}

impl fmt::Display for ReductionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReductionMode {
    type Err = RtxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(ReductionMode::Mean),
            "drop" => Ok(ReductionMode::Drop),
            other => Err(RtxError::InvalidReductionMode(other.to_string())),
        }
    }
}

/// Reduce `values` by `factor`, one output value per group of `factor`
/// consecutive inputs.
///
/// A factor of zero or one is a no-op and returns the input unchanged.
///
/// # Example
///
/// ```
/// use rtx_rs::decimate::{reduce_samples, ReductionMode};
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(
///     reduce_samples(&values, 2, ReductionMode::Mean),
///     vec![1.5, 3.5, 5.0]
/// );
/// assert_eq!(
///     reduce_samples(&values, 2, ReductionMode::Drop),
///     vec![1.0, 3.0, 5.0]
/// );
/// ```
pub fn reduce_samples(values: &[f64], factor: usize, mode: ReductionMode) -> Vec<f64> {
    if factor <= 1 {
        return values.to_vec();
    }

    match mode {
        ReductionMode::Mean => values
            .chunks(factor)
            .map(|group| group.iter().sum::<f64>() / group.len() as f64)
            .collect(),
        // chunks() never yields an empty group
        ReductionMode::Drop => values.chunks(factor).map(|group| group[0]).collect(),
    }
}
