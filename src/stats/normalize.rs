//! Capped-Scale Normalization Module
//! Turns averaged operation times into radar values shared by all devices.
//!
//! For every axis the slowest measured average is stretched by `cap`, so the
//! slowest device plots at `1 - 1/cap` instead of the center and the fastest
//! plots closest to the outer ring.

use crate::data::catalog::AxisSpec;
use crate::data::sample::{MetricSample, Series, NOT_SUPPORTED, UNSUPPORTED_VALUE};
use crate::data::Profile;
use thiserror::Error;
use tracing::debug;

/// Slowdown factor used by the published charts.
pub const DEFAULT_CAP: f64 = 1.11;

#[derive(Error, Debug, PartialEq)]
pub enum NormalizeError {
    #[error("Slowdown cap must be greater than 1, got {0}")]
    InvalidCap(f64),
}

/// Ratios of each profile's average to the capped slowest average, per axis.
///
/// `ratios[profile][axis]` is 0 when the profile has no measurement.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub axes: Vec<AxisSpec>,
    pub cap: f64,
    ratios: Vec<Vec<f64>>,
}

impl NormalizedTable {
    /// Normalize `profiles` over `axes`. Every profile shares one scale per axis.
    pub fn compute(axes: &[AxisSpec], profiles: &[Profile], cap: f64) -> Result<Self, NormalizeError> {
        if !(cap.is_finite() && cap > 1.0) {
            return Err(NormalizeError::InvalidCap(cap));
        }

        let mut ratios = vec![vec![0.0; axes.len()]; profiles.len()];
        for (j, axis) in axes.iter().enumerate() {
            let max_avg = profiles
                .iter()
                .filter_map(|p| p.operation_avg(axis.function))
                .fold(0.0_f64, f64::max);
            if max_avg <= 0.0 {
                debug!(axis = axis.label.trim(), "no device measured this axis");
                continue;
            }
            for (i, profile) in profiles.iter().enumerate() {
                if let Some(avg) = profile.operation_avg(axis.function) {
                    ratios[i][j] = avg / (cap * max_avg);
                }
            }
        }

        Ok(Self {
            axes: axes.to_vec(),
            cap,
            ratios,
        })
    }

    pub fn ratio(&self, profile: usize, axis: usize) -> f64 {
        self.ratios
            .get(profile)
            .and_then(|row| row.get(axis))
            .copied()
            .unwrap_or(0.0)
    }

    /// Build the radar series of one profile.
    ///
    /// `profile` must be the profile at index `index` of the normalized set.
    /// With `title_with_axis` the timing title is prefixed by the axis label.
    pub fn series_for(&self, index: usize, profile: &Profile, title_with_axis: bool) -> Series {
        self.axes
            .iter()
            .enumerate()
            .map(|(j, axis)| {
                let ratio = self.ratio(index, j);
                let value = if ratio != 0.0 {
                    round_to(1.0 - ratio, 3)
                } else {
                    UNSUPPORTED_VALUE
                };
                let title = match profile.operation_avg(axis.function) {
                    Some(avg) if title_with_axis => format!("{} {}", axis.label.trim(), format_ms(avg)),
                    Some(avg) => format_ms(avg),
                    None => NOT_SUPPORTED.to_string(),
                };
                MetricSample::new(axis.label, value, title)
            })
            .collect()
    }
}

/// Round half away from zero to `digits` decimals.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Timing title, rounded to two decimals and printed in shortest form (`"134.0 ms"`).
pub fn format_ms(avg_ms: f64) -> String {
    format!("{:?} ms", round_to(avg_ms, 2))
}
