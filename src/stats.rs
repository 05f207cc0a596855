//! Order statistics over flow-rate samples.
//!
//! Helpers here assume finite input; validation happens in
//! [`crate::uniformity`] before any of these are called.

use serde::{Deserialize, Serialize};

/// Share of the sample that makes up the low quartile.
pub const LOW_QUARTILE_FRACTION: f64 = 0.25;

/// Returns an ascending copy of `values`. The caller's slice is untouched.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Neumaier-compensated sum.
pub fn compensated_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in values {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

/// Arithmetic mean, shifted by the first element.
///
/// Computes `x0 + sum((xi - x0) / n)`, so a sample of identical values
/// returns that value bit for bit. Each term is scaled before summing, so
/// finite non-negative input always yields a finite mean. Returns `NaN` for
/// an empty slice.
pub fn average(values: &[f64]) -> f64 {
    let Some(&shift) = values.first() else {
        return f64::NAN;
    };
    let n = values.len() as f64;
    let scaled: Vec<f64> = values.iter().map(|v| (v - shift) / n).collect();
    shift + compensated_sum(&scaled)
}

/// Number of values in the low quartile: `max(1, floor(n * 0.25))`.
pub fn low_quartile_count(n: usize) -> usize {
    ((n as f64 * LOW_QUARTILE_FRACTION).floor() as usize).max(1)
}

/// Mean of the `low_quartile_count` smallest values of an ascending slice.
pub fn low_quartile_mean(sorted: &[f64]) -> f64 {
    let count = low_quartile_count(sorted.len()).min(sorted.len());
    average(&sorted[..count])
}

/// Median of an ascending slice.
pub fn median(sorted: &[f64]) -> f64 {
    let len = sorted.len();
    if len == 0 {
        return f64::NAN;
    }
    if len % 2 == 1 {
        sorted[len / 2]
    } else {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    }
}

/// Population standard deviation (denominator `n`).
///
/// Deviations are scaled by the largest one before squaring.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mean = average(values);
    let scale = values.iter().fold(0.0_f64, |acc, v| acc.max((v - mean).abs()));
    if scale == 0.0 {
        return 0.0;
    }
    let squares: Vec<f64> = values
        .iter()
        .map(|v| {
            let d = (v - mean) / scale;
            d * d
        })
        .collect();
    scale * (compensated_sum(&squares) / values.len() as f64).sqrt()
}

/// Descriptive statistics shown next to the uniformity coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowSummary {
    pub low: f64,
    pub high: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl FlowSummary {
    /// Builds the summary from an ascending, non-empty slice.
    pub fn from_sorted(sorted: &[f64]) -> Self {
        FlowSummary {
            low: sorted.first().copied().unwrap_or(f64::NAN),
            high: sorted.last().copied().unwrap_or(f64::NAN),
            median: median(sorted),
            std_dev: std_dev(sorted),
        }
    }
}
