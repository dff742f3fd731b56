//! The streaming statistics pass (§4.7): sort the trial samples once, then
//! derive percentiles, a histogram, a CDF, and summary moments from the
//! sorted buffer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::DomainError;

/// The seventeen percentile ranks `SimulationRun.percentiles` always
/// carries (§3).
pub const STANDARD_PERCENTILE_RANKS: [u32; 17] = [
    5, 10, 25, 50, 55, 60, 65, 70, 75, 80, 85, 90, 95, 96, 97, 98, 99,
];

/// One contiguous, non-overlapping bin of the sample histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
}

/// Sort `samples` ascending in place. The rest of this module's functions
/// all expect to be called with an already-sorted slice.
pub fn sort_samples(samples: &mut [f64]) {
    samples.sort_by(|a, b| a.partial_cmp(b).expect("samples must not be NaN"));
}

/// Linear-interpolated percentile at real-valued position `p * (n - 1)`.
/// `p = 0` and `p = 1` return the first and last element respectively.
pub fn percentile(sorted: &[f64], p: f64) -> Result<f64, DomainError> {
    if sorted.is_empty() {
        return Err(DomainError::EmptySampleSet);
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(DomainError::ProbabilityOutOfBounds { p });
    }
    let n = sorted.len();
    if n == 1 {
        return Ok(sorted[0]);
    }
    let position = p * (n - 1) as f64;
    let lower_index = position.floor() as usize;
    let upper_index = position.ceil() as usize;
    if lower_index == upper_index {
        return Ok(sorted[lower_index]);
    }
    let fraction = position - lower_index as f64;
    Ok(sorted[lower_index] + fraction * (sorted[upper_index] - sorted[lower_index]))
}

/// The seventeen standard percentile ranks, keyed by integer percentile.
pub fn compute_standard_percentiles(sorted: &[f64]) -> Result<BTreeMap<u32, f64>, DomainError> {
    let mut map = BTreeMap::new();
    for &rank in STANDARD_PERCENTILE_RANKS.iter() {
        map.insert(rank, percentile(sorted, rank as f64 / 100.0)?);
    }
    Ok(map)
}

/// Arithmetic mean, `0` on an empty slice.
pub fn mean(sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.iter().sum::<f64>() / sorted.len() as f64
}

/// Population standard deviation, `0` on an empty slice or constant input.
pub fn standard_deviation(sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let m = mean(sorted);
    let variance = sorted.iter().map(|v| (v - m).powi(2)).sum::<f64>() / sorted.len() as f64;
    variance.sqrt()
}

/// Exactly `bin_count` contiguous bins spanning `[min, max]`, closed-open
/// except the final bin which is closed-closed. Counts always sum to `n`.
/// A constant input collapses to a single `[v, v]` bin holding every
/// sample; an empty input returns no bins.
pub fn histogram(sorted: &[f64], bin_count: u32) -> Vec<HistogramBin> {
    if sorted.is_empty() {
        return Vec::new();
    }
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: sorted.len() as u32,
        }];
    }

    let bin_count = bin_count.max(1);
    let width = (max - min) / bin_count as f64;
    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| {
            let lower = min + width * i as f64;
            let upper = if i + 1 == bin_count {
                max
            } else {
                min + width * (i + 1) as f64
            };
            HistogramBin {
                lower,
                upper,
                count: 0,
            }
        })
        .collect();

    for &value in sorted {
        let mut index = ((value - min) / width).floor() as i64;
        if index < 0 {
            index = 0;
        }
        if index as u32 >= bin_count {
            index = bin_count as i64 - 1;
        }
        bins[index as usize].count += 1;
    }

    bins
}

/// `(value, probability)` pairs with `probability = (i + 1) / n`. When
/// `n > max_points`, downsamples by a uniform stride and always appends the
/// final point so the last `probability` is exactly `1`.
pub fn cdf(sorted: &[f64], max_points: Option<usize>) -> Vec<(f64, f64)> {
    let n = sorted.len();
    if n == 0 {
        return Vec::new();
    }
    let max_points = max_points.unwrap_or(n).max(1);
    if n <= max_points {
        return sorted
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, (i + 1) as f64 / n as f64))
            .collect();
    }

    let stride = (n as f64 / max_points as f64).ceil() as usize;
    let mut points: Vec<(f64, f64)> = (0..n)
        .step_by(stride.max(1))
        .map(|i| (sorted[i], (i + 1) as f64 / n as f64))
        .collect();
    let last = (sorted[n - 1], 1.0);
    if points.last() != Some(&last) {
        points.push(last);
    }
    points
}
