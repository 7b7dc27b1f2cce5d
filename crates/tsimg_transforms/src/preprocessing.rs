//! Preprocessing shared by the imaging transforms.
//!
//! - [`Span`]: sizes given either as a count or as a fraction of the sequence length
//! - [`segmentation`] and [`paa`]: piecewise aggregate approximation
//! - [`min_max_scale`]: per-sample rescaling into a target range
//! - [`KBinsDiscretizer`]: per-sample binning into ordinal symbols

use std::ops::Range;

use ndarray::{s, Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tsimg_core::{ImagingError, Result};

/// A length given as an absolute count or as a fraction of the sequence length.
///
/// Deserializes from a JSON integer (`Absolute`) or float (`Fraction`), so
/// `{"image_size": 24}` and `{"image_size": 0.5}` both work.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Span {
    /// Exact count, must lie in `1..=n_timestamps`.
    Absolute(usize),
    /// Fraction of the sequence length in `(0, 1]`, rounded up.
    Fraction(f64),
}

impl Span {
    /// Resolve to a count for a sequence of `n_timestamps` values.
    ///
    /// # Errors
    ///
    /// Returns [`ImagingError::InvalidParameter`] naming `name` if the value
    /// is out of range.
    pub fn resolve(&self, n_timestamps: usize, name: &str) -> Result<usize> {
        match *self {
            Self::Absolute(n) if (1..=n_timestamps).contains(&n) => Ok(n),
            Self::Absolute(n) => Err(ImagingError::InvalidParameter(format!(
                "'{}' must be between 1 and the sequence length ({}), got {}",
                name, n_timestamps, n
            ))),
            Self::Fraction(f) if f > 0.0 && f <= 1.0 => {
                Ok(((f * n_timestamps as f64).ceil() as usize).clamp(1, n_timestamps))
            }
            Self::Fraction(f) => Err(ImagingError::InvalidParameter(format!(
                "'{}' as a fraction must be in (0, 1], got {}",
                name, f
            ))),
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::Fraction(1.0)
    }
}

/// Split `0..ts_size` into `n_segments` index ranges.
///
/// Without overlap the bounds are evenly spaced and truncated. With overlap
/// every segment spans `window_size` indices, shifted left just enough for
/// the last one to end at `ts_size`.
#[must_use]
pub fn segmentation(
    ts_size: usize,
    window_size: usize,
    overlapping: bool,
    n_segments: usize,
) -> Vec<Range<usize>> {
    if n_segments == 0 {
        return Vec::new();
    }

    if !overlapping {
        return (0..n_segments)
            .map(|k| (k * ts_size / n_segments)..((k + 1) * ts_size / n_segments))
            .collect();
    }

    let n_overlapping = (n_segments * window_size).saturating_sub(ts_size);
    let n_overlaps = n_segments - 1;
    (0..n_segments)
        .map(|k| {
            let shift = if n_overlaps == 0 {
                0
            } else {
                k * n_overlapping / n_overlaps
            };
            (k * window_size).saturating_sub(shift)..((k + 1) * window_size).saturating_sub(shift)
        })
        .collect()
}

/// Piecewise aggregate approximation: reduce `sample` to `output_size`
/// segment means.
///
/// Returns the sample unchanged when `output_size >= sample.len()`.
#[must_use]
pub fn paa(sample: ArrayView1<'_, f64>, output_size: usize, overlapping: bool) -> Array1<f64> {
    let n_timestamps = sample.len();
    if output_size == 0 || output_size >= n_timestamps {
        return sample.to_owned();
    }

    let window_size = n_timestamps.div_ceil(output_size);
    segmentation(n_timestamps, window_size, overlapping, output_size)
        .into_iter()
        .map(|r| sample.slice(s![r.start..r.end]).mean().unwrap_or(0.0))
        .collect()
}

/// Minimum and maximum of a sample.
#[must_use]
pub fn min_max(sample: ArrayView1<'_, f64>) -> (f64, f64) {
    sample
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
}

/// Linearly rescale `sample` so its minimum maps to `lo` and its maximum to `hi`.
///
/// A constant sample maps entirely to `lo`.
#[must_use]
pub fn min_max_scale(sample: ArrayView1<'_, f64>, lo: f64, hi: f64) -> Array1<f64> {
    let (min, max) = min_max(sample);
    let range = max - min;
    if range == 0.0 {
        return Array1::from_elem(sample.len(), lo);
    }
    sample.mapv(|x| lo + (x - min) * (hi - lo) / range)
}

/// Percentile `q` (0..=100) of sorted data with linear interpolation.
///
/// Returns `NaN` for empty input.
#[must_use]
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// How bin edges are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinStrategy {
    /// Equal-width bins between the sample's min and max.
    Uniform,
    /// Equal-frequency bins from the sample's quantiles.
    #[default]
    Quantile,
    /// Bins with equal probability under a standard normal distribution.
    Normal,
}

/// Discretizes each sample independently into `n_bins` ordinal bins.
#[derive(Debug, Clone, Copy)]
pub struct KBinsDiscretizer {
    n_bins: usize,
    strategy: BinStrategy,
}

impl KBinsDiscretizer {
    /// Create a discretizer.
    #[must_use]
    pub fn new(n_bins: usize, strategy: BinStrategy) -> Self {
        Self { n_bins, strategy }
    }

    /// Number of bins.
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Check the bin count against the sequence length.
    ///
    /// # Errors
    ///
    /// Returns [`ImagingError::InvalidParameter`] unless `2 <= n_bins <= n_timestamps`.
    pub fn check(&self, n_timestamps: usize) -> Result<()> {
        if self.n_bins < 2 || self.n_bins > n_timestamps {
            return Err(ImagingError::InvalidParameter(format!(
                "'n_bins' must be between 2 and the sequence length ({}), got {}",
                n_timestamps, self.n_bins
            )));
        }
        Ok(())
    }

    /// The `n_bins - 1` inner bin edges for `sample`, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`ImagingError::InvalidInput`] when the sample cannot be split
    /// into `n_bins` distinct bins with the chosen strategy.
    pub fn bin_edges(&self, sample: ArrayView1<'_, f64>) -> Result<Vec<f64>> {
        let n_bins = self.n_bins as f64;
        match self.strategy {
            BinStrategy::Uniform => {
                let (min, max) = min_max(sample);
                if min == max {
                    return Err(ImagingError::InvalidInput(
                        "uniform binning requires non-constant samples".to_string(),
                    ));
                }
                Ok((1..self.n_bins)
                    .map(|k| min + (max - min) * k as f64 / n_bins)
                    .collect())
            }
            BinStrategy::Quantile => {
                let mut sorted = sample.to_vec();
                sorted.sort_by(f64::total_cmp);
                let edges: Vec<f64> = (1..self.n_bins)
                    .map(|k| percentile(&sorted, 100.0 * k as f64 / n_bins))
                    .collect();
                if edges.windows(2).any(|w| w[0] == w[1]) {
                    return Err(ImagingError::InvalidInput(format!(
                        "at least two consecutive quantiles are equal; try fewer than {} bins",
                        self.n_bins
                    )));
                }
                Ok(edges)
            }
            BinStrategy::Normal => {
                let normal = Normal::new(0.0, 1.0)
                    .map_err(|e| ImagingError::InvalidParameter(e.to_string()))?;
                Ok((1..self.n_bins)
                    .map(|k| normal.inverse_cdf(k as f64 / n_bins))
                    .collect())
            }
        }
    }

    /// Map every value of `sample` to its bin index in `0..n_bins`.
    pub fn discretize(&self, sample: ArrayView1<'_, f64>) -> Result<Vec<usize>> {
        let edges = self.bin_edges(sample)?;
        Ok(sample
            .iter()
            .map(|&x| edges.partition_point(|&edge| edge <= x))
            .collect())
    }
}
