//! Recurrence Plots.
//!
//! A recurrence plot visualizes the times at which a dynamical system
//! returns to a state it has visited before. States are delay-embedded
//! trajectories `(x_i, x_{i+d}, ..., x_{i+(m-1)d})`; the plot holds their
//! pairwise Euclidean distances, optionally binarized against a threshold.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tsimg_core::{
    parse_options, ImageBatch, ImagingError, ImagingTransform, MethodKind, Result, SequenceBatch,
};

use crate::preprocessing::{percentile, Span};

/// Named threshold rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdRule {
    /// Per row, the `percentage` percentile of that row's distances.
    Point,
    /// `percentage` percent of the largest distance in the plot.
    Distance,
}

/// How distances are binarized.
///
/// Deserializes from `"point"`, `"distance"`, or a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    /// A threshold derived from the distances.
    Rule(ThresholdRule),
    /// A fixed, non-negative distance.
    Value(f64),
}

/// Options for the Recurrence Plot transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecurrencePlotConfig {
    /// Embedding dimension of the trajectories.
    pub dimension: Span,
    /// Delay between consecutive trajectory coordinates.
    pub time_delay: Span,
    /// Threshold for recurrence. `None` keeps raw distances.
    pub threshold: Option<Threshold>,
    /// Percentage used by the `point` and `distance` rules.
    pub percentage: f64,
}

impl Default for RecurrencePlotConfig {
    fn default() -> Self {
        Self {
            dimension: Span::Absolute(1),
            time_delay: Span::Absolute(1),
            threshold: None,
            percentage: 10.0,
        }
    }
}

/// Converts time series to Recurrence Plot images.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecurrencePlot;

impl RecurrencePlot {
    /// Create a new Recurrence Plot transform.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Transform a batch with an already parsed configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or non-finite batch, an
    /// embedding longer than the series, a negative threshold, or a
    /// percentage outside `[0, 100]`.
    pub fn transform_with(
        &self,
        batch: &SequenceBatch,
        config: &RecurrencePlotConfig,
    ) -> Result<ImageBatch> {
        batch.validate()?;
        let n_timestamps = batch.n_timestamps();
        let dimension = config.dimension.resolve(n_timestamps, "dimension")?;
        let time_delay = config.time_delay.resolve(n_timestamps, "time_delay")?;

        let span = (dimension - 1) * time_delay;
        if span >= n_timestamps {
            return Err(ImagingError::InvalidParameter(format!(
                "(dimension - 1) * time_delay must be below the sequence length ({}), got {}",
                n_timestamps, span
            )));
        }
        if !(0.0..=100.0).contains(&config.percentage) {
            return Err(ImagingError::InvalidParameter(format!(
                "'percentage' must be in [0, 100], got {}",
                config.percentage
            )));
        }
        if let Some(Threshold::Value(t)) = config.threshold {
            if t < 0.0 {
                return Err(ImagingError::InvalidParameter(format!(
                    "'threshold' must be non-negative, got {}",
                    t
                )));
            }
        }

        tracing::debug!(
            n_samples = batch.n_samples(),
            dimension,
            time_delay,
            threshold = ?config.threshold,
            "computing recurrence plot"
        );

        let images = batch
            .samples()
            .map(|sample| {
                let distances = trajectory_distances(sample, dimension, time_delay);
                self.binarize(distances, config)
            })
            .collect();

        ImageBatch::from_images(images)
    }

    fn binarize(&self, distances: Array2<f64>, config: &RecurrencePlotConfig) -> Array2<f64> {
        let indicator = |d: f64, t: f64| if d <= t { 1.0 } else { 0.0 };

        match config.threshold {
            None => distances,
            Some(Threshold::Value(t)) => distances.mapv(|d| indicator(d, t)),
            Some(Threshold::Rule(ThresholdRule::Distance)) => {
                let max = distances.iter().copied().fold(0.0f64, f64::max);
                let t = config.percentage / 100.0 * max;
                distances.mapv(|d| indicator(d, t))
            }
            Some(Threshold::Rule(ThresholdRule::Point)) => {
                let row_thresholds: Vec<f64> = distances
                    .rows()
                    .into_iter()
                    .map(|row| {
                        let mut sorted = row.to_vec();
                        sorted.sort_by(f64::total_cmp);
                        percentile(&sorted, config.percentage)
                    })
                    .collect();
                Array2::from_shape_fn(distances.dim(), |(i, j)| {
                    indicator(distances[[i, j]], row_thresholds[i])
                })
            }
        }
    }
}

impl ImagingTransform for RecurrencePlot {
    fn transform(&self, batch: &SequenceBatch, options: &Value) -> Result<ImageBatch> {
        let config: RecurrencePlotConfig = parse_options(self.kind(), options)?;
        self.transform_with(batch, &config)
    }

    fn kind(&self) -> MethodKind {
        MethodKind::Rp
    }
}

/// Pairwise Euclidean distances between delay-embedded trajectories.
///
/// The caller guarantees `(dimension - 1) * time_delay < sample.len()`.
#[must_use]
pub fn trajectory_distances(
    sample: ArrayView1<'_, f64>,
    dimension: usize,
    time_delay: usize,
) -> Array2<f64> {
    let n_trajectories = sample.len() - (dimension - 1) * time_delay;
    Array2::from_shape_fn((n_trajectories, n_trajectories), |(i, j)| {
        (0..dimension)
            .map(|k| {
                let diff = sample[i + k * time_delay] - sample[j + k * time_delay];
                diff * diff
            })
            .sum::<f64>()
            .sqrt()
    })
}
