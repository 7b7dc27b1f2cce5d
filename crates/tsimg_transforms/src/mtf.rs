//! Markov Transition Fields.
//!
//! Each sample is discretized into quantile (or uniform/normal) bins. The
//! first-order transition probabilities between bins form an
//! `n_bins x n_bins` matrix `W`, and the field spreads them over time:
//! `M[i][j] = W[bin(x_i)][bin(x_j)]`. Fields larger than the requested image
//! size are averaged down block by block.

use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tsimg_core::{parse_options, ImageBatch, ImagingTransform, MethodKind, Result, SequenceBatch};

use crate::preprocessing::{segmentation, BinStrategy, KBinsDiscretizer, Span};

/// Options for the Markov Transition Field transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MtfConfig {
    /// Output image side length, absolute or as a fraction of the sequence length.
    pub image_size: Span,
    /// Number of bins.
    pub n_bins: usize,
    /// How bin edges are computed.
    pub strategy: BinStrategy,
    /// Whether aggregation blocks may overlap.
    pub overlapping: bool,
}

impl Default for MtfConfig {
    fn default() -> Self {
        Self {
            image_size: Span::default(),
            n_bins: 5,
            strategy: BinStrategy::Quantile,
            overlapping: false,
        }
    }
}

/// Converts time series to Markov Transition Field images.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkovTransitionField;

impl MarkovTransitionField {
    /// Create a new MTF transform.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Transform a batch with an already parsed configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or non-finite batch, an
    /// out-of-range `image_size` or `n_bins`, or samples that cannot be
    /// binned with the chosen strategy.
    pub fn transform_with(&self, batch: &SequenceBatch, config: &MtfConfig) -> Result<ImageBatch> {
        batch.validate()?;
        let n_timestamps = batch.n_timestamps();
        let image_size = config.image_size.resolve(n_timestamps, "image_size")?;
        let discretizer = KBinsDiscretizer::new(config.n_bins, config.strategy);
        discretizer.check(n_timestamps)?;

        tracing::debug!(
            n_samples = batch.n_samples(),
            n_bins = config.n_bins,
            strategy = ?config.strategy,
            image_size,
            "computing markov transition field"
        );

        let images = batch
            .samples()
            .map(|sample| {
                let bins = discretizer.discretize(sample)?;
                let transitions = transition_matrix(&bins, config.n_bins);
                let field = Array2::from_shape_fn((n_timestamps, n_timestamps), |(i, j)| {
                    transitions[[bins[i], bins[j]]]
                });
                Ok(aggregate(&field, image_size, config.overlapping))
            })
            .collect::<Result<Vec<_>>>()?;

        ImageBatch::from_images(images)
    }
}

impl ImagingTransform for MarkovTransitionField {
    fn transform(&self, batch: &SequenceBatch, options: &Value) -> Result<ImageBatch> {
        let config: MtfConfig = parse_options(self.kind(), options)?;
        self.transform_with(batch, &config)
    }

    fn kind(&self) -> MethodKind {
        MethodKind::Mtf
    }
}

/// Row-normalized first-order transition counts between consecutive bins.
///
/// Rows of bins that are never left stay all zero.
#[must_use]
pub fn transition_matrix(bins: &[usize], n_bins: usize) -> Array2<f64> {
    let mut counts = Array2::<f64>::zeros((n_bins, n_bins));
    for pair in bins.windows(2) {
        counts[[pair[0], pair[1]]] += 1.0;
    }

    for mut row in counts.rows_mut() {
        let total = row.sum();
        if total > 0.0 {
            row.mapv_inplace(|c| c / total);
        }
    }
    counts
}

/// Average an `L x L` field down to `image_size x image_size` blocks.
fn aggregate(field: &Array2<f64>, image_size: usize, overlapping: bool) -> Array2<f64> {
    let n_timestamps = field.nrows();
    if image_size >= n_timestamps {
        return field.clone();
    }

    let window_size = n_timestamps.div_ceil(image_size);
    let segments = segmentation(n_timestamps, window_size, overlapping, image_size);
    Array2::from_shape_fn((image_size, image_size), |(i, j)| {
        let (rows, cols) = (&segments[i], &segments[j]);
        field
            .slice(s![rows.start..rows.end, cols.start..cols.end])
            .mean()
            .unwrap_or(0.0)
    })
}
