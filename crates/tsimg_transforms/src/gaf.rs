//! Gramian Angular Fields.
//!
//! Each sample is reduced with PAA, rescaled into `[-1, 1]`, and read as the
//! cosine of an angle `phi`. The summation field is `cos(phi_i + phi_j)` and
//! the difference field is `sin(phi_i - phi_j)`.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tsimg_core::{
    parse_options, ImageBatch, ImagingError, ImagingTransform, MethodKind, Result, SequenceBatch,
};

use crate::preprocessing::{min_max, min_max_scale, paa, Span};

/// Type of Gramian Angular Field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GafMode {
    /// Gramian Angular Summation Field.
    Summation,
    /// Gramian Angular Difference Field.
    Difference,
}

/// Options for Gramian Angular Field transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GafConfig {
    /// Output image side length, absolute or as a fraction of the sequence length.
    pub image_size: Span,
    /// Range each sample is rescaled into. `None` means the input is
    /// already within `[-1, 1]`.
    pub sample_range: Option<(f64, f64)>,
    /// Whether PAA segments may overlap.
    pub overlapping: bool,
}

impl Default for GafConfig {
    fn default() -> Self {
        Self {
            image_size: Span::default(),
            sample_range: Some((-1.0, 1.0)),
            overlapping: false,
        }
    }
}

impl GafConfig {
    fn checked_sample_range(&self) -> Result<Option<(f64, f64)>> {
        match self.sample_range {
            Some((lo, hi)) if !(-1.0 <= lo && lo < hi && hi <= 1.0) => {
                Err(ImagingError::InvalidParameter(format!(
                    "'sample_range' must satisfy -1 <= min < max <= 1, got ({}, {})",
                    lo, hi
                )))
            }
            range => Ok(range),
        }
    }
}

/// Converts time series to Gramian Angular Field images.
#[derive(Debug, Clone, Copy)]
pub struct GramianAngularField {
    mode: GafMode,
}

impl GramianAngularField {
    /// Create a transform with the given mode.
    #[must_use]
    pub const fn new(mode: GafMode) -> Self {
        Self { mode }
    }

    /// Gramian Angular Summation Field.
    #[must_use]
    pub const fn summation() -> Self {
        Self::new(GafMode::Summation)
    }

    /// Gramian Angular Difference Field.
    #[must_use]
    pub const fn difference() -> Self {
        Self::new(GafMode::Difference)
    }

    /// The field type.
    #[must_use]
    pub const fn mode(&self) -> GafMode {
        self.mode
    }

    /// Transform a batch with an already parsed configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or non-finite batch, an
    /// out-of-range `image_size` or `sample_range`, or (with
    /// `sample_range: None`) values outside `[-1, 1]`.
    pub fn transform_with(&self, batch: &SequenceBatch, config: &GafConfig) -> Result<ImageBatch> {
        batch.validate()?;
        let image_size = config.image_size.resolve(batch.n_timestamps(), "image_size")?;
        let sample_range = config.checked_sample_range()?;

        tracing::debug!(
            method = %self.kind(),
            n_samples = batch.n_samples(),
            image_size,
            "computing gramian angular field"
        );

        let images = batch
            .samples()
            .map(|sample| {
                let reduced = paa(sample, image_size, config.overlapping);
                let cos = match sample_range {
                    Some((lo, hi)) => min_max_scale(reduced.view(), lo, hi),
                    None => {
                        let (min, max) = min_max(reduced.view());
                        if min < -1.0 || max > 1.0 {
                            return Err(ImagingError::InvalidInput(
                                "with 'sample_range' set to null, all values must lie in [-1, 1]"
                                    .to_string(),
                            ));
                        }
                        reduced
                    }
                };
                Ok(self.field(&cos))
            })
            .collect::<Result<Vec<_>>>()?;

        ImageBatch::from_images(images)
    }

    /// Compute the field of a series already scaled into `[-1, 1]`.
    #[must_use]
    pub fn field(&self, cos: &Array1<f64>) -> Array2<f64> {
        let n = cos.len();
        let sin: Array1<f64> = cos.mapv(|x| (1.0 - x * x).max(0.0).sqrt());

        match self.mode {
            // cos(a + b) = cos a cos b - sin a sin b
            GafMode::Summation => {
                Array2::from_shape_fn((n, n), |(i, j)| cos[i] * cos[j] - sin[i] * sin[j])
            }
            // sin(a - b) = sin a cos b - cos a sin b
            GafMode::Difference => {
                Array2::from_shape_fn((n, n), |(i, j)| sin[i] * cos[j] - cos[i] * sin[j])
            }
        }
    }
}

impl ImagingTransform for GramianAngularField {
    fn transform(&self, batch: &SequenceBatch, options: &Value) -> Result<ImageBatch> {
        let config: GafConfig = parse_options(self.kind(), options)?;
        self.transform_with(batch, &config)
    }

    fn kind(&self) -> MethodKind {
        match self.mode {
            GafMode::Summation => MethodKind::Gasf,
            GafMode::Difference => MethodKind::Gadf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn batch(rows: &[Vec<f64>]) -> SequenceBatch {
        SequenceBatch::from_rows(rows).unwrap()
    }

    #[test]
    fn test_gasf_compute() {
        let series = batch(&[vec![0.0, 0.5, 1.0, 0.5, 0.0]]);
        let images = GramianAngularField::summation()
            .transform(&series, &Value::Null)
            .unwrap();

        assert_eq!(images.shape(), (1, 5, 5));

        // GASF values should be in [-1, 1]
        for &val in images.image(0).unwrap() {
            assert!((-1.0 - 1e-12..=1.0 + 1e-12).contains(&val));
        }
    }

    #[test]
    fn test_gadf_compute() {
        let series = batch(&[vec![0.0, 0.5, 1.0, 0.5, 0.0]]);
        let images = GramianAngularField::difference()
            .transform(&series, &Value::Null)
            .unwrap();
        let field = images.image(0).unwrap();

        // Diagonal should be zero (sin(0) = 0)
        for i in 0..5 {
            assert!(field[[i, i]].abs() < 1e-12);
        }
        // Antisymmetric
        assert!((field[[0, 2]] + field[[2, 0]]).abs() < 1e-12);

        for &val in field {
            assert!((-1.0 - 1e-12..=1.0 + 1e-12).contains(&val));
        }
    }

    #[test]
    fn test_constant_sample() {
        // Scales to the low end of the range, so every angle is pi
        let series = batch(&[vec![3.0; 5]]);

        let gasf = GramianAngularField::summation()
            .transform(&series, &Value::Null)
            .unwrap();
        assert_eq!(gasf.shape(), (1, 5, 5));
        assert!(gasf.image(0).unwrap().iter().all(|v| (v - 1.0).abs() < 1e-12));

        let gadf = GramianAngularField::difference()
            .transform(&series, &Value::Null)
            .unwrap();
        assert_eq!(gadf.shape(), (1, 5, 5));
        assert!(gadf.image(0).unwrap().iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_known_values() {
        // Scales to [-1, 0, 1, 0]
        let series = batch(&[vec![0.0, 0.5, 1.0, 0.5]]);

        let gasf = GramianAngularField::summation()
            .transform(&series, &Value::Null)
            .unwrap();
        let gasf = gasf.image(0).unwrap();
        assert!((gasf[[0, 0]] - 1.0).abs() < 1e-12);
        assert!((gasf[[1, 1]] + 1.0).abs() < 1e-12);
        assert!((gasf[[0, 2]] + 1.0).abs() < 1e-12);

        let gadf = GramianAngularField::difference()
            .transform(&series, &Value::Null)
            .unwrap();
        let gadf = gadf.image(0).unwrap();
        assert!(gadf[[0, 0]].abs() < 1e-12);
        // sin(phi_1 - phi_0) = sin(pi/2 - pi) = -1
        assert!((gadf[[1, 0]] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_image_size_reduces_output() {
        let series = batch(&[(0..12).map(f64::from).collect()]);
        let field = GramianAngularField::summation();

        let images = field.transform(&series, &json!({"image_size": 4})).unwrap();
        assert_eq!(images.shape(), (1, 4, 4));

        let images = field.transform(&series, &json!({"image_size": 0.5})).unwrap();
        assert_eq!(images.shape(), (1, 6, 6));

        let images = field
            .transform(&series, &json!({"image_size": 5, "overlapping": true}))
            .unwrap();
        assert_eq!(images.shape(), (1, 5, 5));
    }

    #[test]
    fn test_null_sample_range() {
        let field = GramianAngularField::summation();
        let in_range = batch(&[vec![-0.5, 0.0, 0.5]]);
        let images = field
            .transform(&in_range, &json!({"sample_range": null}))
            .unwrap();
        // cos(2 * acos(-0.5)) = 2 * 0.25 - 1
        assert!((images.image(0).unwrap()[[0, 0]] + 0.5).abs() < 1e-12);

        let out_of_range = batch(&[vec![-2.0, 0.0, 2.0]]);
        assert!(matches!(
            field.transform(&out_of_range, &json!({"sample_range": null})),
            Err(ImagingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_sample_range() {
        let series = batch(&[vec![0.0, 1.0, 2.0]]);
        let field = GramianAngularField::difference();
        for range in [json!([0.5, 0.5]), json!([-2.0, 1.0]), json!([1.0, -1.0])] {
            assert!(matches!(
                field.transform(&series, &json!({ "sample_range": range })),
                Err(ImagingError::InvalidParameter(_))
            ));
        }
        assert!(field
            .transform(&series, &json!({"sample_range": [0, 1]}))
            .is_ok());
    }

    #[test]
    fn test_unknown_option_rejected() {
        let series = batch(&[vec![0.0, 1.0, 2.0]]);
        let result = GramianAngularField::summation().transform(&series, &json!({"method": "difference"}));
        assert!(matches!(
            result,
            Err(ImagingError::InvalidOptions {
                method: MethodKind::Gasf,
                ..
            })
        ));
    }

    #[test]
    fn test_kind_follows_mode() {
        assert_eq!(GramianAngularField::summation().kind(), MethodKind::Gasf);
        assert_eq!(GramianAngularField::difference().kind(), MethodKind::Gadf);
        assert_eq!(GramianAngularField::difference().name(), "gadf");
    }
}
