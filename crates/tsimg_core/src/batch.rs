//! Sequence and image batch containers.

use ndarray::{Array2, Array3, ArrayView1, ArrayView2, ArrayView3, Axis};

use crate::error::{ImagingError, Result};

/// A batch of equal-length univariate time series with shape `(N, L)`.
///
/// Rectangular by construction. Transforms borrow it and never mutate it.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceBatch {
    data: Array2<f64>,
}

impl SequenceBatch {
    /// Wrap an existing `(N, L)` array.
    #[must_use]
    pub fn from_array(data: Array2<f64>) -> Self {
        Self { data }
    }

    /// Build a batch from one `Vec` per sample.
    ///
    /// # Errors
    ///
    /// Returns [`ImagingError::InvalidInput`] if the rows differ in length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n_timestamps = rows.first().map_or(0, Vec::len);
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != n_timestamps)
        {
            return Err(ImagingError::InvalidInput(format!(
                "ragged batch: sample {} has length {}, expected {}",
                idx,
                row.len(),
                n_timestamps
            )));
        }

        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_vec(rows.len(), n_timestamps, flat)
    }

    /// Build a batch from row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`ImagingError::InvalidInput`] if `data.len() != n_samples * n_timestamps`.
    pub fn from_vec(n_samples: usize, n_timestamps: usize, data: Vec<f64>) -> Result<Self> {
        let data = Array2::from_shape_vec((n_samples, n_timestamps), data).map_err(|e| {
            ImagingError::InvalidInput(format!(
                "cannot shape data into ({}, {}): {}",
                n_samples, n_timestamps, e
            ))
        })?;
        Ok(Self { data })
    }

    /// Number of samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    /// Sequence length.
    #[must_use]
    pub fn n_timestamps(&self) -> usize {
        self.data.ncols()
    }

    /// `(n_samples, n_timestamps)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Check if the batch holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the underlying array.
    #[must_use]
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Borrow sample `idx`, if present.
    #[must_use]
    pub fn sample(&self, idx: usize) -> Option<ArrayView1<'_, f64>> {
        (idx < self.n_samples()).then(|| self.data.row(idx))
    }

    /// Iterate over samples in order.
    pub fn samples(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.data.outer_iter()
    }

    /// Check that the batch can be transformed: at least one sample, at
    /// least one timestamp, and only finite values.
    ///
    /// # Errors
    ///
    /// Returns [`ImagingError::InvalidInput`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let (n_samples, n_timestamps) = self.shape();
        if n_samples == 0 {
            return Err(ImagingError::InvalidInput(
                "batch must contain at least one sample".to_string(),
            ));
        }
        if n_timestamps == 0 {
            return Err(ImagingError::InvalidInput(
                "samples must contain at least one timestamp".to_string(),
            ));
        }
        if let Some(((i, t), value)) = self.data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ImagingError::InvalidInput(format!(
                "non-finite value {} at sample {}, timestamp {}",
                value, i, t
            )));
        }
        Ok(())
    }

    /// Consume the batch and return the underlying array.
    #[must_use]
    pub fn into_inner(self) -> Array2<f64> {
        self.data
    }
}

impl From<Array2<f64>> for SequenceBatch {
    fn from(data: Array2<f64>) -> Self {
        Self::from_array(data)
    }
}

/// A batch of square images with shape `(N, S, S)`, one per input sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    data: Array3<f64>,
}

impl ImageBatch {
    /// Wrap an existing `(N, S, S)` array.
    #[must_use]
    pub fn from_array(data: Array3<f64>) -> Self {
        Self { data }
    }

    /// Stack per-sample images into a batch.
    ///
    /// # Errors
    ///
    /// Returns [`ImagingError::InvalidInput`] if `images` is empty or the
    /// images differ in shape.
    pub fn from_images(images: Vec<Array2<f64>>) -> Result<Self> {
        if images.is_empty() {
            return Err(ImagingError::InvalidInput(
                "cannot build an image batch from zero images".to_string(),
            ));
        }
        let views: Vec<ArrayView2<'_, f64>> = images.iter().map(|image| image.view()).collect();
        let data = ndarray::stack(Axis(0), &views)
            .map_err(|e| ImagingError::InvalidInput(format!("images differ in shape: {}", e)))?;
        Ok(Self { data })
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Check if the batch holds no images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Side length of each image.
    #[must_use]
    pub fn image_size(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    /// `(n_images, height, width)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Borrow image `idx`, if present.
    #[must_use]
    pub fn image(&self, idx: usize) -> Option<ArrayView2<'_, f64>> {
        (idx < self.len()).then(|| self.data.index_axis(Axis(0), idx))
    }

    /// Iterate over images in order.
    pub fn images(&self) -> impl Iterator<Item = ArrayView2<'_, f64>> {
        self.data.outer_iter()
    }

    /// Borrow the underlying array.
    #[must_use]
    pub fn view(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    /// Consume the batch and return the underlying array.
    #[must_use]
    pub fn into_inner(self) -> Array3<f64> {
        self.data
    }

    /// Copy into nested vectors `[image][row][col]`.
    #[must_use]
    pub fn to_nested(&self) -> Vec<Vec<Vec<f64>>> {
        self.images()
            .map(|image| image.outer_iter().map(|row| row.to_vec()).collect())
            .collect()
    }
}
