//! Plotting helper for imaging results.
//!
//! Renders a single image of a batch either to an 8-bit grayscale image
//! (optionally saved to disk) or to an ASCII preview for the terminal.

use std::path::Path;

use image::{GrayImage, Luma};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use tsimg_core::{ImageBatch, ImagingError, Result};

const ASCII_SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

/// Grayscale colormap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    /// Low values white, high values black.
    #[default]
    Greys,
    /// Low values black, high values white.
    Gray,
}

impl Colormap {
    /// Amount of ink for a normalized value in `[0, 1]`.
    fn ink(self, value: f64) -> f64 {
        match self {
            Self::Greys => value,
            Self::Gray => 1.0 - value,
        }
    }
}

/// Where row 0 of the matrix is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Row 0 at the bottom.
    #[default]
    Lower,
    /// Row 0 at the top.
    Upper,
}

/// Rendering options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    /// Colormap.
    pub cmap: Colormap,
    /// Vertical orientation.
    pub origin: Origin,
    /// Value range mapped onto the colormap. `None` uses the image's min and max.
    pub scale: Option<(f64, f64)>,
}

impl PlotConfig {
    /// Set the colormap.
    #[must_use]
    pub fn with_cmap(mut self, cmap: Colormap) -> Self {
        self.cmap = cmap;
        self
    }

    /// Set the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Fix the value range instead of normalizing per image.
    #[must_use]
    pub fn with_scale(mut self, lo: f64, hi: f64) -> Self {
        self.scale = Some((lo, hi));
        self
    }

    /// Check that a fixed `scale` is a finite, non-empty range.
    ///
    /// # Errors
    ///
    /// Returns [`ImagingError::InvalidParameter`] when `lo >= hi` or either
    /// bound is not finite.
    pub fn validate(&self) -> Result<()> {
        match self.scale {
            Some((lo, hi)) if !lo.is_finite() || !hi.is_finite() || lo >= hi => {
                Err(ImagingError::InvalidParameter(format!(
                    "scale must be a finite range with lo < hi, got ({}, {})",
                    lo, hi
                )))
            }
            _ => Ok(()),
        }
    }

    /// Ink per cell in `[0, 1]`, already flipped for the origin.
    fn ink_grid(&self, image: ArrayView2<'_, f64>) -> Result<Vec<Vec<f64>>> {
        self.validate()?;
        let (lo, hi) = self.scale.unwrap_or_else(|| {
            image
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        });
        let range = hi - lo;
        let has_range = range > 0.0;
        if !has_range {
            tracing::warn!(lo, hi, "image has no value range; rendering it blank");
        }

        let mut grid: Vec<Vec<f64>> = image
            .outer_iter()
            .map(|row| {
                row.iter()
                    .map(|&v| {
                        let normalized = if has_range {
                            ((v - lo) / range).clamp(0.0, 1.0)
                        } else {
                            0.0
                        };
                        self.cmap.ink(normalized)
                    })
                    .collect()
            })
            .collect();

        if self.origin == Origin::Lower {
            grid.reverse();
        }
        Ok(grid)
    }
}

/// Convert one matrix to an 8-bit grayscale image.
///
/// # Errors
///
/// Returns [`ImagingError::InvalidParameter`] for an invalid `scale`.
pub fn to_gray_image(image: ArrayView2<'_, f64>, config: &PlotConfig) -> Result<GrayImage> {
    let (height, width) = image.dim();
    let grid = config.ink_grid(image)?;

    let mut img = GrayImage::new(width as u32, height as u32);
    for (y, row) in grid.iter().enumerate() {
        for (x, &ink) in row.iter().enumerate() {
            let level = ((1.0 - ink) * 255.0).round() as u8;
            img.put_pixel(x as u32, y as u32, Luma([level]));
        }
    }
    Ok(img)
}

/// Render one matrix and, when `output` is given, save it there. The file
/// format follows the path's extension.
///
/// # Errors
///
/// Returns [`ImagingError::InvalidParameter`] for an invalid `scale` and
/// [`ImagingError::ImageError`] if the image cannot be encoded or written.
pub fn plot_image(
    image: ArrayView2<'_, f64>,
    config: &PlotConfig,
    output: Option<&Path>,
) -> Result<GrayImage> {
    let img = to_gray_image(image, config)?;

    if let Some(path) = output {
        img.save(path)?;
        tracing::debug!(path = %path.display(), "saved plot");
    }

    Ok(img)
}

/// Render the first image of `images` and, when `output` is given, save it
/// there. See [`plot_image`] for any other image of the batch.
///
/// # Errors
///
/// Returns [`ImagingError::InvalidInput`] for an empty batch, otherwise the
/// errors of [`plot_image`].
pub fn plot(images: &ImageBatch, config: &PlotConfig, output: Option<&Path>) -> Result<GrayImage> {
    let first = images
        .image(0)
        .ok_or_else(|| ImagingError::InvalidInput("cannot plot an empty image batch".to_string()))?;
    plot_image(first, config, output)
}

/// ASCII preview of one matrix, sampled down to at most `width x height` cells.
///
/// # Errors
///
/// Returns [`ImagingError::InvalidParameter`] for an invalid `scale`.
pub fn render_ascii(
    image: ArrayView2<'_, f64>,
    config: &PlotConfig,
    width: usize,
    height: usize,
) -> Result<String> {
    let (n_rows, n_cols) = image.dim();
    if n_rows == 0 || n_cols == 0 || width == 0 || height == 0 {
        return Ok(String::new());
    }

    let grid = config.ink_grid(image)?;

    // Sample rows and columns to fit dimensions
    let row_step = (n_rows as f64 / height as f64).max(1.0);
    let col_step = (n_cols as f64 / width as f64).max(1.0);

    let mut output = String::new();
    for h in 0..height.min(n_rows) {
        let r = (h as f64 * row_step) as usize;
        if r >= n_rows {
            break;
        }

        for w in 0..width.min(n_cols) {
            let c = (w as f64 * col_step) as usize;
            if c >= n_cols {
                break;
            }

            let idx = (grid[r][c] * (ASCII_SHADES.len() - 1) as f64).round() as usize;
            output.push(ASCII_SHADES[idx.min(ASCII_SHADES.len() - 1)]);
        }
        output.push('\n');
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_greys_lower_origin() {
        let image = array![[0.0, 1.0], [1.0, 1.0]];
        let img = to_gray_image(image.view(), &PlotConfig::default()).unwrap();

        assert_eq!(img.dimensions(), (2, 2));
        // Row 0 is drawn at the bottom; 0.0 is white under Greys.
        assert_eq!(img.get_pixel(0, 1).0, [255]);
        assert_eq!(img.get_pixel(1, 1).0, [0]);
        assert_eq!(img.get_pixel(0, 0).0, [0]);
    }

    #[test]
    fn test_gray_upper_origin() {
        let image = array![[0.0, 1.0], [1.0, 1.0]];
        let config = PlotConfig::default()
            .with_cmap(Colormap::Gray)
            .with_origin(Origin::Upper);
        let img = to_gray_image(image.view(), &config).unwrap();

        assert_eq!(img.get_pixel(0, 0).0, [0]);
        assert_eq!(img.get_pixel(1, 0).0, [255]);
    }

    #[test]
    fn test_fixed_scale_clamps() {
        let image = array![[-5.0, 0.0, 5.0]];
        let config = PlotConfig::default().with_scale(-1.0, 1.0);
        let img = to_gray_image(image.view(), &config).unwrap();

        assert_eq!(img.get_pixel(0, 0).0, [255]);
        assert_eq!(img.get_pixel(1, 0).0, [128]);
        assert_eq!(img.get_pixel(2, 0).0, [0]);
    }

    #[test]
    fn test_constant_image_is_blank() {
        let image = array![[0.3, 0.3], [0.3, 0.3]];
        let img = to_gray_image(image.view(), &PlotConfig::default()).unwrap();
        assert!(img.pixels().all(|p| p.0 == [255]));
    }

    #[test]
    fn test_plot_saves_to_requested_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.png");
        let images = ImageBatch::from_array(Array3::from_shape_fn((2, 3, 3), |(n, i, j)| {
            (n + i * j) as f64
        }));

        let img = plot(&images, &PlotConfig::default(), Some(&path)).unwrap();
        assert_eq!(img.dimensions(), (3, 3));

        let saved = image::open(&path).unwrap().to_luma8();
        assert_eq!(saved.dimensions(), (3, 3));
        assert_eq!(saved, img);
    }

    #[test]
    fn test_plot_empty_batch() {
        let images = ImageBatch::from_array(Array3::zeros((0, 4, 4)));
        assert!(matches!(
            plot(&images, &PlotConfig::default(), None),
            Err(ImagingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_plot_image_picks_any_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("second.png");
        let images = ImageBatch::from_array(Array3::from_shape_fn((2, 2, 2), |(n, i, _)| {
            if n == 0 {
                0.0
            } else {
                i as f64
            }
        }));

        let config = PlotConfig::default().with_origin(Origin::Upper);
        let img = plot_image(images.image(1).unwrap(), &config, Some(&path)).unwrap();
        // Row 0 is low (white), row 1 high (black); the first image is blank.
        assert_eq!(img.get_pixel(0, 0).0, [255]);
        assert_eq!(img.get_pixel(0, 1).0, [0]);
        assert_ne!(img, plot(&images, &config, None).unwrap());
        assert_eq!(image::open(&path).unwrap().to_luma8(), img);
    }

    #[test]
    fn test_unsupported_save_format_is_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.bmp");
        let image = array![[0.0, 1.0], [1.0, 0.0]];

        let err = plot_image(image.view(), &PlotConfig::default(), Some(&path)).unwrap_err();
        assert!(matches!(err, ImagingError::ImageError(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let image = array![[0.0, 1.0], [1.0, 0.0]];
        for (lo, hi) in [(1.0, 1.0), (1.0, -1.0), (f64::NAN, 1.0), (0.0, f64::INFINITY)] {
            let config = PlotConfig::default().with_scale(lo, hi);
            assert!(matches!(
                config.validate(),
                Err(ImagingError::InvalidParameter(_))
            ));
            assert!(matches!(
                to_gray_image(image.view(), &config),
                Err(ImagingError::InvalidParameter(_))
            ));
            assert!(matches!(
                render_ascii(image.view(), &config, 4, 4),
                Err(ImagingError::InvalidParameter(_))
            ));
        }
        assert!(PlotConfig::default().with_scale(-1.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_render_ascii() {
        let image = array![[0.0, 1.0], [1.0, 0.0]];
        let config = PlotConfig::default().with_origin(Origin::Upper);
        let ascii = render_ascii(image.view(), &config, 10, 10).unwrap();
        assert_eq!(ascii, " █\n█ \n");

        assert_eq!(render_ascii(image.view(), &config, 0, 5).unwrap(), "");
    }

    #[test]
    fn test_render_ascii_downsamples() {
        let image = ndarray::Array2::from_shape_fn((8, 8), |(i, j)| (i + j) as f64);
        let ascii = render_ascii(image.view(), &PlotConfig::default(), 4, 2).unwrap();
        let lines: Vec<&str> = ascii.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.chars().count() == 4));
    }
}
