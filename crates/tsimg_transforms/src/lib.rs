//! # tsimg_transforms
//!
//! Imaging transforms for time series, and the registry that dispatches to them.
//!
//! This crate provides:
//! - Gramian Angular Fields ([`GramianAngularField`], summation and difference)
//! - Markov Transition Fields ([`MarkovTransitionField`])
//! - Recurrence Plots ([`RecurrencePlot`])
//! - [`TransformRegistry`], a uniform `apply(name, data, options)` entry point
//! - A plotting helper that renders an image to grayscale or ASCII
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use tsimg_core::SequenceBatch;
//! use tsimg_transforms::TransformRegistry;
//!
//! let registry = TransformRegistry::new();
//! let data = SequenceBatch::from_rows(&[vec![0.0, 0.5, 1.0, 0.5]]).unwrap();
//!
//! let images = registry.apply("mtf", &data, &json!({"n_bins": 2})).unwrap();
//! assert_eq!(images.shape(), (1, 4, 4));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod gaf;
pub mod mtf;
pub mod plot;
pub mod preprocessing;
pub mod registry;
pub mod rp;

pub use gaf::{GafConfig, GafMode, GramianAngularField};
pub use mtf::{MarkovTransitionField, MtfConfig};
pub use plot::{plot, plot_image, render_ascii, to_gray_image, Colormap, Origin, PlotConfig};
pub use preprocessing::{BinStrategy, KBinsDiscretizer, Span};
pub use registry::TransformRegistry;
pub use rp::{RecurrencePlot, RecurrencePlotConfig, Threshold, ThresholdRule};
