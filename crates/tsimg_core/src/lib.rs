//! # tsimg_core
//!
//! Core types and traits for converting time series into images.
//!
//! This crate provides:
//! - [`SequenceBatch`] and [`ImageBatch`], the input and output containers
//! - [`MethodKind`], the closed set of imaging methods
//! - [`ImagingTransform`], the capability every imaging method implements
//! - Error types and `.npy`/`.csv` readers and writers
//!
//! ## Shape Convention
//!
//! A sequence batch has shape `(N, L)`:
//! - `N`: number of samples
//! - `L`: sequence length (time steps)
//!
//! An image batch has shape `(N, S, S)` where `S` is the image size.
//!
//! ## Example
//!
//! ```rust
//! use tsimg_core::SequenceBatch;
//!
//! let batch = SequenceBatch::from_rows(&[vec![0.0, 0.5, 1.0, 0.5]]).unwrap();
//! assert_eq!(batch.shape(), (1, 4));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod batch;
mod error;
pub mod io;
mod method;
mod transform;

pub use batch::{ImageBatch, SequenceBatch};
pub use error::{ImagingError, Result};
pub use method::MethodKind;
pub use transform::{parse_options, ImagingTransform};
