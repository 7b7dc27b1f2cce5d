//! # tsimg
//!
//! Turn time series into images.
//!
//! tsimg converts batches of univariate time series into square matrices
//! that can be viewed, saved, or fed to image models:
//!
//! - **GASF / GADF**: Gramian Angular Summation and Difference Fields
//! - **MTF**: Markov Transition Fields
//! - **RP**: Recurrence Plots
//!
//! Every method is reachable through one entry point,
//! [`TransformRegistry::apply`](transforms::TransformRegistry::apply).
//!
//! ## Quick Start
//!
//! ```rust
//! use tsimg::prelude::*;
//! use serde_json::json;
//!
//! let registry = TransformRegistry::new();
//! let data = SequenceBatch::from_rows(&[vec![0.0, 0.5, 1.0, 0.5]])?;
//!
//! let gasf = registry.apply("gasf", &data, &json!({}))?;
//! let rp = registry.apply("rp", &data, &json!({"threshold": "point"}))?;
//! assert_eq!(gasf.shape(), rp.shape());
//!
//! let preview = render_ascii(gasf.image(0).unwrap(), &PlotConfig::default(), 40, 20)?;
//! assert!(!preview.is_empty());
//! # Ok::<(), tsimg::core::ImagingError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export all crates
pub use tsimg_core as core;
pub use tsimg_transforms as transforms;

/// Prelude module for convenient imports.
///
/// ```rust
/// use tsimg::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tsimg_core::{
        ImageBatch, ImagingError, ImagingTransform, MethodKind, Result, SequenceBatch,
    };

    // Transforms
    pub use tsimg_transforms::{
        GafConfig, GafMode, GramianAngularField, MarkovTransitionField, MtfConfig,
        RecurrencePlot, RecurrencePlotConfig, TransformRegistry,
    };

    // Plotting
    pub use tsimg_transforms::{plot, plot_image, render_ascii, to_gray_image, PlotConfig};
}
