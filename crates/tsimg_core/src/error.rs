//! Error types for tsimg_core.

use thiserror::Error;

use crate::method::MethodKind;

/// Result type alias using [`ImagingError`].
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Errors raised while resolving, configuring, or running an imaging method.
#[derive(Error, Debug)]
pub enum ImagingError {
    /// The requested method name is not registered.
    #[error("Unknown imaging method '{0}' (expected one of: gasf, gadf, mtf, rp)")]
    UnknownMethod(String),

    /// Options could not be deserialized into the method's configuration.
    #[error("Invalid options for '{method}': {source}")]
    InvalidOptions {
        /// Method whose options were rejected.
        method: MethodKind,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// An option value is out of range for the given input.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The input batch is malformed (empty, ragged, or non-finite).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File format error.
    #[error("File format error: {0}")]
    FormatError(String),

    /// Encoding or saving a rendered image failed.
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ImagingError {
    /// Returns `true` for errors caused by a bad method name.
    #[must_use]
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::UnknownMethod(_))
    }

    /// Returns `true` for errors caused by malformed input data or options.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidOptions { .. } | Self::InvalidParameter(_) | Self::InvalidInput(_)
        )
    }
}
