//! The imaging transform capability.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::batch::{ImageBatch, SequenceBatch};
use crate::error::{ImagingError, Result};
use crate::method::MethodKind;

/// A transform that turns a batch of time series into a batch of images.
///
/// Implementations hold no mutable state, so one instance can serve any
/// number of calls, from any number of threads.
///
/// # Implementation Notes
///
/// - `options` is a JSON object (or `null`) that the implementation parses
///   into its own typed configuration, rejecting unknown keys
/// - The input batch must be validated by the implementation, not the caller
/// - One output image per input sample, freshly computed on every call
///
/// # Example
///
/// ```rust,ignore
/// use tsimg_core::{ImagingTransform, ImageBatch, MethodKind, SequenceBatch, Result};
/// use serde_json::Value;
///
/// struct Identity;
///
/// impl ImagingTransform for Identity {
///     fn transform(&self, batch: &SequenceBatch, _options: &Value) -> Result<ImageBatch> {
///         batch.validate()?;
///         // Build one image per sample...
///     }
///
///     fn kind(&self) -> MethodKind {
///         MethodKind::Rp
///     }
/// }
/// ```
pub trait ImagingTransform: Send + Sync {
    /// Transform every sample of `batch` into an image.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `options` or `batch` are malformed.
    fn transform(&self, batch: &SequenceBatch, options: &Value) -> Result<ImageBatch>;

    /// The method this transform implements.
    fn kind(&self) -> MethodKind;

    /// Get the name of this transform for logging/debugging.
    fn name(&self) -> &str {
        self.kind().as_str()
    }
}

/// Parse JSON options into a typed configuration.
///
/// `null` yields the configuration's defaults. Any other value must be a JSON
/// object; arrays are refused even though serde would map them onto struct
/// fields by position.
///
/// # Errors
///
/// Returns [`ImagingError::InvalidOptions`] for non-object options, unknown
/// keys, or values of the wrong type.
pub fn parse_options<T>(method: MethodKind, options: &Value) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let found = match options {
        Value::Null => return Ok(T::default()),
        Value::Object(_) => {
            return T::deserialize(options)
                .map_err(|source| ImagingError::InvalidOptions { method, source })
        }
        Value::Array(_) => "an array",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
    };
    Err(ImagingError::InvalidOptions {
        method,
        source: serde::de::Error::custom(format!("expected a JSON object, found {}", found)),
    })
}
