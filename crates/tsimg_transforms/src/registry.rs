//! Transform registry for dispatching imaging methods by name.
//!
//! The registry maps every [`MethodKind`] to a transform handler and applies
//! it with JSON options.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tsimg_core::SequenceBatch;
//! use tsimg_transforms::registry::TransformRegistry;
//!
//! let registry = TransformRegistry::new();
//! let data = SequenceBatch::from_rows(&[vec![0.0, 0.5, 1.0, 0.5]]).unwrap();
//!
//! let images = registry.apply("gasf", &data, &json!({})).unwrap();
//! assert_eq!(images.len(), 1);
//! assert!(registry.apply("gaf", &data, &json!({})).is_err());
//! ```

use std::collections::HashMap;

use serde_json::Value;
use tsimg_core::{ImageBatch, ImagingError, ImagingTransform, MethodKind, Result, SequenceBatch};

use crate::gaf::GramianAngularField;
use crate::mtf::MarkovTransitionField;
use crate::rp::RecurrencePlot;

/// Boxed transform handler.
pub type TransformHandler = Box<dyn ImagingTransform>;

/// Fixed mapping from method to transform handler.
///
/// Built once by [`TransformRegistry::new`] and never modified afterwards,
/// so a shared registry can be used from several threads.
pub struct TransformRegistry {
    handlers: HashMap<MethodKind, TransformHandler>,
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("methods", &self.methods())
            .finish()
    }
}

impl TransformRegistry {
    /// Create a registry with every method registered.
    ///
    /// # Available Methods
    ///
    /// - `gasf` - Gramian Angular Summation Field
    /// - `gadf` - Gramian Angular Difference Field
    /// - `mtf` - Markov Transition Field
    /// - `rp` - Recurrence Plot
    #[must_use]
    pub fn new() -> Self {
        let handlers = MethodKind::ALL
            .into_iter()
            .map(|kind| (kind, handler_for(kind)))
            .collect();
        Self { handlers }
    }

    /// Apply the method registered under `name`.
    ///
    /// # Arguments
    ///
    /// * `name` - Method identifier (`gasf`, `gadf`, `mtf`, `rp`), case-sensitive
    /// * `data` - Batch of sequences, shape `(N, L)`
    /// * `options` - JSON object of method options, or `null` for defaults
    ///
    /// # Errors
    ///
    /// Returns [`ImagingError::UnknownMethod`] for an unregistered name, and
    /// whatever validation error the method raises for bad data or options.
    pub fn apply(&self, name: &str, data: &SequenceBatch, options: &Value) -> Result<ImageBatch> {
        let kind: MethodKind = name.parse()?;
        self.apply_kind(kind, data, options)
    }

    /// Apply a method selected by kind.
    ///
    /// # Errors
    ///
    /// Returns whatever validation error the method raises.
    pub fn apply_kind(
        &self,
        kind: MethodKind,
        data: &SequenceBatch,
        options: &Value,
    ) -> Result<ImageBatch> {
        let handler = self
            .handlers
            .get(&kind)
            .ok_or_else(|| ImagingError::UnknownMethod(kind.to_string()))?;

        let (n_samples, n_timestamps) = data.shape();
        tracing::debug!(method = %kind, n_samples, n_timestamps, "applying imaging method");

        handler.transform(data, options)
    }

    /// The handler registered for `kind`.
    #[must_use]
    pub fn get(&self, kind: MethodKind) -> Option<&dyn ImagingTransform> {
        self.handlers.get(&kind).map(|handler| handler.as_ref())
    }

    /// All registered methods, in declaration order.
    #[must_use]
    pub fn methods(&self) -> Vec<MethodKind> {
        let mut methods: Vec<MethodKind> = self.handlers.keys().copied().collect();
        methods.sort();
        methods
    }

    /// Check if a method name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        name.parse::<MethodKind>()
            .map(|kind| self.handlers.contains_key(&kind))
            .unwrap_or(false)
    }
}

fn handler_for(kind: MethodKind) -> TransformHandler {
    match kind {
        MethodKind::Gasf => Box::new(GramianAngularField::summation()),
        MethodKind::Gadf => Box::new(GramianAngularField::difference()),
        MethodKind::Mtf => Box::new(MarkovTransitionField::new()),
        MethodKind::Rp => Box::new(RecurrencePlot::new()),
    }
}
