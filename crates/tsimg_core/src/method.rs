//! The closed set of imaging methods.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ImagingError;

/// Identifies one of the supported imaging methods.
///
/// String identifiers are lowercase and case-sensitive.
///
/// ```rust
/// use tsimg_core::MethodKind;
///
/// let kind: MethodKind = "gadf".parse().unwrap();
/// assert_eq!(kind, MethodKind::Gadf);
/// assert!("GADF".parse::<MethodKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    /// Gramian Angular Summation Field.
    Gasf,
    /// Gramian Angular Difference Field.
    Gadf,
    /// Markov Transition Field.
    Mtf,
    /// Recurrence Plot.
    Rp,
}

impl MethodKind {
    /// All methods, in registration order.
    pub const ALL: [MethodKind; 4] = [Self::Gasf, Self::Gadf, Self::Mtf, Self::Rp];

    /// The method's string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gasf => "gasf",
            Self::Gadf => "gadf",
            Self::Mtf => "mtf",
            Self::Rp => "rp",
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Gasf => "Gramian Angular Summation Field",
            Self::Gadf => "Gramian Angular Difference Field",
            Self::Mtf => "Markov Transition Field",
            Self::Rp => "Recurrence Plot",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodKind {
    type Err = ImagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ImagingError::UnknownMethod(s.to_string()))
    }
}
