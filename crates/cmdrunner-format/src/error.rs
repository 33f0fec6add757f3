//! Error types for formatter construction and application

use thiserror::Error;

/// Formatter failures.
///
/// `InvalidFormatter` is raised while a runner is being built; the other
/// variants surface when a formatter is applied to a value at call time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid {kind} formatter: {reason}")]
    InvalidFormatter { kind: &'static str, reason: String },

    #[error("Value {value} not found in lookup table (keys: {keys})")]
    LookupMiss { value: String, keys: String },

    #[error("List of {len} elements outside allowed range {min}..={max}")]
    ListLength { len: usize, min: usize, max: usize },

    #[error("Expected a list, got {value}")]
    NotASequence { value: String },
}

impl FormatError {
    pub(crate) fn invalid(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidFormatter {
            kind,
            reason: reason.into(),
        }
    }
}
