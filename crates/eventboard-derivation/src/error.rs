//! Derivation error types

use thiserror::Error;

/// Errors that can occur when setting up or invoking a derivation
///
/// Per-record data problems are never reported here; they are recorded as
/// anomalies on the derived view.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DerivationError {
    /// No classification registered under this name
    #[error("Unknown classification: {0}")]
    UnknownClass(String),

    /// A classification with this name is already registered
    #[error("Classification already registered: {0}")]
    DuplicateClass(String),

    /// Score range bounds are not finite or not ordered
    #[error("Invalid score range [{min}, {max}]")]
    InvalidScoreRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
}

/// Result type for derivation setup
pub type Result<T> = std::result::Result<T, DerivationError>;
