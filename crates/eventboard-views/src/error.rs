//! Error types for view operations

use eventboard_derivation::DerivationError;
use thiserror::Error;

/// Contract errors raised by the view layer
///
/// Data problems in the snapshot are not errors; they surface as anomalies
/// on the derived views.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    /// A time-dependent view was requested without a reference instant
    #[error("No reference time supplied for a time-dependent view")]
    MissingReferenceTime,

    /// Inputs were built without an entity snapshot
    #[error("No entity snapshot supplied")]
    MissingSnapshot,

    /// Derivation setup error (unknown classification, bad score range)
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    /// The snapshot source failed to load
    #[error("Snapshot source error: {0}")]
    Source(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for view operations
pub type Result<T> = std::result::Result<T, ViewError>;
