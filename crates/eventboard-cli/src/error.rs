//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No data file given on the command line or in the config
    #[error("No data file configured. Pass --data or set data_file in the config.")]
    NoDataFile,

    /// View layer error
    #[error(transparent)]
    View(#[from] eventboard_views::ViewError),

    /// Derivation error
    #[error(transparent)]
    Derivation(#[from] eventboard_derivation::DerivationError),

    /// Notification config error
    #[error(transparent)]
    Notify(#[from] eventboard_notify::NotifyError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
