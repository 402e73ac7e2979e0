//! Notification configuration errors

use thiserror::Error;

/// Errors loading notification configuration
///
/// A missing key is not an error; it simply leaves the feature disabled.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Config is not valid TOML
    #[error("Invalid notification config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for notification configuration
pub type Result<T> = std::result::Result<T, NotifyError>;
