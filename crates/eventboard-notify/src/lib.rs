//! Eventboard Notifications
//!
//! Gate for the push-subscription flow. Only the presence of the public
//! key is checked here; subscription and transport live elsewhere.

#![warn(missing_docs)]

mod config;
mod error;
mod guard;

pub use config::{NotificationConfig, PUBLIC_KEY_ENV};
pub use error::{NotifyError, Result};
pub use guard::is_configured;
