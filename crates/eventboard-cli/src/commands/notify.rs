//! Notify-status command implementation.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use eventboard_notify::{NotificationConfig, PUBLIC_KEY_ENV};

/// Execute the notify-status command.
pub fn execute_notify_status(config: &NotificationConfig, formatter: &Formatter) -> Result<String> {
    let configured = config.is_configured();

    Ok(match formatter.format() {
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "configured": configured,
        }))?,
        OutputFormat::Quiet => configured.to_string(),
        OutputFormat::Table if configured => formatter.success("Push notifications are configured"),
        OutputFormat::Table => formatter.warning(&format!(
            "Push notifications disabled: set notifications.public_key or {}",
            PUBLIC_KEY_ENV
        )),
    })
}
