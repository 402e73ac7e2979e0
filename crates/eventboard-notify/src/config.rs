//! Notification configuration

use crate::error::Result;
use crate::guard::is_configured;
use serde::{Deserialize, Serialize};

/// Environment variable holding the push public key
pub const PUBLIC_KEY_ENV: &str = "EVENTBOARD_PUSH_PUBLIC_KEY";

/// Deployment configuration for push notifications
///
/// # Examples
///
/// ```
/// use eventboard_notify::NotificationConfig;
///
/// let config = NotificationConfig::from_toml_str("public_key = \"abc123\"").unwrap();
/// assert!(config.is_configured());
///
/// assert!(!NotificationConfig::default().is_configured());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Public key used by the subscription flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

impl NotificationConfig {
    /// Config with the given key
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            public_key: Some(key.into()),
        }
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read the key from [`PUBLIC_KEY_ENV`]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the key through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            public_key: lookup(PUBLIC_KEY_ENV),
        }
    }

    /// Fill a missing key from another config
    ///
    /// Used to let the environment override or complement a config file.
    pub fn or(self, fallback: NotificationConfig) -> Self {
        if is_configured(self.public_key.as_deref()) {
            self
        } else {
            fallback
        }
    }

    /// Whether the subscription flow should be attempted
    pub fn is_configured(&self) -> bool {
        let configured = is_configured(self.public_key.as_deref());
        if !configured {
            tracing::debug!("Push notifications disabled: no public key configured");
        }
        configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_not_configured() {
        assert!(!NotificationConfig::default().is_configured());
    }

    #[test]
    fn test_from_toml_str() {
        let config = NotificationConfig::from_toml_str("public_key = \"BEl62iUY\"").unwrap();
        assert_eq!(config.public_key.as_deref(), Some("BEl62iUY"));
        assert!(config.is_configured());

        let empty = NotificationConfig::from_toml_str("public_key = \"\"").unwrap();
        assert!(!empty.is_configured());

        let absent = NotificationConfig::from_toml_str("").unwrap();
        assert_eq!(absent, NotificationConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(NotificationConfig::from_toml_str("public_key = ").is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = NotificationConfig::from_lookup(|name| {
            (name == PUBLIC_KEY_ENV).then(|| "abc123".to_string())
        });
        assert!(config.is_configured());

        let unset = NotificationConfig::from_lookup(|_| None);
        assert!(!unset.is_configured());
    }

    #[test]
    fn test_or_prefers_configured_key() {
        let file = NotificationConfig::with_key("from-file");
        let env = NotificationConfig::with_key("from-env");

        assert_eq!(env.clone().or(file.clone()), env);
        assert_eq!(NotificationConfig::with_key("").or(file.clone()), file);
        assert_eq!(NotificationConfig::default().or(file.clone()), file);
    }
}
