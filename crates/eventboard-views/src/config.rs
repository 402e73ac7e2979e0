//! Configuration for the view layer
//!
//! Defines the time-bucket granularity, the rating score range and the
//! refresh interval hosts use when polling.

use crate::error::{Result, ViewError};
use eventboard_derivation::ScoreRange;
use eventboard_domain::BucketGranularity;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for [`DashboardViews`](crate::DashboardViews)
///
/// # Examples
///
/// ```
/// use eventboard_domain::BucketGranularity;
/// use eventboard_views::ViewConfig;
///
/// // Default configuration (minute buckets)
/// let config = ViewConfig::default();
/// assert_eq!(config.granularity, BucketGranularity::Minute);
///
/// // Realtime dashboards
/// let config = ViewConfig::realtime();
/// assert_eq!(config.granularity, BucketGranularity::Second);
///
/// // Coarse dashboards
/// let config = ViewConfig::coarse();
/// assert_eq!(config.granularity, BucketGranularity::Hour);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Granularity the reference instant is rounded down to
    /// Default: minute
    #[serde(default)]
    pub granularity: BucketGranularity,

    /// How often polling hosts reload the snapshot (in seconds)
    /// Default: 30
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Log a warning for every recomputation that surfaced anomalies
    /// Default: true
    #[serde(default = "default_warn_on_anomalies")]
    pub warn_on_anomalies: bool,

    /// Valid range for rating scores
    /// Default: 0 to 5 inclusive
    #[serde(default)]
    pub score_range: ScoreRange,
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_warn_on_anomalies() -> bool {
    true
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            granularity: BucketGranularity::Minute,
            refresh_interval_secs: default_refresh_interval_secs(),
            warn_on_anomalies: true,
            score_range: ScoreRange::default(),
        }
    }
}

impl ViewConfig {
    /// Second buckets, refreshed every second
    ///
    /// Time views recompute on every tick; use for wall displays.
    pub fn realtime() -> Self {
        Self {
            granularity: BucketGranularity::Second,
            refresh_interval_secs: 1,
            ..Self::default()
        }
    }

    /// Hour buckets, refreshed every five minutes
    pub fn coarse() -> Self {
        Self {
            granularity: BucketGranularity::Hour,
            refresh_interval_secs: 300,
            ..Self::default()
        }
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ViewError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ViewError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Check the configured values
    pub fn validate(&self) -> Result<()> {
        self.score_range.validate()?;
        if self.refresh_interval_secs == 0 {
            return Err(ViewError::Config(
                "refresh_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get refresh interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
