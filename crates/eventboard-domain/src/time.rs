//! Time source and time buckets
//!
//! Derivations never read the system clock. The reference instant is an
//! input: hosts read it from a [`TimeSource`] at the edge and pass it down.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supplies the reference instant for time-windowed derivations
pub trait TimeSource {
    /// Current reference instant
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock; only hosts should use it
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a chosen instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    /// Pin the clock to `instant`
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    /// Move the clock to another instant
    pub fn set(&mut self, instant: DateTime<Utc>) {
        self.instant = instant;
    }

    /// Move the clock forward (or backward, for negative deltas)
    pub fn advance(&mut self, delta: TimeDelta) {
        self.instant += delta;
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// Granularity the reference instant is rounded down to before caching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketGranularity {
    /// One-second buckets
    Second,

    /// One-minute buckets
    #[default]
    Minute,

    /// One-hour buckets
    Hour,
}

impl BucketGranularity {
    /// Bucket length in seconds
    pub fn seconds(&self) -> i64 {
        match self {
            BucketGranularity::Second => 1,
            BucketGranularity::Minute => 60,
            BucketGranularity::Hour => 3600,
        }
    }

    /// Get the granularity name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketGranularity::Second => "second",
            BucketGranularity::Minute => "minute",
            BucketGranularity::Hour => "hour",
        }
    }

    /// Parse a granularity name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "second" => Some(BucketGranularity::Second),
            "minute" => Some(BucketGranularity::Minute),
            "hour" => Some(BucketGranularity::Hour),
            _ => None,
        }
    }

    /// Bucket containing `instant`
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use eventboard_domain::BucketGranularity;
    ///
    /// let instant = Utc.with_ymd_and_hms(2024, 1, 1, 11, 42, 17).unwrap();
    /// let bucket = BucketGranularity::Minute.bucket(instant);
    /// assert_eq!(bucket.start(), Utc.with_ymd_and_hms(2024, 1, 1, 11, 42, 0).unwrap());
    /// ```
    pub fn bucket(&self, instant: DateTime<Utc>) -> TimeBucket {
        let length = self.seconds();
        let floor = instant.timestamp().div_euclid(length) * length;
        // Flooring a representable instant stays representable except at
        // the very bottom of chrono's range
        let start = DateTime::from_timestamp(floor, 0).unwrap_or(instant);

        TimeBucket {
            start,
            granularity: *self,
        }
    }
}

impl std::str::FromStr for BucketGranularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid bucket granularity: {}", s))
    }
}

/// A reference instant rounded down to a granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeBucket {
    start: DateTime<Utc>,
    granularity: BucketGranularity,
}

impl TimeBucket {
    /// First instant of the bucket; time-dependent views are evaluated here
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Granularity of the bucket
    pub fn granularity(&self) -> BucketGranularity {
        self.granularity
    }

    /// First instant after the bucket
    pub fn end(&self) -> DateTime<Utc> {
        self.start + TimeDelta::seconds(self.granularity.seconds())
    }

    /// Whether `instant` falls in this bucket
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end()
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.start.to_rfc3339(), self.granularity.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_minute_bucket() {
        let bucket = BucketGranularity::Minute.bucket(instant(11, 0, 59));
        assert_eq!(bucket.start(), instant(11, 0, 0));
        assert_eq!(bucket.end(), instant(11, 1, 0));
        assert!(bucket.contains(instant(11, 0, 30)));
        assert!(!bucket.contains(instant(11, 1, 0)));
    }

    #[test]
    fn test_same_minute_same_bucket() {
        let a = BucketGranularity::Minute.bucket(instant(11, 5, 1));
        let b = BucketGranularity::Minute.bucket(instant(11, 5, 58));
        let c = BucketGranularity::Minute.bucket(instant(11, 6, 0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_hour_bucket() {
        let bucket = BucketGranularity::Hour.bucket(instant(14, 59, 59));
        assert_eq!(bucket.start(), instant(14, 0, 0));
    }

    #[test]
    fn test_bucket_before_epoch_floors_down() {
        let before_epoch = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 30).unwrap();
        let bucket = BucketGranularity::Minute.bucket(before_epoch);
        assert_eq!(
            bucket.start(),
            Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 0).unwrap()
        );
    }

    #[test]
    fn test_fixed_clock() {
        let mut clock = FixedClock::new(instant(10, 0, 0));
        assert_eq!(clock.now(), instant(10, 0, 0));

        clock.advance(TimeDelta::minutes(90));
        assert_eq!(clock.now(), instant(11, 30, 0));

        clock.set(instant(9, 0, 0));
        assert_eq!(clock.now(), instant(9, 0, 0));
    }

    #[test]
    fn test_granularity_parsing() {
        assert_eq!(BucketGranularity::parse("Minute"), Some(BucketGranularity::Minute));
        assert_eq!("hour".parse::<BucketGranularity>(), Ok(BucketGranularity::Hour));
        assert!("fortnight".parse::<BucketGranularity>().is_err());
    }
}
