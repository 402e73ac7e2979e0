//! Inputs to the view layer

use crate::error::{Result, ViewError};
use chrono::{DateTime, Utc};
use eventboard_domain::{BucketGranularity, EntitySnapshot, SnapshotId, TimeBucket, TimeSource};
use std::sync::Arc;

/// The snapshot and reference instant a set of views is derived from
///
/// A snapshot is required. The reference instant is only required by
/// time-dependent views; asking one of them without it fails with
/// [`ViewError::MissingReferenceTime`]. It is never filled in from the
/// system clock.
#[derive(Debug, Clone)]
pub struct ViewInputs {
    snapshot: Arc<EntitySnapshot>,
    at: Option<DateTime<Utc>>,
}

impl ViewInputs {
    /// Start building inputs
    pub fn builder() -> ViewInputsBuilder {
        ViewInputsBuilder::default()
    }

    /// The entity snapshot
    pub fn snapshot(&self) -> &Arc<EntitySnapshot> {
        &self.snapshot
    }

    /// Identity of the entity snapshot
    pub fn snapshot_id(&self) -> SnapshotId {
        self.snapshot.id()
    }

    /// The reference instant, if supplied
    pub fn at(&self) -> Option<DateTime<Utc>> {
        self.at
    }

    /// Bucket of the reference instant
    pub fn bucket(&self, granularity: BucketGranularity) -> Result<TimeBucket> {
        self.at
            .map(|at| granularity.bucket(at))
            .ok_or(ViewError::MissingReferenceTime)
    }
}

/// Builder for [`ViewInputs`]
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use eventboard_domain::EntitySnapshot;
/// use eventboard_views::{ViewError, ViewInputs};
///
/// let inputs = ViewInputs::builder()
///     .snapshot(EntitySnapshot::empty().into_shared())
///     .at(Utc::now())
///     .build()
///     .unwrap();
/// assert!(inputs.at().is_some());
///
/// let missing = ViewInputs::builder().at(Utc::now()).build();
/// assert_eq!(missing.unwrap_err(), ViewError::MissingSnapshot);
/// ```
#[derive(Debug, Default)]
pub struct ViewInputsBuilder {
    snapshot: Option<Arc<EntitySnapshot>>,
    at: Option<DateTime<Utc>>,
}

impl ViewInputsBuilder {
    /// Set the entity snapshot
    pub fn snapshot(mut self, snapshot: Arc<EntitySnapshot>) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Set the reference instant
    pub fn at(mut self, at: DateTime<Utc>) -> Self {
        self.at = Some(at);
        self
    }

    /// Read the reference instant from a time source
    pub fn clock(self, clock: &dyn TimeSource) -> Self {
        self.at(clock.now())
    }

    /// Finish building
    pub fn build(self) -> Result<ViewInputs> {
        let snapshot = self.snapshot.ok_or(ViewError::MissingSnapshot)?;
        Ok(ViewInputs {
            snapshot,
            at: self.at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use eventboard_domain::FixedClock;

    #[test]
    fn test_build_with_clock() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 11, 30, 45).unwrap();
        let snapshot = EntitySnapshot::empty().into_shared();

        let inputs = ViewInputs::builder()
            .snapshot(Arc::clone(&snapshot))
            .clock(&FixedClock::new(instant))
            .build()
            .unwrap();

        assert_eq!(inputs.at(), Some(instant));
        assert_eq!(inputs.snapshot_id(), snapshot.id());
        assert_eq!(
            inputs.bucket(BucketGranularity::Minute).unwrap().start(),
            Utc.with_ymd_and_hms(2024, 1, 1, 11, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_snapshot() {
        let result = ViewInputs::builder().build();
        assert_eq!(result.unwrap_err(), ViewError::MissingSnapshot);
    }

    #[test]
    fn test_missing_reference_time() {
        let inputs = ViewInputs::builder()
            .snapshot(EntitySnapshot::empty().into_shared())
            .build()
            .unwrap();

        assert_eq!(inputs.at(), None);
        assert_eq!(
            inputs.bucket(BucketGranularity::Minute),
            Err(ViewError::MissingReferenceTime)
        );
    }
}
