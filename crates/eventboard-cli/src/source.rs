//! Snapshot source and clock used by the CLI

use crate::error::{CliError, Result};
use chrono::{DateTime, Utc};
use eventboard_domain::traits::SnapshotSource;
use eventboard_domain::{EntitySet, EntitySnapshot, FixedClock, SystemClock, TimeSource};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

/// Loads entity snapshots from a JSON file
///
/// The file holds `{events, suppliers, items, ratings}`. A file that has
/// not been modified since the last load yields the same snapshot; any
/// reload yields a new snapshot identity.
#[derive(Debug)]
pub struct JsonFileSource {
    path: PathBuf,
    last: Mutex<Option<(SystemTime, Arc<EntitySnapshot>)>>,
}

impl JsonFileSource {
    /// Source reading `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last: Mutex::new(None),
        }
    }

    /// Path of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Arc<EntitySnapshot>> {
        let contents = fs::read_to_string(&self.path)?;
        let entities: EntitySet = serde_json::from_str(&contents)?;
        let snapshot = EntitySnapshot::from_entities(entities).into_shared();

        tracing::info!(
            "Loaded snapshot {} from {}: {} events, {} suppliers, {} items, {} ratings",
            snapshot.id(),
            self.path.display(),
            snapshot.events().len(),
            snapshot.suppliers().len(),
            snapshot.items().len(),
            snapshot.ratings().len()
        );
        Ok(snapshot)
    }
}

impl SnapshotSource for JsonFileSource {
    type Error = CliError;

    fn load(&self) -> Result<Arc<EntitySnapshot>> {
        let modified = fs::metadata(&self.path)?.modified()?;
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((seen, snapshot)) = last.as_ref() {
            if *seen == modified {
                tracing::debug!("{} unchanged, reusing snapshot", self.path.display());
                return Ok(Arc::clone(snapshot));
            }
        }

        let snapshot = self.read()?;
        *last = Some((modified, Arc::clone(&snapshot)));
        Ok(snapshot)
    }
}

/// The reference clock: pinned with `--at`, otherwise the wall clock
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// Current time
    System(SystemClock),
    /// A fixed instant
    Fixed(FixedClock),
}

impl Clock {
    /// Fixed clock if an instant is given, wall clock otherwise
    pub fn from_option(at: Option<DateTime<Utc>>) -> Self {
        match at {
            Some(instant) => Clock::Fixed(FixedClock::new(instant)),
            None => Clock::System(SystemClock),
        }
    }
}

impl TimeSource for Clock {
    fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System(clock) => clock.now(),
            Clock::Fixed(clock) => clock.now(),
        }
    }
}
