//! Command implementations.

pub mod classify;
pub mod config;
pub mod costs;
pub mod in_progress;
pub mod integrity;
pub mod notify;
pub mod rating;
pub mod watch;

pub use self::classify::execute_classify;
pub use self::config::execute_config;
pub use self::costs::execute_costs;
pub use self::in_progress::execute_in_progress;
pub use self::integrity::execute_integrity;
pub use self::notify::execute_notify_status;
pub use self::rating::execute_rating;
pub use self::watch::execute_watch;

use crate::error::Result;
use crate::source::{Clock, JsonFileSource};
use eventboard_domain::traits::SnapshotSource;
use eventboard_views::{DashboardViews, ViewInputs};

/// What data-reading commands run against
pub struct Session {
    source: JsonFileSource,
    clock: Clock,
    views: DashboardViews,
}

impl Session {
    /// Create a session.
    pub fn new(source: JsonFileSource, clock: Clock, views: DashboardViews) -> Self {
        Self { source, clock, views }
    }

    /// Load the snapshot and read the clock once.
    pub fn inputs(&self) -> Result<ViewInputs> {
        let snapshot = self.source.load()?;
        Ok(ViewInputs::builder()
            .snapshot(snapshot)
            .clock(&self.clock)
            .build()?)
    }

    /// The memoized views.
    pub fn views(&mut self) -> &mut DashboardViews {
        &mut self.views
    }

    /// Split into views, source and clock.
    pub fn into_parts(self) -> (DashboardViews, JsonFileSource, Clock) {
        (self.views, self.source, self.clock)
    }
}
