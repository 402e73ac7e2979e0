//! Event module - the scheduled occasions suppliers are booked for

use crate::{AnomalyKind, EventId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event as delivered by the remote store
///
/// `start` is optional on the wire only because the store does not enforce
/// it; an event without a start cannot be placed in time and is reported as
/// an anomaly by every temporal derivation. A missing `end` means the event
/// is open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub id: EventId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// When the event starts
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,

    /// When the event ends (None = open-ended)
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl Event {
    /// Create a new event
    pub fn new(
        id: EventId,
        name: impl Into<String>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            start,
            end,
        }
    }

    /// Validated time window of this event
    ///
    /// Fails with the anomaly describing why the event cannot be placed in
    /// time. An end before the start is never swapped.
    pub fn window(&self) -> Result<EventWindow, AnomalyKind> {
        let start = self.start.ok_or(AnomalyKind::MissingStart)?;

        if let Some(end) = self.end {
            if end < start {
                return Err(AnomalyKind::EndBeforeStart { start, end });
            }
        }

        Ok(EventWindow {
            start,
            end: self.end,
        })
    }
}

/// A well-formed event time window (`end`, when present, is not before `start`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
}

impl EventWindow {
    /// Start instant
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End instant (None = open-ended)
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Whether `now` falls inside the window, both bounds inclusive
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && self.end.map_or(true, |end| now <= end)
    }

    /// Whether the window has not started yet at `now`
    pub fn starts_after(&self, now: DateTime<Utc>) -> bool {
        now < self.start
    }

    /// Whether the window closed strictly before `now`
    pub fn ended_before(&self, now: DateTime<Utc>) -> bool {
        self.end.map_or(false, |end| end < now)
    }
}
