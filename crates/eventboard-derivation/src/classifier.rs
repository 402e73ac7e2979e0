//! Temporal classification of events
//!
//! A classification is a named predicate over an event's time window and a
//! reference instant. The built-in classes cover "in progress", "upcoming"
//! and "past"; more can be registered on a [`Classifier`] without touching
//! the existing ones.

use crate::DerivationError;
use chrono::{DateTime, Utc};
use eventboard_domain::{Anomalies, EntitySnapshot, Event, EventId, EventWindow, RecordRef};
use serde::Serialize;

/// Name of the built-in "in progress" class
pub const IN_PROGRESS: &str = "in_progress";

/// Name of the built-in "upcoming" class
pub const UPCOMING: &str = "upcoming";

/// Name of the built-in "past" class
pub const PAST: &str = "past";

/// A temporal classification of events
pub trait TemporalClass: Send + Sync {
    /// Unique name of the class
    fn name(&self) -> &str;

    /// Whether an event with this window belongs to the class at `now`
    fn matches(&self, window: &EventWindow, now: DateTime<Utc>) -> bool;
}

/// Events running at the reference instant: `start <= now` and
/// (`end` absent or `now <= end`)
#[derive(Debug, Clone, Copy, Default)]
pub struct InProgress;

impl TemporalClass for InProgress {
    fn name(&self) -> &str {
        IN_PROGRESS
    }

    fn matches(&self, window: &EventWindow, now: DateTime<Utc>) -> bool {
        window.contains(now)
    }
}

/// Events that have not started yet: `now < start`
#[derive(Debug, Clone, Copy, Default)]
pub struct Upcoming;

impl TemporalClass for Upcoming {
    fn name(&self) -> &str {
        UPCOMING
    }

    fn matches(&self, window: &EventWindow, now: DateTime<Utc>) -> bool {
        window.starts_after(now)
    }
}

/// Events that are over: `end` present and `end < now`
#[derive(Debug, Clone, Copy, Default)]
pub struct Past;

impl TemporalClass for Past {
    fn name(&self) -> &str {
        PAST
    }

    fn matches(&self, window: &EventWindow, now: DateTime<Utc>) -> bool {
        window.ended_before(now)
    }
}

type WindowPredicate = dyn Fn(&EventWindow, DateTime<Utc>) -> bool + Send + Sync;

/// A class defined by a closure
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use eventboard_derivation::{Classifier, PredicateClass};
///
/// let mut classifier = Classifier::with_defaults();
/// classifier
///     .register(PredicateClass::new("starting_soon", |window, now| {
///         window.starts_after(now) && window.start() - now <= TimeDelta::hours(1)
///     }))
///     .unwrap();
/// assert!(classifier.contains("starting_soon"));
/// ```
pub struct PredicateClass {
    name: String,
    predicate: Box<WindowPredicate>,
}

impl PredicateClass {
    /// Create a class from a name and a window predicate
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&EventWindow, DateTime<Utc>) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
        }
    }
}

impl TemporalClass for PredicateClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, window: &EventWindow, now: DateTime<Utc>) -> bool {
        (self.predicate)(window, now)
    }
}

impl std::fmt::Debug for PredicateClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateClass")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Result of classifying events with one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// Class name
    pub class: String,

    /// Reference instant the class was evaluated at
    pub at: DateTime<Utc>,

    /// Matching events, in input order
    pub event_ids: Vec<EventId>,

    /// Events that could not be placed in time
    pub anomalies: Anomalies,
}

impl Classification {
    /// Number of matching events
    pub fn len(&self) -> usize {
        self.event_ids.len()
    }

    /// Whether no event matched
    pub fn is_empty(&self) -> bool {
        self.event_ids.is_empty()
    }

    /// Whether the event matched
    pub fn contains(&self, id: EventId) -> bool {
        self.event_ids.contains(&id)
    }

    /// Resolve matching events against the snapshot they were derived from
    pub fn events<'a>(&'a self, snapshot: &'a EntitySnapshot) -> impl Iterator<Item = &'a Event> + 'a {
        self.event_ids.iter().filter_map(move |id| snapshot.event(*id))
    }
}

/// Classify events with a single class
///
/// One linear pass; matching events keep their input order. Events without
/// a start or ending before they start are left out and recorded as
/// anomalies.
pub fn classify_with(class: &dyn TemporalClass, events: &[Event], now: DateTime<Utc>) -> Classification {
    let mut event_ids = Vec::new();
    let mut anomalies = Anomalies::new();

    for event in events {
        match event.window() {
            Ok(window) => {
                if class.matches(&window, now) {
                    event_ids.push(event.id);
                }
            }
            Err(kind) => anomalies.record(RecordRef::Event(event.id), kind),
        }
    }

    tracing::debug!(
        "Classified {} events as {}: {} matched, {} anomalies",
        events.len(),
        class.name(),
        event_ids.len(),
        anomalies.len()
    );

    Classification {
        class: class.name().to_string(),
        at: now,
        event_ids,
        anomalies,
    }
}

/// Events in progress at `now`
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use eventboard_derivation::events_in_progress;
/// use eventboard_domain::{Event, EventId};
///
/// let at = |h| Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap();
/// let events = vec![
///     Event::new(EventId::new(1), "Morning", Some(at(10)), Some(at(12))),
///     Event::new(EventId::new(2), "Evening", Some(at(13)), None),
/// ];
///
/// assert_eq!(events_in_progress(&events, at(11)).event_ids, vec![EventId::new(1)]);
/// assert_eq!(events_in_progress(&events, at(14)).event_ids, vec![EventId::new(2)]);
/// ```
pub fn events_in_progress(events: &[Event], now: DateTime<Utc>) -> Classification {
    classify_with(&InProgress, events, now)
}

/// Events grouped by every registered class at once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition {
    /// Reference instant
    pub at: DateTime<Utc>,

    /// Matching events per class, in registration order
    pub groups: Vec<(String, Vec<EventId>)>,

    /// Events that could not be placed in time, recorded once each
    pub anomalies: Anomalies,
}

impl Partition {
    /// Events matching the named class
    pub fn get(&self, class: &str) -> Option<&[EventId]> {
        self.groups
            .iter()
            .find(|(name, _)| name == class)
            .map(|(_, ids)| ids.as_slice())
    }
}

/// Registry of temporal classes
pub struct Classifier {
    classes: Vec<Box<dyn TemporalClass>>,
}

impl Classifier {
    /// Create a classifier with no classes
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
        }
    }

    /// Create a classifier with the built-in classes
    /// (in progress, upcoming, past)
    pub fn with_defaults() -> Self {
        Self {
            classes: vec![Box::new(InProgress), Box::new(Upcoming), Box::new(Past)],
        }
    }

    /// Register an additional class
    pub fn register<C: TemporalClass + 'static>(&mut self, class: C) -> Result<(), DerivationError> {
        if self.contains(class.name()) {
            return Err(DerivationError::DuplicateClass(class.name().to_string()));
        }
        self.classes.push(Box::new(class));
        Ok(())
    }

    /// Whether a class with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c.name() == name)
    }

    /// The class registered under `name`
    pub fn get(&self, name: &str) -> Option<&dyn TemporalClass> {
        self.classes
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Names of the registered classes, in registration order
    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name()).collect()
    }

    /// Classify events with the named class
    pub fn classify(
        &self,
        name: &str,
        events: &[Event],
        now: DateTime<Utc>,
    ) -> Result<Classification, DerivationError> {
        let class = self
            .get(name)
            .ok_or_else(|| DerivationError::UnknownClass(name.to_string()))?;

        Ok(classify_with(class, events, now))
    }

    /// Classify events with every registered class in one pass
    pub fn partition(&self, events: &[Event], now: DateTime<Utc>) -> Partition {
        let mut groups: Vec<(String, Vec<EventId>)> = self
            .classes
            .iter()
            .map(|c| (c.name().to_string(), Vec::new()))
            .collect();
        let mut anomalies = Anomalies::new();

        for event in events {
            match event.window() {
                Ok(window) => {
                    for (class, (_, ids)) in self.classes.iter().zip(groups.iter_mut()) {
                        if class.matches(&window, now) {
                            ids.push(event.id);
                        }
                    }
                }
                Err(kind) => anomalies.record(RecordRef::Event(event.id), kind),
            }
        }

        tracing::debug!(
            "Partitioned {} events into {} classes, {} anomalies",
            events.len(),
            groups.len(),
            anomalies.len()
        );

        Partition {
            at: now,
            groups,
            anomalies,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("classes", &self.class_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use eventboard_domain::AnomalyKind;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    fn event(id: u64, start: Option<u32>, end: Option<u32>) -> Event {
        Event::new(EventId::new(id), format!("event {}", id), start.map(at), end.map(at))
    }

    fn ids(values: &[u64]) -> Vec<EventId> {
        values.iter().map(|&v| EventId::new(v)).collect()
    }

    #[test]
    fn test_in_progress_scenario() {
        let events = vec![event(1, Some(10), Some(12)), event(2, Some(13), None)];

        assert_eq!(events_in_progress(&events, at(11)).event_ids, ids(&[1]));
        assert_eq!(events_in_progress(&events, at(14)).event_ids, ids(&[2]));
    }

    #[test]
    fn test_in_progress_bounds_inclusive() {
        let events = vec![event(1, Some(10), Some(12))];

        assert!(events_in_progress(&events, at(10)).contains(EventId::new(1)));
        assert!(events_in_progress(&events, at(12)).contains(EventId::new(1)));
        assert!(events_in_progress(&events, at(9)).is_empty());
        assert!(events_in_progress(&events, at(13)).is_empty());
    }

    #[test]
    fn test_in_progress_preserves_input_order() {
        let events = vec![
            event(5, Some(9), None),
            event(3, Some(8), Some(20)),
            event(4, Some(10), Some(11)),
        ];

        let result = events_in_progress(&events, at(10));
        assert_eq!(result.event_ids, ids(&[5, 3, 4]));
    }

    #[test]
    fn test_missing_start_is_anomaly_not_failure() {
        let events = vec![event(1, None, Some(12)), event(2, Some(9), None)];

        let result = events_in_progress(&events, at(11));
        assert_eq!(result.event_ids, ids(&[2]));
        assert_eq!(result.anomalies.len(), 1);
        let anomaly = result.anomalies.iter().next().unwrap();
        assert_eq!(anomaly.record, RecordRef::Event(EventId::new(1)));
        assert_eq!(anomaly.kind, AnomalyKind::MissingStart);
    }

    #[test]
    fn test_end_before_start_is_anomaly() {
        let events = vec![event(1, Some(12), Some(10))];

        let result = events_in_progress(&events, at(11));
        assert!(result.is_empty());
        assert_eq!(result.anomalies.count_by_kind()["end_before_start"], 1);
    }

    #[test]
    fn test_upcoming_and_past() {
        let classifier = Classifier::with_defaults();
        let events = vec![
            event(1, Some(8), Some(9)),
            event(2, Some(10), Some(12)),
            event(3, Some(15), None),
        ];

        let upcoming = classifier.classify(UPCOMING, &events, at(11)).unwrap();
        let past = classifier.classify(PAST, &events, at(11)).unwrap();

        assert_eq!(upcoming.event_ids, ids(&[3]));
        assert_eq!(past.event_ids, ids(&[1]));
    }

    #[test]
    fn test_unknown_class() {
        let classifier = Classifier::with_defaults();
        let result = classifier.classify("cancelled", &[], at(11));
        assert_eq!(result, Err(DerivationError::UnknownClass("cancelled".to_string())));
    }

    #[test]
    fn test_register_custom_class() {
        let mut classifier = Classifier::with_defaults();
        classifier
            .register(PredicateClass::new("starting_soon", |window, now| {
                window.starts_after(now) && window.start() - now <= TimeDelta::hours(2)
            }))
            .unwrap();

        let events = vec![event(1, Some(12), None), event(2, Some(18), None)];
        let soon = classifier.classify("starting_soon", &events, at(11)).unwrap();
        assert_eq!(soon.event_ids, ids(&[1]));

        // Built-in classes are unaffected
        let upcoming = classifier.classify(UPCOMING, &events, at(11)).unwrap();
        assert_eq!(upcoming.event_ids, ids(&[1, 2]));
        assert_eq!(
            classifier.class_names(),
            vec![IN_PROGRESS, UPCOMING, PAST, "starting_soon"]
        );
    }

    #[test]
    fn test_register_duplicate_class() {
        let mut classifier = Classifier::with_defaults();
        let result = classifier.register(InProgress);
        assert_eq!(result, Err(DerivationError::DuplicateClass(IN_PROGRESS.to_string())));
    }

    #[test]
    fn test_partition_records_anomalies_once() {
        let classifier = Classifier::with_defaults();
        let events = vec![
            event(1, Some(8), Some(9)),
            event(2, None, None),
            event(3, Some(10), None),
            event(4, Some(20), None),
        ];

        let partition = classifier.partition(&events, at(11));
        assert_eq!(partition.get(IN_PROGRESS), Some(ids(&[3]).as_slice()));
        assert_eq!(partition.get(UPCOMING), Some(ids(&[4]).as_slice()));
        assert_eq!(partition.get(PAST), Some(ids(&[1]).as_slice()));
        assert_eq!(partition.get("other"), None);
        assert_eq!(partition.anomalies.len(), 1);
    }

    #[test]
    fn test_resolve_events_against_snapshot() {
        let snapshot = EntitySnapshot::new(
            vec![event(1, Some(10), Some(12)), event(2, Some(13), None)],
            vec![],
            vec![],
            vec![],
        );

        let result = events_in_progress(snapshot.events(), at(11));
        let names: Vec<&str> = result.events(&snapshot).map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["event 1"]);
    }
}
