//! Memoized dashboard views
//!
//! Each view declares the inputs it depends on as its cache key. A lookup
//! whose key is unchanged returns the previously derived `Arc`; anything
//! else recomputes from the snapshot.

use crate::config::ViewConfig;
use crate::error::Result;
use crate::inputs::ViewInputs;
use crate::memo::Memo;
use crate::metrics::ViewMetrics;
use eventboard_derivation::{
    classify_with, cost_by_event, events_in_progress, mean_rating, supplier_ratings_for_event,
    Classification, Classifier, CostSummary, DerivationError, EventCosts, Partition,
    RatingSummary, TemporalClass,
};
use eventboard_domain::{Anomalies, EventId, SnapshotId, SupplierId, TimeBucket};
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

type TimeKey = (SnapshotId, TimeBucket);

/// View names used in metrics and logs
pub mod names {
    /// Events in progress
    pub const IN_PROGRESS: &str = "in_progress";
    /// A named classification
    pub const CLASSIFICATION: &str = "classification";
    /// All classifications at once
    pub const PARTITION: &str = "partition";
    /// Supplier cost of every event
    pub const EVENT_COSTS: &str = "event_costs";
    /// Mean rating of a supplier in an event
    pub const SUPPLIER_RATING: &str = "supplier_rating";
    /// Mean rating of every supplier in an event
    pub const SUPPLIER_RATINGS: &str = "supplier_ratings";
    /// Snapshot-level integrity problems
    pub const INTEGRITY: &str = "integrity";
}

/// Views that carry anomalies worth surfacing on recomputation
trait Surfaced {
    fn surfaced(&self) -> Anomalies;
}

impl Surfaced for Classification {
    fn surfaced(&self) -> Anomalies {
        self.anomalies.clone()
    }
}

impl Surfaced for Partition {
    fn surfaced(&self) -> Anomalies {
        self.anomalies.clone()
    }
}

impl Surfaced for EventCosts {
    fn surfaced(&self) -> Anomalies {
        self.all_anomalies()
    }
}

impl Surfaced for RatingSummary {
    fn surfaced(&self) -> Anomalies {
        self.anomalies.clone()
    }
}

impl Surfaced for Vec<RatingSummary> {
    fn surfaced(&self) -> Anomalies {
        let mut all = Anomalies::new();
        for summary in self {
            all.extend(summary.anomalies.clone());
        }
        all
    }
}

impl Surfaced for Anomalies {
    fn surfaced(&self) -> Anomalies {
        self.clone()
    }
}

fn lookup<K, V, F>(
    memo: &mut Memo<K, V>,
    metrics: &mut ViewMetrics,
    warn_on_anomalies: bool,
    view: &'static str,
    key: K,
    compute: F,
) -> Arc<V>
where
    K: PartialEq,
    V: Surfaced,
    F: FnOnce(&K) -> V,
{
    if let Some(value) = memo.get(&key) {
        metrics.record_hit(view);
        return value;
    }

    metrics.record_miss(view);
    let value = memo.get_or_compute(key, compute);
    tracing::debug!("Recomputed view {}", view);

    let anomalies = value.surfaced();
    if !anomalies.is_empty() {
        metrics.record_anomalies(view, anomalies.len());
        if warn_on_anomalies {
            tracing::warn!("View {} derived with {}", view, anomalies.summary());
        }
    }
    value
}

/// One event's [`CostSummary`] inside a cached [`EventCosts`]
#[derive(Debug, Clone)]
pub struct CostView {
    costs: Arc<EventCosts>,
    position: usize,
}

impl CostView {
    /// Event the cost belongs to
    pub fn event_id(&self) -> EventId {
        self.costs[self.position].event_id
    }

    /// The cached costs of every event this view points into
    pub fn costs(&self) -> &Arc<EventCosts> {
        &self.costs
    }
}

impl Deref for CostView {
    type Target = CostSummary;

    fn deref(&self) -> &CostSummary {
        &self.costs[self.position].cost
    }
}

/// Memoized derivations behind the dashboard
///
/// | View | Depends on |
/// |------|------------|
/// | [`in_progress`](Self::in_progress), [`classification`](Self::classification), [`partition`](Self::partition) | snapshot, time bucket |
/// | [`event_costs`](Self::event_costs), [`event_cost`](Self::event_cost) | snapshot |
/// | [`supplier_rating`](Self::supplier_rating) | snapshot, supplier, event |
/// | [`supplier_ratings`](Self::supplier_ratings) | snapshot, event |
/// | [`integrity`](Self::integrity) | snapshot |
///
/// Time-dependent views are evaluated at the start of the bucket, so their
/// result is a function of the snapshot and the bucket alone.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use eventboard_domain::*;
/// use eventboard_views::{DashboardViews, ViewConfig, ViewInputs};
/// use std::sync::Arc;
///
/// let at = |h, m| Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap();
/// let snapshot = EntitySnapshot::new(
///     vec![Event::new(EventId::new(1), "Gala", Some(at(10, 0)), Some(at(12, 0)))],
///     vec![],
///     vec![],
///     vec![],
/// )
/// .into_shared();
///
/// let mut views = DashboardViews::new(ViewConfig::default()).unwrap();
/// let inputs = ViewInputs::builder().snapshot(Arc::clone(&snapshot)).at(at(11, 0)).build().unwrap();
/// let first = views.in_progress(&inputs).unwrap();
///
/// let inputs = ViewInputs::builder().snapshot(snapshot).at(at(11, 0)).build().unwrap();
/// let second = views.in_progress(&inputs).unwrap();
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(first.event_ids, vec![EventId::new(1)]);
/// ```
#[derive(Debug)]
pub struct DashboardViews {
    config: ViewConfig,
    classifier: Classifier,
    in_progress: Memo<TimeKey, Classification>,
    classifications: HashMap<String, Memo<TimeKey, Classification>>,
    partition: Memo<TimeKey, Partition>,
    event_costs: Memo<SnapshotId, EventCosts>,
    ratings: HashMap<(SupplierId, EventId), Memo<SnapshotId, RatingSummary>>,
    event_ratings: HashMap<EventId, Memo<SnapshotId, Vec<RatingSummary>>>,
    ratings_snapshot: Option<SnapshotId>,
    integrity: Memo<SnapshotId, Anomalies>,
    metrics: ViewMetrics,
}

impl DashboardViews {
    /// Create views with the built-in classifications
    pub fn new(config: ViewConfig) -> Result<Self> {
        Self::with_classifier(config, Classifier::with_defaults())
    }

    /// Create views with a custom classifier
    pub fn with_classifier(config: ViewConfig, classifier: Classifier) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            "Dashboard views configured: {} buckets, classes {:?}",
            config.granularity.as_str(),
            classifier.class_names()
        );

        Ok(Self {
            config,
            classifier,
            in_progress: Memo::new(),
            classifications: HashMap::new(),
            partition: Memo::new(),
            event_costs: Memo::new(),
            ratings: HashMap::new(),
            event_ratings: HashMap::new(),
            ratings_snapshot: None,
            integrity: Memo::new(),
            metrics: ViewMetrics::new(),
        })
    }

    /// Register an additional classification
    ///
    /// Existing classifications are untouched; the cached partition is
    /// dropped since it no longer covers every class.
    pub fn register_class<C: TemporalClass + 'static>(&mut self, class: C) -> Result<()> {
        self.classifier.register(class)?;
        self.partition.clear();
        Ok(())
    }

    /// Current configuration
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Registered classifications
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Lookup metrics
    pub fn metrics(&self) -> &ViewMetrics {
        &self.metrics
    }

    /// Reset lookup metrics
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    fn time_key(&self, inputs: &ViewInputs) -> Result<TimeKey> {
        Ok((inputs.snapshot_id(), inputs.bucket(self.config.granularity)?))
    }

    /// Events in progress at the reference instant
    pub fn in_progress(&mut self, inputs: &ViewInputs) -> Result<Arc<Classification>> {
        let key = self.time_key(inputs)?;
        let snapshot = inputs.snapshot();

        Ok(lookup(
            &mut self.in_progress,
            &mut self.metrics,
            self.config.warn_on_anomalies,
            names::IN_PROGRESS,
            key,
            |(_, bucket)| events_in_progress(snapshot.events(), bucket.start()),
        ))
    }

    /// Events in the named classification at the reference instant
    pub fn classification(&mut self, inputs: &ViewInputs, name: &str) -> Result<Arc<Classification>> {
        let key = self.time_key(inputs)?;
        let snapshot = inputs.snapshot();

        let class = self
            .classifier
            .get(name)
            .ok_or_else(|| DerivationError::UnknownClass(name.to_string()))?;
        let memo = self.classifications.entry(name.to_string()).or_default();

        Ok(lookup(
            memo,
            &mut self.metrics,
            self.config.warn_on_anomalies,
            names::CLASSIFICATION,
            key,
            |(_, bucket)| classify_with(class, snapshot.events(), bucket.start()),
        ))
    }

    /// Every registered classification at the reference instant
    pub fn partition(&mut self, inputs: &ViewInputs) -> Result<Arc<Partition>> {
        let key = self.time_key(inputs)?;
        let snapshot = inputs.snapshot();
        let classifier = &self.classifier;

        Ok(lookup(
            &mut self.partition,
            &mut self.metrics,
            self.config.warn_on_anomalies,
            names::PARTITION,
            key,
            |(_, bucket)| classifier.partition(snapshot.events(), bucket.start()),
        ))
    }

    /// Supplier cost of every event
    pub fn event_costs(&mut self, inputs: &ViewInputs) -> Arc<EventCosts> {
        let snapshot = inputs.snapshot();

        lookup(
            &mut self.event_costs,
            &mut self.metrics,
            self.config.warn_on_anomalies,
            names::EVENT_COSTS,
            inputs.snapshot_id(),
            |_| cost_by_event(snapshot),
        )
    }

    /// Supplier cost of one event
    ///
    /// `None` if the event is not in the snapshot. The returned handle
    /// shares the cached [`EventCosts`].
    pub fn event_cost(&mut self, inputs: &ViewInputs, event_id: EventId) -> Option<CostView> {
        let costs = self.event_costs(inputs);
        let position = costs.position(event_id)?;
        Some(CostView { costs, position })
    }

    /// Mean rating of a supplier within an event
    pub fn supplier_rating(
        &mut self,
        inputs: &ViewInputs,
        supplier_id: SupplierId,
        event_id: EventId,
    ) -> Arc<RatingSummary> {
        let snapshot_id = self.track_ratings_snapshot(inputs);
        let snapshot = inputs.snapshot();
        let range = self.config.score_range;
        let memo = self.ratings.entry((supplier_id, event_id)).or_default();

        lookup(
            memo,
            &mut self.metrics,
            self.config.warn_on_anomalies,
            names::SUPPLIER_RATING,
            snapshot_id,
            |_| mean_rating(snapshot, supplier_id, event_id, &range),
        )
    }

    /// Mean rating of every supplier rated in an event
    pub fn supplier_ratings(&mut self, inputs: &ViewInputs, event_id: EventId) -> Arc<Vec<RatingSummary>> {
        let snapshot_id = self.track_ratings_snapshot(inputs);
        let snapshot = inputs.snapshot();
        let range = self.config.score_range;
        let memo = self.event_ratings.entry(event_id).or_default();

        lookup(
            memo,
            &mut self.metrics,
            self.config.warn_on_anomalies,
            names::SUPPLIER_RATINGS,
            snapshot_id,
            |_| supplier_ratings_for_event(snapshot, event_id, &range),
        )
    }

    fn track_ratings_snapshot(&mut self, inputs: &ViewInputs) -> SnapshotId {
        let snapshot_id = inputs.snapshot_id();
        if self.ratings_snapshot != Some(snapshot_id) {
            // Entries for an older snapshot can never hit again
            self.ratings.clear();
            self.event_ratings.clear();
            self.ratings_snapshot = Some(snapshot_id);
        }
        snapshot_id
    }

    /// Integrity problems of the snapshot itself (duplicate ids)
    pub fn integrity(&mut self, inputs: &ViewInputs) -> Arc<Anomalies> {
        let snapshot = inputs.snapshot();

        lookup(
            &mut self.integrity,
            &mut self.metrics,
            self.config.warn_on_anomalies,
            names::INTEGRITY,
            inputs.snapshot_id(),
            |_| snapshot.integrity_anomalies(),
        )
    }

    /// Drop every cached view
    pub fn invalidate(&mut self) {
        self.in_progress.clear();
        self.classifications.clear();
        self.partition.clear();
        self.event_costs.clear();
        self.ratings.clear();
        self.event_ratings.clear();
        self.ratings_snapshot = None;
        self.integrity.clear();
        tracing::debug!("Dashboard views invalidated");
    }
}
