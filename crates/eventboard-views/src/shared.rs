//! Thread-safe handle to dashboard views

use crate::{DashboardViews, ViewMetrics};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared handle to [`DashboardViews`] for multi-threaded hosts
///
/// The lock covers the whole read-check-write sequence of a lookup, so two
/// threads asking for the same view with the same inputs never both
/// compute it.
#[derive(Debug, Clone)]
pub struct SharedDashboardViews {
    inner: Arc<Mutex<DashboardViews>>,
}

impl SharedDashboardViews {
    /// Wrap views for sharing
    pub fn new(views: DashboardViews) -> Self {
        Self {
            inner: Arc::new(Mutex::new(views)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DashboardViews> {
        // A panic mid-lookup leaves at worst a stale memo entry
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the views
    ///
    /// # Examples
    ///
    /// ```
    /// use eventboard_domain::EntitySnapshot;
    /// use eventboard_views::{DashboardViews, SharedDashboardViews, ViewConfig, ViewInputs};
    ///
    /// let shared = SharedDashboardViews::new(DashboardViews::new(ViewConfig::default()).unwrap());
    /// let inputs = ViewInputs::builder()
    ///     .snapshot(EntitySnapshot::empty().into_shared())
    ///     .build()
    ///     .unwrap();
    ///
    /// let costs = shared.with(|views| views.event_costs(&inputs));
    /// assert!(costs.is_empty());
    /// ```
    pub fn with<R>(&self, f: impl FnOnce(&mut DashboardViews) -> R) -> R {
        let mut views = self.lock();
        f(&mut views)
    }

    /// Snapshot of the lookup metrics
    pub fn metrics(&self) -> ViewMetrics {
        self.lock().metrics().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{names, ViewConfig, ViewInputs};
    use eventboard_domain::{EntitySnapshot, Event, EventId, ItemId, Supplier, SupplierId, SupplierItem};
    use std::thread;

    #[test]
    fn test_concurrent_lookups_compute_once() {
        let snapshot = EntitySnapshot::new(
            vec![Event::new(EventId::new(1), "Gala", None, None)],
            vec![Supplier::new(SupplierId::new(1), "Catering")],
            vec![SupplierItem::new(ItemId::new(1), SupplierId::new(1), EventId::new(1), 2, 10.0)],
            vec![],
        )
        .into_shared();
        let inputs = ViewInputs::builder().snapshot(snapshot).build().unwrap();
        let shared = SharedDashboardViews::new(DashboardViews::new(ViewConfig::default()).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                let inputs = inputs.clone();
                thread::spawn(move || shared.with(|views| views.event_costs(&inputs)))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for result in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], result));
        }

        let metrics = shared.metrics();
        assert_eq!(metrics.view(names::EVENT_COSTS).misses, 1);
        assert_eq!(metrics.view(names::EVENT_COSTS).hits, 7);
    }
}
