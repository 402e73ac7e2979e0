//! Background worker that keeps dashboard views fresh

use crate::{DashboardViews, ViewConfig, ViewError, ViewInputs, ViewMetrics};
use eventboard_domain::traits::SnapshotSource;
use eventboard_domain::TimeSource;
use tokio::time::{interval, Duration};

/// Background worker that reloads the snapshot on a schedule
///
/// Each tick loads the current snapshot, reads the clock once and hands
/// the resulting [`ViewInputs`] to a callback together with one long-lived
/// [`DashboardViews`], so ticks whose snapshot and time bucket are
/// unchanged are served from the cache.
///
/// # Examples
///
/// ```no_run
/// use eventboard_domain::{EntitySnapshot, SystemClock};
/// use eventboard_domain::traits::SnapshotSource;
/// use eventboard_views::{RefreshWorker, ViewConfig};
/// use std::sync::Arc;
///
/// struct Static(Arc<EntitySnapshot>);
///
/// impl SnapshotSource for Static {
///     type Error = std::convert::Infallible;
///     fn load(&self) -> Result<Arc<EntitySnapshot>, Self::Error> {
///         Ok(Arc::clone(&self.0))
///     }
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let source = Static(EntitySnapshot::empty().into_shared());
///     let mut worker = RefreshWorker::new(ViewConfig::default(), source, SystemClock)?;
///
///     // Run indefinitely (until Ctrl+C)
///     worker
///         .run(|views, inputs| {
///             if let Ok(live) = views.in_progress(inputs) {
///                 println!("{} events in progress", live.len());
///             }
///         })
///         .await?;
///     Ok(())
/// }
/// ```
pub struct RefreshWorker<S, C> {
    views: DashboardViews,
    source: S,
    clock: C,
    interval: Duration,
}

impl<S, C> RefreshWorker<S, C>
where
    S: SnapshotSource,
    S::Error: std::fmt::Display,
    C: TimeSource,
{
    /// Create a worker with the given configuration
    pub fn new(config: ViewConfig, source: S, clock: C) -> Result<Self, ViewError> {
        let interval = config.refresh_interval();
        Ok(Self {
            views: DashboardViews::new(config)?,
            source,
            clock,
            interval,
        })
    }

    /// Create a worker around existing views
    pub fn with_views(views: DashboardViews, source: S, clock: C) -> Self {
        let interval = views.config().refresh_interval();
        Self {
            views,
            source,
            clock,
            interval,
        }
    }

    fn refresh<F>(&mut self, on_tick: &mut F) -> Result<(), ViewError>
    where
        F: FnMut(&mut DashboardViews, &ViewInputs),
    {
        let snapshot = self
            .source
            .load()
            .map_err(|e| ViewError::Source(e.to_string()))?;

        let inputs = ViewInputs::builder()
            .snapshot(snapshot)
            .clock(&self.clock)
            .build()?;

        on_tick(&mut self.views, &inputs);
        Ok(())
    }

    /// Run the worker indefinitely
    ///
    /// Refreshes at the configured interval until a shutdown signal
    /// (Ctrl+C) is received. A failed load is logged and retried on the
    /// next tick.
    pub async fn run<F>(&mut self, mut on_tick: F) -> Result<(), ViewError>
    where
        F: FnMut(&mut DashboardViews, &ViewInputs),
    {
        let mut ticker = interval(self.interval);

        tracing::info!("Refresh worker started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("Starting refresh");
                    if let Err(e) = self.refresh(&mut on_tick) {
                        tracing::error!("Refresh failed: {}", e);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping refresh worker");
                    break;
                }
            }
        }

        tracing::info!("Refresh worker stopped. Final metrics:\n{}", self.views.metrics().summary());

        Ok(())
    }

    /// Run for a specific number of refreshes
    ///
    /// Stops at the first failed load.
    pub async fn run_cycles<F>(&mut self, cycles: usize, mut on_tick: F) -> Result<(), ViewError>
    where
        F: FnMut(&mut DashboardViews, &ViewInputs),
    {
        let mut ticker = interval(self.interval);

        tracing::info!(
            "Refresh worker started for {} cycles (interval: {:?})",
            cycles,
            self.interval
        );

        for cycle in 0..cycles {
            ticker.tick().await;

            tracing::debug!("Starting refresh {}/{}", cycle + 1, cycles);

            if let Err(e) = self.refresh(&mut on_tick) {
                tracing::error!("Refresh {}/{} failed: {}", cycle + 1, cycles, e);
                return Err(e);
            }
        }

        tracing::info!(
            "Refresh worker finished {} cycles. Final metrics:\n{}",
            cycles,
            self.views.metrics().summary()
        );

        Ok(())
    }

    /// The views the worker keeps fresh
    pub fn views(&self) -> &DashboardViews {
        &self.views
    }

    /// Get a reference to the current lookup metrics
    pub fn metrics(&self) -> &ViewMetrics {
        self.views.metrics()
    }

    /// Mutable access to the clock, for hosts that drive time themselves
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names;
    use chrono::{TimeZone, Utc};
    use eventboard_domain::{EntitySnapshot, Event, EventId, FixedClock};
    use std::cell::Cell;
    use std::sync::Arc;

    struct MockSource {
        snapshot: Arc<EntitySnapshot>,
        fail: bool,
        loads: Cell<usize>,
    }

    impl MockSource {
        fn new() -> Self {
            let at = |h| Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap();
            Self {
                snapshot: EntitySnapshot::new(
                    vec![Event::new(EventId::new(1), "Gala", Some(at(10)), Some(at(12)))],
                    vec![],
                    vec![],
                    vec![],
                )
                .into_shared(),
                fail: false,
                loads: Cell::new(0),
            }
        }
    }

    impl SnapshotSource for MockSource {
        type Error = String;

        fn load(&self) -> Result<Arc<EntitySnapshot>, Self::Error> {
            self.loads.set(self.loads.get() + 1);
            if self.fail {
                return Err("store unreachable".to_string());
            }
            Ok(Arc::clone(&self.snapshot))
        }
    }

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap())
    }

    fn fast_config() -> ViewConfig {
        ViewConfig {
            refresh_interval_secs: 1,
            ..ViewConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cycles_hits_cache() {
        let mut worker = RefreshWorker::new(fast_config(), MockSource::new(), clock()).unwrap();
        let mut seen = Vec::new();

        worker
            .run_cycles(3, |views, inputs| {
                let live = views.in_progress(inputs).unwrap();
                seen.push(live.event_ids.clone());
            })
            .await
            .unwrap();

        assert_eq!(seen, vec![vec![EventId::new(1)]; 3]);
        assert_eq!(worker.metrics().view(names::IN_PROGRESS).misses, 1);
        assert_eq!(worker.metrics().view(names::IN_PROGRESS).hits, 2);
        assert_eq!(worker.source.loads.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cycles_stops_on_failed_load() {
        let mut source = MockSource::new();
        source.fail = true;
        let mut worker = RefreshWorker::new(fast_config(), source, clock()).unwrap();
        let mut ticks = 0;

        let result = worker.run_cycles(3, |_, _| ticks += 1).await;

        assert_eq!(result, Err(ViewError::Source("store unreachable".to_string())));
        assert_eq!(ticks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_advance_changes_bucket() {
        let mut worker = RefreshWorker::new(fast_config(), MockSource::new(), clock()).unwrap();

        worker
            .run_cycles(1, |views, inputs| {
                views.in_progress(inputs).unwrap();
            })
            .await
            .unwrap();

        worker.clock_mut().advance(chrono::TimeDelta::hours(3));

        let mut live = Vec::new();
        worker
            .run_cycles(1, |views, inputs| {
                live = views.in_progress(inputs).unwrap().event_ids.clone();
            })
            .await
            .unwrap();

        assert!(live.is_empty());
        assert_eq!(worker.metrics().view(names::IN_PROGRESS).misses, 2);
    }
}
