//! Metrics collection for view lookups

use std::collections::BTreeMap;

/// Counters for a single view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewCounters {
    /// Lookups answered from the cache
    pub hits: usize,

    /// Lookups that recomputed the view
    pub misses: usize,

    /// Anomalies surfaced by recomputations
    pub anomalies: usize,
}

/// Metrics collected by [`DashboardViews`](crate::DashboardViews)
///
/// Tracks cache hits, misses and surfaced anomalies per view.
#[derive(Debug, Clone, Default)]
pub struct ViewMetrics {
    views: BTreeMap<&'static str, ViewCounters>,
}

impl ViewMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup served from the cache
    pub fn record_hit(&mut self, view: &'static str) {
        self.views.entry(view).or_default().hits += 1;
    }

    /// Record a recomputation
    pub fn record_miss(&mut self, view: &'static str) {
        self.views.entry(view).or_default().misses += 1;
    }

    /// Record anomalies surfaced by a recomputation
    pub fn record_anomalies(&mut self, view: &'static str, count: usize) {
        self.views.entry(view).or_default().anomalies += count;
    }

    /// Counters for one view
    pub fn view(&self, view: &str) -> ViewCounters {
        self.views.get(view).copied().unwrap_or_default()
    }

    /// Get total hits across all views
    pub fn total_hits(&self) -> usize {
        self.views.values().map(|c| c.hits).sum()
    }

    /// Get total misses across all views
    pub fn total_misses(&self) -> usize {
        self.views.values().map(|c| c.misses).sum()
    }

    /// Get total anomalies surfaced across all views
    pub fn total_anomalies(&self) -> usize {
        self.views.values().map(|c| c.anomalies).sum()
    }

    /// Fraction of lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.total_hits() + self.total_misses();
        if lookups == 0 {
            0.0
        } else {
            self.total_hits() as f64 / lookups as f64
        }
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        self.views.clear();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "View Metrics Summary".to_string(),
            "====================".to_string(),
            format!(
                "Lookups: {} ({} hits, {} misses)",
                self.total_hits() + self.total_misses(),
                self.total_hits(),
                self.total_misses()
            ),
            format!("Hit rate: {:.1}%", self.hit_rate() * 100.0),
            format!("Anomalies surfaced: {}", self.total_anomalies()),
        ];

        if !self.views.is_empty() {
            lines.push(String::new());
            lines.push("By view:".to_string());
            for (view, c) in &self.views {
                lines.push(format!(
                    "  {}: {} hits, {} misses, {} anomalies",
                    view, c.hits, c.misses, c.anomalies
                ));
            }
        }

        lines.join("\n")
    }
}
