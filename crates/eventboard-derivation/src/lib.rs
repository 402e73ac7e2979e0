//! Eventboard Derivations
//!
//! Pure functions from an [`EntitySnapshot`](eventboard_domain::EntitySnapshot)
//! and a reference instant to dashboard figures.
//!
//! The derivation layer provides:
//! - Temporal classification of events (in progress, upcoming, past, and
//!   any registered class)
//! - Supplier cost aggregation per event
//! - Mean supplier ratings per event
//!
//! Data problems never fail a derivation. They are returned next to the
//! result as [`Anomalies`](eventboard_domain::Anomalies).
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use eventboard_derivation::{events_in_progress, supplier_cost_for_event};
//! use eventboard_domain::*;
//!
//! let at = |h| Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap();
//! let snapshot = EntitySnapshot::new(
//!     vec![Event::new(EventId::new(1), "Gala", Some(at(10)), Some(at(12)))],
//!     vec![Supplier::new(SupplierId::new(1), "Catering")],
//!     vec![SupplierItem::new(ItemId::new(1), SupplierId::new(1), EventId::new(1), 3, 1.0)],
//!     vec![],
//! );
//!
//! let live = events_in_progress(snapshot.events(), at(11));
//! assert_eq!(live.event_ids, vec![EventId::new(1)]);
//!
//! let cost = supplier_cost_for_event(&snapshot, EventId::new(1));
//! assert_eq!(cost.total, Money::from_cents(300));
//! ```

#![warn(missing_docs)]

pub mod aggregator;
pub mod classifier;
mod error;
pub mod ratings;

pub use aggregator::{
    cost_by_event, line_cost, supplier_cost_for_event, supplier_cost_for_events, CostSummary,
    EventCost, EventCosts,
};
pub use classifier::{
    classify_with, events_in_progress, Classification, Classifier, InProgress, Partition, Past,
    PredicateClass, TemporalClass, Upcoming, IN_PROGRESS, PAST, UPCOMING,
};
pub use error::{DerivationError, Result};
pub use ratings::{mean_rating, supplier_ratings_for_event, MeanRating, RatingSummary, ScoreRange};
