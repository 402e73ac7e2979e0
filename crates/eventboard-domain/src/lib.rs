//! Eventboard Domain Layer
//!
//! This crate holds the entity model the dashboard derives its views from.
//! It defines value types and boundary traits only; derivations live in
//! `eventboard-derivation` and caching in `eventboard-views`.
//!
//! ## Key Concepts
//!
//! - **Entity snapshot**: an immutable, `Arc`-shared view of events,
//!   suppliers, supplier items and ratings, identified by a [`SnapshotId`]
//! - **Anomaly**: a recoverable per-record data problem, recorded instead
//!   of raised
//! - **Money**: fixed-point cents used for every cost computation
//! - **Time bucket**: a reference instant rounded down to a granularity
//!
//! ## Architecture
//!
//! - No I/O and no ambient clock reads in derivation paths
//! - The entity store and the clock are reached only through
//!   [`traits::SnapshotSource`] and [`TimeSource`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod anomaly;
pub mod event;
pub mod ids;
pub mod money;
pub mod snapshot;
pub mod supplier;
pub mod time;
pub mod traits;

// Re-exports for convenience
pub use anomaly::{Anomalies, Anomaly, AnomalyKind, RecordRef};
pub use event::{Event, EventWindow};
pub use ids::{EventId, ItemId, RatingId, SupplierId};
pub use money::Money;
pub use snapshot::{EntitySet, EntitySnapshot, SnapshotId};
pub use supplier::{Supplier, SupplierItem, SupplierRating};
pub use time::{BucketGranularity, FixedClock, SystemClock, TimeBucket, TimeSource};
