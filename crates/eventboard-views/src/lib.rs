//! Eventboard Views
//!
//! Memoized dashboard views over immutable entity snapshots.
//!
//! # Overview
//!
//! The view layer is responsible for:
//! - **Memoization**: every view declares the inputs it depends on and is
//!   recomputed only when one of them changes
//! - **Time buckets**: the reference instant is rounded down to a
//!   configurable granularity so time views stay cached within a bucket
//! - **Anomaly surfacing**: data problems found while deriving are logged
//!   once per recomputation and counted in [`ViewMetrics`]
//! - **Refreshing**: [`RefreshWorker`] reloads the snapshot on a schedule
//!
//! # Usage
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use eventboard_domain::*;
//! use eventboard_views::{DashboardViews, ViewConfig, ViewInputs};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let snapshot = EntitySnapshot::new(
//!     vec![Event::new(EventId::new(1), "Gala", None, None)],
//!     vec![Supplier::new(SupplierId::new(1), "Catering")],
//!     vec![SupplierItem::new(ItemId::new(1), SupplierId::new(1), EventId::new(1), 2, 10.0)],
//!     vec![],
//! )
//! .into_shared();
//!
//! let mut views = DashboardViews::new(ViewConfig::default())?;
//! let inputs = ViewInputs::builder()
//!     .snapshot(snapshot)
//!     .at(Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap())
//!     .build()?;
//!
//! let cost = views.event_cost(&inputs, EventId::new(1)).unwrap();
//! assert_eq!(cost.total, Money::from_cents(2000));
//!
//! // The event has no start, so it is reported rather than classified
//! let live = views.in_progress(&inputs)?;
//! assert!(live.is_empty());
//! assert_eq!(live.anomalies.len(), 1);
//!
//! println!("{}", views.metrics().summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Views can be configured via TOML:
//!
//! ```toml
//! granularity = "minute"
//! refresh_interval_secs = 30
//! warn_on_anomalies = true
//!
//! [score_range]
//! min = 0.0
//! max = 5.0
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod inputs;
mod memo;
mod metrics;
mod shared;
mod views;
mod worker;

pub use config::ViewConfig;
pub use error::{Result, ViewError};
pub use inputs::{ViewInputs, ViewInputsBuilder};
pub use memo::Memo;
pub use metrics::{ViewCounters, ViewMetrics};
pub use shared::SharedDashboardViews;
pub use views::{names, CostView, DashboardViews};
pub use worker::RefreshWorker;
