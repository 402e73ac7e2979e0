//! Anomaly module - recoverable per-record data problems
//!
//! Derivations never fail because of one malformed record. The record is
//! left out of the result and an [`Anomaly`] naming it is attached to the
//! derived view instead.

use crate::{EventId, ItemId, RatingId, SupplierId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Reference to the record an anomaly was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordRef {
    /// An event record
    Event(EventId),

    /// A supplier record
    Supplier(SupplierId),

    /// A supplier line item
    Item(ItemId),

    /// A supplier rating
    Rating(RatingId),
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Event(id) => write!(f, "event {}", id),
            RecordRef::Supplier(id) => write!(f, "supplier {}", id),
            RecordRef::Item(id) => write!(f, "item {}", id),
            RecordRef::Rating(id) => write!(f, "rating {}", id),
        }
    }
}

/// What is wrong with a record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Event has no start instant
    MissingStart,

    /// Event ends before it starts
    EndBeforeStart {
        /// Declared start
        start: DateTime<Utc>,
        /// Declared end
        end: DateTime<Utc>,
    },

    /// Record references an event missing from the snapshot
    DanglingEvent {
        /// The missing event
        event_id: EventId,
    },

    /// Record references a supplier missing from the snapshot
    DanglingSupplier {
        /// The missing supplier
        supplier_id: SupplierId,
    },

    /// Line item with a negative quantity
    NegativeQuantity {
        /// Delivered quantity
        quantity: i64,
    },

    /// Line item with a negative unit cost
    NegativeUnitCost {
        /// Delivered unit cost
        unit_cost: f64,
    },

    /// NaN or infinite numeric value
    NonFiniteAmount,

    /// Rating score outside the accepted range
    ScoreOutOfRange {
        /// Delivered score
        score: f64,
        /// Lowest accepted score
        min: f64,
        /// Highest accepted score
        max: f64,
    },

    /// Identifier already used by an earlier record of the same collection
    DuplicateId,

    /// Amount does not fit the money representation
    Overflow,
}

impl AnomalyKind {
    /// Stable short code, used for counting and log fields
    pub fn code(&self) -> &'static str {
        match self {
            AnomalyKind::MissingStart => "missing_start",
            AnomalyKind::EndBeforeStart { .. } => "end_before_start",
            AnomalyKind::DanglingEvent { .. } => "dangling_event",
            AnomalyKind::DanglingSupplier { .. } => "dangling_supplier",
            AnomalyKind::NegativeQuantity { .. } => "negative_quantity",
            AnomalyKind::NegativeUnitCost { .. } => "negative_unit_cost",
            AnomalyKind::NonFiniteAmount => "non_finite_amount",
            AnomalyKind::ScoreOutOfRange { .. } => "score_out_of_range",
            AnomalyKind::DuplicateId => "duplicate_id",
            AnomalyKind::Overflow => "overflow",
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyKind::MissingStart => write!(f, "missing start time"),
            AnomalyKind::EndBeforeStart { start, end } => {
                write!(f, "ends at {} before it starts at {}", end, start)
            }
            AnomalyKind::DanglingEvent { event_id } => {
                write!(f, "references unknown event {}", event_id)
            }
            AnomalyKind::DanglingSupplier { supplier_id } => {
                write!(f, "references unknown supplier {}", supplier_id)
            }
            AnomalyKind::NegativeQuantity { quantity } => {
                write!(f, "negative quantity {}", quantity)
            }
            AnomalyKind::NegativeUnitCost { unit_cost } => {
                write!(f, "negative unit cost {}", unit_cost)
            }
            AnomalyKind::NonFiniteAmount => write!(f, "non-finite amount"),
            AnomalyKind::ScoreOutOfRange { score, min, max } => {
                write!(f, "score {} outside [{}, {}]", score, min, max)
            }
            AnomalyKind::DuplicateId => write!(f, "duplicate identifier"),
            AnomalyKind::Overflow => write!(f, "amount overflows"),
        }
    }
}

/// A recorded anomaly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    /// Offending record
    pub record: RecordRef,

    /// What is wrong with it
    #[serde(flatten)]
    pub kind: AnomalyKind,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.record, self.kind)
    }
}

/// Ordered collection of anomalies attached to a derived view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Anomalies(Vec<Anomaly>);

impl Anomalies {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an anomaly on a record
    pub fn record(&mut self, record: RecordRef, kind: AnomalyKind) {
        self.0.push(Anomaly { record, kind });
    }

    /// Append all anomalies of another collection
    pub fn extend(&mut self, other: Anomalies) {
        self.0.extend(other.0);
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded anomalies
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate in recording order
    pub fn iter(&self) -> std::slice::Iter<'_, Anomaly> {
        self.0.iter()
    }

    /// Whether any anomaly was recorded on the given record
    pub fn mentions(&self, record: RecordRef) -> bool {
        self.0.iter().any(|a| a.record == record)
    }

    /// Count anomalies per [`AnomalyKind::code`]
    pub fn count_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for anomaly in &self.0 {
            *counts.entry(anomaly.kind.code()).or_insert(0) += 1;
        }
        counts
    }

    /// One-line summary, e.g. `3 anomalies (dangling_event: 1, negative_quantity: 2)`
    pub fn summary(&self) -> String {
        if self.0.is_empty() {
            return "no anomalies".to_string();
        }

        let parts: Vec<String> = self
            .count_by_kind()
            .iter()
            .map(|(code, count)| format!("{}: {}", code, count))
            .collect();

        let noun = if self.0.len() == 1 { "anomaly" } else { "anomalies" };
        format!("{} {} ({})", self.0.len(), noun, parts.join(", "))
    }
}

impl<'a> IntoIterator for &'a Anomalies {
    type Item = &'a Anomaly;
    type IntoIter = std::slice::Iter<'a, Anomaly>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_count() {
        let mut anomalies = Anomalies::new();
        anomalies.record(RecordRef::Event(EventId::new(1)), AnomalyKind::MissingStart);
        anomalies.record(
            RecordRef::Item(ItemId::new(4)),
            AnomalyKind::NegativeQuantity { quantity: -1 },
        );
        anomalies.record(
            RecordRef::Item(ItemId::new(5)),
            AnomalyKind::NegativeQuantity { quantity: -2 },
        );

        assert_eq!(anomalies.len(), 3);
        let counts = anomalies.count_by_kind();
        assert_eq!(counts["negative_quantity"], 2);
        assert_eq!(counts["missing_start"], 1);
        assert!(anomalies.mentions(RecordRef::Item(ItemId::new(5))));
        assert!(!anomalies.mentions(RecordRef::Item(ItemId::new(6))));
    }

    #[test]
    fn test_summary() {
        let mut anomalies = Anomalies::new();
        assert_eq!(anomalies.summary(), "no anomalies");

        anomalies.record(
            RecordRef::Rating(RatingId::new(2)),
            AnomalyKind::DanglingEvent { event_id: EventId::new(9) },
        );
        assert_eq!(anomalies.summary(), "1 anomaly (dangling_event: 1)");
    }

    #[test]
    fn test_display() {
        let anomaly = Anomaly {
            record: RecordRef::Item(ItemId::new(3)),
            kind: AnomalyKind::DanglingSupplier { supplier_id: SupplierId::new(8) },
        };
        assert_eq!(anomaly.to_string(), "item 3: references unknown supplier 8");
    }

    #[test]
    fn test_serialize_flattens_kind() {
        let anomaly = Anomaly {
            record: RecordRef::Item(ItemId::new(3)),
            kind: AnomalyKind::NegativeQuantity { quantity: -2 },
        };
        let json = serde_json::to_value(&anomaly).unwrap();
        assert_eq!(json["kind"], "negative_quantity");
        assert_eq!(json["quantity"], -2);
        assert_eq!(json["record"]["item"], 3);
    }
}
