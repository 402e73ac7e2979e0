//! Supplier module - suppliers, their line items and their ratings

use crate::{EventId, ItemId, RatingId, SupplierId};
use serde::{Deserialize, Serialize};

/// A supplier that can be booked for events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique identifier
    pub id: SupplierId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Contact metadata, passed through untouched
    #[serde(default)]
    pub contact: serde_json::Value,
}

impl Supplier {
    /// Create a supplier without contact metadata
    pub fn new(id: SupplierId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            contact: serde_json::Value::Null,
        }
    }

    /// Attach contact metadata
    pub fn with_contact(mut self, contact: serde_json::Value) -> Self {
        self.contact = contact;
        self
    }
}

/// A line item a supplier provides for one event
///
/// Quantity and unit cost are kept exactly as delivered. Negative values are
/// representable so that derivations can flag them instead of failing to
/// load the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierItem {
    /// Unique identifier
    pub id: ItemId,

    /// Owning supplier
    pub supplier_id: SupplierId,

    /// Owning event
    pub event_id: EventId,

    /// Number of units
    pub quantity: i64,

    /// Cost of one unit, in major currency units
    pub unit_cost: f64,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SupplierItem {
    /// Create a new line item
    pub fn new(
        id: ItemId,
        supplier_id: SupplierId,
        event_id: EventId,
        quantity: i64,
        unit_cost: f64,
    ) -> Self {
        Self {
            id,
            supplier_id,
            event_id,
            quantity,
            unit_cost,
            description: None,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A rating given to a supplier in the context of one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRating {
    /// Unique identifier
    pub id: RatingId,

    /// Rated supplier
    pub supplier_id: SupplierId,

    /// Event the rating was given for
    pub event_id: EventId,

    /// Score, expected inside the configured score range
    pub score: f64,

    /// Optional reviewer comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl SupplierRating {
    /// Create a new rating
    pub fn new(id: RatingId, supplier_id: SupplierId, event_id: EventId, score: f64) -> Self {
        Self {
            id,
            supplier_id,
            event_id,
            score,
            comment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_deserialize_keeps_negative_values() {
        let json = r#"{"id": 1, "supplier_id": 2, "event_id": 3, "quantity": -4, "unit_cost": -1.5}"#;
        let item: SupplierItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity, -4);
        assert_eq!(item.unit_cost, -1.5);
        assert!(item.description.is_none());
    }

    #[test]
    fn test_supplier_contact_is_opaque() {
        let supplier = Supplier::new(SupplierId::new(1), "Catering Co")
            .with_contact(serde_json::json!({"email": "hello@catering.test", "tags": [1, 2]}));

        let json = serde_json::to_value(&supplier).unwrap();
        assert_eq!(json["contact"]["tags"][1], 2);
    }
}
