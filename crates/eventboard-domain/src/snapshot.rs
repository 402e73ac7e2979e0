//! Entity snapshot - an immutable, point-in-time view of the entity store
//!
//! A snapshot is built once from what the remote store delivered and then
//! shared read-only behind an `Arc`. Every snapshot gets a fresh
//! [`SnapshotId`]; the view layer treats "new id" as "inputs changed" and
//! never compares contents.

use crate::{
    Anomalies, AnomalyKind, Event, EventId, RecordRef, Supplier, SupplierId, SupplierItem,
    SupplierRating,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Identity of one snapshot, based on UUIDv7
///
/// UUIDv7 ids sort by creation time, so later snapshots compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId(u128);

impl SnapshotId {
    /// Generate a new identity
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Raw entity collections as delivered by the remote store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySet {
    /// Events, in store order
    #[serde(default)]
    pub events: Vec<Event>,

    /// Suppliers, in store order
    #[serde(default)]
    pub suppliers: Vec<Supplier>,

    /// Supplier line items, in store order
    #[serde(default)]
    pub items: Vec<SupplierItem>,

    /// Supplier ratings, in store order
    #[serde(default)]
    pub ratings: Vec<SupplierRating>,
}

/// Immutable snapshot of all entities, with lookup indices
#[derive(Debug, Clone)]
pub struct EntitySnapshot {
    id: SnapshotId,
    entities: EntitySet,
    event_index: HashMap<EventId, usize>,
    supplier_index: HashMap<SupplierId, usize>,
}

impl EntitySnapshot {
    /// Build a snapshot from the four entity collections
    pub fn new(
        events: Vec<Event>,
        suppliers: Vec<Supplier>,
        items: Vec<SupplierItem>,
        ratings: Vec<SupplierRating>,
    ) -> Self {
        Self::from_entities(EntitySet {
            events,
            suppliers,
            items,
            ratings,
        })
    }

    /// Build a snapshot from a delivered entity set
    ///
    /// When an identifier appears twice, lookups resolve to the first
    /// record; the duplicate is reported by [`integrity_anomalies`].
    ///
    /// [`integrity_anomalies`]: EntitySnapshot::integrity_anomalies
    pub fn from_entities(entities: EntitySet) -> Self {
        let event_index = first_positions(entities.events.iter().map(|e| e.id));
        let supplier_index = first_positions(entities.suppliers.iter().map(|s| s.id));

        Self {
            id: SnapshotId::new(),
            entities,
            event_index,
            supplier_index,
        }
    }

    /// An empty snapshot
    pub fn empty() -> Self {
        Self::from_entities(EntitySet::default())
    }

    /// Move the snapshot behind an `Arc` for sharing
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Identity of this snapshot
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    /// All events, in store order
    pub fn events(&self) -> &[Event] {
        &self.entities.events
    }

    /// All suppliers, in store order
    pub fn suppliers(&self) -> &[Supplier] {
        &self.entities.suppliers
    }

    /// All supplier line items, in store order
    pub fn items(&self) -> &[SupplierItem] {
        &self.entities.items
    }

    /// All supplier ratings, in store order
    pub fn ratings(&self) -> &[SupplierRating] {
        &self.entities.ratings
    }

    /// Look up an event by id
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.event_index.get(&id).map(|&i| &self.entities.events[i])
    }

    /// Look up a supplier by id
    pub fn supplier(&self, id: SupplierId) -> Option<&Supplier> {
        self.supplier_index
            .get(&id)
            .map(|&i| &self.entities.suppliers[i])
    }

    /// Whether the event exists in this snapshot
    pub fn has_event(&self, id: EventId) -> bool {
        self.event_index.contains_key(&id)
    }

    /// Whether the supplier exists in this snapshot
    pub fn has_supplier(&self, id: SupplierId) -> bool {
        self.supplier_index.contains_key(&id)
    }

    /// Report identifiers that occur more than once within a collection
    ///
    /// Every occurrence after the first is reported as
    /// [`AnomalyKind::DuplicateId`].
    pub fn integrity_anomalies(&self) -> Anomalies {
        let mut anomalies = Anomalies::new();

        report_duplicates(
            &mut anomalies,
            self.entities.events.iter().map(|e| RecordRef::Event(e.id)),
        );
        report_duplicates(
            &mut anomalies,
            self.entities
                .suppliers
                .iter()
                .map(|s| RecordRef::Supplier(s.id)),
        );
        report_duplicates(
            &mut anomalies,
            self.entities.items.iter().map(|i| RecordRef::Item(i.id)),
        );
        report_duplicates(
            &mut anomalies,
            self.entities.ratings.iter().map(|r| RecordRef::Rating(r.id)),
        );

        anomalies
    }
}

fn first_positions<K: Eq + Hash>(ids: impl Iterator<Item = K>) -> HashMap<K, usize> {
    let mut index = HashMap::new();
    for (position, id) in ids.enumerate() {
        index.entry(id).or_insert(position);
    }
    index
}

fn report_duplicates(anomalies: &mut Anomalies, records: impl Iterator<Item = RecordRef>) {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record) {
            anomalies.record(record, AnomalyKind::DuplicateId);
        }
    }
}
