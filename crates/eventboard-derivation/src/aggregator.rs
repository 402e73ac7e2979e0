//! Supplier cost aggregation
//!
//! Costs are `quantity × unit cost` per line item, rounded to cents once
//! per line and accumulated in fixed-point [`Money`] with checked
//! arithmetic. Items that cannot be
//! costed (unknown event or supplier, negative or non-finite values,
//! overflow) are left out and recorded as anomalies.

use eventboard_domain::{
    Anomalies, AnomalyKind, EntitySnapshot, EventId, Money, RecordRef, SupplierId, SupplierItem,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Aggregated supplier cost
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostSummary {
    /// Sum of `quantity × unit cost` over contributing items
    pub total: Money,

    /// Number of distinct suppliers among contributing items
    pub supplier_count: usize,

    /// Number of contributing items
    pub item_count: usize,

    /// Items left out of the total
    pub anomalies: Anomalies,
}

/// Cost of a single line item
///
/// Fails with the anomaly that keeps the item out of any total.
pub fn line_cost(snapshot: &EntitySnapshot, item: &SupplierItem) -> Result<Money, AnomalyKind> {
    if !snapshot.has_supplier(item.supplier_id) {
        return Err(AnomalyKind::DanglingSupplier {
            supplier_id: item.supplier_id,
        });
    }

    if item.quantity < 0 {
        return Err(AnomalyKind::NegativeQuantity {
            quantity: item.quantity,
        });
    }

    if !item.unit_cost.is_finite() {
        return Err(AnomalyKind::NonFiniteAmount);
    }

    if item.unit_cost < 0.0 {
        return Err(AnomalyKind::NegativeUnitCost {
            unit_cost: item.unit_cost,
        });
    }

    Money::line_total(item.quantity, item.unit_cost).ok_or(AnomalyKind::Overflow)
}

#[derive(Default)]
struct CostAccumulator {
    total: Money,
    suppliers: HashSet<SupplierId>,
    item_count: usize,
    anomalies: Anomalies,
}

impl CostAccumulator {
    fn add(&mut self, snapshot: &EntitySnapshot, item: &SupplierItem) {
        let record = RecordRef::Item(item.id);

        let cost = match line_cost(snapshot, item) {
            Ok(cost) => cost,
            Err(kind) => {
                self.anomalies.record(record, kind);
                return;
            }
        };

        match self.total.checked_add(cost) {
            Some(total) => {
                self.total = total;
                self.suppliers.insert(item.supplier_id);
                self.item_count += 1;
            }
            None => self.anomalies.record(record, AnomalyKind::Overflow),
        }
    }

    fn finish(self) -> CostSummary {
        CostSummary {
            total: self.total,
            supplier_count: self.suppliers.len(),
            item_count: self.item_count,
            anomalies: self.anomalies,
        }
    }
}

/// Aggregate supplier cost for one event
///
/// Zero matching items yields a zero total. If the event itself is missing
/// from the snapshot, every item pointing at it is recorded as
/// [`AnomalyKind::DanglingEvent`] and the total stays zero.
///
/// # Examples
///
/// ```
/// use eventboard_derivation::supplier_cost_for_event;
/// use eventboard_domain::*;
///
/// let snapshot = EntitySnapshot::new(
///     vec![Event::new(EventId::new(1), "Gala", None, None)],
///     vec![Supplier::new(SupplierId::new(1), "Catering")],
///     vec![
///         SupplierItem::new(ItemId::new(1), SupplierId::new(1), EventId::new(1), 2, 10.0),
///         SupplierItem::new(ItemId::new(2), SupplierId::new(1), EventId::new(1), 1, 5.0),
///     ],
///     vec![],
/// );
///
/// let cost = supplier_cost_for_event(&snapshot, EventId::new(1));
/// assert_eq!(cost.total, Money::from_cents(2500));
/// assert_eq!(cost.supplier_count, 1);
/// ```
pub fn supplier_cost_for_event(snapshot: &EntitySnapshot, event_id: EventId) -> CostSummary {
    supplier_cost_for_events(snapshot, &[event_id])
}

/// Aggregate supplier cost over the union of several events
///
/// Suppliers contributing to more than one of the events are counted once.
pub fn supplier_cost_for_events(snapshot: &EntitySnapshot, event_ids: &[EventId]) -> CostSummary {
    let targets: HashSet<EventId> = event_ids.iter().copied().collect();
    let mut acc = CostAccumulator::default();

    for item in snapshot.items().iter().filter(|i| targets.contains(&i.event_id)) {
        if !snapshot.has_event(item.event_id) {
            acc.anomalies.record(
                RecordRef::Item(item.id),
                AnomalyKind::DanglingEvent {
                    event_id: item.event_id,
                },
            );
            continue;
        }
        acc.add(snapshot, item);
    }

    let summary = acc.finish();
    tracing::debug!(
        "Aggregated cost for {} event(s): {} from {} items, {} anomalies",
        targets.len(),
        summary.total,
        summary.item_count,
        summary.anomalies.len()
    );
    summary
}

/// Cost of one event inside [`EventCosts`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventCost {
    /// Event the cost belongs to
    pub event_id: EventId,

    /// Aggregated cost
    #[serde(flatten)]
    pub cost: CostSummary,
}

/// Supplier cost of every event in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventCosts {
    entries: Vec<EventCost>,

    /// Items pointing at events missing from the snapshot
    unattributed: Anomalies,

    #[serde(skip)]
    index: HashMap<EventId, usize>,
}

impl EventCosts {
    /// Cost of one event
    pub fn get(&self, event_id: EventId) -> Option<&CostSummary> {
        self.position(event_id).map(|i| &self.entries[i].cost)
    }

    /// Position of an event's entry, usable with indexing
    pub fn position(&self, event_id: EventId) -> Option<usize> {
        self.index.get(&event_id).copied()
    }

    /// Per-event costs, in snapshot event order
    pub fn iter(&self) -> std::slice::Iter<'_, EventCost> {
        self.entries.iter()
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot had no events
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Items that reference unknown events
    pub fn unattributed(&self) -> &Anomalies {
        &self.unattributed
    }

    /// Sum over all events; `None` if the sum overflows
    pub fn grand_total(&self) -> Option<Money> {
        self.entries
            .iter()
            .try_fold(Money::ZERO, |acc, entry| acc.checked_add(entry.cost.total))
    }

    /// Every anomaly, unattributed items first
    pub fn all_anomalies(&self) -> Anomalies {
        let mut all = self.unattributed.clone();
        for entry in &self.entries {
            all.extend(entry.cost.anomalies.clone());
        }
        all
    }
}

impl std::ops::Index<usize> for EventCosts {
    type Output = EventCost;

    fn index(&self, position: usize) -> &EventCost {
        &self.entries[position]
    }
}

/// Aggregate supplier cost for every event in one pass over the items
///
/// Each event appears once (first occurrence), in snapshot order; events
/// without items get a zero entry. Items pointing at unknown events are
/// recorded once under [`EventCosts::unattributed`].
pub fn cost_by_event(snapshot: &EntitySnapshot) -> EventCosts {
    let mut accumulators: HashMap<EventId, CostAccumulator> = HashMap::new();
    let mut unattributed = Anomalies::new();

    for item in snapshot.items() {
        if !snapshot.has_event(item.event_id) {
            unattributed.record(
                RecordRef::Item(item.id),
                AnomalyKind::DanglingEvent {
                    event_id: item.event_id,
                },
            );
            continue;
        }
        accumulators
            .entry(item.event_id)
            .or_default()
            .add(snapshot, item);
    }

    let mut entries = Vec::new();
    let mut index = HashMap::new();
    for event in snapshot.events() {
        if index.contains_key(&event.id) {
            continue;
        }
        let cost = accumulators
            .remove(&event.id)
            .map(CostAccumulator::finish)
            .unwrap_or_default();
        index.insert(event.id, entries.len());
        entries.push(EventCost {
            event_id: event.id,
            cost,
        });
    }

    tracing::debug!(
        "Aggregated costs for {} events, {} unattributed items",
        entries.len(),
        unattributed.len()
    );

    EventCosts {
        entries,
        unattributed,
        index,
    }
}
