//! Supplier rating aggregation

use crate::error::DerivationError;
use eventboard_domain::{
    Anomalies, AnomalyKind, EntitySnapshot, EventId, RecordRef, SupplierId, SupplierRating,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Inclusive range of valid rating scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    /// Lowest valid score
    pub min: f64,

    /// Highest valid score
    pub max: f64,
}

impl ScoreRange {
    /// Create a range, rejecting non-finite or inverted bounds
    pub fn new(min: f64, max: f64) -> Result<Self, DerivationError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    /// Check the bounds
    ///
    /// Needed after deserializing, which bypasses [`ScoreRange::new`].
    pub fn validate(&self) -> Result<(), DerivationError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(DerivationError::InvalidScoreRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Whether `score` lies inside the range (bounds inclusive)
    pub fn contains(&self, score: f64) -> bool {
        self.min <= score && score <= self.max
    }
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self { min: 0.0, max: 5.0 }
    }
}

/// Mean of the valid scores, or an explicit absence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MeanRating {
    /// No valid score matched; distinct from a mean of zero
    NoData,

    /// Arithmetic mean of `count` scores
    Mean {
        /// The mean
        value: f64,
        /// Number of scores averaged
        count: usize,
    },
}

impl MeanRating {
    /// The mean, if any score matched
    pub fn value(&self) -> Option<f64> {
        match self {
            MeanRating::NoData => None,
            MeanRating::Mean { value, .. } => Some(*value),
        }
    }

    /// Number of scores averaged
    pub fn count(&self) -> usize {
        match self {
            MeanRating::NoData => 0,
            MeanRating::Mean { count, .. } => *count,
        }
    }
}

/// Mean rating of one supplier within one event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Rated supplier
    pub supplier_id: SupplierId,

    /// Event the ratings were given in
    pub event_id: EventId,

    /// Mean of the valid scores
    pub rating: MeanRating,

    /// Ratings left out of the mean
    pub anomalies: Anomalies,
}

fn rating_anomaly(
    snapshot: &EntitySnapshot,
    supplier_id: SupplierId,
    event_id: EventId,
    score: f64,
    range: &ScoreRange,
) -> Option<AnomalyKind> {
    if !snapshot.has_supplier(supplier_id) {
        return Some(AnomalyKind::DanglingSupplier { supplier_id });
    }
    if !snapshot.has_event(event_id) {
        return Some(AnomalyKind::DanglingEvent { event_id });
    }
    if !score.is_finite() {
        return Some(AnomalyKind::NonFiniteAmount);
    }
    if !range.contains(score) {
        return Some(AnomalyKind::ScoreOutOfRange {
            score,
            min: range.min,
            max: range.max,
        });
    }
    None
}

/// Mean rating of a supplier within an event
///
/// Scores that are non-finite, outside `range`, or attached to a supplier
/// or event missing from the snapshot are left out and recorded.
///
/// # Examples
///
/// ```
/// use eventboard_derivation::{mean_rating, MeanRating, ScoreRange};
/// use eventboard_domain::*;
///
/// let snapshot = EntitySnapshot::new(
///     vec![Event::new(EventId::new(1), "Gala", None, None)],
///     vec![Supplier::new(SupplierId::new(1), "Catering")],
///     vec![],
///     vec![],
/// );
///
/// let summary = mean_rating(&snapshot, SupplierId::new(1), EventId::new(1), &ScoreRange::default());
/// assert_eq!(summary.rating, MeanRating::NoData);
/// ```
pub fn mean_rating(
    snapshot: &EntitySnapshot,
    supplier_id: SupplierId,
    event_id: EventId,
    range: &ScoreRange,
) -> RatingSummary {
    let mut acc = RatingAccumulator::default();
    for rating in snapshot
        .ratings()
        .iter()
        .filter(|r| r.supplier_id == supplier_id && r.event_id == event_id)
    {
        acc.add(snapshot, rating, range);
    }
    acc.finish(supplier_id, event_id)
}

#[derive(Default)]
struct RatingAccumulator {
    sum: f64,
    count: usize,
    anomalies: Anomalies,
}

impl RatingAccumulator {
    fn add(&mut self, snapshot: &EntitySnapshot, rating: &SupplierRating, range: &ScoreRange) {
        match rating_anomaly(snapshot, rating.supplier_id, rating.event_id, rating.score, range) {
            Some(kind) => self.anomalies.record(RecordRef::Rating(rating.id), kind),
            None => {
                self.sum += rating.score;
                self.count += 1;
            }
        }
    }

    fn finish(self, supplier_id: SupplierId, event_id: EventId) -> RatingSummary {
        let rating = if self.count == 0 {
            MeanRating::NoData
        } else {
            MeanRating::Mean {
                value: self.sum / self.count as f64,
                count: self.count,
            }
        };

        RatingSummary {
            supplier_id,
            event_id,
            rating,
            anomalies: self.anomalies,
        }
    }
}

/// Mean rating of every supplier rated in an event
///
/// One pass over the ratings. Suppliers appear in the order their first
/// rating appears.
pub fn supplier_ratings_for_event(
    snapshot: &EntitySnapshot,
    event_id: EventId,
    range: &ScoreRange,
) -> Vec<RatingSummary> {
    let mut groups: Vec<(SupplierId, RatingAccumulator)> = Vec::new();
    let mut index: HashMap<SupplierId, usize> = HashMap::new();

    for rating in snapshot.ratings().iter().filter(|r| r.event_id == event_id) {
        let position = *index.entry(rating.supplier_id).or_insert_with(|| {
            groups.push((rating.supplier_id, RatingAccumulator::default()));
            groups.len() - 1
        });
        groups[position].1.add(snapshot, rating, range);
    }

    groups
        .into_iter()
        .map(|(supplier_id, acc)| acc.finish(supplier_id, event_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventboard_domain::{Event, RatingId, Supplier};

    fn rating(id: u64, supplier: u64, event: u64, score: f64) -> SupplierRating {
        SupplierRating::new(
            RatingId::new(id),
            SupplierId::new(supplier),
            EventId::new(event),
            score,
        )
    }

    fn snapshot(ratings: Vec<SupplierRating>) -> EntitySnapshot {
        EntitySnapshot::new(
            vec![
                Event::new(EventId::new(1), "Gala", None, None),
                Event::new(EventId::new(2), "Fair", None, None),
            ],
            vec![
                Supplier::new(SupplierId::new(1), "Catering"),
                Supplier::new(SupplierId::new(2), "Lighting"),
            ],
            vec![],
            ratings,
        )
    }

    #[test]
    fn test_mean_rating() {
        let snapshot = snapshot(vec![
            rating(1, 1, 1, 4.0),
            rating(2, 1, 1, 5.0),
            rating(3, 1, 2, 1.0),
            rating(4, 2, 1, 2.0),
        ]);

        let summary = mean_rating(&snapshot, SupplierId::new(1), EventId::new(1), &ScoreRange::default());
        assert_eq!(summary.rating, MeanRating::Mean { value: 4.5, count: 2 });
        assert!(summary.anomalies.is_empty());
    }

    #[test]
    fn test_no_ratings_is_no_data_not_zero() {
        let snapshot = snapshot(vec![rating(1, 1, 2, 3.0)]);
        let summary = mean_rating(&snapshot, SupplierId::new(1), EventId::new(1), &ScoreRange::default());

        assert_eq!(summary.rating, MeanRating::NoData);
        assert_eq!(summary.rating.value(), None);
        assert_eq!(summary.rating.count(), 0);
    }

    #[test]
    fn test_out_of_range_scores_are_excluded() {
        let snapshot = snapshot(vec![
            rating(1, 1, 1, 4.0),
            rating(2, 1, 1, 7.0),
            rating(3, 1, 1, -1.0),
            rating(4, 1, 1, f64::NAN),
        ]);

        let summary = mean_rating(&snapshot, SupplierId::new(1), EventId::new(1), &ScoreRange::default());
        assert_eq!(summary.rating, MeanRating::Mean { value: 4.0, count: 1 });

        let counts = summary.anomalies.count_by_kind();
        assert_eq!(counts["score_out_of_range"], 2);
        assert_eq!(counts["non_finite_amount"], 1);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let snapshot = snapshot(vec![rating(1, 1, 1, 0.0), rating(2, 1, 1, 5.0)]);
        let summary = mean_rating(&snapshot, SupplierId::new(1), EventId::new(1), &ScoreRange::default());
        assert_eq!(summary.rating, MeanRating::Mean { value: 2.5, count: 2 });
    }

    #[test]
    fn test_dangling_references_are_excluded() {
        let snapshot = snapshot(vec![rating(1, 9, 1, 4.0), rating(2, 1, 9, 4.0)]);

        let unknown_supplier =
            mean_rating(&snapshot, SupplierId::new(9), EventId::new(1), &ScoreRange::default());
        assert_eq!(unknown_supplier.rating, MeanRating::NoData);
        assert_eq!(unknown_supplier.anomalies.count_by_kind()["dangling_supplier"], 1);

        let unknown_event =
            mean_rating(&snapshot, SupplierId::new(1), EventId::new(9), &ScoreRange::default());
        assert_eq!(unknown_event.rating, MeanRating::NoData);
        assert_eq!(unknown_event.anomalies.count_by_kind()["dangling_event"], 1);
    }

    #[test]
    fn test_custom_range() {
        let range = ScoreRange::new(1.0, 10.0).unwrap();
        let snapshot = snapshot(vec![rating(1, 1, 1, 8.0), rating(2, 1, 1, 0.5)]);

        let summary = mean_rating(&snapshot, SupplierId::new(1), EventId::new(1), &range);
        assert_eq!(summary.rating, MeanRating::Mean { value: 8.0, count: 1 });
        assert_eq!(summary.anomalies.len(), 1);
    }

    #[test]
    fn test_invalid_range() {
        assert_eq!(
            ScoreRange::new(5.0, 1.0),
            Err(DerivationError::InvalidScoreRange { min: 5.0, max: 1.0 })
        );
        assert!(ScoreRange::new(0.0, f64::INFINITY).is_err());
        assert!(ScoreRange::new(3.0, 3.0).is_ok());
    }

    #[test]
    fn test_supplier_ratings_for_event() {
        let snapshot = snapshot(vec![
            rating(1, 2, 1, 3.0),
            rating(2, 1, 1, 5.0),
            rating(3, 2, 1, 4.0),
            rating(4, 1, 2, 1.0),
        ]);

        let summaries = supplier_ratings_for_event(&snapshot, EventId::new(1), &ScoreRange::default());
        let suppliers: Vec<SupplierId> = summaries.iter().map(|s| s.supplier_id).collect();
        assert_eq!(suppliers, vec![SupplierId::new(2), SupplierId::new(1)]);
        assert_eq!(summaries[0].rating, MeanRating::Mean { value: 3.5, count: 2 });
        assert_eq!(summaries[1].rating, MeanRating::Mean { value: 5.0, count: 1 });
    }

    #[test]
    fn test_serialize_mean_rating() {
        let no_data = serde_json::to_value(MeanRating::NoData).unwrap();
        assert_eq!(no_data["status"], "no_data");

        let mean = serde_json::to_value(MeanRating::Mean { value: 4.5, count: 2 }).unwrap();
        assert_eq!(mean["status"], "mean");
        assert_eq!(mean["count"], 2);
    }
}
