use super::{Edge, Metric, Point, fitness};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// One candidate tour: a visiting order over the seed points.
///
/// An individual is expected to be a permutation of the seed point set. The
/// operators in this crate preserve that, and [`Individual::is_permutation_of`]
/// is how the breeder verifies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub(crate) tour: Vec<Point>,
}

impl Individual {
    pub fn new(tour: Vec<Point>) -> Self {
        Self { tour }
    }

    pub fn tour(&self) -> &[Point] {
        &self.tour
    }

    pub fn into_tour(self) -> Vec<Point> {
        self.tour
    }

    pub fn len(&self) -> usize {
        self.tour.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tour.is_empty()
    }

    /// Closed-cycle length of this tour under `metric`.
    pub fn tour_length(&self, metric: Metric) -> f64 {
        fitness::tour_length(&self.tour, metric)
    }

    /// The edges of the closed cycle: every consecutive pair plus last → first.
    pub fn edges(&self) -> Vec<Edge> {
        if self.tour.len() < 2 {
            return Vec::new();
        }

        self.tour
            .iter()
            .zip(self.tour.iter().cycle().skip(1))
            .map(|(&a, &b)| Edge { a, b })
            .collect()
    }

    /// True when both tours hold the same multiset of points.
    pub fn is_permutation_of(&self, other: &Individual) -> bool {
        if self.tour.len() != other.tour.len() {
            return false;
        }

        let mut counts: HashMap<_, i64> = HashMap::with_capacity(self.tour.len());
        for point in &self.tour {
            *counts.entry(point.key()).or_default() += 1;
        }
        for point in &other.tour {
            *counts.entry(point.key()).or_default() -= 1;
        }

        counts.values().all(|&count| count == 0)
    }

    // Fast hash of the visiting order, used to count distinct tours
    pub(crate) fn tour_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for point in &self.tour {
            point.key().hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl From<Vec<Point>> for Individual {
    fn from(tour: Vec<Point>) -> Self {
        Self::new(tour)
    }
}
