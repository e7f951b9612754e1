use super::{Individual, Metric, Point};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum EvaluationError {
    #[error("cannot evaluate an empty population")]
    EmptyPopulation,
}

/// Length of the closed cycle through `tour`: every consecutive pair plus the
/// wrap-around edge from the last point back to the first. Lower is better.
///
/// Tours with fewer than two points have length `0.0`.
pub fn tour_length(tour: &[Point], metric: Metric) -> f64 {
    let (Some(first), Some(last)) = (tour.first(), tour.last()) else {
        return 0.0;
    };

    let open_path: f64 = tour
        .windows(2)
        .map(|pair| metric.distance(&pair[0], &pair[1]))
        .sum();

    open_path + metric.distance(last, first)
}

/// Finds the individual with the shortest tour.
///
/// Ties resolve to the first individual in population order. An empty slice
/// is an error rather than a sentinel fitness.
#[instrument(level = "debug", skip(individuals), fields(population_size = individuals.len(), metric = ?metric))]
pub fn fittest(
    individuals: &[Individual],
    metric: Metric,
) -> Result<(f64, &Individual), EvaluationError> {
    let mut scored = individuals
        .iter()
        .map(|individual| (individual.tour_length(metric), individual));

    let first = scored.next().ok_or(EvaluationError::EmptyPopulation)?;

    Ok(scored.fold(first, |best, candidate| {
        if candidate.0 < best.0 { candidate } else { best }
    }))
}

/// Best individual seen so far in a run, and when it was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fittest {
    pub fitness: f64,
    pub individual: Individual,
    pub generation: u32,
    pub found_at: DateTime<Utc>,
}

impl Fittest {
    pub fn new(fitness: f64, individual: Individual, generation: u32) -> Self {
        Self {
            fitness,
            individual,
            generation,
            found_at: Utc::now(),
        }
    }

    /// Replaces the incumbent only on strict improvement. Ties keep the
    /// incumbent. Returns whether the record changed.
    #[instrument(level = "debug", skip(self, individual), fields(incumbent = self.fitness, fitness = fitness, generation = generation))]
    pub fn offer(&mut self, fitness: f64, individual: &Individual, generation: u32) -> bool {
        // NaN compares as unordered and never counts as an improvement
        if fitness.partial_cmp(&self.fitness) != Some(Ordering::Less) {
            return false;
        }

        *self = Self::new(fitness, individual.clone(), generation);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    #[test]
    fn it_measures_the_unit_square() {
        assert_eq!(tour_length(&unit_square(), Metric::Euclidean), 4.0);
        assert_eq!(tour_length(&unit_square(), Metric::Manhattan), 4.0);
    }

    #[test]
    fn it_includes_the_wrap_around_edge() {
        let tour = vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        assert_eq!(tour_length(&tour, Metric::Euclidean), 10.0);
    }

    #[test]
    fn it_counts_every_edge_exactly_once() {
        // Crossing tour of the unit square: two sides and two diagonals.
        let tour = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ];
        let expected = 2.0 + 2.0 * 2.0_f64.sqrt();
        assert!((tour_length(&tour, Metric::Euclidean) - expected).abs() < 1e-12);
    }

    #[test]
    fn it_handles_degenerate_tours() {
        assert_eq!(tour_length(&[], Metric::Euclidean), 0.0);
        assert_eq!(tour_length(&[Point::new(4.0, 2.0)], Metric::Euclidean), 0.0);
    }

    #[test]
    fn it_is_invariant_under_rotation_and_reversal() {
        let tour = vec![
            Point::new(12.0, 7.0),
            Point::new(3.0, 44.0),
            Point::new(90.0, 1.0),
            Point::new(55.0, 60.0),
            Point::new(21.0, 18.0),
            Point::new(70.0, 33.0),
        ];

        for metric in [Metric::Euclidean, Metric::Manhattan] {
            let reference = tour_length(&tour, metric);

            for shift in 0..tour.len() {
                let mut rotated = tour.clone();
                rotated.rotate_left(shift);
                assert!((tour_length(&rotated, metric) - reference).abs() < 1e-9);
            }

            let mut reversed = tour.clone();
            reversed.reverse();
            assert!((tour_length(&reversed, metric) - reference).abs() < 1e-9);
        }
    }

    #[test]
    fn it_finds_the_fittest_individual() {
        let square = Individual::new(unit_square());
        let crossed = Individual::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        let population = vec![crossed.clone(), square.clone(), crossed];

        let (fitness, best) = fittest(&population, Metric::Euclidean).unwrap();

        assert_eq!(fitness, 4.0);
        assert_eq!(best, &square);
        for individual in &population {
            assert!(fitness <= individual.tour_length(Metric::Euclidean));
        }
    }

    #[test]
    fn it_breaks_ties_by_first_occurrence() {
        let a = Individual::new(unit_square());
        let mut rotated = unit_square();
        rotated.rotate_left(1);
        let b = Individual::new(rotated);
        let population = vec![a.clone(), b];

        let (_, best) = fittest(&population, Metric::Euclidean).unwrap();
        assert!(std::ptr::eq(best, &population[0]));
    }

    #[test]
    fn it_errors_on_empty_population() {
        let result = fittest(&[], Metric::Euclidean);
        assert_eq!(result.unwrap_err(), EvaluationError::EmptyPopulation);
    }

    #[test]
    fn it_only_replaces_incumbent_on_strict_improvement() {
        let square = Individual::new(unit_square());
        let mut record = Fittest::new(4.0, square.clone(), 0);

        assert!(!record.offer(4.0, &square, 1));
        assert_eq!(record.generation, 0);

        assert!(!record.offer(5.0, &square, 2));
        assert_eq!(record.fitness, 4.0);

        assert!(record.offer(3.5, &square, 3));
        assert_eq!(record.fitness, 3.5);
        assert_eq!(record.generation, 3);
    }

    #[test]
    fn it_rejects_nan_fitness() {
        let square = Individual::new(unit_square());
        let mut record = Fittest::new(2.0, square.clone(), 0);

        assert!(!record.offer(f64::NAN, &square, 1));
        assert_eq!(record.fitness, 2.0);
        assert_eq!(record.generation, 0);
    }
}
