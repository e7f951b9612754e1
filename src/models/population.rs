use super::{EvaluationError, Individual, Metric, Point, fitness};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::instrument;

/// One generation: an ordered snapshot of individuals.
///
/// Populations are never mutated across generations. Each generational step
/// builds a new one from the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub(crate) individuals: Vec<Individual>,
}

impl Population {
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    /// Seeds `size` individuals, each an independent shuffle of `points`.
    #[instrument(level = "debug", skip(points, rng), fields(size = size, n_points = points.len()))]
    pub fn initialize<R: Rng>(size: usize, points: &[Point], rng: &mut R) -> Self {
        let individuals = (0..size)
            .map(|_| {
                let mut tour = points.to_vec();
                tour.shuffle(rng);
                Individual::new(tour)
            })
            .collect();

        Self { individuals }
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    pub fn fittest(&self, metric: Metric) -> Result<(f64, &Individual), EvaluationError> {
        fitness::fittest(&self.individuals, metric)
    }

    /// Number of distinct visiting orders in this generation.
    pub fn distinct_tours(&self) -> usize {
        self.individuals
            .iter()
            .map(Individual::tour_hash)
            .collect::<HashSet<_>>()
            .len()
    }
}

impl FromIterator<Individual> for Population {
    fn from_iter<I: IntoIterator<Item = Individual>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Population {
    type Item = Individual;
    type IntoIter = std::vec::IntoIter<Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn points() -> Vec<Point> {
        (0..8).map(|i| Point::new(i as f64, (i * i) as f64)).collect()
    }

    #[test]
    fn it_initializes_permutations_of_the_seed_points() {
        let mut rng = StdRng::seed_from_u64(42);
        let seed = Individual::new(points());

        let population = Population::initialize(20, seed.tour(), &mut rng);

        assert_eq!(population.len(), 20);
        for individual in population.iter() {
            assert!(individual.is_permutation_of(&seed));
        }
    }

    #[test]
    fn it_initializes_reproducibly() {
        let a = Population::initialize(5, &points(), &mut StdRng::seed_from_u64(7));
        let b = Population::initialize(5, &points(), &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn it_counts_distinct_tours() {
        let tour = Individual::new(points());
        let mut reversed = points();
        reversed.reverse();

        let population = Population::new(vec![
            tour.clone(),
            tour.clone(),
            Individual::new(reversed),
        ]);

        assert_eq!(population.distinct_tours(), 2);
        assert_eq!(Population::default().distinct_tours(), 0);
    }

    #[test]
    fn it_errors_when_evaluating_empty_population() {
        let empty = Population::default();
        let result = empty.fittest(Metric::Euclidean);
        assert_eq!(result.unwrap_err(), EvaluationError::EmptyPopulation);
    }
}
