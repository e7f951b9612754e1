use super::point::PointKey;
use super::{Individual, Point};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

/// Maps each point of `rhs` onto the position of the matching point in `lhs`.
///
/// Positions in `lhs` form the arena the edge table is indexed by. Points that
/// occur more than once are matched to `lhs` copies in order, so both parents
/// resolve to permutations of `0..lhs.len()`.
fn arena_indices(lhs: &[Point], rhs: &[Point]) -> Result<Vec<usize>, CrossoverError> {
    if lhs.len() != rhs.len() {
        return Err(CrossoverError::LengthMismatch {
            lhs: lhs.len(),
            rhs: rhs.len(),
        });
    }

    let mut positions: HashMap<PointKey, Vec<usize>> = HashMap::with_capacity(lhs.len());
    for (index, point) in lhs.iter().enumerate().rev() {
        positions.entry(point.key()).or_default().push(index);
    }

    rhs.iter()
        .map(|point| {
            positions
                .get_mut(&point.key())
                .and_then(Vec::pop)
                .ok_or(CrossoverError::PointMismatch { point: *point })
        })
        .collect()
}

/// Adjacency of every node to its neighbours in either parent, treating each
/// parent as an open path. Lives only for the duration of one offspring.
#[derive(Debug)]
struct EdgeTable {
    neighbours: Vec<Vec<usize>>,
}

impl EdgeTable {
    fn build(size: usize, parents: [&[usize]; 2]) -> Self {
        let mut table = Self {
            neighbours: vec![Vec::with_capacity(4); size],
        };

        for parent in parents {
            for (position, &node) in parent.iter().enumerate() {
                if position > 0 {
                    table.insert(node, parent[position - 1]);
                }
                if position + 1 < parent.len() {
                    table.insert(node, parent[position + 1]);
                }
            }
        }

        table
    }

    fn insert(&mut self, node: usize, neighbour: usize) {
        let neighbours = &mut self.neighbours[node];
        if !neighbours.contains(&neighbour) {
            neighbours.push(neighbour);
        }
    }

    /// Consumes every edge leading to `node`.
    fn remove(&mut self, node: usize) {
        for neighbours in &mut self.neighbours {
            neighbours.retain(|&neighbour| neighbour != node);
        }
    }

    fn degree(&self, node: usize) -> usize {
        self.neighbours[node].len()
    }

    /// The neighbour of `node` with the fewest remaining neighbours of its own.
    /// Ties go to the last in insertion order.
    fn min_branching_neighbour(&self, node: usize) -> Option<usize> {
        self.neighbours[node]
            .iter()
            .copied()
            .reduce(|best, neighbour| {
                if self.degree(best) < self.degree(neighbour) {
                    best
                } else {
                    neighbour
                }
            })
    }
}

/// Builds one offspring by edge recombination.
#[instrument(level = "debug", skip(rng, lhs, rhs), fields(n_points = lhs.len()))]
fn recombine_edges<R: Rng>(
    rng: &mut R,
    lhs: &Individual,
    rhs: &Individual,
) -> Result<Individual, CrossoverError> {
    let size = lhs.len();
    let rhs_arena = arena_indices(&lhs.tour, &rhs.tour)?;
    if size == 0 {
        return Ok(Individual::new(Vec::new()));
    }

    let lhs_arena: Vec<usize> = (0..size).collect();
    let mut table = EdgeTable::build(size, [&lhs_arena, &rhs_arena]);

    let mut placed = vec![false; size];
    let mut child = Vec::with_capacity(size);

    let mut current = rng.random_range(0..size);
    placed[current] = true;
    child.push(current);

    while child.len() < size {
        table.remove(current);

        let next = match table.min_branching_neighbour(current) {
            Some(next) => next,
            None => {
                let unplaced: Vec<usize> = (0..size).filter(|&node| !placed[node]).collect();
                *unplaced
                    .choose(rng)
                    .ok_or(CrossoverError::Exhausted { placed: child.len() })?
            }
        };

        placed[next] = true;
        child.push(next);
        current = next;
    }

    Ok(Individual::new(
        child.into_iter().map(|node| lhs.tour[node]).collect(),
    ))
}

/// Edge recombination crossover (ERX) for permutation-encoded tours.
///
/// Index-based crossovers such as single-point or uniform would break the
/// "every point exactly once" property of a tour. ERX instead recombines the
/// *adjacencies* of both parents: it builds a table of which points neighbour
/// which in either parent, then walks it greedily, always stepping to the
/// neighbour that has the fewest neighbours left. When the walk runs into a
/// dead end it restarts from a random point that has not been placed yet.
///
/// With probability `1 - probability` the parents are passed through as the
/// children unchanged.
///
/// # Examples
///
/// ```rust
/// use rand::{SeedableRng, rngs::StdRng};
/// use tsp_ga::models::{Crossover, Individual, Point};
///
/// let crossover = Crossover::edge_recombination(1.0)?;
/// let lhs = Individual::new(vec![
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ]);
/// let rhs = Individual::new(vec![
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 0.0),
///     Point::new(0.0, 1.0),
///     Point::new(1.0, 0.0),
/// ]);
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let (first, second) = crossover.apply(&mut rng, &lhs, &rhs)?;
///
/// assert!(first.is_permutation_of(&lhs));
/// assert!(second.is_permutation_of(&lhs));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Crossover {
    /// Probability that a mating event recombines instead of cloning (0.0 to 1.0).
    probability: f64,
}

/// Error returned when attempting to create a crossover with invalid probability.
#[derive(Debug, thiserror::Error)]
#[error("crossover probability must be between 0.0 and 1.0, got {0}")]
pub struct ProbabilityOutOfRangeError(f64);

/// Parents that cannot be recombined.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq))]
pub enum CrossoverError {
    #[error("parents differ in length: lhs={lhs}, rhs={rhs}")]
    LengthMismatch { lhs: usize, rhs: usize },
    #[error("parents are not permutations of the same points: {point:?} has no counterpart")]
    PointMismatch { point: Point },
    #[error("no unplaced point left after placing {placed}")]
    Exhausted { placed: usize },
}

impl Crossover {
    pub fn edge_recombination(probability: f64) -> Result<Self, ProbabilityOutOfRangeError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ProbabilityOutOfRangeError(probability));
        }

        Ok(Self { probability })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Produces two children from two parents.
    ///
    /// Both children are reconstructed independently from the same edge
    /// information, so they usually differ.
    #[instrument(level = "debug", skip(self, rng, lhs, rhs), fields(probability = self.probability, n_points = lhs.len()))]
    pub fn apply<R: Rng>(
        &self,
        rng: &mut R,
        lhs: &Individual,
        rhs: &Individual,
    ) -> Result<(Individual, Individual), CrossoverError> {
        if !rng.random_bool(self.probability) {
            return Ok((lhs.clone(), rhs.clone()));
        }

        let first = recombine_edges(rng, lhs, rhs)?;
        let second = recombine_edges(rng, lhs, rhs)?;

        Ok((first, second))
    }
}

impl TryFrom<f64> for Crossover {
    type Error = ProbabilityOutOfRangeError;

    fn try_from(probability: f64) -> Result<Self, Self::Error> {
        Self::edge_recombination(probability)
    }
}

impl From<Crossover> for f64 {
    fn from(crossover: Crossover) -> Self {
        crossover.probability
    }
}
