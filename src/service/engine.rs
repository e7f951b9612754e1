use super::Error;
use crate::models::{Breeder, Config, Fittest, Individual, Metric, Point, Population};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

/// Seeds the first generation: `n_population` independent shuffles of
/// `seed_points`.
#[instrument(level = "info", skip(config, seed_points, rng), fields(n_population = config.n_population, n_points = seed_points.len()))]
pub fn initialize<R: Rng>(
    config: &Config,
    seed_points: &[Point],
    rng: &mut R,
) -> Result<Population, Error> {
    config.validate()?;

    Ok(Population::initialize(
        config.n_population,
        seed_points,
        rng,
    ))
}

/// Breeds the next generation from `population`.
///
/// The result holds `2 * floor(n_population / number_of_children)`
/// individuals, which only matches `n_population` when two children are
/// configured and the population size is even.
#[instrument(level = "info", skip(config, population, rng), fields(population_size = population.len(), number_of_children = config.number_of_children))]
pub fn step<R: Rng>(
    config: &Config,
    population: &Population,
    rng: &mut R,
) -> Result<Population, Error> {
    config.validate()?;

    let breeder = Breeder::new(config)?;
    let next = breeder.breed_batch(config.parent_pairs(), population, rng)?;

    if next.len() != config.n_population {
        tracing::warn!(
            n_population = config.n_population,
            population_size = next.len(),
            "Population size drifted from its target"
        );
    }
    tracing::debug!(distinct_tours = next.distinct_tours(), "Bred generation");

    Ok(next)
}

/// Shortest tour in `population` and its length.
pub fn evaluate(population: &Population, metric: Metric) -> Result<(f64, &Individual), Error> {
    Ok(population.fittest(metric)?)
}

/// Outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub id: Uuid,
    pub best: Fittest,
    /// Generations evaluated, the initial one included.
    pub generations: usize,
    pub final_population_size: usize,
    pub started_at: DateTime<Utc>,
    pub concluded_at: DateTime<Utc>,
}

/// Runs `n_iter` generations and returns the best tour seen in any of them.
///
/// The batch caps are checked before any work is done.
#[instrument(level = "info", skip(config, points, rng), fields(n_population = config.n_population, n_iter = config.n_iter, n_points = points.len()))]
pub fn run<R: Rng>(config: &Config, points: &[Point], rng: &mut R) -> Result<RunReport, Error> {
    config.validate_batch()?;

    let id = Uuid::now_v7();
    let started_at = Utc::now();

    let mut population = initialize(config, points, rng)?;
    let (fitness, individual) = evaluate(&population, config.metric)?;
    let mut best = Fittest::new(fitness, individual.clone(), 0);
    tracing::info!(run_id = %id, tour_length = fitness, "Initial population evaluated");

    for generation in 1..config.n_iter {
        population = step(config, &population, rng)?;

        let (fitness, individual) = evaluate(&population, config.metric)?;
        if best.offer(fitness, individual, generation as u32) {
            tracing::info!(generation, tour_length = fitness, "Found a shorter tour");
        }
        tracing::debug!(
            generation,
            tour_length = fitness,
            best = best.fitness,
            "Generation evaluated"
        );
    }

    Ok(RunReport {
        id,
        best,
        generations: config.n_iter,
        final_population_size: population.len(),
        started_at,
        concluded_at: Utc::now(),
    })
}
