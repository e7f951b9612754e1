use super::{
    Crossover, Metric, Mutagen, MutationRateOutOfRange, ProbabilityOutOfRangeError,
    SelectionError, Selector,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::instrument;

/// Largest population the batch driver accepts.
pub const MAX_POPULATION: usize = 100;
/// Largest iteration budget the batch driver accepts.
pub const MAX_ITERATIONS: usize = 1000;

/// Parameters of one evolutionary run.
///
/// Missing fields take their defaults when deserializing, so a JSON document
/// only needs to name what it changes:
///
/// ```rust
/// use tsp_ga::models::{Config, Metric};
///
/// let config = Config::from_json(r#"{ "n_population": 50, "metric": "manhattan" }"#)?;
///
/// assert_eq!(config.n_population, 50);
/// assert_eq!(config.metric, Metric::Manhattan);
/// assert_eq!(config.tournament_size, 10);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Target number of individuals per generation.
    pub n_population: usize,
    /// Probability that a child undergoes swap mutation.
    pub p_mutation: f64,
    /// Probability that a mating event recombines instead of cloning the parents.
    pub p_crossover: f64,
    /// Individuals competing in each tournament. At most `n_population`.
    pub tournament_size: usize,
    /// Tournaments run per mating event. Only the first two winners breed.
    pub number_of_children: usize,
    /// Generation budget of the batch driver.
    pub n_iter: usize,
    /// Number of points in a randomly generated instance.
    pub n_points: usize,
    /// Distance function tours are scored with.
    pub metric: Metric,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            n_population: 100,
            p_mutation: 0.2,
            p_crossover: 0.8,
            tournament_size: 10,
            number_of_children: 2,
            n_iter: 1000,
            n_points: 10,
            metric: Metric::Euclidean,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("n_population must be greater than 0")]
    EmptyPopulation,
    #[error("number_of_children must be at least 2, got {0}")]
    TooFewChildren(usize),
    #[error("n_iter must be greater than 0")]
    NoIterations,
    #[error("population size {n_population} exceeds the maximum of {max}")]
    PopulationCap { n_population: usize, max: usize },
    #[error("number of iterations {n_iter} exceeds the maximum of {max}")]
    IterationCap { n_iter: usize, max: usize },
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),
    #[error("Crossover error: {0}")]
    Crossover(#[from] ProbabilityOutOfRangeError),
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationRateOutOfRange),
    #[error("Could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),
}

impl Config {
    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Checks every parameter range required by a single generational step.
    #[instrument(level = "debug", skip(self), fields(n_population = self.n_population, tournament_size = self.tournament_size, number_of_children = self.number_of_children))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.number_of_children < 2 {
            return Err(ConfigError::TooFewChildren(self.number_of_children));
        }
        if self.n_iter == 0 {
            return Err(ConfigError::NoIterations);
        }

        self.selector()?;
        self.crossover()?;
        self.mutagen()?;

        Ok(())
    }

    /// Like [`Config::validate`], plus the hard caps of the batch driver.
    pub fn validate_batch(&self) -> Result<(), ConfigError> {
        if self.n_population > MAX_POPULATION {
            return Err(ConfigError::PopulationCap {
                n_population: self.n_population,
                max: MAX_POPULATION,
            });
        }
        if self.n_iter > MAX_ITERATIONS {
            return Err(ConfigError::IterationCap {
                n_iter: self.n_iter,
                max: MAX_ITERATIONS,
            });
        }

        self.validate()
    }

    pub fn selector(&self) -> Result<Selector, SelectionError> {
        Selector::tournament(self.tournament_size, self.n_population)
    }

    pub fn crossover(&self) -> Result<Crossover, ProbabilityOutOfRangeError> {
        Crossover::edge_recombination(self.p_crossover)
    }

    pub fn mutagen(&self) -> Result<Mutagen, MutationRateOutOfRange> {
        Mutagen::swap(self.p_mutation)
    }

    /// Mating events per generation. Each contributes two children, so the
    /// next generation holds `2 * parent_pairs()` individuals.
    pub fn parent_pairs(&self) -> usize {
        self.n_population / self.number_of_children
    }
}
