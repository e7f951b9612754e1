mod breeder;
mod config;
mod crossover;
mod fitness;
mod individual;
mod metric;
mod mutagen;
mod point;
mod population;
mod selector;

pub use breeder::BreedError;
pub use config::{Config, ConfigError, MAX_ITERATIONS, MAX_POPULATION};
pub use crossover::{Crossover, CrossoverError, ProbabilityOutOfRangeError};
pub use fitness::{EvaluationError, Fittest, fittest, tour_length};
pub use individual::Individual;
pub use metric::Metric;
pub use mutagen::{Mutagen, MutationRate, MutationRateOutOfRange};
pub use point::{Edge, Point};
pub use population::Population;
pub use selector::{SelectionError, Selector};

pub(crate) use breeder::Breeder;
