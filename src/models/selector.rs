//! Parent selection for the generational step.
//!
//! Selection is tournament based: `k` distinct individuals are drawn uniformly
//! at random and the one with the shortest tour wins. The tournament size is
//! the only knob for selection pressure.
//!
//! Tournament size guidelines:
//! - **Size 2-3**: Weak pressure, the population stays diverse for longer
//! - **Size 4-10**: Balanced search
//! - **Size close to the population size**: Near-greedy, the global fittest
//!   wins almost every tournament and the population converges fast
//!
//! # Examples
//!
//! ```rust
//! use tsp_ga::models::Selector;
//!
//! // Moderate pressure in a population of 100
//! let selector = Selector::tournament(10, 100)?;
//!
//! // A tournament cannot be larger than the population it samples from
//! assert!(Selector::tournament(11, 10).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::{Individual, Metric};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Draws `size` distinct indices in `0..population_size`, in draw order.
fn draw_distinct<R: Rng>(size: usize, population_size: usize, rng: &mut R) -> Vec<usize> {
    let mut participants = Vec::with_capacity(size);

    while participants.len() < size {
        let index = rng.random_range(0..population_size);
        if !participants.contains(&index) {
            participants.push(index);
        }
    }

    participants
}

/// Runs one tournament and returns the index of the winner.
#[instrument(level = "debug", skip(individuals, rng), fields(tournament_size = tournament_size, population_size = individuals.len()))]
fn tournament_selection<R: Rng>(
    tournament_size: usize,
    individuals: &[Individual],
    metric: Metric,
    rng: &mut R,
) -> Result<usize, SelectionError> {
    if tournament_size == 0 {
        return Err(SelectionError::EmptyTournament);
    }
    if tournament_size > individuals.len() {
        return Err(SelectionError::TournamentTooLarge {
            tournament_size,
            population_size: individuals.len(),
        });
    }

    let participants = draw_distinct(tournament_size, individuals.len(), rng);

    // First participant in draw order wins ties
    let mut winner = participants[0];
    let mut winner_fitness = individuals[winner].tour_length(metric);
    for &index in &participants[1..] {
        let fitness = individuals[index].tour_length(metric);
        if fitness < winner_fitness {
            winner = index;
            winner_fitness = fitness;
        }
    }

    Ok(winner)
}

/// Tournament selection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    /// Number of distinct individuals competing in each tournament.
    pub tournament_size: usize,
}

/// Errors that can occur during parent selection.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum SelectionError {
    /// A tournament needs at least one participant.
    #[error("tournament size must be at least 1")]
    EmptyTournament,

    /// Participants are drawn without replacement, so the tournament cannot
    /// outnumber the population.
    #[error(
        "tournament size must not exceed the population size. tournament_size={tournament_size}, population_size={population_size}"
    )]
    TournamentTooLarge {
        tournament_size: usize,
        population_size: usize,
    },
}

impl Selector {
    /// Creates a tournament selector, validated against the population size it
    /// will sample from.
    pub fn tournament(
        tournament_size: usize,
        population_size: usize,
    ) -> Result<Self, SelectionError> {
        if tournament_size == 0 {
            return Err(SelectionError::EmptyTournament);
        }
        if tournament_size > population_size {
            return Err(SelectionError::TournamentTooLarge {
                tournament_size,
                population_size,
            });
        }

        Ok(Self { tournament_size })
    }

    /// Selects one parent and returns its index in `individuals`.
    ///
    /// Fails if the population has shrunk below the tournament size since the
    /// selector was configured.
    pub fn select<R: Rng>(
        &self,
        individuals: &[Individual],
        metric: Metric,
        rng: &mut R,
    ) -> Result<usize, SelectionError> {
        tournament_selection(self.tournament_size, individuals, metric, rng)
    }
}
