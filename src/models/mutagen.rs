use super::Individual;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

// ============================================================
// MutationRate
// ============================================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct MutationRate {
    value: f64,
}

#[derive(Debug, thiserror::Error)]
#[error("mutation_rate must be between 0.0 and 1.0, got: {0}")]
pub struct MutationRateOutOfRange(f64);

impl MutationRate {
    pub fn new(value: f64) -> Result<Self, MutationRateOutOfRange> {
        let value = Self::validate(value)?;

        Ok(Self { value })
    }

    fn validate(value: f64) -> Result<f64, MutationRateOutOfRange> {
        if !(0.0..=1.0).contains(&value) {
            return Err(MutationRateOutOfRange(value));
        }

        Ok(value)
    }

    pub fn get(&self) -> f64 {
        self.value
    }
}

impl TryFrom<f64> for MutationRate {
    type Error = MutationRateOutOfRange;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MutationRate> for f64 {
    fn from(rate: MutationRate) -> Self {
        rate.value
    }
}

// ============================================================
// Mutagen
// ============================================================

/// Swap mutation: with probability `mutation_rate`, exchanges the points at
/// two positions drawn uniformly with replacement. Drawing the same position
/// twice is a valid no-op.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mutagen {
    mutation_rate: MutationRate,
}

impl Mutagen {
    pub fn new(mutation_rate: MutationRate) -> Self {
        Self { mutation_rate }
    }

    pub fn swap(mutation_rate: f64) -> Result<Self, MutationRateOutOfRange> {
        Ok(Self::new(MutationRate::new(mutation_rate)?))
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate.get()
    }

    /// Mutates `individual` in place and returns the swapped positions, if any.
    #[instrument(level = "debug", skip(self, rng, individual), fields(mutation_rate = self.mutation_rate.get(), n_points = individual.len()))]
    pub fn mutate<R: Rng>(
        &self,
        rng: &mut R,
        individual: &mut Individual,
    ) -> Option<(usize, usize)> {
        if individual.is_empty() || !rng.random_bool(self.mutation_rate.get()) {
            return None;
        }

        let i = rng.random_range(0..individual.len());
        let j = rng.random_range(0..individual.len());
        individual.tour.swap(i, j);

        Some((i, j))
    }
}
