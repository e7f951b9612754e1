use super::{
    Config, ConfigError, Crossover, CrossoverError, Individual, Mutagen, Population,
    SelectionError, Selector,
};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum BreedError {
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),
    #[error("Crossover error: {0}")]
    Crossover(#[from] CrossoverError),
    #[error("{operator} produced a tour that is not a permutation of its parent")]
    InvariantViolation { operator: &'static str },
}

/// Turns one generation into the next: every mating event selects two
/// parents, recombines them and mutates both children.
pub(crate) struct Breeder<'a> {
    config: &'a Config,
    selector: Selector,
    crossover: Crossover,
    mutagen: Mutagen,
}

impl<'a> Breeder<'a> {
    pub(crate) fn new(config: &'a Config) -> Result<Self, ConfigError> {
        Ok(Self {
            config,
            selector: config.selector()?,
            crossover: config.crossover()?,
            mutagen: config.mutagen()?,
        })
    }

    /// Runs `number_of_children` tournaments and keeps the first two winners.
    fn select_parents<R: rand::Rng>(
        &self,
        individuals: &[Individual],
        rng: &mut R,
    ) -> Result<(usize, usize), BreedError> {
        let mut pool = Vec::with_capacity(self.config.number_of_children);
        for _ in 0..self.config.number_of_children {
            pool.push(
                self.selector
                    .select(individuals, self.config.metric, rng)?,
            );
        }

        // Extra draws are consumed from the stream but never bred
        Ok((pool[0], pool[1]))
    }

    fn breed_pair<R: rand::Rng>(
        &self,
        individuals: &[Individual],
        rng: &mut R,
    ) -> Result<[Individual; 2], BreedError> {
        let (i, j) = self.select_parents(individuals, rng)?;
        let parent = &individuals[i];

        let (first, second) = self.crossover.apply(rng, parent, &individuals[j])?;
        check_permutation("crossover", parent, [&first, &second])?;

        let mut children = [first, second];
        for child in children.iter_mut() {
            self.mutagen.mutate(rng, child);
        }
        check_permutation("mutation", parent, [&children[0], &children[1]])?;

        Ok(children)
    }

    #[instrument(level = "debug", skip(self, population, rng), fields(parent_pairs = parent_pairs, population_size = population.len()))]
    pub(crate) fn breed_batch<R: rand::Rng>(
        &self,
        parent_pairs: usize,
        population: &Population,
        rng: &mut R,
    ) -> Result<Population, BreedError> {
        let mut individuals = Vec::with_capacity(parent_pairs * 2);
        for _ in 0..parent_pairs {
            individuals.extend(self.breed_pair(population.individuals(), rng)?);
        }

        Ok(Population::new(individuals))
    }
}

fn check_permutation(
    operator: &'static str,
    parent: &Individual,
    children: [&Individual; 2],
) -> Result<(), BreedError> {
    if cfg!(debug_assertions)
        && children
            .iter()
            .any(|child| !child.is_permutation_of(parent))
    {
        return Err(BreedError::InvariantViolation { operator });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;
    use rand::{SeedableRng, rngs::StdRng};

    fn points() -> Vec<Point> {
        (0..12)
            .map(|i| Point::new((i * 7 % 12) as f64, (i * 5 % 12) as f64))
            .collect()
    }

    fn config() -> Config {
        Config {
            n_population: 10,
            tournament_size: 3,
            ..Config::default()
        }
    }

    #[test]
    fn it_breeds_two_children_per_pair() {
        let config = config();
        let breeder = Breeder::new(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let population = Population::initialize(10, &points(), &mut rng);

        let next = breeder.breed_batch(4, &population, &mut rng).unwrap();

        assert_eq!(next.len(), 8);
        let seed = Individual::new(points());
        assert!(next.iter().all(|child| child.is_permutation_of(&seed)));
    }

    #[test]
    fn it_clones_parents_without_crossover_or_mutation() {
        let config = Config {
            p_crossover: 0.0,
            p_mutation: 0.0,
            ..config()
        };
        let breeder = Breeder::new(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let population = Population::initialize(10, &points(), &mut rng);

        let next = breeder.breed_batch(5, &population, &mut rng).unwrap();

        assert!(next.iter().all(|child| population.iter().any(|p| p == child)));
    }

    #[test]
    fn it_consumes_every_tournament_in_the_mating_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let population = Population::initialize(10, &points(), &mut rng);

        let two = config();
        let four = Config {
            number_of_children: 4,
            ..config()
        };

        let mut lhs = StdRng::seed_from_u64(11);
        let mut rhs = StdRng::seed_from_u64(11);
        let (a, b) = Breeder::new(&two)
            .unwrap()
            .select_parents(population.individuals(), &mut lhs)
            .unwrap();
        let (c, d) = Breeder::new(&four)
            .unwrap()
            .select_parents(population.individuals(), &mut rhs)
            .unwrap();

        // The first two winners are identical, the extra draws advance the stream
        assert_eq!((a, b), (c, d));
        assert_ne!(
            rand::Rng::random::<u64>(&mut lhs),
            rand::Rng::random::<u64>(&mut rhs)
        );
    }

    #[test]
    fn it_propagates_selection_errors() {
        let config = config();
        let breeder = Breeder::new(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let population = Population::initialize(2, &points(), &mut rng);

        let result = breeder.breed_batch(1, &population, &mut rng);

        assert!(matches!(
            result,
            Err(BreedError::Selection(SelectionError::TournamentTooLarge { .. }))
        ));
    }

    #[test]
    fn it_flags_non_permutations() {
        let parent = Individual::new(points());
        let mut broken = points();
        broken[0] = broken[1];
        let broken = Individual::new(broken);

        let result = check_permutation("crossover", &parent, [&parent, &broken]);

        if cfg!(debug_assertions) {
            assert!(matches!(
                result,
                Err(BreedError::InvariantViolation {
                    operator: "crossover"
                })
            ));
        } else {
            assert!(result.is_ok());
        }
    }

    #[test]
    fn it_rejects_invalid_config() {
        let config = Config {
            p_crossover: 2.0,
            ..config()
        };
        assert!(matches!(
            Breeder::new(&config),
            Err(ConfigError::Crossover(_))
        ));
    }
}
