use super::{Error, evaluate, initialize, step};
use crate::builder::{Set, Unset};
use crate::geometry;
use crate::models::{Config, Fittest, Point, Population};
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::instrument;
use uuid::Uuid;

/// An interactive run: the caller decides when each generation is bred.
///
/// ```rust
/// use rand::{SeedableRng, rngs::StdRng};
/// use tsp_ga::models::{Config, Point};
/// use tsp_ga::service::Solver;
///
/// let points = vec![
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ];
/// let config = Config { n_population: 10, tournament_size: 3, ..Config::default() };
/// let mut solver = Solver::builder().config(config).points(points).build()?;
/// let mut rng = StdRng::seed_from_u64(1);
///
/// solver.init(&mut rng)?;
/// for _ in 0..10 {
///     solver.next(&mut rng)?;
/// }
///
/// assert_eq!(solver.generation(), 10);
/// assert_eq!(solver.fittest().map(|f| f.fitness), Some(4.0));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Solver {
    id: Uuid,
    started_at: DateTime<Utc>,
    config: Config,
    points: Vec<Point>,
    population: Option<Population>,
    generation: u32,
    fittest: Option<Fittest>,
}

impl Solver {
    pub fn builder() -> SolverBuilder<Unset<Config>, Unset<Vec<Point>>> {
        SolverBuilder {
            config: Unset::new(),
            points: Unset::new(),
        }
    }

    pub fn new(config: Config, points: Vec<Point>) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            id: Uuid::now_v7(),
            started_at: Utc::now(),
            config,
            points,
            population: None,
            generation: 0,
            fittest: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The current generation, once [`Solver::init`] has run.
    pub fn population(&self) -> Option<&Population> {
        self.population.as_ref()
    }

    /// Generations bred since the last `init`.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Best tour seen since the last `init`.
    pub fn fittest(&self) -> Option<&Fittest> {
        self.fittest.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.population.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Seeds a fresh population and makes its fittest the incumbent.
    #[instrument(level = "info", skip(self, rng), fields(solver_id = %self.id, n_population = self.config.n_population, n_points = self.points.len()))]
    pub fn init<R: Rng>(&mut self, rng: &mut R) -> Result<&Fittest, Error> {
        let population = initialize(&self.config, &self.points, rng)?;
        let (fitness, individual) = evaluate(&population, self.config.metric)?;

        let fittest = Fittest::new(fitness, individual.clone(), 0);
        self.population = Some(population);
        self.generation = 0;

        Ok(&*self.fittest.insert(fittest))
    }

    /// Breeds one generation. The incumbent only changes on strict improvement.
    #[instrument(level = "info", skip(self, rng), fields(solver_id = %self.id, generation = self.generation + 1))]
    pub fn next<R: Rng>(&mut self, rng: &mut R) -> Result<&Fittest, Error> {
        let (Some(population), Some(fittest)) = (&self.population, &mut self.fittest) else {
            return Err(Error::NotInitialized);
        };

        let next = step(&self.config, population, rng)?;
        let generation = self.generation + 1;

        let (fitness, individual) = evaluate(&next, self.config.metric)?;
        if fittest.offer(fitness, individual, generation) {
            tracing::info!(generation, tour_length = fitness, "Found a shorter tour");
        }

        self.population = Some(next);
        self.generation = generation;

        Ok(&*fittest)
    }

    /// Drops the population and the incumbent. The seed points and config stay.
    pub fn reset(&mut self) {
        self.population = None;
        self.generation = 0;
        self.fittest = None;
    }

    /// Swaps in a new config. With `reset_population` the session is
    /// re-initialized under it; otherwise the current population carries on.
    ///
    /// A different `n_points` replaces the instance with fresh random points,
    /// which also drops the population when it is not re-initialized.
    #[instrument(level = "info", skip(self, config, rng), fields(solver_id = %self.id, reset_population = reset_population))]
    pub fn update_config<R: Rng>(
        &mut self,
        config: Config,
        reset_population: bool,
        rng: &mut R,
    ) -> Result<(), Error> {
        config.validate()?;
        let resize = config.n_points != self.config.n_points;
        self.config = config;

        if resize {
            self.randomize_points(rng);
        }
        if reset_population {
            self.init(rng)?;
        }

        Ok(())
    }

    /// Replaces the problem instance and resets the session.
    pub fn set_points(&mut self, points: Vec<Point>) {
        self.points = points;
        self.reset();
    }

    /// Replaces the problem instance with `n_points` random points.
    pub fn randomize_points<R: Rng>(&mut self, rng: &mut R) {
        let points = geometry::random_points(rng, self.config.n_points);
        self.set_points(points);
    }
}

pub struct SolverBuilder<C, P> {
    config: C,
    points: P,
}

impl<P> SolverBuilder<Unset<Config>, P> {
    pub fn config(self, config: Config) -> SolverBuilder<Set<Config>, P> {
        SolverBuilder {
            config: Set::new(config),
            points: self.points,
        }
    }
}

impl<C> SolverBuilder<C, Unset<Vec<Point>>> {
    pub fn points(self, points: Vec<Point>) -> SolverBuilder<C, Set<Vec<Point>>> {
        SolverBuilder {
            config: self.config,
            points: Set::new(points),
        }
    }
}

impl SolverBuilder<Set<Config>, Unset<Vec<Point>>> {
    /// Uses `n_points` random points from the configured count.
    pub fn random_points<R: Rng>(
        self,
        rng: &mut R,
    ) -> SolverBuilder<Set<Config>, Set<Vec<Point>>> {
        let points = geometry::random_points(rng, self.config.as_ref_inner().n_points);
        self.points(points)
    }
}

impl SolverBuilder<Set<Config>, Set<Vec<Point>>> {
    pub fn build(self) -> Result<Solver, Error> {
        Solver::new(self.config.into_inner(), self.points.into_inner())
    }
}
