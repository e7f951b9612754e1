use rand::{SeedableRng, rngs::StdRng};
use tracing::Level;
use tsp_ga::{geometry, models::Config, service};

// Evolves a tour over a random instance and prints the run report as JSON.
//
// Usage: evolve [config.json]
// Set TSP_SEED to make the run reproducible.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_thread_ids(true)
        .with_max_level(Level::INFO)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    let mut rng = match std::env::var("TSP_SEED") {
        Ok(seed) => StdRng::seed_from_u64(seed.parse()?),
        Err(_) => StdRng::from_os_rng(),
    };

    let points = geometry::random_points(&mut rng, config.n_points);
    let report = service::run(&config, &points, &mut rng)?;

    tracing::info!(
        run_id = %report.id,
        tour_length = report.best.fitness,
        found_in_generation = report.best.generation,
        "Run concluded"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
