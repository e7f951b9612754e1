mod engine;
mod errors;
mod solver;

pub use engine::{RunReport, evaluate, initialize, run, step};
pub use errors::Error;
pub use solver::{Solver, SolverBuilder};
