mod builder;

pub mod geometry;
pub mod models;
pub mod service;

pub use service::{Error, RunReport, Solver};
