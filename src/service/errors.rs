use crate::models::{BreedError, ConfigError, EvaluationError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ConfigError: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("BreedError: {0}")]
    BreedError(#[from] BreedError),
    #[error("EvaluationError: {0}")]
    EvaluationError(#[from] EvaluationError),
    #[error("NotInitialized: call init before advancing the solver")]
    NotInitialized,
}
