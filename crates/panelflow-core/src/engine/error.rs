use thiserror::Error;

use super::config::ConfigError;
use super::solver::SolverError;
use crate::core::geometry::GeometryError;
use crate::core::models::freestream::DomainError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Geometry error: {source}")]
    Geometry {
        #[from]
        source: GeometryError,
    },

    #[error("Invalid freestream: {source}")]
    Domain {
        #[from]
        source: DomainError,
    },

    #[error("Linear solve failed: {source}")]
    Solver {
        #[from]
        source: SolverError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Gauss-Seidel failed to converge after {iterations} iterations")]
    Convergence { iterations: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
