//! Optimizer error types

use evcap_core::EvcapError;
use thiserror::Error;

use crate::sizing::SizingError;

/// Errors that can occur while building or solving the capacity LP.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OptimizeError {
    /// Sizing or parameter validation failed before the model was built
    #[error(transparent)]
    Sizing(#[from] SizingError),

    /// The inputs cannot produce a well-formed model
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// No assignment satisfies every constraint
    #[error("problem is infeasible: {0}")]
    Infeasible(String),

    /// The objective decreases without bound
    #[error("problem is unbounded: {0}")]
    Unbounded(String),

    /// Any other solver failure (numerical trouble, backend unavailable, ...)
    #[error("solver failed: {0}")]
    SolverFailed(String),
}

impl OptimizeError {
    /// Whether the error is a solver outcome rather than a setup problem.
    pub fn is_solve_failure(&self) -> bool {
        matches!(
            self,
            OptimizeError::Infeasible(_) | OptimizeError::Unbounded(_) | OptimizeError::SolverFailed(_)
        )
    }
}

impl From<SizingError> for EvcapError {
    fn from(err: SizingError) -> Self {
        EvcapError::Config(err.to_string())
    }
}

impl From<OptimizeError> for EvcapError {
    fn from(err: OptimizeError) -> Self {
        match err {
            OptimizeError::Sizing(e) => e.into(),
            OptimizeError::InvalidModel(msg) => EvcapError::Data(msg),
            OptimizeError::Infeasible(msg) => EvcapError::Infeasible(msg),
            OptimizeError::Unbounded(msg) => EvcapError::Unbounded(msg),
            OptimizeError::SolverFailed(msg) => EvcapError::Solver(msg),
        }
    }
}
