//! Unified error type for the evcap workspace
//!
//! Each crate keeps its own domain error (`SizingError`, `OptimizeError`,
//! `DataError`). They all convert into [`EvcapError`] so that callers at the
//! API boundary can handle failures uniformly.
//!
//! # Example
//!
//! ```ignore
//! use evcap_core::{EvcapError, EvcapResult};
//!
//! fn run(paths: &InputPaths, params: &PlanningParams) -> EvcapResult<()> {
//!     let loaded = load_inputs(paths, 8760)?;
//!     let plan = plan_capacity(&loaded.inputs, params, &GoodLpBackend::default())?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all evcap operations.
///
/// Input and configuration variants are raised before the solver runs; the
/// solver variants after it. Every variant is fatal, and each class maps to
/// its own process exit code.
#[derive(Error, Debug)]
pub enum EvcapError {
    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input table shape or range errors
    #[error("Data error: {0}")]
    Data(String),

    /// Configuration errors (constants, sizing preconditions)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The LP has no feasible assignment
    #[error("Infeasible: {0}")]
    Infeasible(String),

    /// The LP objective is unbounded below
    #[error("Unbounded: {0}")]
    Unbounded(String),

    /// Any other solver failure
    #[error("Solver error: {0}")]
    Solver(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

impl EvcapError {
    /// Whether the error was raised after the solver ran.
    pub fn is_solve_failure(&self) -> bool {
        matches!(
            self,
            EvcapError::Infeasible(_) | EvcapError::Unbounded(_) | EvcapError::Solver(_)
        )
    }

    /// Process exit status for this failure class. 2 is left to usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            EvcapError::Other(_) => 1,
            EvcapError::Data(_) => 3,
            EvcapError::Config(_) => 4,
            EvcapError::Infeasible(_) => 5,
            EvcapError::Unbounded(_) => 6,
            EvcapError::Solver(_) => 7,
            EvcapError::Io(_) => 8,
        }
    }
}

/// Convenience type alias for Results using EvcapError.
pub type EvcapResult<T> = Result<T, EvcapError>;

impl From<anyhow::Error> for EvcapError {
    fn from(err: anyhow::Error) -> Self {
        EvcapError::Other(format!("{:#}", err))
    }
}
