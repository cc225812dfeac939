//! Error types for pressure solve operations.

use thiserror::Error;

/// Errors that can occur while building or solving the pressure system.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Linear solve failed: {what}")]
    LinearSolve { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    pub(crate) fn linear_solve(what: impl Into<String>) -> Self {
        SolverError::LinearSolve { what: what.into() }
    }
}
