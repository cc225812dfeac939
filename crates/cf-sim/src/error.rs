//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while configuring or running a cavity simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Grid error: {0}")]
    Core(#[from] cf_core::CfError),

    #[error("Pressure solve error: {0}")]
    Solver(#[from] cf_solver::SolverError),
}

pub type SimResult<T> = Result<T, SimError>;
