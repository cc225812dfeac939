//! Pressure-Poisson solver for the staggered cavity grid.
//!
//! This crate assembles the 5-point discrete Laplacian over the pressure
//! cells, pins one cell to remove the constant null space, and solves it
//! with a sparse direct factorization that is cached across time steps.

pub mod error;
pub mod poisson;
pub mod pressure;

pub use error::{SolverError, SolverResult};
pub use poisson::{PoissonSystem, build_system};
pub use pressure::PressureSolver;
