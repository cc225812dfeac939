//! Time-marching projection solver for the lid-driven cavity.
//!
//! Provides:
//! - Boundary enforcement for the moving-lid cavity walls
//! - Explicit central-difference advection-diffusion update
//! - Cell-centered divergence and pressure-gradient projection
//! - Diffusion stability check and run diagnostics
//! - Run configuration (YAML) and the step-by-step simulation driver

pub mod advection;
pub mod boundary;
pub mod config;
pub mod diagnostics;
pub mod divergence;
pub mod error;
pub mod history;
pub mod projection;
pub mod sim;
pub mod stability;

// Re-exports for public API
pub use advection::advect_diffuse;
pub use boundary::apply_boundary_conditions;
pub use config::CavityConfig;
pub use diagnostics::{advective_courant, kinetic_energy};
pub use divergence::{divergence, max_abs_divergence};
pub use error::{SimError, SimResult};
pub use history::{History, Snapshot};
pub use projection::project;
pub use sim::{
    CavityStepper, DriverState, SimOptions, SimProgress, SimulationDriver, StepReport, run,
    run_with_progress,
};
pub use stability::{StabilityWarning, check_diffusion_stability, diffusion_limit};
