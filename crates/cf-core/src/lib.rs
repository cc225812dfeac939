//! cf-core: stable foundation for cavityflow.
//!
//! Contains:
//! - numeric (Real + float validation helpers)
//! - grid (staggered MAC grid storage)
//! - index (cell <-> linear system row bijection)
//! - timing (per-stage accumulating timers)
//! - error (shared error types)

pub mod error;
pub mod grid;
pub mod index;
pub mod numeric;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CfError, CfResult};
pub use grid::Grid;
pub use index::{cell_coords, cell_index, flatten_cells, unflatten_cells};
pub use numeric::*;
