//! Discrete divergence at cell centers.

use cf_core::timing::{Timer, stage_timing};
use cf_core::{Real, max_abs};
use nalgebra::DMatrix;
use rayon::prelude::*;

/// Net outflow per unit area of each cell, shape `nx x ny`:
/// `(u[i+1,j] - u[i,j])/dx + (v[i,j+1] - v[i,j])/dy`.
pub fn divergence(u: &DMatrix<Real>, v: &DMatrix<Real>, dx: Real, dy: Real) -> DMatrix<Real> {
    let timer = Timer::start("divergence");
    let nx = u.nrows() - 1;
    let ny = v.ncols() - 1;

    let mut div = DMatrix::zeros(nx, ny);
    if nx > 0 {
        div.as_mut_slice()
            .par_chunks_mut(nx)
            .enumerate()
            .for_each(|(j, column)| {
                for (i, value) in column.iter_mut().enumerate() {
                    *value = (u[(i + 1, j)] - u[(i, j)]) / dx + (v[(i, j + 1)] - v[(i, j)]) / dy;
                }
            });
    }

    timer.stop_into(&stage_timing::DIVERGENCE);
    div
}

/// Largest `|div|` over all cells.
pub fn max_abs_divergence(u: &DMatrix<Real>, v: &DMatrix<Real>, dx: Real, dy: Real) -> Real {
    max_abs(&divergence(u, v, dx, dy))
}
