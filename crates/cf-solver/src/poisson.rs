//! Discrete pressure-Poisson operator.

use crate::error::{SolverError, SolverResult};
use cf_core::{Real, cell_index};
use nalgebra_sparse::{CooMatrix, CscMatrix};

/// Assemble the anchored 5-point Laplacian for an `nx x ny` cell grid.
///
/// Rows/columns follow [`cell_index`]. A cell gets `1/dx^2` (`1/dy^2`) for
/// each neighbor that exists along x (y) and the negated sum on the
/// diagonal; boundary cells simply have fewer terms. Row 0 is replaced by
/// `p[0] = 0`.
pub fn build_system(nx: usize, ny: usize, dx: Real, dy: Real) -> SolverResult<CscMatrix<Real>> {
    if nx == 0 || ny == 0 {
        return Err(SolverError::linear_solve(format!(
            "cannot assemble Poisson system for empty grid {nx}x{ny}"
        )));
    }
    if !(dx.is_finite() && dx > 0.0 && dy.is_finite() && dy > 0.0) {
        return Err(SolverError::InvalidArg {
            what: format!("cell sizes must be positive (dx={dx}, dy={dy})"),
        });
    }

    let n = nx * ny;
    let idx2 = 1.0 / (dx * dx);
    let idy2 = 1.0 / (dy * dy);

    let mut coo = CooMatrix::new(n, n);

    for i in 0..nx {
        for j in 0..ny {
            let row = cell_index(i, j, ny);
            if row == 0 {
                // Null-space anchor
                coo.push(0, 0, 1.0);
                continue;
            }

            let mut diag = 0.0;
            if i > 0 {
                coo.push(row, cell_index(i - 1, j, ny), idx2);
                diag -= idx2;
            }
            if i + 1 < nx {
                coo.push(row, cell_index(i + 1, j, ny), idx2);
                diag -= idx2;
            }
            if j > 0 {
                coo.push(row, cell_index(i, j - 1, ny), idy2);
                diag -= idy2;
            }
            if j + 1 < ny {
                coo.push(row, cell_index(i, j + 1, ny), idy2);
                diag -= idy2;
            }
            coo.push(row, row, diag);
        }
    }

    Ok(CscMatrix::from(&coo))
}

/// Assembled Poisson system together with the grid shape it was built for.
#[derive(Clone, Debug)]
pub struct PoissonSystem {
    nx: usize,
    ny: usize,
    matrix: CscMatrix<Real>,
}

impl PoissonSystem {
    pub fn assemble(nx: usize, ny: usize, dx: Real, dy: Real) -> SolverResult<Self> {
        let matrix = build_system(nx, ny, dx, dy)?;
        Ok(Self { nx, ny, matrix })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    pub fn size(&self) -> usize {
        self.nx * self.ny
    }

    /// The anchored Laplacian `A` (row 0 pinned).
    pub fn matrix(&self) -> &CscMatrix<Real> {
        &self.matrix
    }

    /// Symmetric positive definite operator with the same solution as `A`.
    ///
    /// The pinned unknown is exactly zero, so the column-0 couplings in the
    /// other rows contribute nothing and can be dropped; negating the rest
    /// gives `-A` restricted to the free cells, which is SPD on a connected
    /// grid. Solving `M p = -rhs` therefore reproduces `A p = rhs` whenever
    /// `rhs[0] == 0`.
    pub fn spd_operator(&self) -> CscMatrix<Real> {
        let n = self.size();
        let mut coo = CooMatrix::new(n, n);
        for (row, col, &value) in self.matrix.triplet_iter() {
            match (row, col) {
                (0, 0) => coo.push(0, 0, 1.0),
                (0, _) | (_, 0) => {}
                _ => coo.push(row, col, -value),
            }
        }
        CscMatrix::from(&coo)
    }
}
