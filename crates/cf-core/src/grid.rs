//! Staggered (Marker-and-Cell) grid storage.
//!
//! Layout, with `i` along x and `j` along y:
//! - `u` lives on vertical faces: `u[(i, j)]` is the face between cell
//!   columns `i-1` and `i` at row `j`, shape `(nx+1) x ny`.
//! - `v` lives on horizontal faces: `v[(i, j)]` is the face between cell
//!   rows `j-1` and `j` at column `i`, shape `nx x (ny+1)`.
//! - `p` lives at cell centers, shape `nx x ny`.

use crate::error::{CfError, CfResult};
use crate::numeric::Real;
use nalgebra::DMatrix;

/// Uniform cavity grid with its staggered velocity/pressure fields.
///
/// Geometry is fixed at construction. The fields are public so the
/// simulation pipeline can replace them each step; callers must keep the
/// shapes returned by [`Grid::u_shape`], [`Grid::v_shape`] and
/// [`Grid::p_shape`].
#[derive(Clone, Debug)]
pub struct Grid {
    nx: usize,
    ny: usize,
    lx: Real,
    ly: Real,
    dx: Real,
    dy: Real,
    pub u: DMatrix<Real>,
    pub v: DMatrix<Real>,
    pub p: DMatrix<Real>,
}

impl Grid {
    /// Build a zero-initialized grid of `nx x ny` cells over `lx x ly`.
    pub fn new(nx: usize, ny: usize, lx: Real, ly: Real) -> CfResult<Self> {
        if nx == 0 {
            return Err(CfError::InvalidDimension {
                what: "nx must be positive",
                value: nx as Real,
            });
        }
        if ny == 0 {
            return Err(CfError::InvalidDimension {
                what: "ny must be positive",
                value: ny as Real,
            });
        }
        if !(lx.is_finite() && lx > 0.0) {
            return Err(CfError::InvalidDimension {
                what: "Lx must be positive and finite",
                value: lx,
            });
        }
        if !(ly.is_finite() && ly > 0.0) {
            return Err(CfError::InvalidDimension {
                what: "Ly must be positive and finite",
                value: ly,
            });
        }

        Ok(Self {
            nx,
            ny,
            lx,
            ly,
            dx: lx / nx as Real,
            dy: ly / ny as Real,
            u: DMatrix::zeros(nx + 1, ny),
            v: DMatrix::zeros(nx, ny + 1),
            p: DMatrix::zeros(nx, ny),
        })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn lx(&self) -> Real {
        self.lx
    }

    pub fn ly(&self) -> Real {
        self.ly
    }

    pub fn dx(&self) -> Real {
        self.dx
    }

    pub fn dy(&self) -> Real {
        self.dy
    }

    /// Number of pressure cells (rows of the Poisson system).
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny
    }

    pub fn u_shape(&self) -> (usize, usize) {
        (self.nx + 1, self.ny)
    }

    pub fn v_shape(&self) -> (usize, usize) {
        (self.nx, self.ny + 1)
    }

    pub fn p_shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Cell-center coordinates of cell `(i, j)`.
    pub fn cell_center(&self, i: usize, j: usize) -> (Real, Real) {
        (
            (i as Real + 0.5) * self.dx,
            (j as Real + 0.5) * self.dy,
        )
    }

    /// Check that the live fields still have their construction shapes.
    pub fn check_shapes(&self) -> CfResult<()> {
        check_shape("u", &self.u, self.u_shape())?;
        check_shape("v", &self.v, self.v_shape())?;
        check_shape("p", &self.p, self.p_shape())
    }
}

pub fn check_shape(
    what: &'static str,
    m: &DMatrix<Real>,
    expected: (usize, usize),
) -> CfResult<()> {
    let found = m.shape();
    if found == expected {
        Ok(())
    } else {
        Err(CfError::ShapeMismatch {
            what,
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staggered_shapes_are_offset() {
        let grid = Grid::new(4, 3, 1.0, 1.5).unwrap();
        assert_eq!(grid.u.shape(), (5, 3));
        assert_eq!(grid.v.shape(), (4, 4));
        assert_eq!(grid.p.shape(), (4, 3));
        assert!(grid.check_shapes().is_ok());
    }

    #[test]
    fn fields_start_at_zero() {
        let grid = Grid::new(6, 6, 1.0, 1.0).unwrap();
        assert!(grid.u.iter().all(|&x| x == 0.0));
        assert!(grid.v.iter().all(|&x| x == 0.0));
        assert!(grid.p.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn cell_sizes_derived_from_lengths() {
        let grid = Grid::new(4, 8, 2.0, 1.0).unwrap();
        assert_eq!(grid.dx(), 0.5);
        assert_eq!(grid.dy(), 0.125);
        assert_eq!(grid.cell_count(), 32);
        assert_eq!(grid.cell_center(0, 0), (0.25, 0.0625));
    }

    #[test]
    fn zero_cells_rejected() {
        let err = Grid::new(0, 4, 1.0, 1.0).unwrap_err();
        assert!(matches!(err, CfError::InvalidDimension { .. }));
        let err = Grid::new(4, 0, 1.0, 1.0).unwrap_err();
        assert!(matches!(err, CfError::InvalidDimension { .. }));
    }

    #[test]
    fn bad_lengths_rejected() {
        assert!(Grid::new(4, 4, 0.0, 1.0).is_err());
        assert!(Grid::new(4, 4, 1.0, -1.0).is_err());
        assert!(Grid::new(4, 4, Real::NAN, 1.0).is_err());
    }

    #[test]
    fn reshaped_field_is_detected() {
        let mut grid = Grid::new(3, 3, 1.0, 1.0).unwrap();
        grid.u = DMatrix::zeros(3, 4);
        let err = grid.check_shapes().unwrap_err();
        assert!(format!("{err}").contains("Shape mismatch for u"));
    }
}
