//! Lid-driven cavity wall conditions.

use cf_core::Real;
use nalgebra::DMatrix;

/// Enforce the cavity wall conditions on `u` (`(nx+1) x ny`) and `v`
/// (`nx x (ny+1)`) in place.
///
/// Walls are impermeable, the bottom row of `u` and the outer columns of
/// `v` are held at rest, and the top row of `u` moves with the lid. The lid
/// row is written after the side walls, so `u[0, ny-1]` and `u[nx, ny-1]`
/// carry the lid velocity.
pub fn apply_boundary_conditions(u: &mut DMatrix<Real>, v: &mut DMatrix<Real>, lid_velocity: Real) {
    let nx = u.nrows() - 1;
    let ny = v.ncols() - 1;

    // Left and right walls
    u.row_mut(0).fill(0.0);
    u.row_mut(nx).fill(0.0);

    // Bottom wall
    v.column_mut(0).fill(0.0);
    u.column_mut(0).fill(0.0);

    // Moving lid
    v.column_mut(ny).fill(0.0);
    u.column_mut(ny - 1).fill(lid_velocity);

    // Side-wall no-slip on the outer v columns
    v.row_mut(0).fill(0.0);
    v.row_mut(nx - 1).fill(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(nx: usize, ny: usize, value: Real) -> (DMatrix<Real>, DMatrix<Real>) {
        (
            DMatrix::from_element(nx + 1, ny, value),
            DMatrix::from_element(nx, ny + 1, value),
        )
    }

    #[test]
    fn walls_and_lid() {
        let (nx, ny) = (4, 5);
        let (mut u, mut v) = filled(nx, ny, 3.0);
        apply_boundary_conditions(&mut u, &mut v, 1.5);

        for j in 0..ny - 1 {
            assert_eq!(u[(0, j)], 0.0);
            assert_eq!(u[(nx, j)], 0.0);
        }
        for i in 0..=nx {
            assert_eq!(u[(i, 0)], 0.0);
            assert_eq!(u[(i, ny - 1)], 1.5);
        }
        for i in 0..nx {
            assert_eq!(v[(i, 0)], 0.0);
            assert_eq!(v[(i, ny)], 0.0);
        }
        for j in 0..=ny {
            assert_eq!(v[(0, j)], 0.0);
            assert_eq!(v[(nx - 1, j)], 0.0);
        }
    }

    #[test]
    fn interior_points_untouched() {
        let (mut u, mut v) = filled(5, 5, 2.0);
        apply_boundary_conditions(&mut u, &mut v, 1.0);
        assert_eq!(u[(2, 2)], 2.0);
        assert_eq!(v[(2, 2)], 2.0);
        assert_eq!(v[(1, 1)], 2.0);
    }
}
