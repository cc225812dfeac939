//! Pressure-gradient correction of the provisional velocity.

use cf_core::Real;
use cf_core::timing::{Timer, stage_timing};
use nalgebra::DMatrix;

/// Subtract `dt * grad(p)` from every face that separates two cells.
///
/// Wall-normal faces (`i = 0, nx` for u and `j = 0, ny` for v) keep the
/// provisional value.
pub fn project(
    u_star: &DMatrix<Real>,
    v_star: &DMatrix<Real>,
    p: &DMatrix<Real>,
    dx: Real,
    dy: Real,
    dt: Real,
) -> (DMatrix<Real>, DMatrix<Real>) {
    let timer = Timer::start("projection");
    let (nx, ny) = p.shape();
    let mut u = u_star.clone();
    let mut v = v_star.clone();

    let cx = dt / dx;
    for j in 0..ny {
        for i in 1..nx {
            u[(i, j)] = u_star[(i, j)] - cx * (p[(i, j)] - p[(i - 1, j)]);
        }
    }

    let cy = dt / dy;
    for j in 1..ny {
        for i in 0..nx {
            v[(i, j)] = v_star[(i, j)] - cy * (p[(i, j)] - p[(i, j - 1)]);
        }
    }

    timer.stop_into(&stage_timing::PROJECTION);
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_pressure_changes_nothing() {
        let u_star = DMatrix::from_fn(4, 3, |i, j| (i + j) as Real);
        let v_star = DMatrix::from_fn(3, 4, |i, j| (i * j) as Real);
        let p = DMatrix::from_element(3, 3, 7.0);
        let (u, v) = project(&u_star, &v_star, &p, 0.5, 0.5, 0.1);
        assert_eq!(u, u_star);
        assert_eq!(v, v_star);
    }

    #[test]
    fn gradient_applied_on_interior_faces_only() {
        let (nx, ny) = (3, 2);
        let (dx, dy, dt) = (0.5, 0.25, 0.1);
        let u_star = DMatrix::zeros(nx + 1, ny);
        let v_star = DMatrix::zeros(nx, ny + 1);
        // p = x-index + 2 * y-index
        let p = DMatrix::from_fn(nx, ny, |i, j| i as Real + 2.0 * j as Real);

        let (u, v) = project(&u_star, &v_star, &p, dx, dy, dt);

        for j in 0..ny {
            assert_eq!(u[(0, j)], 0.0);
            assert_eq!(u[(nx, j)], 0.0);
            for i in 1..nx {
                assert!((u[(i, j)] + dt / dx).abs() < 1e-12);
            }
        }
        for i in 0..nx {
            assert_eq!(v[(i, 0)], 0.0);
            assert_eq!(v[(i, ny)], 0.0);
            assert!((v[(i, 1)] + 2.0 * dt / dy).abs() < 1e-12);
        }
    }
}
