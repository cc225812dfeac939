//! Explicit advection-diffusion update for the provisional velocity.
//!
//! Forward Euler in time, second-order central differences in space.
//! Each interior face depends only on the previous field, so columns are
//! updated in parallel into freshly allocated outputs; the result is the
//! same as a serial sweep.

use cf_core::Real;
use cf_core::timing::{Timer, stage_timing};
use nalgebra::DMatrix;
use rayon::prelude::*;

/// Advance `(u, v)` by one explicit step of advection and diffusion.
///
/// Interior u-faces are `1 <= i <= nx-1`, `1 <= j <= ny-2`; interior
/// v-faces are `1 <= i <= nx-2`, `1 <= j <= ny-1`. Every other face is
/// copied through unchanged for the boundary pass to fix up.
pub fn advect_diffuse(
    u: &DMatrix<Real>,
    v: &DMatrix<Real>,
    dx: Real,
    dy: Real,
    dt: Real,
    nu: Real,
) -> (DMatrix<Real>, DMatrix<Real>) {
    let timer = Timer::start("advection");
    let nx = u.nrows() - 1;
    let ny = u.ncols();
    let coeffs = Coeffs { dx, dy, dt, nu };

    let mut u_star = u.clone();
    let mut v_star = v.clone();

    // Column-major storage: one chunk per j
    let u_rows = u.nrows();
    u_star
        .as_mut_slice()
        .par_chunks_mut(u_rows)
        .enumerate()
        .filter(|(j, _)| *j >= 1 && *j + 1 < ny)
        .for_each(|(j, column)| {
            for (i, value) in column.iter_mut().enumerate().take(nx).skip(1) {
                *value = coeffs.u_face(u, v, i, j);
            }
        });

    let v_rows = v.nrows();
    v_star
        .as_mut_slice()
        .par_chunks_mut(v_rows)
        .enumerate()
        .filter(|(j, _)| *j >= 1 && *j < ny)
        .for_each(|(j, column)| {
            for (i, value) in column.iter_mut().enumerate().take(nx.saturating_sub(1)).skip(1) {
                *value = coeffs.v_face(u, v, i, j);
            }
        });

    timer.stop_into(&stage_timing::ADVECTION);
    (u_star, v_star)
}

#[derive(Clone, Copy)]
struct Coeffs {
    dx: Real,
    dy: Real,
    dt: Real,
    nu: Real,
}

impl Coeffs {
    fn u_face(&self, u: &DMatrix<Real>, v: &DMatrix<Real>, i: usize, j: usize) -> Real {
        let uc = u[(i, j)];
        // v interpolated to the u-face from its four surrounding v-faces
        let vc = 0.25 * (v[(i - 1, j)] + v[(i, j)] + v[(i - 1, j + 1)] + v[(i, j + 1)]);

        let du_dx = (u[(i + 1, j)] - u[(i - 1, j)]) / (2.0 * self.dx);
        let du_dy = (u[(i, j + 1)] - u[(i, j - 1)]) / (2.0 * self.dy);
        let d2u_dx2 = (u[(i + 1, j)] - 2.0 * uc + u[(i - 1, j)]) / (self.dx * self.dx);
        let d2u_dy2 = (u[(i, j + 1)] - 2.0 * uc + u[(i, j - 1)]) / (self.dy * self.dy);

        let advection = -(uc * du_dx + vc * du_dy);
        let diffusion = self.nu * (d2u_dx2 + d2u_dy2);
        uc + self.dt * (advection + diffusion)
    }

    fn v_face(&self, u: &DMatrix<Real>, v: &DMatrix<Real>, i: usize, j: usize) -> Real {
        let vc = v[(i, j)];
        let uc = 0.25 * (u[(i, j - 1)] + u[(i + 1, j - 1)] + u[(i, j)] + u[(i + 1, j)]);

        let dv_dx = (v[(i + 1, j)] - v[(i - 1, j)]) / (2.0 * self.dx);
        let dv_dy = (v[(i, j + 1)] - v[(i, j - 1)]) / (2.0 * self.dy);
        let d2v_dx2 = (v[(i + 1, j)] - 2.0 * vc + v[(i - 1, j)]) / (self.dx * self.dx);
        let d2v_dy2 = (v[(i, j + 1)] - 2.0 * vc + v[(i, j - 1)]) / (self.dy * self.dy);

        let advection = -(uc * dv_dx + vc * dv_dy);
        let diffusion = self.nu * (d2v_dx2 + d2v_dy2);
        vc + self.dt * (advection + diffusion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_flow_is_steady() {
        // No gradients: neither advection nor diffusion changes anything
        let u = DMatrix::from_element(6, 5, 0.7);
        let v = DMatrix::from_element(5, 6, -0.3);
        let (u_star, v_star) = advect_diffuse(&u, &v, 0.2, 0.2, 0.01, 0.01);
        assert_eq!(u_star, u);
        assert_eq!(v_star, v);
    }

    #[test]
    fn edges_are_left_alone() {
        let (nx, ny) = (5, 5);
        let u = DMatrix::from_fn(nx + 1, ny, |i, j| (i * j) as Real * 0.1);
        let v = DMatrix::from_fn(nx, ny + 1, |i, j| (i + j) as Real * 0.05);
        let (u_star, v_star) = advect_diffuse(&u, &v, 0.2, 0.2, 0.01, 0.05);

        for j in 0..ny {
            assert_eq!(u_star[(0, j)], u[(0, j)]);
            assert_eq!(u_star[(nx, j)], u[(nx, j)]);
        }
        for i in 0..=nx {
            assert_eq!(u_star[(i, 0)], u[(i, 0)]);
            assert_eq!(u_star[(i, ny - 1)], u[(i, ny - 1)]);
        }
        for j in 0..=ny {
            assert_eq!(v_star[(0, j)], v[(0, j)]);
            assert_eq!(v_star[(nx - 1, j)], v[(nx - 1, j)]);
        }
        for i in 0..nx {
            assert_eq!(v_star[(i, 0)], v[(i, 0)]);
            assert_eq!(v_star[(i, ny)], v[(i, ny)]);
        }
    }

    #[test]
    fn pure_diffusion_of_a_spike() {
        // Single u spike, zero v: the spike decays and spreads to its 4 neighbors
        let (nx, ny) = (4, 5);
        let (dx, dy, dt, nu) = (0.25, 0.2, 0.001, 0.1);
        let mut u = DMatrix::zeros(nx + 1, ny);
        u[(2, 2)] = 1.0;
        let v = DMatrix::zeros(nx, ny + 1);

        let (u_star, _) = advect_diffuse(&u, &v, dx, dy, dt, nu);

        let expected_center = 1.0 + dt * nu * (-2.0 / (dx * dx) - 2.0 / (dy * dy));
        assert!((u_star[(2, 2)] - expected_center).abs() < 1e-12);

        // Advection of a spike by itself: -u du/dx is zero at the spike
        // and zero at the neighbors (u = 0 there), leaving only diffusion
        let east = dt * nu / (dx * dx);
        let north = dt * nu / (dy * dy);
        assert!((u_star[(3, 2)] - east).abs() < 1e-12);
        assert!((u_star[(1, 2)] - east).abs() < 1e-12);
        assert!((u_star[(2, 3)] - north).abs() < 1e-12);
        assert!((u_star[(2, 1)] - north).abs() < 1e-12);
    }

    #[test]
    fn v_interpolates_u_from_four_faces() {
        // Linear v in x is advected by the averaged u: dv/dt = -u_avg * dv/dx
        let (nx, ny) = (5, 4);
        let (dx, dy, dt) = (0.2, 0.25, 0.01);
        let u = DMatrix::from_element(nx + 1, ny, 2.0);
        let v = DMatrix::from_fn(nx, ny + 1, |i, _| i as Real);
        let (_, v_star) = advect_diffuse(&u, &v, dx, dy, dt, 0.0);

        let dv_dx = 1.0 / dx;
        for i in 1..nx - 1 {
            for j in 1..ny {
                let expected = i as Real - dt * 2.0 * dv_dx;
                assert!((v_star[(i, j)] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn tiny_grids_do_not_panic() {
        let u = DMatrix::zeros(2, 1);
        let v = DMatrix::zeros(1, 2);
        let (u_star, v_star) = advect_diffuse(&u, &v, 1.0, 1.0, 0.1, 0.1);
        assert_eq!(u_star.shape(), (2, 1));
        assert_eq!(v_star.shape(), (1, 2));
    }
}
