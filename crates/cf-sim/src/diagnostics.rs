//! Scalar run diagnostics.

use cf_core::Real;
use nalgebra::DMatrix;

/// Mean kinetic energy `0.5 * (u^2 + v^2)` over cell centers, with the
/// face velocities averaged onto each center.
pub fn kinetic_energy(u: &DMatrix<Real>, v: &DMatrix<Real>) -> Real {
    let nx = u.nrows() - 1;
    let ny = u.ncols();
    if nx == 0 || ny == 0 {
        return 0.0;
    }

    let mut sum = 0.0;
    for j in 0..ny {
        for i in 0..nx {
            let uc = 0.5 * (u[(i, j)] + u[(i + 1, j)]);
            let vc = 0.5 * (v[(i, j)] + v[(i, j + 1)]);
            sum += uc * uc + vc * vc;
        }
    }
    0.5 * sum / (nx * ny) as Real
}

/// Advective Courant number `dt * (max|u|/dx + max|v|/dy)`.
pub fn advective_courant(
    u: &DMatrix<Real>,
    v: &DMatrix<Real>,
    dx: Real,
    dy: Real,
    dt: Real,
) -> Real {
    dt * (cf_core::max_abs(u) / dx + cf_core::max_abs(v) / dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_has_no_energy() {
        assert_eq!(kinetic_energy(&DMatrix::zeros(5, 4), &DMatrix::zeros(4, 5)), 0.0);
    }

    #[test]
    fn uniform_flow_energy() {
        let u = DMatrix::from_element(5, 4, 3.0);
        let v = DMatrix::from_element(4, 5, 4.0);
        assert!((kinetic_energy(&u, &v) - 12.5).abs() < 1e-12);
    }

    #[test]
    fn courant_from_peak_speeds() {
        let mut u = DMatrix::zeros(3, 2);
        let mut v = DMatrix::zeros(2, 3);
        u[(1, 1)] = -2.0;
        v[(0, 2)] = 1.0;
        let c = advective_courant(&u, &v, 0.5, 0.25, 0.01);
        assert!((c - 0.08).abs() < 1e-12);
    }
}
