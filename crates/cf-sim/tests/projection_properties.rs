//! The projection step removes divergence from any provisional field
//! whose wall-normal faces carry no net flux.

use cf_core::Real;
use cf_sim::{divergence, max_abs_divergence, project};
use cf_solver::PressureSolver;
use nalgebra::DMatrix;
use proptest::prelude::*;

fn provisional_field(
    nx: usize,
    ny: usize,
    values: &[Real],
) -> (DMatrix<Real>, DMatrix<Real>) {
    let mut k = 0;
    let mut next = || {
        let x = values[k % values.len()];
        k += 1;
        x
    };
    let mut u = DMatrix::from_fn(nx + 1, ny, |_, _| next());
    let mut v = DMatrix::from_fn(nx, ny + 1, |_, _| next());
    u.row_mut(0).fill(0.0);
    u.row_mut(nx).fill(0.0);
    v.column_mut(0).fill(0.0);
    v.column_mut(ny).fill(0.0);
    (u, v)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn projected_field_is_divergence_free(
        nx in 2usize..12,
        ny in 2usize..12,
        values in prop::collection::vec(-2.0_f64..2.0, 16..64),
        dt in 0.0005_f64..0.01,
    ) {
        let (dx, dy) = (1.0 / nx as Real, 1.0 / ny as Real);
        let (u_star, v_star) = provisional_field(nx, ny, &values);

        let div = divergence(&u_star, &v_star, dx, dy);
        let mut solver = PressureSolver::new();
        let p = solver.solve(&div, dx, dy, dt).unwrap();
        let (u, v) = project(&u_star, &v_star, &p, dx, dy, dt);

        // Characteristic flux scale of the provisional field
        let scale = cf_core::max_abs(&div).max(1.0);
        let residual = max_abs_divergence(&u, &v, dx, dy);
        prop_assert!(residual < 1e-8 * scale, "residual {} (scale {})", residual, scale);
    }
}

#[test]
fn lid_corner_faces_cancel_in_total_flux() {
    // With the lid written onto both side-wall corner faces, the net wall
    // flux is still zero and projection still closes every cell.
    let (nx, ny, dt) = (6, 5, 0.001);
    let (dx, dy) = (1.0 / nx as Real, 1.0 / ny as Real);
    let (mut u_star, mut v_star) = provisional_field(nx, ny, &[0.3, -0.1, 0.7, 0.2, -0.5]);
    cf_sim::apply_boundary_conditions(&mut u_star, &mut v_star, 1.0);

    let div = divergence(&u_star, &v_star, dx, dy);
    let p = PressureSolver::new().solve(&div, dx, dy, dt).unwrap();
    let (u, v) = project(&u_star, &v_star, &p, dx, dy, dt);

    assert!(max_abs_divergence(&u, &v, dx, dy) < 1e-8 * cf_core::max_abs(&div).max(1.0));
}
