//! Cached sparse direct pressure solver.

use crate::error::{SolverError, SolverResult};
use crate::poisson::PoissonSystem;
use cf_core::timing::{Timer, stage_timing};
use cf_core::{Real, flatten_cells, unflatten_cells};
use nalgebra::DMatrix;
use nalgebra_sparse::factorization::CscCholesky;

/// Geometry a factorization was built for.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SystemKey {
    nx: usize,
    ny: usize,
    dx: Real,
    dy: Real,
}

struct CachedFactorization {
    key: SystemKey,
    system: PoissonSystem,
    factor: CscCholesky<Real>,
}

/// Pressure-Poisson solver owning its assembled system and factorization.
///
/// The factorization is built on the first solve and reused until the
/// grid shape or spacing changes. One solver belongs to one run; it is
/// never shared mutably between runs.
#[derive(Default)]
pub struct PressureSolver {
    cache: Option<CachedFactorization>,
    factorizations: usize,
}

impl PressureSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the Poisson system has been assembled and factorized.
    pub fn factorization_count(&self) -> usize {
        self.factorizations
    }

    /// Cached system, if any solve has happened yet.
    pub fn system(&self) -> Option<&PoissonSystem> {
        self.cache.as_ref().map(|c| &c.system)
    }

    /// Drop the cached factorization; the next solve rebuilds it.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Solve `A p = div / dt` (with `rhs[0] = 0`) for the cell pressures.
    pub fn solve(
        &mut self,
        divergence: &DMatrix<Real>,
        dx: Real,
        dy: Real,
        dt: Real,
    ) -> SolverResult<DMatrix<Real>> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SolverError::InvalidArg {
                what: format!("dt must be positive, got {dt}"),
            });
        }

        let (nx, ny) = divergence.shape();
        let key = SystemKey { nx, ny, dx, dy };
        let factor = self.factorization_for(key)?;

        let mut rhs = flatten_cells(divergence) / dt;
        rhs[0] = 0.0;

        let timer = Timer::start("pressure solve");
        // SPD form is the negated system, see PoissonSystem::spd_operator
        let b = DMatrix::from_column_slice(rhs.len(), 1, (-rhs).as_slice());
        let solution = factor.solve(&b);
        timer.stop_into(&stage_timing::PRESSURE_SOLVE);

        if solution.nrows() != nx * ny || solution.iter().any(|x| !x.is_finite()) {
            return Err(SolverError::linear_solve(format!(
                "pressure solution for {nx}x{ny} grid is not finite"
            )));
        }

        Ok(unflatten_cells(&solution.column(0).into_owned(), nx, ny))
    }

    fn factorization_for(&mut self, key: SystemKey) -> SolverResult<&CscCholesky<Real>> {
        let stale = self.cache.as_ref().is_none_or(|c| c.key != key);
        if stale {
            self.cache = None;
            let timer = Timer::start("factorization");
            let system = PoissonSystem::assemble(key.nx, key.ny, key.dx, key.dy)?;
            let factor = CscCholesky::factor(&system.spd_operator()).map_err(|e| {
                SolverError::linear_solve(format!(
                    "factorization of {}x{} Poisson system failed: {e:?}",
                    key.nx, key.ny
                ))
            })?;
            timer.stop_into(&stage_timing::FACTORIZATION);

            self.factorizations += 1;
            tracing::debug!(
                nx = key.nx,
                ny = key.ny,
                nnz = system.matrix().nnz(),
                count = self.factorizations,
                "factorized pressure system"
            );
            self.cache = Some(CachedFactorization {
                key,
                system,
                factor,
            });
        }

        self.cache
            .as_ref()
            .map(|c| &c.factor)
            .ok_or_else(|| SolverError::linear_solve("pressure factorization missing"))
    }
}
