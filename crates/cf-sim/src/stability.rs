//! Explicit-scheme stability bounds.

use cf_core::Real;
use std::fmt;

/// Largest stable time step for explicit diffusion:
/// `0.25 * min(dx, dy)^2 / nu`.
pub fn diffusion_limit(dx: Real, dy: Real, nu: Real) -> Real {
    let h = dx.min(dy);
    0.25 * h * h / nu
}

/// Advisory raised when `dt` exceeds the diffusion limit. The run goes on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StabilityWarning {
    pub dt: Real,
    pub limit: Real,
}

impl fmt::Display for StabilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dt ({}) is larger than diffusion stability limit ({})",
            self.dt, self.limit
        )
    }
}

pub fn check_diffusion_stability(
    dt: Real,
    dx: Real,
    dy: Real,
    nu: Real,
) -> Option<StabilityWarning> {
    let limit = diffusion_limit(dx, dy, nu);
    (dt > limit).then_some(StabilityWarning { dt, limit })
}
