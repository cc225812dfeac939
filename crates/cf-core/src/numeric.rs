use crate::CfError;
use nalgebra::DMatrix;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CfError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CfError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CfError::NotPositive { what, value: v })
    }
}

/// Largest absolute entry, 0 for an empty matrix.
pub fn max_abs(m: &DMatrix<Real>) -> Real {
    m.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}
