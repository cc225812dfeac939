//! Cell `(i, j)` <-> linear system row mapping.
//!
//! Every conversion between a cell-centered field and a vector of
//! unknowns goes through [`cell_index`], so assembly, right-hand-side
//! flattening and solution unflattening always agree.

use crate::numeric::Real;
use nalgebra::{DMatrix, DVector};

/// Row of cell `(i, j)` on a grid with `ny` cells per column.
#[inline]
pub fn cell_index(i: usize, j: usize, ny: usize) -> usize {
    i * ny + j
}

/// Inverse of [`cell_index`].
#[inline]
pub fn cell_coords(row: usize, ny: usize) -> (usize, usize) {
    (row / ny, row % ny)
}

/// Flatten an `nx x ny` cell field into a vector of unknowns.
pub fn flatten_cells(field: &DMatrix<Real>) -> DVector<Real> {
    let (nx, ny) = field.shape();
    let mut out = DVector::zeros(nx * ny);
    for i in 0..nx {
        for j in 0..ny {
            out[cell_index(i, j, ny)] = field[(i, j)];
        }
    }
    out
}

/// Reshape a vector of unknowns back into an `nx x ny` cell field.
pub fn unflatten_cells(values: &DVector<Real>, nx: usize, ny: usize) -> DMatrix<Real> {
    debug_assert_eq!(values.len(), nx * ny);
    DMatrix::from_fn(nx, ny, |i, j| values[cell_index(i, j, ny)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_in_i() {
        assert_eq!(cell_index(0, 0, 5), 0);
        assert_eq!(cell_index(0, 4, 5), 4);
        assert_eq!(cell_index(1, 0, 5), 5);
        assert_eq!(cell_index(3, 2, 5), 17);
    }

    #[test]
    fn flatten_places_values_by_cell_index() {
        let field = DMatrix::from_fn(3, 2, |i, j| (10 * i + j) as Real);
        let flat = flatten_cells(&field);
        assert_eq!(flat.len(), 6);
        assert_eq!(flat[cell_index(2, 1, 2)], 21.0);
        assert_eq!(flat[cell_index(1, 0, 2)], 10.0);
        assert_eq!(unflatten_cells(&flat, 3, 2), field);
    }
}
