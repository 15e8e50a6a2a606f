//! Dynamically sized products and Gauss–Jordan reduction.

use nalgebra::DMatrix;

use super::Rounding;
use crate::error::ProjError;

/// `A · B`, rejecting shapes whose inner dimensions differ.
pub fn multiply(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>, ProjError> {
    if a.ncols() != b.nrows() {
        return Err(ProjError::Dimension {
            expected: a.ncols(),
            found: b.nrows(),
        });
    }
    Ok(a * b)
}

/// Reduced row-echelon form of a copy of `a`.
///
/// The pivot is the first entry in the lead column (scanning down from the
/// current row) that does not round to zero. When the lead column runs past
/// the last column the partially reduced matrix is returned unchanged.
/// Reducing an already reduced matrix is a no-op.
pub fn solve_rref(a: &DMatrix<f64>, cfg: Rounding) -> DMatrix<f64> {
    let mut m = a.clone();
    let (rows, cols) = m.shape();
    let mut lead = 0;
    for r in 0..rows {
        if lead >= cols {
            break;
        }
        let mut i = r;
        while cfg.is_zero(m[(i, lead)]) {
            i += 1;
            if i == rows {
                i = r;
                lead += 1;
                if lead == cols {
                    return m;
                }
            }
        }
        m.swap_rows(i, r);
        let pivot = m[(r, lead)];
        for j in 0..cols {
            m[(r, j)] /= pivot;
        }
        for i in 0..rows {
            if i == r {
                continue;
            }
            let val = m[(i, lead)];
            if val == 0.0 {
                continue;
            }
            for j in 0..cols {
                let rv = m[(r, j)];
                m[(i, j)] -= val * rv;
            }
        }
        lead += 1;
    }
    m
}
