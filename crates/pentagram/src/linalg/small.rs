//! Closed-form kernels for 2×2 and 3×3 matrices.

use nalgebra::{Matrix2, Matrix3, Vector3};

use super::Rounding;
use crate::error::ProjError;

#[inline]
pub fn determinant2x2(m: &Matrix2<f64>) -> f64 {
    m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]
}

#[inline]
pub fn determinant3x3(m: &Matrix3<f64>) -> f64 {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
}

#[inline]
pub fn cross_product3(u: &Vector3<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(
        u.y * v.z - u.z * v.y,
        u.z * v.x - u.x * v.z,
        u.x * v.y - u.y * v.x,
    )
}

/// Cofactor matrix: row `i` is the cross product of rows `i+1` and `i+2`.
pub fn cofactor3x3(m: &Matrix3<f64>) -> Matrix3<f64> {
    let r0: Vector3<f64> = m.row(0).transpose();
    let r1: Vector3<f64> = m.row(1).transpose();
    let r2: Vector3<f64> = m.row(2).transpose();
    Matrix3::from_rows(&[
        cross_product3(&r1, &r2).transpose(),
        cross_product3(&r2, &r0).transpose(),
        cross_product3(&r0, &r1).transpose(),
    ])
}

pub fn invert2x2(m: &Matrix2<f64>, cfg: Rounding) -> Result<Matrix2<f64>, ProjError> {
    let det = determinant2x2(m);
    if cfg.is_zero(det) {
        return Err(ProjError::SingularMatrix { det });
    }
    Ok(Matrix2::new(
        m[(1, 1)] / det,
        -m[(0, 1)] / det,
        -m[(1, 0)] / det,
        m[(0, 0)] / det,
    ))
}

/// Inverse through the adjugate (transposed cofactor matrix).
pub fn invert3x3(m: &Matrix3<f64>, cfg: Rounding) -> Result<Matrix3<f64>, ProjError> {
    let det = determinant3x3(m);
    if cfg.is_zero(det) {
        return Err(ProjError::SingularMatrix { det });
    }
    Ok(cofactor3x3(m).transpose() / det)
}

/// Euclidean distance between two equally long coordinate lists.
pub fn l2_distance(a: &[f64], b: &[f64]) -> Result<f64, ProjError> {
    if a.len() != b.len() {
        return Err(ProjError::Dimension {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt())
}
