//! Monodromy, its dual, and monodromy-driven vertex windows.

use nalgebra::Matrix3;

use crate::error::ProjError;
use crate::frame::projective_lift;
use crate::geometry::{canonical, reconstruct};
use crate::linalg::{
    characteristic_polynomial3x3, cross_product3, eigenvalues3x3, invert3x3, Rounding, Spectrum3,
};
use crate::ProjPoint;

/// Number of periods `n` of an invariant list; needs an even length of at least 4.
pub fn check_corners(corners: &[f64]) -> Result<usize, ProjError> {
    if corners.len() < 4 || corners.len() % 2 != 0 {
        return Err(ProjError::MalformedTwistedBigon { len: corners.len() });
    }
    Ok(corners.len() / 2)
}

/// `M` with `M·v_i ∝ v_{i+n}` on the canonical reconstruction.
pub fn monodromy_of(corners: &[f64], cfg: Rounding) -> Result<Matrix3<f64>, ProjError> {
    let n = check_corners(corners)?;
    let v = reconstruct(corners, n + 4)?;
    let first = projective_lift(&v[0], &v[1], &v[2], &v[3], cfg)?;
    let shifted = projective_lift(&v[n], &v[n + 1], &v[n + 2], &v[n + 3], cfg)?;
    let back = invert3x3(&shifted, cfg).map_err(|_| ProjError::NotInGeneralPosition)?;
    Ok(back * first)
}

/// Projective dual: transpose, replace each row by the cross product of the
/// other two, transpose back.
pub fn dual_monodromy(m: &Matrix3<f64>) -> Matrix3<f64> {
    let t = m.transpose();
    let rows: Vec<_> = (0..3).map(|i| t.row(i).transpose()).collect();
    let dual = Matrix3::from_rows(&[
        cross_product3(&rows[1], &rows[2]).transpose(),
        cross_product3(&rows[2], &rows[0]).transpose(),
        cross_product3(&rows[0], &rows[1]).transpose(),
    ]);
    dual.transpose()
}

/// `(Ω1, Ω2) = (tr(M)³/det(M), tr(M*)³/det(M*))`; scale and conjugation invariant.
pub fn invariants_from_monodromy(m: &Matrix3<f64>, dual: &Matrix3<f64>) -> (f64, f64) {
    let omega = |a: &Matrix3<f64>| {
        let [trace, _, det] = characteristic_polynomial3x3(a);
        trace.powi(3) / det
    };
    (omega(m), omega(dual))
}

/// Eigenvalues of `M` rescaled to unit determinant.
pub fn normalized_spectrum(m: &Matrix3<f64>) -> Spectrum3 {
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        return eigenvalues3x3(m);
    }
    eigenvalues3x3(&(m / det.cbrt()))
}

/// Closed-form bigon invariants from the corners (`n = 2` only).
pub fn bigon_omegas(corners: &[f64]) -> Option<(f64, f64)> {
    let [x0, x1, x2, x3] = <[f64; 4]>::try_from(corners).ok()?;
    let o1 = (1.0 - x1 - x3).powi(3) / ((x1 * x3).powi(2) * x0 * x2);
    let o2 = (1.0 - x0 - x2).powi(3) / ((x0 * x2).powi(2) * x1 * x3);
    Some((o1, o2))
}

/// `count` vertices: one period by direct recursion, the rest as `v_i = M·v_{i−n}`.
pub fn window_from_monodromy(
    m: &Matrix3<f64>,
    corners: &[f64],
    count: usize,
) -> Result<Vec<ProjPoint>, ProjError> {
    let n = check_corners(corners)?;
    let mut v = reconstruct(corners, n.max(4).min(count))?;
    for i in v.len()..count {
        let next = canonical(m * v[i - n]);
        v.push(next);
    }
    Ok(v)
}
