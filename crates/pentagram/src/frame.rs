//! Projective frames: the transform sending four points in general position
//! onto the canonical frame, and compositions of such transforms.
//!
//! Model
//! - `projective_lift(p0..p3)` is the unique (up to scale) `T` with `T·p_i ∝ e_i`
//!   for `i = 0,1,2` and `T·p3 ∝ (1,1,1)`.
//! - `frame_transform(src, tgt) = lift(tgt)⁻¹ · lift(src)` carries `src[i]` onto `tgt[i]`.
//! - `four_to_four` solves the same problem as a 12×13 homogeneous linear system
//!   through `solve_rref`; it is slower and serves as a cross-check.
//!
//! Inputs are rescaled to unit length before any determinant is tested, so the
//! zero test is independent of the homogeneous scale callers happen to use.

use nalgebra::{DMatrix, Matrix3};

use crate::error::ProjError;
use crate::linalg::{invert3x3, solve_rref, Rounding};
use crate::ProjPoint;

fn unit(p: &ProjPoint) -> Result<ProjPoint, ProjError> {
    let n = p.norm();
    if n == 0.0 || !n.is_finite() {
        return Err(ProjError::NotInGeneralPosition);
    }
    Ok(p / n)
}

/// Transform sending `p0, p1, p2` to multiples of the basis vectors and `p3` to a multiple of (1,1,1).
pub fn projective_lift(
    p0: &ProjPoint,
    p1: &ProjPoint,
    p2: &ProjPoint,
    p3: &ProjPoint,
    cfg: Rounding,
) -> Result<Matrix3<f64>, ProjError> {
    let c = Matrix3::from_columns(&[unit(p0)?, unit(p1)?, unit(p2)?]);
    let c_inv = invert3x3(&c, cfg).map_err(|_| ProjError::NotInGeneralPosition)?;
    let lambda = c_inv * unit(p3)?;
    if lambda.iter().any(|&x| cfg.is_zero(x)) {
        return Err(ProjError::NotInGeneralPosition);
    }
    Ok(Matrix3::from_diagonal(&lambda.map(|x| 1.0 / x)) * c_inv)
}

/// `projective_lift` on a slice of four points.
pub fn lift4(points: &[ProjPoint; 4], cfg: Rounding) -> Result<Matrix3<f64>, ProjError> {
    projective_lift(&points[0], &points[1], &points[2], &points[3], cfg)
}

/// Transform carrying `source[i]` onto `target[i]` for all four indices.
pub fn frame_transform(
    source: &[ProjPoint; 4],
    target: &[ProjPoint; 4],
    cfg: Rounding,
) -> Result<Matrix3<f64>, ProjError> {
    let from = lift4(source, cfg)?;
    let to = lift4(target, cfg)?;
    let to_inv = invert3x3(&to, cfg).map_err(|_| ProjError::NotInGeneralPosition)?;
    Ok(to_inv * from)
}

/// Apply `t` and return the affine representative `(x/w, y/w, 1)`, rounded.
pub fn apply_affine(t: &Matrix3<f64>, p: &ProjPoint, cfg: Rounding) -> Result<ProjPoint, ProjError> {
    let q = t * p;
    if cfg.is_zero(q.z) {
        return Err(ProjError::AtInfinity { index: None });
    }
    Ok(ProjPoint::new(cfg.round(q.x / q.z), cfg.round(q.y / q.z), 1.0))
}

/// Four-point-to-four-point transform from the linear system
/// `T·s_i = λ_i t_i`, unknowns the nine entries of `T` and `λ_0..λ_3`, with `λ_3 = 1`.
pub fn four_to_four(
    source: &[ProjPoint; 4],
    target: &[ProjPoint; 4],
    cfg: Rounding,
) -> Result<Matrix3<f64>, ProjError> {
    let mut a = DMatrix::<f64>::zeros(12, 13);
    for (i, (s, t)) in source.iter().zip(target).enumerate() {
        let s = unit(s)?;
        let t = unit(t)?;
        for row in 0..3 {
            let eq = 3 * i + row;
            for col in 0..3 {
                a[(eq, 3 * row + col)] = s[col];
            }
            a[(eq, 9 + i)] = -t[row];
        }
    }
    let r = solve_rref(&a, cfg);
    // Full rank puts the pivots on the diagonal of the leading 12×12 block.
    for i in 0..12 {
        if r[(i, i)] != 1.0 {
            return Err(ProjError::NotInGeneralPosition);
        }
    }
    let t = Matrix3::from_fn(|i, j| -r[(3 * i + j, 12)]);
    if cfg.is_zero(t.amax()) {
        return Err(ProjError::NotInGeneralPosition);
    }
    Ok(t)
}
