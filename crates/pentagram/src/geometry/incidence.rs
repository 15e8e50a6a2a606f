//! Lines, intersections and cross ratios.

use nalgebra::{Matrix3, Vector2, Vector3};

use crate::error::ProjError;
use crate::linalg::Rounding;
use crate::ProjPoint;

/// `|w| / |p|` below this counts as a point at infinity when canonicalizing.
const AFFINE_EPS: f64 = 1e-12;

#[inline]
pub fn line_through(a: &ProjPoint, b: &ProjPoint) -> Vector3<f64> {
    a.cross(b)
}

/// Canonical representative: `(x/w, y/w, 1)` when affine, unit length otherwise.
pub fn canonical(p: ProjPoint) -> ProjPoint {
    let n = p.norm();
    if n == 0.0 || !n.is_finite() {
        return p;
    }
    if p.z.abs() > AFFINE_EPS * n {
        p / p.z
    } else {
        p / n
    }
}

/// `line(p1, p2) ∩ line(p3, p4)` in canonical form.
#[inline]
pub fn intersection(p1: &ProjPoint, p2: &ProjPoint, p3: &ProjPoint, p4: &ProjPoint) -> ProjPoint {
    canonical(line_through(p1, p2).cross(&line_through(p3, p4)))
}

pub fn is_at_infinity(p: &ProjPoint, cfg: Rounding) -> bool {
    let n = p.norm();
    n == 0.0 || cfg.is_zero(p.z / n)
}

/// Affine coordinates of `p`.
pub fn affine(p: &ProjPoint, cfg: Rounding) -> Result<Vector2<f64>, ProjError> {
    if is_at_infinity(p, cfg) {
        return Err(ProjError::AtInfinity { index: None });
    }
    Ok(Vector2::new(p.x / p.z, p.y / p.z))
}

/// Equality up to nonzero scale.
pub fn same_point(a: &ProjPoint, b: &ProjPoint, cfg: Rounding) -> bool {
    let (na, nb) = (a.norm(), b.norm());
    if na == 0.0 || nb == 0.0 {
        return na == nb;
    }
    cfg.is_zero((a / na).cross(&(b / nb)).norm())
}

pub fn collinear(a: &ProjPoint, b: &ProjPoint, c: &ProjPoint, cfg: Rounding) -> bool {
    let m = Matrix3::from_columns(&[a.normalize(), b.normalize(), c.normalize()]);
    cfg.is_zero(m.determinant())
}

/// The line carrying four collinear points, taken from the best separated pair.
fn carrier(points: [&ProjPoint; 4]) -> Vector3<f64> {
    let units = points.map(|p| p.normalize());
    let mut best = Vector3::zeros();
    for i in 0..4 {
        for j in (i + 1)..4 {
            let l = units[i].cross(&units[j]);
            if l.norm() > best.norm() {
                best = l;
            }
        }
    }
    best
}

/// `det(ℓ, p, q)`: a signed coordinate difference along the line ℓ.
#[inline]
fn bracket(l: &Vector3<f64>, p: &ProjPoint, q: &ProjPoint) -> f64 {
    l.dot(&p.cross(q))
}

/// `χ(a,b,c,d) = (a−b)(c−d) / ((a−c)(b−d))` for four collinear points.
///
/// Independent of the homogeneous scale of each argument; points at infinity
/// are handled like any other point of the line.
pub fn inverse_cross_ratio(a: &ProjPoint, b: &ProjPoint, c: &ProjPoint, d: &ProjPoint) -> f64 {
    let l = carrier([a, b, c, d]);
    let (a, b, c, d) = (a.normalize(), b.normalize(), c.normalize(), d.normalize());
    bracket(&l, &a, &b) * bracket(&l, &c, &d) / (bracket(&l, &a, &c) * bracket(&l, &b, &d))
}

/// The point `d` on the line `ab` with `χ(a, b, c, d) = x`; `c` must lie on that line.
pub fn point_with_cross_ratio(a: &ProjPoint, b: &ProjPoint, c: &ProjPoint, x: f64) -> ProjPoint {
    let (a, b, c) = (a.normalize(), b.normalize(), c.normalize());
    let l = a.cross(&b);
    let cb = bracket(&l, &c, &b);
    let ca = bracket(&l, &c, &a);
    canonical(a * cb + b * ((x - 1.0) * ca))
}

/// χ of four directions through a common point, from their 2D determinants.
pub fn line_cross_ratio(u1: &Vector2<f64>, u2: &Vector2<f64>, u3: &Vector2<f64>, u4: &Vector2<f64>) -> f64 {
    let det = |p: &Vector2<f64>, q: &Vector2<f64>| p.x * q.y - p.y * q.x;
    det(u1, u2) * det(u3, u4) / (det(u1, u3) * det(u2, u4))
}
