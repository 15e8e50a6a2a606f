//! Degeneracy and shape predicates on cyclic vertex lists.

use nalgebra::Vector2;

use super::incidence::{affine, collinear, same_point};
use crate::linalg::Rounding;
use crate::ProjPoint;

/// All vertices represent the same projective point.
pub fn is_point(vertices: &[ProjPoint], cfg: Rounding) -> bool {
    match vertices.split_first() {
        Some((first, rest)) => rest.iter().all(|v| same_point(first, v, cfg)),
        None => true,
    }
}

/// All vertices lie on one line (a single point counts as collinear).
pub fn is_linear(vertices: &[ProjPoint], cfg: Rounding) -> bool {
    let Some(first) = vertices.first() else {
        return true;
    };
    let Some(second) = vertices.iter().find(|v| !same_point(first, v, cfg)) else {
        return true;
    };
    vertices.iter().all(|v| collinear(first, second, v, cfg))
}

#[inline]
fn orient(a: &Vector2<f64>, b: &Vector2<f64>, c: &Vector2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn sign(x: f64, cfg: Rounding) -> i8 {
    if cfg.is_zero(x) {
        0
    } else if x > 0.0 {
        1
    } else {
        -1
    }
}

fn on_segment(a: &Vector2<f64>, b: &Vector2<f64>, p: &Vector2<f64>) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed segments `ab` and `cd` share a point.
fn segments_meet(a: &Vector2<f64>, b: &Vector2<f64>, c: &Vector2<f64>, d: &Vector2<f64>, cfg: Rounding) -> bool {
    let o1 = sign(orient(a, b, c), cfg);
    let o2 = sign(orient(a, b, d), cfg);
    let o3 = sign(orient(c, d, a), cfg);
    let o4 = sign(orient(c, d, b), cfg);
    if o1 * o2 < 0 && o3 * o4 < 0 {
        return true;
    }
    (o1 == 0 && on_segment(a, b, c))
        || (o2 == 0 && on_segment(a, b, d))
        || (o3 == 0 && on_segment(c, d, a))
        || (o4 == 0 && on_segment(c, d, b))
}

fn affine_vertices(vertices: &[ProjPoint], cfg: Rounding) -> Option<Vec<Vector2<f64>>> {
    vertices.iter().map(|v| affine(v, cfg).ok()).collect()
}

/// No two non-adjacent edges meet and no edge is degenerate.
///
/// A vertex at infinity makes the polygon non-embedded.
pub fn is_embedded(vertices: &[ProjPoint], cfg: Rounding) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let Some(p) = affine_vertices(vertices, cfg) else {
        return false;
    };
    for i in 0..n {
        if cfg.is_zero((p[(i + 1) % n] - p[i]).norm()) {
            return false;
        }
    }
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_meet(&p[i], &p[(i + 1) % n], &p[j], &p[(j + 1) % n], cfg) {
                return false;
            }
        }
    }
    true
}

/// Embedded, with every turn strictly in the same direction.
pub fn is_convex(vertices: &[ProjPoint], cfg: Rounding) -> bool {
    let n = vertices.len();
    let Some(p) = affine_vertices(vertices, cfg) else {
        return false;
    };
    let mut turn = 0i8;
    for i in 0..n {
        let s = sign(orient(&p[i], &p[(i + 1) % n], &p[(i + 2) % n]), cfg);
        if s == 0 || (turn != 0 && s != turn) {
            return false;
        }
        turn = s;
    }
    is_embedded(vertices, cfg)
}

/// Every chord `v_i v_{i+l}` strictly separates the `l−1` vertices it spans
/// from the remaining `n−l−1` vertices. Needs `2 ≤ l` and `2l < n`.
pub fn is_bird(vertices: &[ProjPoint], l: usize, cfg: Rounding) -> bool {
    let n = vertices.len();
    if l < 2 || 2 * l >= n {
        return false;
    }
    let Some(p) = affine_vertices(vertices, cfg) else {
        return false;
    };
    for i in 0..n {
        let (a, b) = (&p[i], &p[(i + l) % n]);
        let inner = sign(orient(a, b, &p[(i + 1) % n]), cfg);
        if inner == 0 {
            return false;
        }
        for t in 1..n {
            if t == l {
                continue;
            }
            let s = sign(orient(a, b, &p[(i + t) % n]), cfg);
            let want = if t < l { inner } else { -inner };
            if s != want {
                return false;
            }
        }
    }
    true
}
