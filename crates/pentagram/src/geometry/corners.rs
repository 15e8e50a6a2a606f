//! Corner invariants and vertex reconstruction.
//!
//! At vertex `j`, with
//! `A = (v_{j−2}v_{j−1}) ∩ (v_j v_{j+1})`,
//! `B = (v_{j−2}v_{j−1}) ∩ (v_{j+1}v_{j+2})`,
//! `C = (v_{j−1}v_j) ∩ (v_{j+1}v_{j+2})`:
//!
//! - `x_{2j}   = χ(v_{j−2}, v_{j−1}, A, B)`
//! - `x_{2j+1} = χ(B, C, v_{j+1}, v_{j+2})`
//!
//! Both are projective invariants, and `(v_{j−2}, v_{j−1}, v_j, v_{j+1})`
//! together with the pair determine `v_{j+2}`; `next_vertex` inverts the two
//! cross ratios in that order.

use std::ops::Range;

use super::incidence::{canonical, intersection, inverse_cross_ratio, point_with_cross_ratio};
use crate::error::ProjError;
use crate::ProjPoint;

/// `(0,0), (1,0), (1,1), (0,1)`: the first four vertices of every reconstruction.
pub fn unit_square() -> [ProjPoint; 4] {
    [
        ProjPoint::new(0.0, 0.0, 1.0),
        ProjPoint::new(1.0, 0.0, 1.0),
        ProjPoint::new(1.0, 1.0, 1.0),
        ProjPoint::new(0.0, 1.0, 1.0),
    ]
}

/// Corner invariants at the middle vertex of five consecutive vertices.
pub fn corner_pair(w: [&ProjPoint; 5]) -> (f64, f64) {
    let [vm2, vm1, v0, vp1, vp2] = w;
    let a = intersection(vm2, vm1, v0, vp1);
    let b = intersection(vm2, vm1, vp1, vp2);
    let c = intersection(vm1, v0, vp1, vp2);
    (
        inverse_cross_ratio(vm2, vm1, &a, &b),
        inverse_cross_ratio(&b, &c, vp1, vp2),
    )
}

/// Invariants of a closed polygon, `2n` values, pair `(x_{2j}, x_{2j+1})` at vertex `j`.
pub fn corner_invariants(vertices: &[ProjPoint]) -> Vec<f64> {
    let n = vertices.len();
    if n < 4 {
        return Vec::new();
    }
    let at = |i: isize| &vertices[i.rem_euclid(n as isize) as usize];
    let mut out = Vec::with_capacity(2 * n);
    for j in 0..n as isize {
        let (xe, xo) = corner_pair([at(j - 2), at(j - 1), at(j), at(j + 1), at(j + 2)]);
        out.push(xe);
        out.push(xo);
    }
    out
}

/// Invariant pairs at the vertices `centers` of an open window, flattened.
///
/// Every center needs two neighbours on each side inside the window.
pub fn corner_pairs_at(vertices: &[ProjPoint], centers: Range<usize>) -> Result<Vec<f64>, ProjError> {
    if centers.start < 2 || centers.end + 2 > vertices.len() {
        return Err(ProjError::Dimension {
            expected: centers.end + 2,
            found: vertices.len(),
        });
    }
    let mut out = Vec::with_capacity(2 * centers.len());
    for j in centers {
        let (xe, xo) = corner_pair([
            &vertices[j - 2],
            &vertices[j - 1],
            &vertices[j],
            &vertices[j + 1],
            &vertices[j + 2],
        ]);
        out.push(xe);
        out.push(xo);
    }
    Ok(out)
}

/// `v_{j+2}` from `v_{j−2}, v_{j−1}, v_j, v_{j+1}` and the pair at `v_j`.
pub fn next_vertex(w: [&ProjPoint; 4], x_even: f64, x_odd: f64) -> ProjPoint {
    let [vm2, vm1, v0, vp1] = w;
    let a = intersection(vm2, vm1, v0, vp1);
    let b = point_with_cross_ratio(vm2, vm1, &a, x_even);
    let c = intersection(vm1, v0, vp1, &b);
    canonical(point_with_cross_ratio(&b, &c, vp1, x_odd))
}

/// Rebuild `count` vertices from `start` and periodic invariants (`corners[i mod 2n]`).
pub fn reconstruct_from(
    start: [ProjPoint; 4],
    corners: &[f64],
    count: usize,
) -> Result<Vec<ProjPoint>, ProjError> {
    if corners.is_empty() || corners.len() % 2 != 0 {
        return Err(ProjError::MalformedTwistedBigon { len: corners.len() });
    }
    let m = corners.len();
    let mut v: Vec<ProjPoint> = start.iter().take(count).copied().collect();
    for i in 4..count {
        let j = i - 2;
        let next = next_vertex(
            [&v[i - 4], &v[i - 3], &v[i - 2], &v[i - 1]],
            corners[(2 * j) % m],
            corners[(2 * j + 1) % m],
        );
        v.push(next);
    }
    Ok(v)
}

/// `reconstruct_from` starting on the unit square.
pub fn reconstruct(corners: &[f64], count: usize) -> Result<Vec<ProjPoint>, ProjError> {
    reconstruct_from(unit_square(), corners, count)
}
