//! Center of mass, inertia, energy and regular polygons.

use std::f64::consts::TAU;

use nalgebra::{Matrix2, Vector2};

use super::incidence::{affine, line_cross_ratio};
use crate::error::ProjError;
use crate::linalg::Rounding;
use crate::ProjPoint;

fn affine_all(vertices: &[ProjPoint], cfg: Rounding) -> Result<Vec<Vector2<f64>>, ProjError> {
    vertices
        .iter()
        .enumerate()
        .map(|(i, v)| affine(v, cfg).map_err(|_| ProjError::AtInfinity { index: Some(i) }))
        .collect()
}

/// Unweighted mean of the affine vertices.
pub fn center_of_mass(vertices: &[ProjPoint], cfg: Rounding) -> Result<Vector2<f64>, ProjError> {
    if vertices.is_empty() {
        return Err(ProjError::Dimension {
            expected: 1,
            found: 0,
        });
    }
    let pts = affine_all(vertices, cfg)?;
    Ok(pts.iter().sum::<Vector2<f64>>() / pts.len() as f64)
}

/// Second moments `[[Ixx, Ixy], [Ixy, Iyy]]` of the vertices about their center of mass.
pub fn inertia_matrix(vertices: &[ProjPoint], cfg: Rounding) -> Result<Matrix2<f64>, ProjError> {
    let com = center_of_mass(vertices, cfg)?;
    let pts = affine_all(vertices, cfg)?;
    let n = pts.len() as f64;
    Ok(pts
        .iter()
        .map(|p| {
            let c = p - com;
            c * c.transpose()
        })
        .sum::<Matrix2<f64>>()
        / n)
}

/// Product over vertices of χ of the lines from `v_i` to `v_{i−k}, v_{i−l}, v_{i+l}, v_{i+k}`.
///
/// Projectively invariant; requires every vertex to be affine.
pub fn energy(vertices: &[ProjPoint], l: usize, k: usize, cfg: Rounding) -> Result<f64, ProjError> {
    let n = vertices.len();
    let pts = affine_all(vertices, cfg)?;
    let at = |i: isize| pts[i.rem_euclid(n as isize) as usize];
    let (l, k) = (l as isize, k as isize);
    let mut prod = 1.0;
    for i in 0..n as isize {
        let p = at(i);
        let u1 = p - at(i - k);
        let u2 = p - at(i - l);
        let u3 = p - at(i + l);
        let u4 = p - at(i + k);
        prod *= line_cross_ratio(&u1, &u2, &u3, &u4);
    }
    Ok(prod)
}

/// Regular `n`-gon of the given circumradius centered at the origin, first vertex on the x-axis.
pub fn regular_polygon(n: usize, radius: f64) -> Vec<ProjPoint> {
    (0..n)
        .map(|i| {
            let t = TAU * i as f64 / n as f64;
            ProjPoint::new(radius * t.cos(), radius * t.sin(), 1.0)
        })
        .collect()
}
