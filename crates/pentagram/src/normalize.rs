//! Projective normalizations applied after each map step.
//!
//! Purpose
//! - Keep iterated polygons at a usable scale: the map is projectively natural,
//!   so any projective (or affine) renormalization commutes with it up to
//!   the choice of representative.
//!
//! Modes
//! - `Square`: four reference vertices go to the corners `(±1, ±1)`.
//! - `SquareTwisted`: vertices 0, 2, 4, 6 go to four consecutive points of a
//!   regular `n/2`-fold star of radius √2; optionally the first vertex pair is
//!   broadcast to all pairs by rotation.
//! - `Ellipse`: affine normalization making the inertia ellipse the unit circle.

use std::f64::consts::{SQRT_2, TAU};

use nalgebra::{Matrix2, Rotation2, Vector2};

use crate::error::ProjError;
use crate::frame::frame_transform;
use crate::geometry::{affine, is_at_infinity};
use crate::linalg::{spectral_decomposition2x2, Rounding, Spectral2};
use crate::ProjPoint;

/// Per-step normalization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Normalization {
    None,
    Square,
    SquareTwisted,
    #[default]
    Ellipse,
}

/// Corners `(1,1), (−1,1), (−1,−1), (1,−1)` targeted by `square_normalize`.
pub fn square_corners() -> [ProjPoint; 4] {
    [
        ProjPoint::new(1.0, 1.0, 1.0),
        ProjPoint::new(-1.0, 1.0, 1.0),
        ProjPoint::new(-1.0, -1.0, 1.0),
        ProjPoint::new(1.0, -1.0, 1.0),
    ]
}

fn reference(vertices: &[ProjPoint], refs: [usize; 4]) -> Result<[ProjPoint; 4], ProjError> {
    let n = vertices.len();
    if let Some(&bad) = refs.iter().find(|&&i| i >= n) {
        return Err(ProjError::Dimension {
            expected: bad + 1,
            found: n,
        });
    }
    Ok(refs.map(|i| vertices[i]))
}

/// Send `vertices[refs[i]]` to the i-th square corner and carry the rest along.
///
/// Results are dehomogenized and rounded; a vertex sent to infinity is kept
/// as the raw image.
pub fn square_normalize(
    vertices: &[ProjPoint],
    refs: [usize; 4],
    cfg: Rounding,
) -> Result<Vec<ProjPoint>, ProjError> {
    let t = frame_transform(&reference(vertices, refs)?, &square_corners(), cfg)?;
    Ok(vertices
        .iter()
        .map(|v| {
            let w = t * v;
            if is_at_infinity(&w, cfg) {
                w
            } else {
                ProjPoint::new(cfg.round(w.x / w.z), cfg.round(w.y / w.z), 1.0)
            }
        })
        .collect())
}

fn check_twisted_len(n: usize) -> Result<(), ProjError> {
    if n % 2 != 0 || n < 8 {
        return Err(ProjError::MalformedTwistedBigon { len: n });
    }
    Ok(())
}

/// Square-type normalization for a polygon made of `n/2` repeated vertex pairs.
pub fn twisted_square_normalize(
    vertices: &[ProjPoint],
    broadcast: bool,
    cfg: Rounding,
) -> Result<Vec<ProjPoint>, ProjError> {
    let n = vertices.len();
    check_twisted_len(n)?;
    let theta = TAU / (n / 2) as f64;
    let star: [ProjPoint; 4] = [0.0, 1.0, 2.0, 3.0].map(|j: f64| {
        ProjPoint::new(
            cfg.round(SQRT_2 * (j * theta).cos()),
            cfg.round(SQRT_2 * (j * theta).sin()),
            1.0,
        )
    });
    let t = frame_transform(&reference(vertices, [0, 2, 4, 6])?, &star, cfg)?;
    let mut out = Vec::with_capacity(n);
    for (i, v) in vertices.iter().enumerate() {
        let w = t * v;
        if cfg.is_zero(w.z) {
            return Err(ProjError::AtInfinity { index: Some(i) });
        }
        out.push(ProjPoint::new(w.x / w.z, w.y / w.z, 1.0));
    }
    if broadcast {
        broadcast_pairs(&mut out)?;
    }
    Ok(out)
}

/// Overwrite pair `i` with vertices 0 and 1 rotated by `i · 2π/(n/2)`.
pub fn broadcast_pairs(vertices: &mut [ProjPoint]) -> Result<(), ProjError> {
    let n = vertices.len();
    if n % 2 != 0 {
        return Err(ProjError::MalformedTwistedBigon { len: n });
    }
    let sides = n / 2;
    let (a0, a1) = (vertices[0], vertices[1]);
    for i in 1..sides {
        let rot = Rotation2::new(TAU * i as f64 / sides as f64);
        let r0 = rot * Vector2::new(a0.x / a0.z, a0.y / a0.z);
        let r1 = rot * Vector2::new(a1.x / a1.z, a1.y / a1.z);
        vertices[2 * i] = ProjPoint::new(r0.x, r0.y, 1.0);
        vertices[2 * i + 1] = ProjPoint::new(r1.x, r1.y, 1.0);
    }
    Ok(())
}

/// Center the vertices and whiten their second moments.
///
/// With `I = Q Λ Qᵗ` the inertia matrix, each centered vertex becomes
/// `Q Λ^{-1/2} Qᵗ (v − c)`. An axis whose moment rounds to zero is left
/// unscaled, so a polygon collapsed onto a point stays collapsed.
pub fn ellipse_normalize(vertices: &[ProjPoint], cfg: Rounding) -> Result<Vec<ProjPoint>, ProjError> {
    if vertices.is_empty() {
        return Ok(Vec::new());
    }
    let pts: Vec<Vector2<f64>> = vertices
        .iter()
        .enumerate()
        .map(|(i, v)| affine(v, cfg).map_err(|_| ProjError::AtInfinity { index: Some(i) }))
        .collect::<Result<_, _>>()?;
    let n = pts.len() as f64;
    let com = pts.iter().sum::<Vector2<f64>>() / n;
    let centered: Vec<Vector2<f64>> = pts
        .iter()
        .map(|p| (p - com).map(|x| cfg.round(x)))
        .collect();
    let inertia = centered.iter().map(|c| c * c.transpose()).sum::<Matrix2<f64>>() / n;
    let Spectral2 { q, eigenvalues } = spectral_decomposition2x2(&inertia);
    let scale = eigenvalues.map(|l| if cfg.is_zero(l) { 1.0 } else { 1.0 / l.sqrt() });
    let whiten = q * Matrix2::from_diagonal(&scale) * q.transpose();
    Ok(centered
        .iter()
        .map(|c| {
            let r = whiten * c;
            ProjPoint::new(cfg.round(r.x), cfg.round(r.y), 1.0)
        })
        .collect())
}

/// Dispatch on `mode`; `refs` are the reference vertices for `Square`.
pub fn normalize(
    vertices: &[ProjPoint],
    mode: Normalization,
    refs: [usize; 4],
    cfg: Rounding,
) -> Result<Vec<ProjPoint>, ProjError> {
    match mode {
        Normalization::None => Ok(vertices.to_vec()),
        Normalization::Square => square_normalize(vertices, refs, cfg),
        Normalization::SquareTwisted => twisted_square_normalize(vertices, true, cfg),
        Normalization::Ellipse => ellipse_normalize(vertices, cfg),
    }
}
