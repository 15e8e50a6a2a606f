//! Reproducible starting configurations.
//!
//! Closed polygons are drawn from sorted uniform angles; twisted spirals are
//! drawn directly in corner-invariant space. Every draw takes a
//! `ReplayToken`, so `(seed, index)` identifies the configuration.

use std::f64::consts::{PI, SQRT_2};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ProjError;
use crate::geometry::is_convex;
use crate::linalg::Rounding;
use crate::normalize::ellipse_normalize;
use crate::ProjPoint;

pub use crate::geometry::regular_polygon;

/// Redraws of the radial jitter before `random_convex` falls back to the circle.
pub const CONVEX_RETRIES: usize = 500;

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    /// The token for the next draw in the same stream.
    pub fn next(self) -> Self {
        Self {
            index: self.index.wrapping_add(1),
            ..self
        }
    }

    #[inline]
    pub fn to_std_rng(self) -> StdRng {
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

fn sorted_angles<R: Rng>(n: usize, rng: &mut R) -> Vec<f64> {
    let mut angles: Vec<f64> = (0..n).map(|_| rng.gen::<f64>() * 2.0 * PI).collect();
    angles.sort_by(f64::total_cmp);
    angles
}

/// Uniform in (0, 1); an exact zero is replaced by 1/2.
fn open_unit<R: Rng>(rng: &mut R) -> f64 {
    match rng.gen::<f64>() {
        x if x == 0.0 => 0.5,
        x => x,
    }
}

/// `n` points at sorted random angles on the circle of radius √2.
pub fn random_inscribed(n: usize, tok: ReplayToken) -> Vec<ProjPoint> {
    let mut rng = tok.to_std_rng();
    sorted_angles(n, &mut rng)
        .into_iter()
        .map(|t| ProjPoint::new(SQRT_2 * t.cos(), SQRT_2 * t.sin(), 1.0))
        .collect()
}

/// Unit-circle points with a small radial jitter, redrawn until convex.
///
/// After `CONVEX_RETRIES` failed draws the unjittered points are used.
/// The result is ellipse-normalized.
pub fn random_convex(n: usize, tok: ReplayToken, cfg: Rounding) -> Result<Vec<ProjPoint>, ProjError> {
    let mut rng = tok.to_std_rng();
    let base: Vec<ProjPoint> = sorted_angles(n, &mut rng)
        .into_iter()
        .map(|t| ProjPoint::new(t.cos(), t.sin(), 1.0))
        .collect();
    let nf = n as f64;
    let mut chosen = None;
    for _ in 0..CONVEX_RETRIES {
        let trial: Vec<ProjPoint> = base
            .iter()
            .map(|p| {
                let r = 1.0 - 1.0 / (20.0 * nf) + rng.gen::<f64>() / (10.0 * nf);
                ProjPoint::new(p.x * r, p.y * r, 1.0)
            })
            .collect();
        if is_convex(&trial, cfg) {
            chosen = Some(trial);
            break;
        }
    }
    ellipse_normalize(chosen.as_deref().unwrap_or(&base), cfg)
}

/// Sorted random angles with radii uniform in (0, 1]; ellipse-normalized.
pub fn random_star_shaped(n: usize, tok: ReplayToken, cfg: Rounding) -> Result<Vec<ProjPoint>, ProjError> {
    let mut rng = tok.to_std_rng();
    let angles = sorted_angles(n, &mut rng);
    let v: Vec<ProjPoint> = angles
        .into_iter()
        .map(|t| {
            let r = 1.0 - rng.gen::<f64>();
            ProjPoint::new(t.cos() * r, t.sin() * r, 1.0)
        })
        .collect();
    ellipse_normalize(&v, cfg)
}

/// Sign pattern of a random spiral's corner invariants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpiralKind {
    /// Even invariants in (0, 1), odd in (−∞, 0).
    #[default]
    AlphaThree,
    /// Even invariants in (1, ∞), odd in (0, 1).
    BetaThree,
    /// Even invariants in (0, 1) or (1, ∞) with equal odds, odd in (−∞, 0).
    BetaTwo,
}

/// Corner invariants of a random spiral with `n` periods.
pub fn random_spiral(n: usize, kind: SpiralKind, tok: ReplayToken) -> Vec<f64> {
    let mut rng = tok.to_std_rng();
    let mut out = Vec::with_capacity(2 * n);
    for _ in 0..n {
        let x = open_unit(&mut rng);
        let y = open_unit(&mut rng);
        let (even, odd) = match kind {
            SpiralKind::AlphaThree => (x, y / (y - 1.0)),
            SpiralKind::BetaThree => (1.0 / (1.0 - x), y),
            SpiralKind::BetaTwo => {
                let even = if rng.gen::<f64>() < 0.5 {
                    1.0 / (1.0 - x)
                } else {
                    x
                };
                (even, y / (y - 1.0))
            }
        };
        out.push(even);
        out.push(odd);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::is_embedded;

    fn cfg() -> Rounding {
        Rounding::default()
    }

    #[test]
    fn same_token_same_draw() {
        let tok = ReplayToken::new(42, 7);
        assert_eq!(random_inscribed(9, tok), random_inscribed(9, tok));
        assert_ne!(random_inscribed(9, tok), random_inscribed(9, tok.next()));
        assert_eq!(
            random_spiral(4, SpiralKind::BetaTwo, tok),
            random_spiral(4, SpiralKind::BetaTwo, tok)
        );
    }

    #[test]
    fn inscribed_points_lie_on_the_circle() {
        let v = random_inscribed(12, ReplayToken::new(1, 0));
        assert_eq!(v.len(), 12);
        for p in &v {
            assert!((p.xy().norm() - SQRT_2).abs() < 1e-12);
        }
        let angles: Vec<f64> = v.iter().map(|p| p.y.atan2(p.x).rem_euclid(2.0 * PI)).collect();
        assert!(angles.windows(2).all(|w| w[0] <= w[1] + 1e-12));
    }

    #[test]
    fn convex_draws_are_convex() {
        for index in 0..5 {
            let v = random_convex(8, ReplayToken::new(3, index), cfg()).unwrap();
            assert_eq!(v.len(), 8);
            assert!(is_convex(&v, cfg()));
        }
    }

    #[test]
    fn star_shaped_draws_are_normalized() {
        let v = random_star_shaped(10, ReplayToken::new(5, 2), cfg()).unwrap();
        assert_eq!(v.len(), 10);
        let cx: f64 = v.iter().map(|p| p.x).sum::<f64>() / 10.0;
        let cy: f64 = v.iter().map(|p| p.y).sum::<f64>() / 10.0;
        assert!(cx.abs() < 1e-8 && cy.abs() < 1e-8);
        assert!(v.iter().all(|p| p.z == 1.0));
    }

    #[test]
    fn spiral_sign_patterns() {
        let tok = ReplayToken::new(9, 0);
        let a = random_spiral(6, SpiralKind::AlphaThree, tok);
        assert_eq!(a.len(), 12);
        for p in a.chunks(2) {
            assert!(p[0] > 0.0 && p[0] < 1.0);
            assert!(p[1] < 0.0);
        }
        for p in random_spiral(6, SpiralKind::BetaThree, tok).chunks(2) {
            assert!(p[0] > 1.0);
            assert!(p[1] > 0.0 && p[1] < 1.0);
        }
        for p in random_spiral(6, SpiralKind::BetaTwo, tok).chunks(2) {
            assert!(p[0] > 0.0 && p[0] != 1.0);
            assert!(p[1] < 0.0);
        }
    }

    #[test]
    fn regular_polygon_is_embedded() {
        assert!(is_embedded(&regular_polygon(6, 2.0), cfg()));
    }
}
