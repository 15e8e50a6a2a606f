//! Eigen-decompositions: Jacobi rotation (2×2 symmetric) and closed-form cubic (3×3).

use std::f64::consts::PI;

use nalgebra::{Complex, Matrix2, Matrix3, Vector2};

use super::small::determinant3x3;

/// `S = Q · Λ · Qᵗ` with `Q` a rotation and `Λ = diag(eigenvalues)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spectral2 {
    pub q: Matrix2<f64>,
    pub eigenvalues: Vector2<f64>,
}

impl Spectral2 {
    #[inline]
    pub fn lambda(&self) -> Matrix2<f64> {
        Matrix2::from_diagonal(&self.eigenvalues)
    }
}

/// Diagonalize a symmetric 2×2 matrix with one Jacobi rotation.
///
/// Only the upper off-diagonal entry is read.
pub fn spectral_decomposition2x2(s: &Matrix2<f64>) -> Spectral2 {
    let (a, b, c) = (s[(0, 0)], s[(0, 1)], s[(1, 1)]);
    if b == 0.0 {
        return Spectral2 {
            q: Matrix2::identity(),
            eigenvalues: Vector2::new(a, c),
        };
    }
    let theta = 0.5 * (2.0 * b).atan2(a - c);
    let (sn, cs) = theta.sin_cos();
    let l1 = a * cs * cs + 2.0 * b * sn * cs + c * sn * sn;
    let l2 = a * sn * sn - 2.0 * b * sn * cs + c * cs * cs;
    Spectral2 {
        q: Matrix2::new(cs, -sn, sn, cs),
        eigenvalues: Vector2::new(l1, l2),
    }
}

/// Eigenvalues of a real 3×3 matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Spectrum3 {
    /// Three real eigenvalues in descending order; `repeated` flags a multiple root.
    Real { values: [f64; 3], repeated: bool },
    /// One real eigenvalue and a conjugate pair (`pair.im > 0`, conjugate implied).
    Complex { real: f64, pair: Complex<f64> },
}

impl Spectrum3 {
    /// Moduli of the three eigenvalues in the order they are stored.
    pub fn moduli(&self) -> [f64; 3] {
        match *self {
            Spectrum3::Real { values, .. } => values.map(f64::abs),
            Spectrum3::Complex { real, pair } => [real.abs(), pair.norm(), pair.norm()],
        }
    }
}

/// Coefficients `[c0, c1, c2]` of `λ³ − c0 λ² + c1 λ − c2`:
/// trace, sum of principal 2×2 minors, determinant.
pub fn characteristic_polynomial3x3(m: &Matrix3<f64>) -> [f64; 3] {
    let trace = m[(0, 0)] + m[(1, 1)] + m[(2, 2)];
    let minors = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]
        + m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)]
        + m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)];
    [trace, minors, determinant3x3(m)]
}

/// Relative threshold under which the cubic discriminant counts as zero.
const DISC_EPS: f64 = 1e-12;

/// Roots of the characteristic polynomial via the depressed cubic `t³ + p t + q`.
pub fn eigenvalues3x3(m: &Matrix3<f64>) -> Spectrum3 {
    let [a, b, c] = characteristic_polynomial3x3(m);
    let shift = a / 3.0;
    let p = b - a * a / 3.0;
    let q = -2.0 * a.powi(3) / 27.0 + a * b / 3.0 - c;
    let half_q = q / 2.0;
    let third_p = p / 3.0;
    let disc = half_q * half_q + third_p.powi(3);
    let scale = 1.0 + half_q * half_q + third_p.abs().powi(3);

    if disc.abs() <= DISC_EPS * scale {
        // Multiple root.
        if p.abs() <= DISC_EPS * (1.0 + a * a) {
            return Spectrum3::Real {
                values: [shift; 3],
                repeated: true,
            };
        }
        let simple = 3.0 * q / p + shift;
        let double = -3.0 * q / (2.0 * p) + shift;
        return Spectrum3::Real {
            values: sorted_desc([simple, double, double]),
            repeated: true,
        };
    }
    if disc < 0.0 {
        let r = 2.0 * (-third_p).sqrt();
        let arg = ((3.0 * q) / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let phi = arg.acos() / 3.0;
        let values = [0.0, 1.0, 2.0].map(|k: f64| r * (phi - 2.0 * PI * k / 3.0).cos() + shift);
        return Spectrum3::Real {
            values: sorted_desc(values),
            repeated: false,
        };
    }
    let sq = disc.sqrt();
    let u = (-half_q + sq).cbrt();
    let v = (-half_q - sq).cbrt();
    Spectrum3::Complex {
        real: u + v + shift,
        pair: Complex::new(-(u + v) / 2.0 + shift, 3f64.sqrt() / 2.0 * (u - v).abs()),
    }
}

fn sorted_desc(mut v: [f64; 3]) -> [f64; 3] {
    v.sort_by(|x, y| y.partial_cmp(x).unwrap_or(std::cmp::Ordering::Equal));
    v
}
