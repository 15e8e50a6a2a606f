//! Dense linear algebra used by the projective layers.
//!
//! Purpose
//! - Small closed-form kernels (2×2/3×3 inverses, determinants, cofactors,
//!   cross products) and a Gauss–Jordan solver for the 12×13 frame system.
//! - Eigen-decompositions: one Jacobi rotation for symmetric 2×2 matrices and
//!   the closed-form cubic for the 3×3 characteristic polynomial.
//!
//! Numerics
//! - Every zero test goes through `Rounding` (default 10 decimal digits). The
//!   precision is a value, not global state; callers thread it through.
//! - No stability pivoting in `solve_rref`: the first non-zero entry wins.

mod dense;
mod eigen;
mod small;
mod types;

pub use dense::{multiply, solve_rref};
pub use eigen::{
    characteristic_polynomial3x3, eigenvalues3x3, spectral_decomposition2x2, Spectral2, Spectrum3,
};
pub use small::{
    cofactor3x3, cross_product3, determinant2x2, determinant3x3, invert2x2, invert3x3,
    l2_distance,
};
pub use types::{round, Rounding};

#[cfg(test)]
mod tests;
