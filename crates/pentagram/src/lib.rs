//! Pentagram-map dynamics on closed and twisted polygons.
//!
//! Points and lines of the projective plane are homogeneous 3-vectors
//! (`ProjPoint`). Closed polygons are cyclic vertex lists iterated by
//! `closed::ClosedMap`; twisted polygons are corner-invariant lists iterated
//! by `twisted::TwistedMap`, with vertices rebuilt on demand.
//!
//! Layers
//! - `linalg`: small-matrix kernels, RREF, eigenvalues, rounding policy.
//! - `geometry`: incidence, cross ratios, corner invariants, shape predicates.
//! - `frame`: projective frames and four-point maps.
//! - `normalize`: per-step renormalizations.
//! - `closed`, `twisted`: the maps and their stateful drivers.
//! - `sample`: reproducible starting configurations.

pub mod api;
pub mod closed;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod history;
pub mod linalg;
pub mod normalize;
pub mod sample;
pub mod twisted;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::ProjError;
pub use linalg::Rounding;
pub use nalgebra::{Matrix3 as Mat3, Vector3 as Vec3};

/// Homogeneous coordinates of a point (or, dually, a line).
pub type ProjPoint = nalgebra::Vector3<f64>;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::closed::{ClosedMap, Filter, MapConfig, Polygon};
    pub use crate::normalize::Normalization;
    pub use crate::sample::{ReplayToken, SpiralKind};
    pub use crate::twisted::{TwistedConfig, TwistedMap, TwistedPolygon};
    pub use crate::{ProjError, ProjPoint, Rounding};
}
