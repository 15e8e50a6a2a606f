//! Pentagram-map variants on twisted polygons.
//!
//! Purpose
//! - A twisted polygon with `n` periods is an infinite vertex sequence with
//!   `v_{i+n} = M·v_i` for a projective monodromy `M`. It is stored as its
//!   `2n` corner invariants; explicit vertices are rebuilt on demand, the
//!   first four on the unit square.
//! - `TwistedMap` iterates the (l, k) map on the invariants; `TwistedPolygon`
//!   caches monodromy, eigenvalues, Ω-invariants and the display windows.
//!
//! Routes
//! - (l, k) = (3, 1) has a local formula: each image pair comes from the five
//!   input pairs around it, with no global window.
//! - l < 3 build the working window by the direct corner-invariant recursion;
//!   larger l extend a period-long prefix with the monodromy, which keeps the
//!   recursion short.

mod map;
mod polygon;
mod reconstruct;

pub use map::{check_invariants, factor, step, Route, TwistedConfig, TwistedMap};
pub use polygon::{CornerProducts, Trajectory, TwistedInfo, TwistedPolygon, VERTEX_COUNT_RANGE};
pub use reconstruct::{
    bigon_omegas, check_corners, dual_monodromy, invariants_from_monodromy, monodromy_of,
    normalized_spectrum, window_from_monodromy,
};
