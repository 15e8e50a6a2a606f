//! Pentagram-map variants on closed polygons.
//!
//! Purpose
//! - `step`: one application of the (l, k) map with normalization and shift,
//!   repeated `power` times.
//! - `ClosedMap`: iteration counter, filtered searches, next-power queries and
//!   the bounded undo history.
//! - `Polygon`: a vertex list bound to its map, with cached shape information.
//!
//! Map
//! - New vertex `i` is `line(v_i, v_{i+l}) ∩ line(v_{i−k}, v_{i−k+l})`, indices mod n.
//! - After normalization, `out[(i + shift) mod n] = new[i]`.
//!
//! Degeneracy
//! - Each application first rejects polygons collapsed to a point or a line.
//!   Filtered searches are capped; exhausting the cap leaves the caller's
//!   state untouched.

mod map;
mod polygon;
mod types;

pub use map::{step, ClosedMap};
pub use polygon::{Polygon, PolygonInfo};
pub use types::{Filter, MapConfig, NextPower};
