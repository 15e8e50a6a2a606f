//! Curated surface for the experiment runner (UNSTABLE).
//!
//! Not a stable API; re-exports change with the modules behind them.

// Closed polygons
pub use crate::closed::{step as closed_step, ClosedMap, Filter, MapConfig, NextPower, Polygon, PolygonInfo};
// Twisted polygons
pub use crate::twisted::{
    factor, step as twisted_step, CornerProducts, Trajectory, TwistedConfig, TwistedInfo,
    TwistedMap, TwistedPolygon,
};
// Geometry and normalization
pub use crate::geometry::{corner_invariants, energy, is_bird, is_convex, is_embedded, reconstruct};
pub use crate::linalg::Spectrum3;
pub use crate::normalize::{ellipse_normalize, normalize, Normalization};
// Sampling
pub use crate::sample::{
    random_convex, random_inscribed, random_spiral, random_star_shaped, regular_polygon,
    ReplayToken, SpiralKind,
};
