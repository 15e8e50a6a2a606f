//! Incidence geometry of polygons in the real projective plane.
//!
//! Purpose
//! - Lines, intersections and cross ratios on homogeneous coordinates.
//! - Corner invariants and the recursion that rebuilds vertices from them.
//! - Shape predicates (point/line degeneracy, embedded, convex, bird) and
//!   metrics (center of mass, inertia, energy).
//!
//! Conventions
//! - Points are `Vector3<f64>`; a point is "affine" when its third coordinate
//!   is not negligible relative to its norm.
//! - Intersections are returned in canonical form: divided by `w` when affine,
//!   scaled to unit length otherwise.
//! - Cross ratios use `χ(a,b,c,d) = (a−b)(c−d) / ((a−c)(b−d))` on collinear points.

mod corners;
mod incidence;
mod metrics;
mod predicates;

pub use corners::{
    corner_invariants, corner_pair, corner_pairs_at, next_vertex, reconstruct, reconstruct_from,
    unit_square,
};
pub use incidence::{
    affine, canonical, collinear, intersection, inverse_cross_ratio, is_at_infinity,
    line_cross_ratio, line_through, point_with_cross_ratio, same_point,
};
pub use metrics::{center_of_mass, energy, inertia_matrix, regular_polygon};
pub use predicates::{is_bird, is_convex, is_embedded, is_linear, is_point};

#[cfg(test)]
mod tests;
