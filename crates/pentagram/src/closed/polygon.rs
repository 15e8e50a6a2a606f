use std::f64::consts::SQRT_2;

use tracing::debug;

use super::map::ClosedMap;
use super::types::{Filter, NextPower};
use crate::error::ProjError;
use crate::geometry::{
    corner_invariants, energy, is_at_infinity, is_bird, is_convex, is_embedded, regular_polygon,
};
use crate::linalg::l2_distance;
use crate::normalize::ellipse_normalize;
use crate::ProjPoint;

/// Shape information refreshed by `Polygon::update_info`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PolygonInfo {
    pub embedded: bool,
    pub convex: bool,
    pub bird: bool,
    /// `None` when a vertex is at infinity.
    pub energy: Option<f64>,
    pub next_embedded: Option<NextPower>,
    pub next_convex: Option<NextPower>,
    pub next_bird: Option<NextPower>,
}

/// A closed polygon driven by its own `ClosedMap`.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<ProjPoint>,
    pub map: ClosedMap,
    /// Compute next-power distances in `update_info`.
    pub show_next: bool,
    info: PolygonInfo,
    reference: Vec<f64>,
}

impl Polygon {
    /// Ellipse-normalized regular `n`-gon.
    pub fn regular(n: usize, map: ClosedMap) -> Result<Self, ProjError> {
        let mut p = Self {
            vertices: Vec::new(),
            map,
            show_next: false,
            info: PolygonInfo::default(),
            reference: Vec::new(),
        };
        p.set_default(n)?;
        Ok(p)
    }

    /// Start from explicit vertices (no normalization applied).
    pub fn from_vertices(vertices: Vec<ProjPoint>, map: ClosedMap) -> Result<Self, ProjError> {
        let mut p = Self {
            vertices: Vec::new(),
            map,
            show_next: false,
            info: PolygonInfo::default(),
            reference: Vec::new(),
        };
        p.reset_to(vertices)?;
        Ok(p)
    }

    /// Replace with the regular `n`-gon and reset the counter.
    pub fn set_default(&mut self, n: usize) -> Result<(), ProjError> {
        let rounding = self.map.config.rounding;
        let vertices = ellipse_normalize(&regular_polygon(n, 1.0), rounding)?;
        self.reset_to(vertices)
    }

    /// Replace the vertices, reset the counter and take them as the new reference.
    ///
    /// A change of vertex count clears the history.
    pub fn reset_to(&mut self, vertices: Vec<ProjPoint>) -> Result<(), ProjError> {
        if vertices.len() != self.vertices.len() {
            self.map.clear_history();
        }
        self.vertices = vertices;
        self.map.set_iterations(0);
        self.reference = corner_invariants(&self.vertices);
        self.update_info();
        Ok(())
    }

    /// Apply the map to the held vertices; on failure nothing changes.
    pub fn act(&mut self, store: bool, count: bool) -> Result<(), ProjError> {
        self.vertices = self.map.act(&self.vertices, store, count)?;
        self.update_info();
        Ok(())
    }

    /// Restore the last stored vertices; returns the counter stored with them.
    pub fn revert(&mut self) -> Result<Option<u64>, ProjError> {
        let Some((vertices, iterations)) = self.map.revert() else {
            return Ok(None);
        };
        self.vertices = vertices;
        self.update_info();
        Ok(Some(iterations))
    }

    #[inline]
    pub fn can_revert(&self) -> usize {
        self.map.can_revert()
    }

    pub fn clear_history(&mut self) {
        self.map.clear_history();
    }

    /// Push every vertex radially onto the circle of radius √2 about the origin.
    pub fn inscribe(&mut self) -> Result<(), ProjError> {
        let rounding = self.map.config.rounding;
        let mut out = Vec::with_capacity(self.vertices.len());
        for (i, v) in self.vertices.iter().enumerate() {
            if is_at_infinity(v, rounding) {
                return Err(ProjError::AtInfinity { index: Some(i) });
            }
            let r = (v.xy() / v.z).norm();
            if rounding.is_zero(r) {
                return Err(ProjError::Singularity { index: i, value: r });
            }
            let s = SQRT_2 / r;
            out.push(ProjPoint::new(s * v.x / v.z, s * v.y / v.z, 1.0));
        }
        self.vertices = out;
        self.update_info();
        Ok(())
    }

    /// Recompute shape flags, energy and (if `show_next`) next-power distances.
    pub fn update_info(&mut self) {
        let cfg = self.map.config;
        let r = cfg.rounding;
        let v = &self.vertices;
        let mut info = PolygonInfo {
            embedded: is_embedded(v, r),
            convex: is_convex(v, r),
            bird: is_bird(v, cfg.l, r),
            energy: energy(v, cfg.l, cfg.k, r).ok(),
            ..PolygonInfo::default()
        };
        if self.show_next {
            info.next_embedded = Some(self.map.next_power(v, Filter::OnlyEmbedded));
            info.next_convex = Some(self.map.next_power(v, Filter::OnlyConvex));
            info.next_bird = Some(self.map.next_power(v, Filter::OnlyBird));
        }
        debug!(
            n = v.len(),
            embedded = info.embedded,
            convex = info.convex,
            bird = info.bird,
            "polygon info"
        );
        self.info = info;
    }

    #[inline]
    pub fn vertices(&self) -> &[ProjPoint] {
        &self.vertices
    }

    #[inline]
    pub fn info(&self) -> &PolygonInfo {
        &self.info
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn corner_invariants(&self) -> Vec<f64> {
        corner_invariants(&self.vertices)
    }

    /// L2 distance between the current and the reference corner invariants.
    pub fn distance_to_reference(&self) -> Result<f64, ProjError> {
        l2_distance(&self.corner_invariants(), &self.reference)
    }
}
