//! Map configuration and filters.

use crate::geometry::{is_bird, is_convex, is_embedded};
use crate::linalg::Rounding;
use crate::normalize::Normalization;
use crate::ProjPoint;

/// Predicate a filtered `act` waits for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    None,
    OnlyEmbedded,
    OnlyConvex,
    OnlyBird,
}

impl Filter {
    /// Attempts allowed to a filtered `act`.
    pub fn search_cap(self) -> usize {
        match self {
            Filter::None => 1,
            Filter::OnlyEmbedded => 1_000,
            Filter::OnlyConvex | Filter::OnlyBird => 100_000,
        }
    }

    /// Attempts allowed to a next-power query.
    pub fn query_cap(self) -> usize {
        match self {
            Filter::None => 1,
            Filter::OnlyEmbedded => 1_000,
            Filter::OnlyConvex => 100_000,
            Filter::OnlyBird => 10_000,
        }
    }

    pub fn accepts(self, vertices: &[ProjPoint], l: usize, cfg: Rounding) -> bool {
        match self {
            Filter::None => true,
            Filter::OnlyEmbedded => is_embedded(vertices, cfg),
            Filter::OnlyConvex => is_convex(vertices, cfg),
            Filter::OnlyBird => is_bird(vertices, l, cfg),
        }
    }
}

/// Result of a next-power query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextPower {
    /// The predicate holds after this many power-1 applications.
    Found(usize),
    /// Not within the cap.
    Beyond(usize),
    /// This application failed on a collapsed or otherwise degenerate iterate.
    Degenerate(usize),
}

/// Parameters of the closed-polygon map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapConfig {
    /// Diagonal skip.
    pub l: usize,
    /// Spacing skip, `1 ≤ k < l`.
    pub k: usize,
    /// Applications per `act`.
    pub power: usize,
    pub shift: usize,
    pub normalization: Normalization,
    pub filter: Filter,
    /// Reference vertices for `Normalization::Square`.
    pub square_refs: [usize; 4],
    pub rounding: Rounding,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            l: 2,
            k: 1,
            power: 1,
            shift: 0,
            normalization: Normalization::Ellipse,
            filter: Filter::None,
            square_refs: [0, 1, 2, 3],
            rounding: Rounding::default(),
        }
    }
}

impl MapConfig {
    pub fn with_lk(l: usize, k: usize) -> Self {
        Self {
            l,
            k,
            ..Self::default()
        }
    }

    /// Caller-side guard: `1 ≤ k < l`, `3l < n` and `3k + 1 < n`.
    pub fn fits(&self, n: usize) -> bool {
        self.k >= 1 && self.k < self.l && 3 * self.l < n && 3 * self.k + 1 < n
    }
}
