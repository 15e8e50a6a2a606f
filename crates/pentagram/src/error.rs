//! Error type shared by the linear algebra, normalization and map layers.
//!
//! Every failure is returned synchronously from the call that detected it.
//! Nothing in the crate retries; callers decide whether to stop iterating.

use std::fmt;

use crate::closed::Filter;

/// Errors surfaced by projective computations and map iteration.
#[derive(Clone, Debug, PartialEq)]
pub enum ProjError {
    /// Matrix shapes do not compose (inner dimensions differ) or vector lengths differ.
    Dimension { expected: usize, found: usize },
    /// Determinant rounds to zero.
    SingularMatrix { det: f64 },
    /// Four points are not in general position (three collinear or coincident).
    NotInGeneralPosition,
    /// A point that must be affine has a vanishing third coordinate.
    AtInfinity { index: Option<usize> },
    /// All vertices of the polygon coincide.
    CollapsedToPoint,
    /// All vertices of the polygon are collinear.
    CollapsedToLine,
    /// A corner invariant is non-finite, NaN, or zero.
    Singularity { index: usize, value: f64 },
    /// A filtered search gave up after `cap` attempts.
    SearchCapExceeded { filter: Filter, cap: usize },
    /// A twisted configuration with an unusable number of entries.
    MalformedTwistedBigon { len: usize },
}

impl ProjError {
    /// Search exhaustion leaves the caller's state valid; everything else is
    /// terminal for the step that produced it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProjError::SearchCapExceeded { .. })
    }

    /// True for the errors that signal a degenerate polygon.
    pub fn is_degeneracy(&self) -> bool {
        matches!(
            self,
            ProjError::CollapsedToPoint
                | ProjError::CollapsedToLine
                | ProjError::Singularity { .. }
                | ProjError::NotInGeneralPosition
                | ProjError::AtInfinity { .. }
        )
    }
}

impl fmt::Display for ProjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjError::Dimension { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            ProjError::SingularMatrix { det } => {
                write!(f, "matrix is singular (determinant {det:e} rounds to zero)")
            }
            ProjError::NotInGeneralPosition => {
                write!(f, "points are not in general position")
            }
            ProjError::AtInfinity { index: Some(i) } => {
                write!(f, "vertex {i} lies on the line at infinity")
            }
            ProjError::AtInfinity { index: None } => {
                write!(f, "point lies on the line at infinity")
            }
            ProjError::CollapsedToPoint => write!(f, "polygon collapsed to a point"),
            ProjError::CollapsedToLine => write!(f, "polygon collapsed to a line"),
            ProjError::Singularity { index, value } => {
                write!(f, "corner invariant {index} is singular ({value})")
            }
            ProjError::SearchCapExceeded { filter, cap } => write!(
                f,
                "no power satisfies filter {filter:?} within {cap} attempts"
            ),
            ProjError::MalformedTwistedBigon { len } => write!(
                f,
                "twisted configuration has {len} entries (needs an even count of at least 4)"
            ),
        }
    }
}

impl std::error::Error for ProjError {}
