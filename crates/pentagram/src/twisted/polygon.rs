use nalgebra::Matrix3;
use tracing::debug;

use super::map::{step, TwistedMap};
use super::reconstruct::{
    bigon_omegas, check_corners, dual_monodromy, invariants_from_monodromy, monodromy_of,
    normalized_spectrum, window_from_monodromy,
};
use crate::error::ProjError;
use crate::geometry::{corner_invariants, intersection, inverse_cross_ratio, reconstruct, regular_polygon};
use crate::linalg::{l2_distance, Rounding, Spectrum3};
use crate::ProjPoint;

/// Products of corner invariants.
///
/// `F1 = Π x_{2i}/(x_{2i}−1)`, `F2 = Π x_{2i+1}/(x_{2i+1}−1)`,
/// `F3 = Π x_{2i}/x_{2i+1}`, `F4 = F2·F3/F1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerProducts {
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub f4: f64,
}

impl CornerProducts {
    pub fn from_corners(corners: &[f64]) -> Self {
        let mut f1 = 1.0;
        let mut f2 = 1.0;
        let mut f3 = 1.0;
        for pair in corners.chunks_exact(2) {
            let (e, o) = (pair[0], pair[1]);
            f1 *= e / (e - 1.0);
            f2 *= o / (o - 1.0);
            f3 *= e / o;
        }
        Self {
            f1,
            f2,
            f3,
            f4: f2 * f3 / f1,
        }
    }
}

/// Quantities derived from the current invariants.
#[derive(Clone, Debug, PartialEq)]
pub struct TwistedInfo {
    pub monodromy: Matrix3<f64>,
    pub dual_monodromy: Matrix3<f64>,
    /// Eigenvalues of the monodromy at unit determinant.
    pub spectrum: Spectrum3,
    pub omega1: f64,
    pub omega2: f64,
    /// `y_i = x_i / (x_i − 1)`.
    pub y_coords: Vec<f64>,
    pub products: CornerProducts,
    pub flags: Vec<f64>,
    pub chi: Vec<f64>,
    /// Product of the χ-values.
    pub y: f64,
    /// Display window of `vertex_count` vertices.
    pub vertices: Vec<ProjPoint>,
    /// Window rebuilt from the y-coordinates; empty unless `show_dual`.
    pub dual_vertices: Vec<ProjPoint>,
}

/// Corner invariants and tracked vertices of successive iterates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    pub corners: Vec<Vec<f64>>,
    /// Per iterate, the vertices `v_{j+4}` for `j < n`.
    pub tracked: Vec<Vec<ProjPoint>>,
}

/// Display windows are clamped to this range.
pub const VERTEX_COUNT_RANGE: (usize, usize) = (6, 100);

/// A twisted polygon driven by its own `TwistedMap`.
#[derive(Clone, Debug)]
pub struct TwistedPolygon {
    pub map: TwistedMap,
    corners: Vec<f64>,
    reference: Vec<f64>,
    vertex_count: usize,
    pub show_dual: bool,
    info: TwistedInfo,
}

impl TwistedPolygon {
    /// Default configuration with `n` periods.
    pub fn new(n: usize, map: TwistedMap) -> Result<Self, ProjError> {
        let corners = Self::default_corners(n, map.config.l)?;
        Self::from_corners(corners, map)
    }

    pub fn from_corners(corners: Vec<f64>, map: TwistedMap) -> Result<Self, ProjError> {
        let n = check_corners(&corners)?;
        let info = derive_info(&corners, map.config.k, n + 4, false, map.config.rounding)?;
        Ok(Self {
            map,
            reference: corners.clone(),
            corners,
            vertex_count: n + 4,
            show_dual: false,
            info,
        })
    }

    /// Invariants of a regular `m`-gon, `m = max(5, 3l + 1)`, repeated for `n` periods.
    ///
    /// Diagonals of length `l` of that polygon meet inside it, so the map is
    /// defined and the configuration is a fixed point.
    pub fn default_corners(n: usize, l: usize) -> Result<Vec<f64>, ProjError> {
        if n < 2 {
            return Err(ProjError::MalformedTwistedBigon { len: 2 * n });
        }
        let m = (3 * l + 1).max(5);
        let x = corner_invariants(&regular_polygon(m, 1.0));
        Ok((0..2 * n).map(|i| x[i % 2]).collect())
    }

    /// Reset to the default configuration with `n` periods.
    pub fn set_default(&mut self, n: usize) -> Result<(), ProjError> {
        let corners = Self::default_corners(n, self.map.config.l)?;
        self.reset_to(corners)
    }

    /// Change the period count, repeating or truncating the current invariants cyclically.
    pub fn set_periods(&mut self, n: usize) -> Result<(), ProjError> {
        if n < 2 {
            return Err(ProjError::MalformedTwistedBigon { len: 2 * n });
        }
        let len = self.corners.len();
        let corners = (0..2 * n).map(|i| self.corners[i % len]).collect();
        self.reset_to(corners)
    }

    /// Replace the invariants, reset the counter and take them as the new reference.
    ///
    /// A change of period count clears the history.
    pub fn reset_to(&mut self, corners: Vec<f64>) -> Result<(), ProjError> {
        let n = check_corners(&corners)?;
        if corners.len() != self.corners.len() {
            self.map.clear_history();
            self.vertex_count = self.vertex_count.max(n + 4);
        }
        self.corners = corners;
        self.reference = self.corners.clone();
        self.map.set_iterations(0);
        self.update_info()
    }

    /// Apply the map; the image and its info are computed before anything is committed.
    pub fn act(&mut self, store: bool, count: bool) -> Result<(), ProjError> {
        let image = step(&self.corners, &self.map.config)?;
        let info = self.info_for(&image)?;
        self.map.record(&self.corners, store, count);
        self.corners = image;
        self.info = info;
        self.log_info();
        Ok(())
    }

    /// Restore the last stored invariants; returns the counter stored with them.
    pub fn revert(&mut self) -> Result<Option<u64>, ProjError> {
        let Some((corners, iterations)) = self.map.revert() else {
            return Ok(None);
        };
        self.corners = corners;
        self.update_info()?;
        Ok(Some(iterations))
    }

    #[inline]
    pub fn can_revert(&self) -> usize {
        self.map.can_revert()
    }

    pub fn clear_history(&mut self) {
        self.map.clear_history();
    }

    /// Size of the display window, clamped to `VERTEX_COUNT_RANGE` and at least one period plus four.
    pub fn set_vertex_count(&mut self, count: usize) -> Result<(), ProjError> {
        let (lo, hi) = VERTEX_COUNT_RANGE;
        self.vertex_count = count.clamp(lo, hi).max(self.periods() + 4);
        self.update_info()
    }

    pub fn update_info(&mut self) -> Result<(), ProjError> {
        self.info = self.info_for(&self.corners)?;
        self.log_info();
        Ok(())
    }

    fn info_for(&self, corners: &[f64]) -> Result<TwistedInfo, ProjError> {
        let cfg = self.map.config;
        derive_info(corners, cfg.k, self.vertex_count, self.show_dual, cfg.rounding)
    }

    fn log_info(&self) {
        debug!(
            periods = self.periods(),
            omega1 = self.info.omega1,
            omega2 = self.info.omega2,
            "twisted info"
        );
    }

    /// Iterate without storing or counting; stops early at the first error.
    pub fn trajectory(&self, steps: usize) -> Trajectory {
        let n = self.periods();
        let mut out = Trajectory::default();
        let mut current = self.corners.clone();
        for _ in 0..steps {
            match step(&current, &self.map.config) {
                Ok(next) => current = next,
                Err(e) => {
                    debug!(error = %e, "trajectory stopped");
                    break;
                }
            }
            let Ok(window) = reconstruct(&current, n + 4) else {
                break;
            };
            out.tracked.push(window[4..n + 4].to_vec());
            out.corners.push(current.clone());
        }
        out
    }

    #[inline]
    pub fn corners(&self) -> &[f64] {
        &self.corners
    }

    #[inline]
    pub fn periods(&self) -> usize {
        self.corners.len() / 2
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn info(&self) -> &TwistedInfo {
        &self.info
    }

    #[inline]
    pub fn monodromy(&self) -> &Matrix3<f64> {
        &self.info.monodromy
    }

    #[inline]
    pub fn dual_monodromy(&self) -> &Matrix3<f64> {
        &self.info.dual_monodromy
    }

    #[inline]
    pub fn eigenvalues(&self) -> Spectrum3 {
        self.info.spectrum
    }

    #[inline]
    pub fn omega1(&self) -> f64 {
        self.info.omega1
    }

    #[inline]
    pub fn omega2(&self) -> f64 {
        self.info.omega2
    }

    /// Closed-form Ω-invariants from the corners; `None` unless the polygon is a bigon.
    pub fn bigon_omegas(&self) -> Option<(f64, f64)> {
        bigon_omegas(&self.corners)
    }

    pub fn distance_to_reference(&self) -> Result<f64, ProjError> {
        l2_distance(&self.corners, &self.reference)
    }
}

fn derive_info(
    corners: &[f64],
    k: usize,
    count: usize,
    show_dual: bool,
    cfg: Rounding,
) -> Result<TwistedInfo, ProjError> {
    let n = check_corners(corners)?;
    let monodromy = monodromy_of(corners, cfg)?;
    let dual = dual_monodromy(&monodromy);
    let (omega1, omega2) = invariants_from_monodromy(&monodromy, &dual);
    let vertices = window_from_monodromy(&monodromy, corners, count)?;
    let flag_window = window_from_monodromy(&monodromy, corners, n + k + 4)?;
    let (flags, chi) = flags_and_chi(&flag_window, n, k);
    let y_coords: Vec<f64> = corners.iter().map(|x| x / (x - 1.0)).collect();
    let dual_vertices = if show_dual {
        let m = monodromy_of(&y_coords, cfg)?;
        window_from_monodromy(&m, &y_coords, count)?
    } else {
        Vec::new()
    };
    Ok(TwistedInfo {
        spectrum: normalized_spectrum(&monodromy),
        monodromy,
        dual_monodromy: dual,
        omega1,
        omega2,
        products: CornerProducts::from_corners(corners),
        y: chi.iter().product(),
        y_coords,
        flags,
        chi,
        vertices,
        dual_vertices,
    })
}

/// Cross ratios along the diagonals `v_i v_{i+k}` of one period.
fn flags_and_chi(v: &[ProjPoint], n: usize, k: usize) -> (Vec<f64>, Vec<f64>) {
    let mut flags = vec![0.0; n];
    let mut chi = vec![0.0; n];
    for i in 0..n {
        let a = intersection(&v[i + 1], &v[i + k + 1], &v[i + 2], &v[i + k + 2]);
        let b = intersection(&v[i + 2], &v[i + k + 2], &v[i + 3], &v[i + k + 3]);
        flags[i] = inverse_cross_ratio(&v[i + 2], &a, &b, &v[i + k + 2]);

        let c = intersection(&v[i + 1], &v[i + k + 1], &v[i], &v[i + k]);
        chi[(i + 1) % n] = inverse_cross_ratio(&v[i + 1], &c, &a, &v[i + k + 1]);
    }
    (flags, chi)
}
