use tracing::debug;

use super::reconstruct::{check_corners, monodromy_of, window_from_monodromy};
use crate::error::ProjError;
use crate::geometry::{
    canonical, corner_pair, corner_pairs_at, intersection, is_at_infinity, next_vertex, reconstruct,
    unit_square,
};
use crate::history::History;
use crate::linalg::Rounding;
use crate::ProjPoint;

/// How the working vertex window is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// (3, 1) only: each image pair straight from the five input pairs around it.
    ClosedForm,
    /// Corner-invariant recursion over the whole window.
    Direct,
    /// One period by recursion, the rest through the monodromy.
    Monodromy,
}

/// Parameters of the twisted map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwistedConfig {
    pub l: usize,
    pub k: usize,
    pub power: usize,
    /// Reject image vertices on the line at infinity.
    pub check_affine: bool,
    pub rounding: Rounding,
}

impl Default for TwistedConfig {
    fn default() -> Self {
        Self {
            l: 3,
            k: 1,
            power: 1,
            check_affine: false,
            rounding: Rounding::default(),
        }
    }
}

impl TwistedConfig {
    pub fn with_lk(l: usize, k: usize) -> Self {
        Self {
            l,
            k,
            ..Self::default()
        }
    }

    pub fn route(&self) -> Route {
        if self.l == 3 && self.k == 1 {
            Route::ClosedForm
        } else if self.l < 3 {
            Route::Direct
        } else {
            Route::Monodromy
        }
    }
}

/// Every value must be finite and nonzero.
pub fn check_invariants(values: &[f64]) -> Result<(), ProjError> {
    match values
        .iter()
        .position(|x| !x.is_finite() || *x == 0.0)
    {
        Some(index) => Err(ProjError::Singularity {
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

fn window(corners: &[f64], count: usize, route: Route, cfg: Rounding) -> Result<Vec<ProjPoint>, ProjError> {
    match route {
        Route::ClosedForm | Route::Direct => reconstruct(corners, count),
        Route::Monodromy => {
            let m = monodromy_of(corners, cfg)?;
            window_from_monodromy(&m, corners, count)
        }
    }
}

/// Image pair at vertex `j` under (3, 1), from the input pairs at `j − 1 ..= j + 3`.
///
/// The nine vertices `v_{j−3} ..= v_{j+5}` are rebuilt in a local frame; the
/// image invariants do not depend on that frame.
fn image_pair_31(corners: &[f64], j: usize) -> (f64, f64) {
    let n = corners.len() / 2;
    let mut v: Vec<ProjPoint> = unit_square().to_vec();
    for t in 4..9 {
        let p = (j + t + 3 * n - 5) % n;
        let next = next_vertex(
            [&v[t - 4], &v[t - 3], &v[t - 2], &v[t - 1]],
            corners[2 * p],
            corners[2 * p + 1],
        );
        v.push(next);
    }
    let w: [ProjPoint; 5] =
        std::array::from_fn(|i| intersection(&v[i + 1], &v[i + 4], &v[i], &v[i + 3]));
    corner_pair([&w[0], &w[1], &w[2], &w[3], &w[4]])
}

/// (3, 1) image invariants without a global window.
///
/// Vertex positions depend on the local frame, so `check_affine` has no effect here.
fn closed_form_31(corners: &[f64]) -> Result<Vec<f64>, ProjError> {
    let n = check_corners(corners)?;
    let mut out = Vec::with_capacity(2 * n);
    for j in 0..n {
        let (xe, xo) = image_pair_31(corners, j);
        out.push(xe);
        out.push(xo);
    }
    check_invariants(&out)?;
    Ok(out)
}

/// One application along an explicit route.
pub(crate) fn apply_once(
    corners: &[f64],
    cfg: &TwistedConfig,
    route: Route,
) -> Result<Vec<f64>, ProjError> {
    if route == Route::ClosedForm && (cfg.l, cfg.k) == (3, 1) {
        return closed_form_31(corners);
    }
    let n = check_corners(corners)?;
    let (l, k) = (cfg.l, cfg.k);
    let v = window(corners, n + 4 + k + l, route, cfg.rounding)?;
    let image: Vec<ProjPoint> = (0..n + 4)
        .map(|i| intersection(&v[i + k], &v[i + k + l], &v[i], &v[i + l]))
        .collect();
    if cfg.check_affine {
        if let Some(i) = image.iter().position(|w| is_at_infinity(w, cfg.rounding)) {
            return Err(ProjError::AtInfinity { index: Some(i) });
        }
    }
    let pairs = corner_pairs_at(&image, 2..n + 2)?;
    // Image vertex `i` carries label `i + k`; realign so pair `j` sits at label `j`.
    let s = (n - k % n) % n;
    let mut out = Vec::with_capacity(2 * n);
    for j in 0..n {
        let r = (j + s + 2 * n - 2) % n;
        out.push(pairs[2 * r]);
        out.push(pairs[2 * r + 1]);
    }
    check_invariants(&out)?;
    Ok(out)
}

/// Apply the map `cfg.power` times.
pub fn step(corners: &[f64], cfg: &TwistedConfig) -> Result<Vec<f64>, ProjError> {
    let route = cfg.route();
    let mut current = corners.to_vec();
    for _ in 0..cfg.power {
        current = apply_once(&current, cfg, route)?;
    }
    Ok(current)
}

/// The factor map `D_k`: corner invariants of the line sequence `v_i × v_{i+k}`, read backwards.
pub fn factor(corners: &[f64], k: usize, cfg: Rounding) -> Result<Vec<f64>, ProjError> {
    let n = check_corners(corners)?;
    let m = monodromy_of(corners, cfg)?;
    let v = window_from_monodromy(&m, corners, n + 4 + k)?;
    let lines: Vec<ProjPoint> = (0..n + 4)
        .map(|j| {
            let i = n + 3 - j;
            canonical(v[i].cross(&v[i + k]))
        })
        .collect();
    let out = corner_pairs_at(&lines, 2..n + 2)?;
    check_invariants(&out)?;
    Ok(out)
}

/// Stateful driver for the twisted map.
#[derive(Clone, Debug)]
pub struct TwistedMap {
    pub config: TwistedConfig,
    iterations: u64,
    history: History<Vec<f64>>,
}

impl Default for TwistedMap {
    fn default() -> Self {
        Self::new(TwistedConfig::default())
    }
}

impl TwistedMap {
    pub fn new(config: TwistedConfig) -> Self {
        Self {
            config,
            iterations: 0,
            history: History::default(),
        }
    }

    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn set_iterations(&mut self, iterations: u64) {
        self.iterations = iterations;
    }

    /// Same bookkeeping as `ClosedMap::act`: store and count only on success.
    pub fn act(&mut self, corners: &[f64], store: bool, count: bool) -> Result<Vec<f64>, ProjError> {
        let image = step(corners, &self.config)?;
        self.record(corners, store, count);
        Ok(image)
    }

    /// Bookkeeping of a successful `act` on `corners`.
    pub(crate) fn record(&mut self, corners: &[f64], store: bool, count: bool) {
        if store {
            self.history.push(corners.to_vec(), self.iterations);
        }
        if count {
            self.iterations += self.config.power as u64;
        }
        debug!(
            iterations = self.iterations,
            history = self.history.len(),
            "twisted map act"
        );
    }

    /// Pop the last snapshot; the counter drops by `power`.
    pub fn revert(&mut self) -> Option<(Vec<f64>, u64)> {
        let Some(entry) = self.history.pop() else {
            debug!("twisted map revert: history empty");
            return None;
        };
        self.iterations = self.iterations.saturating_sub(self.config.power as u64);
        Some(entry)
    }

    #[inline]
    pub fn can_revert(&self) -> usize {
        self.history.len()
    }

    pub fn clear_history(&mut self) {
        debug!(dropped = self.history.len(), "twisted map history cleared");
        self.history.clear();
    }
}
