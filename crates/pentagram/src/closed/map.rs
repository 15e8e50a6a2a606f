use tracing::{debug, warn};

use super::types::{Filter, MapConfig, NextPower};
use crate::error::ProjError;
use crate::geometry::{intersection, is_linear, is_point};
use crate::history::History;
use crate::normalize::{normalize, Normalization};
use crate::ProjPoint;

fn apply_once(vertices: &[ProjPoint], cfg: &MapConfig) -> Result<Vec<ProjPoint>, ProjError> {
    let r = cfg.rounding;
    if is_point(vertices, r) {
        return Err(ProjError::CollapsedToPoint);
    }
    if is_linear(vertices, r) {
        return Err(ProjError::CollapsedToLine);
    }
    let n = vertices.len();
    let at = |i: usize| &vertices[i % n];
    let back = n - cfg.k % n;
    let image: Vec<ProjPoint> = (0..n)
        .map(|i| intersection(at(i), at(i + cfg.l), at(i + back), at(i + back + cfg.l)))
        .collect();
    let image = normalize(&image, cfg.normalization, cfg.square_refs, r)?;
    let mut out = image.clone();
    for (i, v) in image.into_iter().enumerate() {
        out[(i + cfg.shift) % n] = v;
    }
    Ok(out)
}

/// Apply the map `cfg.power` times.
pub fn step(vertices: &[ProjPoint], cfg: &MapConfig) -> Result<Vec<ProjPoint>, ProjError> {
    let mut current = vertices.to_vec();
    for _ in 0..cfg.power {
        current = apply_once(&current, cfg)?;
    }
    Ok(current)
}

/// Stateful driver: configuration, iteration counter and undo history.
#[derive(Clone, Debug)]
pub struct ClosedMap {
    pub config: MapConfig,
    iterations: u64,
    history: History<Vec<ProjPoint>>,
}

impl Default for ClosedMap {
    fn default() -> Self {
        Self::new(MapConfig::default())
    }
}

impl ClosedMap {
    pub fn new(config: MapConfig) -> Self {
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

    /// Map `vertices` once (one `power`-step, or a filtered search).
    ///
    /// On success and if `store`, the input and the counter before the call are
    /// pushed to the history; if `count`, the counter grows by the number of
    /// single applications performed. On failure nothing changes.
    pub fn act(
        &mut self,
        vertices: &[ProjPoint],
        store: bool,
        count: bool,
    ) -> Result<Vec<ProjPoint>, ProjError> {
        let cap = self.config.filter.search_cap();
        self.act_capped(vertices, store, count, cap)
    }

    pub(crate) fn act_capped(
        &mut self,
        vertices: &[ProjPoint],
        store: bool,
        count: bool,
        cap: usize,
    ) -> Result<Vec<ProjPoint>, ProjError> {
        let power = self.config.power as u64;
        let (image, applications) = match self.config.filter {
            Filter::None => (step(vertices, &self.config)?, power),
            filter => {
                let Some((image, attempts)) = search(vertices, &self.config, filter, cap)? else {
                    warn!(?filter, cap, "no power satisfies the filter within the search cap");
                    return Err(ProjError::SearchCapExceeded { filter, cap });
                };
                (image, power * attempts as u64)
            }
        };
        if store {
            self.history.push(vertices.to_vec(), self.iterations);
        }
        if count {
            self.iterations += applications;
        }
        debug!(
            applications,
            iterations = self.iterations,
            history = self.history.len(),
            "closed map act"
        );
        Ok(image)
    }

    /// Power-1, ellipse-normalized applications needed until `filter` holds.
    ///
    /// A failing application ends the query as `Degenerate`.
    pub fn next_power(&self, vertices: &[ProjPoint], filter: Filter) -> NextPower {
        let single = MapConfig {
            power: 1,
            normalization: Normalization::Ellipse,
            ..self.config
        };
        let cap = filter.query_cap();
        let mut current = vertices.to_vec();
        for attempt in 1..=cap {
            current = match step(&current, &single) {
                Ok(next) => next,
                Err(e) => {
                    debug!(?filter, attempt, error = %e, "next-power query stopped");
                    return NextPower::Degenerate(attempt);
                }
            };
            if filter.accepts(&current, single.l, single.rounding) {
                return NextPower::Found(attempt);
            }
        }
        NextPower::Beyond(cap)
    }

    /// Pop the last snapshot; the counter drops by `power`.
    pub fn revert(&mut self) -> Option<(Vec<ProjPoint>, u64)> {
        let Some(entry) = self.history.pop() else {
            debug!("closed map revert: history empty");
            return None;
        };
        self.iterations = self.iterations.saturating_sub(self.config.power as u64);
        Some(entry)
    }

    /// Number of snapshots available to `revert`.
    #[inline]
    pub fn can_revert(&self) -> usize {
        self.history.len()
    }

    pub fn clear_history(&mut self) {
        debug!(dropped = self.history.len(), "closed map history cleared");
        self.history.clear();
    }

    pub(crate) fn history(&self) -> &History<Vec<ProjPoint>> {
        &self.history
    }
}

/// Repeat `step` until `filter` accepts; `None` once `cap` attempts are spent.
fn search(
    vertices: &[ProjPoint],
    cfg: &MapConfig,
    filter: Filter,
    cap: usize,
) -> Result<Option<(Vec<ProjPoint>, usize)>, ProjError> {
    let mut current = vertices.to_vec();
    for attempt in 1..=cap {
        current = step(&current, cfg)?;
        if filter.accepts(&current, cfg.l, cfg.rounding) {
            return Ok(Some((current, attempt)));
        }
    }
    Ok(None)
}
