use log::trace;
use rand::rngs::StdRng;

use crate::engine::{Direction, Grid, Score};

use super::{best_branch, simulate, BranchEval, Policy, SearchConfig, SearchStats};

/// Depth-bounded max-only lookahead over simulated moves.
///
/// Each legal direction is scored as its immediate gain plus the best
/// cumulative gain reachable below it. There is no opponent node: spawn
/// randomness is sampled once per simulated move.
pub struct GreedyLookahead {
    cfg: SearchConfig,
    rng: StdRng,
    call_count: u64,
    stats: SearchStats,
}

impl GreedyLookahead {
    pub fn new() -> Self { Self::with_config(SearchConfig::greedy()) }

    pub fn with_config(cfg: SearchConfig) -> Self {
        let rng = cfg.make_rng();
        Self { cfg, rng, call_count: 0, stats: SearchStats::default() }
    }

    /// Best direction, or `None` if every direction is illegal.
    ///
    /// ```
    /// use slide_2048::engine::{Direction, Grid};
    /// use slide_2048::policy::{DepthSchedule, GreedyLookahead, SearchConfig};
    /// let cfg = SearchConfig { depth: DepthSchedule::Fixed(0), seed: Some(1), ..SearchConfig::greedy() };
    /// let mut p = GreedyLookahead::with_config(cfg);
    /// let stuck = Grid::new([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
    /// assert_eq!(p.best_move(stuck), None);
    /// ```
    pub fn best_move(&mut self, grid: Grid) -> Option<Direction> {
        let branches = self.branch_evals(grid);
        best_branch(&branches)
    }

    /// Value of each direction in order `[Up, Down, Left, Right]`.
    ///
    /// Counts as one decision for the depth schedule.
    pub fn branch_evals(&mut self, grid: Grid) -> [BranchEval; 4] {
        self.call_count += 1;
        let depth = self.cfg.depth_for(self.call_count);
        let mut nodes = 0u64;
        let mut out = BranchEval::illegal_set();
        for (slot, dir) in out.iter_mut().zip(Direction::ALL) {
            let Some((gain, child)) = simulate(grid, dir, &mut self.rng) else { continue };
            nodes += 1;
            let value = gain + self.predict_score(child, depth, &mut nodes);
            trace!("greedy depth {depth}: {dir} -> {value}");
            *slot = BranchEval { dir, value: value as f64, legal: true };
        }
        self.stats.record(nodes, depth);
        out
    }

    /// Best cumulative gain reachable from `grid` within `depth` further plies.
    ///
    /// At depth 0 this is the best single-step gain; a grid with no legal move is worth 0.
    pub fn predict_score(&mut self, grid: Grid, depth: u32, nodes: &mut u64) -> Score {
        let mut best = 0;
        for dir in Direction::ALL {
            let Some((gain, child)) = simulate(grid, dir, &mut self.rng) else { continue };
            *nodes += 1;
            let value = if depth == 0 { gain } else { gain + self.predict_score(child, depth - 1, nodes) };
            best = best.max(value);
        }
        best
    }

    /// Decisions made so far.
    #[inline]
    pub fn call_count(&self) -> u64 { self.call_count }

    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }
}

impl Default for GreedyLookahead {
    fn default() -> Self { Self::new() }
}

impl Policy for GreedyLookahead {
    fn decide(&mut self, grid: Grid) -> Option<Direction> { self.best_move(grid) }

    fn name(&self) -> &'static str { "greedy" }
}
