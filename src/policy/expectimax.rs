use log::trace;
use rand::rngs::StdRng;

use crate::engine::{Direction, Grid};

use super::{best_branch, simulate, BranchEval, Policy, SearchConfig, SearchStats};

/// Bounded lookahead that averages instead of maximizing below the root.
///
/// The root still picks the direction with the highest value, but a subtree is
/// worth the mean over its legal moves of gain plus subtree value, which
/// discounts lines that only pay off under a lucky spawn. Depth is frozen at 3
/// by default; use [`DepthSchedule::Growing`](super::DepthSchedule::Growing) to
/// follow the call counter instead.
pub struct BoundedExpectimax {
    cfg: SearchConfig,
    rng: StdRng,
    call_count: u64,
    stats: SearchStats,
}

impl BoundedExpectimax {
    pub fn new() -> Self { Self::with_config(SearchConfig::expectimax()) }

    pub fn with_config(cfg: SearchConfig) -> Self {
        let rng = cfg.make_rng();
        Self { cfg, rng, call_count: 0, stats: SearchStats::default() }
    }

    /// Compute the best move, or `None` if every direction is illegal.
    ///
    /// ```
    /// use slide_2048::engine::{Direction, Grid};
    /// use slide_2048::policy::{BoundedExpectimax, SearchConfig};
    /// let mut ex = BoundedExpectimax::with_config(SearchConfig::expectimax().with_seed(7));
    /// let g = Grid::new([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// assert!(matches!(ex.best_move(g), Some(Direction::Down) | Some(Direction::Right)));
    /// ```
    pub fn best_move(&mut self, grid: Grid) -> Option<Direction> {
        let branches = self.branch_evals(grid);
        best_branch(&branches)
    }

    /// Value of each direction in order `[Up, Down, Left, Right]`; illegal
    /// directions are marked `legal = false`.
    pub fn branch_evals(&mut self, grid: Grid) -> [BranchEval; 4] {
        self.call_count += 1;
        let depth = self.cfg.depth_for(self.call_count);
        let mut nodes = 0u64;
        let mut out = BranchEval::illegal_set();
        for (slot, dir) in out.iter_mut().zip(Direction::ALL) {
            let Some((gain, child)) = simulate(grid, dir, &mut self.rng) else { continue };
            nodes += 1;
            let value = gain as f64 + self.mean_score(child, depth, &mut nodes);
            trace!("expectimax depth {depth}: {dir} -> {value:.2}");
            *slot = BranchEval { dir, value, legal: true };
        }
        self.stats.record(nodes, depth);
        out
    }

    /// Mean over legal moves of gain plus the value of the resulting subtree.
    ///
    /// At depth 0 this is the mean single-step gain; a grid with no legal move is worth 0.
    pub fn mean_score(&mut self, grid: Grid, depth: u32, nodes: &mut u64) -> f64 {
        let mut total = 0.0;
        let mut legal = 0u32;
        for dir in Direction::ALL {
            let Some((gain, child)) = simulate(grid, dir, &mut self.rng) else { continue };
            *nodes += 1;
            legal += 1;
            total += gain as f64;
            if depth > 0 {
                total += self.mean_score(child, depth - 1, nodes);
            }
        }
        if legal == 0 { 0.0 } else { total / legal as f64 }
    }

    #[inline]
    pub fn call_count(&self) -> u64 { self.call_count }

    /// Statistics from the last call to [`Self::best_move`] or [`Self::branch_evals`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }
}

impl Default for BoundedExpectimax {
    fn default() -> Self { Self::new() }
}

impl Policy for BoundedExpectimax {
    fn decide(&mut self, grid: Grid) -> Option<Direction> { self.best_move(grid) }

    fn name(&self) -> &'static str { "expectimax" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DepthSchedule;

    fn fixed(depth: u32) -> BoundedExpectimax {
        BoundedExpectimax::with_config(SearchConfig { depth: DepthSchedule::Fixed(depth), seed: Some(99), ..SearchConfig::expectimax() })
    }

    #[test]
    fn mean_at_depth_zero_averages_legal_gains() {
        // Left and Right each earn 16; Down earns 0; Up is illegal.
        let g = Grid::new([[8, 8, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut nodes = 0;
        let mean = fixed(0).mean_score(g, 0, &mut nodes);
        assert!((mean - 32.0 / 3.0).abs() < 1e-9);
        assert_eq!(nodes, 3);
    }

    #[test]
    fn depth_one_averages_gain_plus_subtree() {
        // Only Left/Right are legal (16 each) and each leaves one empty cell for the spawn.
        // After Left the grid is lost (worth 0); after Right, Up and Down each earn 16.
        let g = Grid::new([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 8, 8]]);
        let mut nodes = 0;
        let mean = fixed(1).mean_score(g, 1, &mut nodes);
        assert!((mean - 24.0).abs() < 1e-9, "{mean}");
        assert_eq!(nodes, 4);
    }

    #[test]
    fn averaging_differs_from_greedy_max() {
        let g = Grid::new([[8, 8, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut ex = fixed(0);
        let branches = ex.branch_evals(g);
        let down = branches[Direction::Down.index() as usize];
        // Down earns nothing now; below it, Left/Right are worth 16 and the rest 0.
        assert!(down.legal);
        assert!(down.value < 16.0);
        assert_eq!(best_branch(&branches), Some(Direction::Left));
    }

    #[test]
    fn frozen_depth_ignores_call_counter() {
        let mut ex = BoundedExpectimax::with_config(SearchConfig::expectimax().with_seed(1));
        let g = Grid::new([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        for _ in 0..12 {
            ex.decide(g);
        }
        assert_eq!(ex.call_count(), 12);
        assert_eq!(ex.last_stats().depth, 3);
    }

    #[test]
    fn growing_mode_deepens() {
        let cfg = SearchConfig { depth: DepthSchedule::Growing { base: 0 }, seed: Some(1), ..SearchConfig::expectimax() };
        let mut ex = BoundedExpectimax::with_config(cfg);
        let g = Grid::new([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        for _ in 0..10 {
            ex.decide(g);
        }
        assert_eq!(ex.last_stats().depth, 1);
    }

    #[test]
    fn stuck_grid_has_no_move() {
        let g = Grid::new([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        let mut ex = fixed(3);
        assert_eq!(ex.decide(g), None);
        assert_eq!(ex.last_stats().nodes, 0);
    }

    #[test]
    fn seeded_searches_agree() {
        let g = Grid::new([[2, 2, 4, 0], [0, 4, 0, 0], [0, 0, 2, 0], [0; 4]]);
        let a = fixed(2).branch_evals(g);
        let b = fixed(2).branch_evals(g);
        assert_eq!(a, b);
    }
}
