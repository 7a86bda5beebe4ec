//! Move-selection policies.
//!
//! Every policy implements [`Policy`]: given a read-only grid snapshot, pick a
//! direction. Callers choose a variant up front (directly or through
//! [`PolicyKind`]) and otherwise treat them alike.
//!
//! - [`UniformRandom`]: any direction with equal probability.
//! - [`FixedCycle`]: Down, then Left, Right, Up while the grid stays stuck.
//! - [`GreedyLookahead`]: max over a depth-bounded tree of simulated moves.
//! - [`BoundedExpectimax`]: same top-level choice, but subtrees are averaged.
//!
//! The lookahead policies simulate through throwaway [`GameSession`]s, so
//! simulated spawns follow the real game's rules. Each owns its own RNG; give
//! [`SearchConfig::seed`] to make decisions reproducible.
//!
//! Quick start
//! ```
//! use slide_2048::policy::{GreedyLookahead, Policy, SearchConfig, DepthSchedule};
//! use slide_2048::session::GameSession;
//!
//! let mut session = GameSession::with_seed(3);
//! let cfg = SearchConfig { depth: DepthSchedule::Fixed(1), seed: Some(3), ..SearchConfig::default() };
//! let mut policy = GreedyLookahead::with_config(cfg);
//! let dir = policy.decide(session.grid()).expect("fresh game has a legal move");
//! assert!(session.step(dir).changed);
//! ```

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::{Direction, Grid, Score};
use crate::session::GameSession;

mod cycle;
mod expectimax;
mod greedy;
mod random;

pub use cycle::FixedCycle;
pub use expectimax::BoundedExpectimax;
pub use greedy::GreedyLookahead;
pub use random::UniformRandom;

/// Chooses a direction for a grid snapshot.
///
/// `None` means the policy found no legal move. Object-safe so it can be used as
/// `Box<dyn Policy>`.
pub trait Policy {
    fn decide(&mut self, grid: Grid) -> Option<Direction>;

    /// Short identifier used in logs and summaries.
    fn name(&self) -> &'static str;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn decide(&mut self, grid: Grid) -> Option<Direction> { (**self).decide(grid) }

    fn name(&self) -> &'static str { (**self).name() }
}

/// How deep the lookahead policies search on a given call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthSchedule {
    /// `base + floor(log10(call_count))`, so later (usually harder) positions search deeper.
    Growing { base: u32 },
    /// Constant depth, independent of how many decisions were made.
    Fixed(u32),
}

impl DepthSchedule {
    /// Depth for the `call_count`-th decision (1-based).
    pub fn depth_for(self, call_count: u64) -> u32 {
        match self {
            DepthSchedule::Growing { base } => base + call_count.max(1).ilog10(),
            DepthSchedule::Fixed(depth) => depth,
        }
    }
}

/// Configurable knobs for the lookahead policies.
///
/// - `depth`: depth schedule; see [`DepthSchedule`].
/// - `depth_cap`: hard cap applied after the schedule (None leaves it uncapped).
/// - `seed`: seed for the policy's simulation RNG (None draws from OS entropy).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub depth: DepthSchedule,
    pub depth_cap: Option<u32>,
    pub seed: Option<u64>,
}

impl SearchConfig {
    /// Defaults for [`GreedyLookahead`]: growing depth from 3.
    pub fn greedy() -> Self {
        Self { depth: DepthSchedule::Growing { base: 3 }, depth_cap: Some(6), seed: None }
    }

    /// Defaults for [`BoundedExpectimax`]: depth frozen at 3.
    pub fn expectimax() -> Self {
        Self { depth: DepthSchedule::Fixed(3), ..Self::greedy() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline]
    pub(crate) fn depth_for(&self, call_count: u64) -> u32 {
        let depth = self.depth.depth_for(call_count);
        match self.depth_cap { Some(cap) => depth.min(cap), None => depth }
    }

    pub(crate) fn make_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self { Self::greedy() }
}

/// Root-level value of one direction.
///
/// `legal` is false when the move is a no-op for the grid; `value` is then 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub dir: Direction,
    pub value: f64,
    pub legal: bool,
}

impl BranchEval {
    pub(crate) fn illegal_set() -> [BranchEval; 4] {
        Direction::ALL.map(|dir| BranchEval { dir, value: 0.0, legal: false })
    }
}

/// First legal branch with the strictly highest value, in enumeration order.
pub fn best_branch(branches: &[BranchEval; 4]) -> Option<Direction> {
    let mut best: Option<&BranchEval> = None;
    for branch in branches.iter().filter(|b| b.legal) {
        if best.map_or(true, |b| branch.value > b.value) {
            best = Some(branch);
        }
    }
    best.map(|b| b.dir)
}

/// Search statistics for the most recent decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    /// Simulated moves in the last decision.
    pub nodes: u64,
    pub peak_nodes: u64,
    /// Depth used by the last decision.
    pub depth: u32,
}

impl SearchStats {
    pub(crate) fn record(&mut self, nodes: u64, depth: u32) {
        self.nodes = nodes;
        self.peak_nodes = self.peak_nodes.max(nodes);
        self.depth = depth;
    }
}

/// Play `dir` on a throwaway session built from `grid`. Returns the score delta
/// and the post-spawn grid, or `None` if the move is illegal.
pub(crate) fn simulate<R: Rng + ?Sized>(grid: Grid, dir: Direction, rng: &mut R) -> Option<(Score, Grid)> {
    let mut trial = GameSession::from_grid(grid, rng.gen());
    let result = trial.step(dir);
    result.changed.then(|| (result.score_delta, trial.grid()))
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("unknown policy '{0}' (expected one of: random, cycle, greedy, expectimax, expectimax-growing)")]
    UnknownPolicy(String),
}

/// Named policy variants, for selection from configuration or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Random,
    Cycle,
    Greedy,
    Expectimax,
    /// [`BoundedExpectimax`] on the growing depth schedule instead of the frozen one.
    ExpectimaxGrowing,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::Random,
        PolicyKind::Cycle,
        PolicyKind::Greedy,
        PolicyKind::Expectimax,
        PolicyKind::ExpectimaxGrowing,
    ];

    /// Build a fresh policy instance. `seed` fixes its random source.
    ///
    /// ```
    /// use slide_2048::policy::PolicyKind;
    /// let p = "cycle".parse::<PolicyKind>().unwrap().build(Some(1));
    /// assert_eq!(p.name(), "cycle");
    /// ```
    pub fn build(self, seed: Option<u64>) -> Box<dyn Policy + Send> {
        let with_seed = |cfg: SearchConfig| SearchConfig { seed, ..cfg };
        match self {
            PolicyKind::Random => Box::new(match seed {
                Some(seed) => UniformRandom::with_seed(seed),
                None => UniformRandom::new(),
            }),
            PolicyKind::Cycle => Box::new(FixedCycle::new()),
            PolicyKind::Greedy => Box::new(GreedyLookahead::with_config(with_seed(SearchConfig::greedy()))),
            PolicyKind::Expectimax => Box::new(BoundedExpectimax::with_config(with_seed(SearchConfig::expectimax()))),
            PolicyKind::ExpectimaxGrowing => Box::new(BoundedExpectimax::with_config(with_seed(SearchConfig {
                depth: DepthSchedule::Growing { base: 3 },
                ..SearchConfig::expectimax()
            }))),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PolicyKind::Random => "random",
            PolicyKind::Cycle => "cycle",
            PolicyKind::Greedy => "greedy",
            PolicyKind::Expectimax => "expectimax",
            PolicyKind::ExpectimaxGrowing => "expectimax-growing",
        };
        f.write_str(s)
    }
}

impl FromStr for PolicyKind {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PolicyKind::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PolicyError::UnknownPolicy(s.to_string()))
    }
}
