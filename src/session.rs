//! Stateful game: the authoritative grid plus score and move counters.
//!
//! A session owns its random source, so a seeded session replays the same
//! spawns for the same sequence of moves. `Clone` is a full deep copy
//! (grid, counters and RNG state); search policies clone or rebuild
//! sessions to simulate ahead without touching the real one.

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::{Direction, GameStatus, Grid, Score};

/// Reward reported by [`GameSession::move_direction`] for an illegal move.
pub const ILLEGAL_MOVE: i64 = -1;

/// Outcome of a move applied to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub changed: bool,
    pub score_delta: Score,
}

impl MoveResult {
    /// Collapse into the historical single-integer reward: the score delta, or
    /// [`ILLEGAL_MOVE`]. A legal move without merges also reports `0`.
    #[inline]
    pub fn reward(self) -> i64 {
        if self.changed { self.score_delta as i64 } else { ILLEGAL_MOVE }
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    grid: Grid,
    score: i64,
    true_score: Score,
    total_moves: u64,
    invalid_moves: u64,
    rng: StdRng,
}

impl GameSession {
    /// New game with two starting tiles, seeded from OS entropy.
    pub fn new() -> Self { Self::with_rng(StdRng::from_entropy()) }

    /// New game with two starting tiles and a deterministic random source.
    ///
    /// ```
    /// use slide_2048::session::GameSession;
    /// let a = GameSession::with_seed(9);
    /// let b = GameSession::with_seed(9);
    /// assert_eq!(a.grid(), b.grid());
    /// assert_eq!(a.grid().count_empty(), 14);
    /// ```
    pub fn with_seed(seed: u64) -> Self { Self::with_rng(StdRng::seed_from_u64(seed)) }

    fn with_rng(mut rng: StdRng) -> Self {
        let grid = Grid::new_game(&mut rng);
        Self { grid, score: 0, true_score: 0, total_moves: 0, invalid_moves: 0, rng }
    }

    /// Session over an arbitrary grid with zeroed counters. No tiles are added.
    pub fn from_grid(grid: Grid, seed: u64) -> Self {
        Self {
            grid,
            score: 0,
            true_score: 0,
            total_moves: 0,
            invalid_moves: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Apply `dir`; on success spawn one tile and bank the score, otherwise
    /// charge the one-point penalty.
    pub fn step(&mut self, dir: Direction) -> MoveResult {
        let outcome = self.grid.apply(dir);
        self.total_moves += 1;
        if !outcome.changed {
            self.invalid_moves += 1;
            self.score -= 1;
            debug!("illegal move {dir}, score now {}", self.score);
            return MoveResult { changed: false, score_delta: 0 };
        }
        self.grid = outcome
            .grid
            .with_random_tile(&mut self.rng)
            .expect("a changed move always leaves an empty cell");
        self.true_score += outcome.score_delta;
        self.score += outcome.score_delta as i64;
        debug!("move {dir} earned {}, true score {}", outcome.score_delta, self.true_score);
        MoveResult { changed: true, score_delta: outcome.score_delta }
    }

    /// Apply `dir` and return the score delta, or [`ILLEGAL_MOVE`].
    ///
    /// ```
    /// use slide_2048::engine::{Direction, Grid};
    /// use slide_2048::session::{GameSession, ILLEGAL_MOVE};
    /// let mut s = GameSession::from_grid(Grid::new([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]), 0);
    /// assert_eq!(s.move_direction(Direction::Left), 4);
    /// assert_eq!(s.true_score(), 4);
    /// let mut stuck = GameSession::from_grid(Grid::new([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]), 0);
    /// assert_eq!(stuck.move_direction(Direction::Up), ILLEGAL_MOVE);
    /// assert_eq!(stuck.score(), -1);
    /// ```
    #[inline]
    pub fn move_direction(&mut self, dir: Direction) -> i64 { self.step(dir).reward() }

    #[inline]
    pub fn up(&mut self) -> i64 { self.move_direction(Direction::Up) }

    #[inline]
    pub fn down(&mut self) -> i64 { self.move_direction(Direction::Down) }

    #[inline]
    pub fn left(&mut self) -> i64 { self.move_direction(Direction::Left) }

    #[inline]
    pub fn right(&mut self) -> i64 { self.move_direction(Direction::Right) }

    /// Apply `dirs` in order, stopping at the first move that scores. Returns the
    /// last attempted reward; `0` when `dirs` is empty.
    pub fn multi_move(&mut self, dirs: &[Direction]) -> i64 {
        let mut last = 0;
        for &dir in dirs {
            last = self.move_direction(dir);
            if last > 0 {
                break;
            }
        }
        last
    }

    #[inline]
    pub fn status(&self) -> GameStatus { self.grid.status() }

    #[inline]
    pub fn is_over(&self) -> bool { self.grid.is_game_over() }

    /// Read-only snapshot of the current grid.
    #[inline]
    pub fn grid(&self) -> Grid { self.grid }

    /// Running score including the illegal-move penalty.
    #[inline]
    pub fn score(&self) -> i64 { self.score }

    #[inline]
    pub fn true_score(&self) -> Score { self.true_score }

    #[inline]
    pub fn total_moves(&self) -> u64 { self.total_moves }

    #[inline]
    pub fn invalid_moves(&self) -> u64 { self.invalid_moves }

    #[inline]
    pub fn accepted_moves(&self) -> u64 { self.total_moves - self.invalid_moves }
}

impl Default for GameSession {
    fn default() -> Self { Self::new() }
}
