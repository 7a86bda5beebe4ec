//! In-memory record of a played game.
//!
//! One [`HistoryStep`] per accepted move plus end-of-game totals. Both types
//! derive serde traits; choosing an on-disk format is left to the caller.

use serde::{Deserialize, Serialize};

use crate::engine::{Direction, Grid, Score};
use crate::session::GameSession;

/// A single accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStep {
    /// Grid before the move.
    pub game_state: Grid,
    pub direction: Direction,
    pub move_score: Score,
    pub total_score_after_move: Score,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameHistory {
    pub steps: Vec<HistoryStep>,
    pub total_score: Score,
    pub total_moves: u64,
    pub invalid_moves: u64,
}

impl GameHistory {
    pub fn new() -> Self { Self::default() }

    pub fn record(&mut self, pre_move: Grid, direction: Direction, move_score: Score, total_score_after_move: Score) {
        self.steps.push(HistoryStep { game_state: pre_move, direction, move_score, total_score_after_move });
    }

    /// Copy the end-of-game counters from `session`.
    pub fn finish(&mut self, session: &GameSession) {
        self.total_score = session.true_score();
        self.total_moves = session.total_moves();
        self.invalid_moves = session.invalid_moves();
    }

    #[inline]
    pub fn len(&self) -> usize { self.steps.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.steps.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_accepted_moves_and_totals() {
        let start = Grid::new([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut session = GameSession::from_grid(start, 8);
        let mut history = GameHistory::new();

        session.move_direction(Direction::Up);
        let pre = session.grid();
        let r = session.step(Direction::Left);
        history.record(pre, Direction::Left, r.score_delta, session.true_score());
        history.finish(&session);

        assert_eq!(history.len(), 1);
        assert_eq!(history.steps[0].game_state, start);
        assert_eq!(history.steps[0].move_score, 4);
        assert_eq!(history.steps[0].total_score_after_move, 4);
        assert_eq!((history.total_score, history.total_moves, history.invalid_moves), (4, 2, 1));
    }
}
