//! Drive one game with a policy until it ends.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::engine::{Score, Tile};
use crate::history::GameHistory;
use crate::policy::Policy;
use crate::session::GameSession;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after this many moves (legal or not).
    pub max_moves: Option<u64>,
}

/// Why [`play_game`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    GameOver,
    /// The policy reported no legal move.
    NoMove,
    MoveLimit,
}

#[derive(Debug, Clone)]
pub struct GameSummary {
    pub policy: &'static str,
    pub stop: StopReason,
    pub true_score: Score,
    pub score: i64,
    pub total_moves: u64,
    pub invalid_moves: u64,
    pub highest_tile: Tile,
    pub elapsed: Duration,
    pub history: GameHistory,
}

/// Loop `decide` then `step` on `session` until it is over, the policy gives
/// up, or the move limit is hit. Accepted moves are recorded in the summary's
/// history.
///
/// ```
/// use slide_2048::policy::FixedCycle;
/// use slide_2048::runner::{play_game, RunOptions, StopReason};
/// use slide_2048::session::GameSession;
/// let mut session = GameSession::with_seed(5);
/// let summary = play_game(&mut session, &mut FixedCycle::new(), &RunOptions::default());
/// assert_eq!(summary.stop, StopReason::GameOver);
/// assert!(session.is_over());
/// assert_eq!(summary.history.len() as u64, session.accepted_moves());
/// ```
pub fn play_game<P: Policy + ?Sized>(session: &mut GameSession, policy: &mut P, opts: &RunOptions) -> GameSummary {
    let start = Instant::now();
    let mut history = GameHistory::new();
    info!("{} starting game", policy.name());

    let stop = loop {
        if session.is_over() {
            break StopReason::GameOver;
        }
        if opts.max_moves.is_some_and(|limit| session.total_moves() >= limit) {
            break StopReason::MoveLimit;
        }
        let pre_move = session.grid();
        let Some(dir) = policy.decide(pre_move) else {
            debug!("{} found no move", policy.name());
            break StopReason::NoMove;
        };
        let result = session.step(dir);
        if result.changed {
            history.record(pre_move, dir, result.score_delta, session.true_score());
        }
    };

    history.finish(session);
    let summary = GameSummary {
        policy: policy.name(),
        stop,
        true_score: session.true_score(),
        score: session.score(),
        total_moves: session.total_moves(),
        invalid_moves: session.invalid_moves(),
        highest_tile: session.grid().highest_tile(),
        elapsed: start.elapsed(),
        history,
    };
    info!(
        "{} finished ({:?}) with {} moves, {} invalid, score {} in {:.2?}",
        summary.policy, summary.stop, summary.total_moves, summary.invalid_moves, summary.true_score, summary.elapsed
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{DepthSchedule, GreedyLookahead, SearchConfig, UniformRandom};

    #[test]
    fn random_policy_plays_to_the_end() {
        let mut session = GameSession::with_seed(12);
        let summary = play_game(&mut session, &mut UniformRandom::with_seed(12), &RunOptions::default());
        assert_eq!(summary.stop, StopReason::GameOver);
        assert_eq!(summary.total_moves, summary.history.len() as u64 + summary.invalid_moves);
        assert_eq!(summary.score, summary.true_score as i64 - summary.invalid_moves as i64);
        let banked: Score = summary.history.steps.iter().map(|s| s.move_score).sum();
        assert_eq!(banked, summary.true_score);
        assert_eq!(summary.history.total_score, summary.true_score);
    }

    #[test]
    fn history_scores_accumulate() {
        let mut session = GameSession::with_seed(30);
        let summary = play_game(&mut session, &mut UniformRandom::with_seed(4), &RunOptions::default());
        let mut running = 0;
        for step in &summary.history.steps {
            running += step.move_score;
            assert_eq!(step.total_score_after_move, running);
        }
    }

    #[test]
    fn move_limit_stops_early() {
        let mut session = GameSession::with_seed(1);
        let cfg = SearchConfig { depth: DepthSchedule::Fixed(1), seed: Some(1), ..SearchConfig::greedy() };
        let opts = RunOptions { max_moves: Some(5) };
        let summary = play_game(&mut session, &mut GreedyLookahead::with_config(cfg), &opts);
        assert_eq!(summary.stop, StopReason::MoveLimit);
        assert_eq!(summary.total_moves, 5);
        assert_eq!(summary.invalid_moves, 0);
    }

    #[test]
    fn boxed_policy_works() {
        let mut session = GameSession::with_seed(2);
        let mut policy: Box<dyn Policy + Send> = crate::policy::PolicyKind::Cycle.build(None);
        let summary = play_game(&mut session, &mut policy, &RunOptions { max_moves: Some(50) });
        assert_eq!(summary.policy, "cycle");
        assert!(summary.total_moves <= 50);
    }
}
