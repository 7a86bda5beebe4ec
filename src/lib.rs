//! slide-2048: a 4x4 sliding-tile (2048) engine + lookahead move-selection policies
//!
//! This crate provides:
//! - A value-type `Grid` with the transition function (`apply`), tile spawning and
//!   terminal classification (`engine` module)
//! - A stateful `GameSession` with score, penalty and move counters (`session` module)
//! - Pluggable policies: uniform random, fixed cycle, greedy lookahead and bounded
//!   expectimax (`policy` module)
//! - A game loop with an in-memory move history (`runner` and `history` modules)
//!
//! Quick start:
//! ```
//! use slide_2048::engine::{Direction, Grid};
//!
//! let g = Grid::new([[2, 0, 2, 0], [0; 4], [0; 4], [0; 4]]);
//! let out = g.apply(Direction::Right);
//! assert!(out.changed);
//! assert_eq!(out.score_delta, 4);
//! assert_eq!(out.grid.rows()[0], [0, 0, 0, 4]);
//! ```
//!
//! Full loop (simplest possible)
//! ```
//! use slide_2048::policy::{BoundedExpectimax, Policy, SearchConfig};
//! use slide_2048::session::GameSession;
//!
//! // 1) Seeded session and policy
//! let mut session = GameSession::with_seed(123);
//! let mut policy = BoundedExpectimax::with_config(SearchConfig::expectimax().with_seed(123));
//!
//! // 2) Loop a couple of moves to demonstrate flow (keep doctests fast)
//! let mut moves = 0u32;
//! while !session.is_over() && moves < 4 {
//!     match policy.decide(session.grid()) {
//!         Some(dir) => {
//!             session.move_direction(dir);
//!             moves += 1;
//!         }
//!         None => break,
//!     }
//! }
//!
//! // 3) Inspect final state
//! assert_eq!(session.total_moves(), 4);
//! assert_eq!(session.invalid_moves(), 0);
//! ```
//!
//! Note: all randomness goes through seedable `StdRng`s owned by sessions and
//! policies. The free functions in `engine` mirror the `Grid` methods and use
//! thread-local RNG where relevant.
//!
pub mod engine;
pub mod history;
pub mod policy;
pub mod runner;
pub mod session;
