//! Computer opponent for the chess engine.
//!
//! - [`evaluation`] - material, piece-square and mobility scoring
//! - [`Searcher`] - depth-bounded minimax with alpha-beta pruning
//! - [`MoveSelector`] - per-difficulty policy on top of the search
//! - [`MoveAdvisor`] - seam for an external move source
//!
//! # Example
//!
//! ```
//! use chess_ai::{Difficulty, MoveSelector};
//! use chess_engine::GameState;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut game = GameState::new();
//! let mut ai = MoveSelector::new(Difficulty::Easy, StdRng::seed_from_u64(1));
//! let mv = ai.next_move(game.board(), &game).unwrap();
//! assert!(game.try_move(mv));
//! ```

pub mod advisor;
pub mod config;
pub mod difficulty;
pub mod evaluation;
pub mod search;
mod selector;
pub mod tactics;

pub use advisor::{AdvisorError, AdvisoryRequest, MoveAdvisor};
pub use config::{AiConfig, ConfigError};
pub use difficulty::{Difficulty, DifficultyProfile, ParseDifficultyError, Policy};
pub use evaluation::{evaluate, MATE_SCORE};
pub use search::{SearchOutcome, Searcher};
pub use selector::MoveSelector;
