//! Chess rules engine on a mailbox board.
//!
//! This crate provides:
//! - [`Board`] - 8x8 grid owning the pieces, with move application
//! - [`movegen`] - per-kind pseudo-legal move generation and attack detection
//! - [`rules`] - legality filtering under check constraints, draw predicates
//! - [`GameState`] - turn order, status, history, notation and draw tracking
//! - SAN notation parsing and generation
//!
//! # Example
//!
//! ```
//! use chess_engine::{GameState, GameStatus};
//!
//! let mut game = GameState::new();
//! game.make_move_san("e4").unwrap();
//! game.make_move_coordinate("e7e5").unwrap();
//! assert_eq!(game.status(), GameStatus::InProgress);
//! assert_eq!(game.history_text(), "1. e4 e5");
//! ```

mod board;
mod game;
pub mod movegen;
pub mod rules;
pub mod san;
pub mod zobrist;

pub use board::Board;
pub use game::{GameError, GameMove, GameState, GameStatus};
pub use movegen::{attacks_square, is_king_attacked, pseudo_legal_moves};
pub use rules::{legal_moves, legal_moves_from, DrawReason};
pub use san::{move_to_san, san_to_move, SanError};
