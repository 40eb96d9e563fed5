//! Core types for chess.
//!
//! This crate provides the value types shared by the rule engine and the
//! move selector:
//! - [`Color`] for the two sides
//! - [`PieceKind`] and [`Piece`] for pieces standing on the board
//! - [`Square`] for `(row, col)` board coordinates
//! - [`Move`] for move representation
//! - FEN parsing and serialization via [`Fen`]

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{CastlingAvailability, Fen, FenError, Placement};
pub use mov::Move;
pub use piece::{Piece, PieceKind};
pub use square::Square;
