//! Zobrist hashing for position identification.
//!
//! A position key XORs together random numbers associated with:
//! - each piece on each square (6 kinds x 2 colors x 64 squares)
//! - the side to move
//! - the castling availability derived from the board (4 values)
//! - the en-passant file, when a capture onto it is actually possible
//!
//! Two positions with equal keys are treated as the same position by the
//! repetition rule.

use crate::Board;
use chess_core::{Color, PieceKind, Square};

/// Zobrist hash keys.
///
/// Generated at compile time from a fixed seed, so keys are stable across runs.
pub struct ZobristKeys {
    /// Keys for pieces: [kind][color][square]
    pub pieces: [[[u64; 64]; 2]; 6],
    /// Key for black to move (XOR when black to move).
    pub black_to_move: u64,
    /// Keys for castling rights, in K Q k q order.
    pub castling: [u64; 4],
    /// Keys for en passant file.
    pub en_passant: [u64; 8],
}

impl ZobristKeys {
    /// Initializes the keys with a xorshift64 generator.
    pub const fn new() -> Self {
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E3779B97F4A7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut kind = 0;
        while kind < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    state = next_random(state);
                    pieces[kind][color][square] = state;
                    square += 1;
                }
                color += 1;
            }
            kind += 1;
        }

        state = next_random(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = next_random(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = next_random(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    /// Returns the key for a piece on a square.
    #[inline]
    pub const fn piece_key(&self, kind: PieceKind, color: Color, square: Square) -> u64 {
        self.pieces[kind.index()][color.index()][square.index() as usize]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// Computes the key of `board` with `side` to move.
pub fn position_key(board: &Board, side: Color) -> u64 {
    let mut key = 0u64;
    for piece in board.pieces() {
        key ^= ZOBRIST.piece_key(piece.kind, piece.color, piece.square);
    }

    if side == Color::Black {
        key ^= ZOBRIST.black_to_move;
    }

    let rights = board.castling_availability();
    for (i, set) in [
        rights.white_kingside,
        rights.white_queenside,
        rights.black_kingside,
        rights.black_queenside,
    ]
    .into_iter()
    .enumerate()
    {
        if set {
            key ^= ZOBRIST.castling[i];
        }
    }

    if let Some(target) = board.en_passant().filter(|t| en_passant_capturable(board, *t, side)) {
        key ^= ZOBRIST.en_passant[target.col() as usize];
    }

    key
}

/// A target only distinguishes positions when a pawn of `side` stands next
/// to the pawn that just made the double step.
fn en_passant_capturable(board: &Board, target: Square, side: Color) -> bool {
    let back = -side.pawn_direction();
    [-1, 1].into_iter().any(|dc| {
        target
            .offset(back, dc)
            .and_then(|sq| board.piece_at(sq))
            .is_some_and(|p| p.kind == PieceKind::Pawn && p.color == side)
    })
}
