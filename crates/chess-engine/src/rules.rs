//! Legality filtering and board-level rule predicates.
//!
//! A pseudo-legal move is legal when, played on a copy of the board, it does
//! not leave the mover's king attacked. Castling additionally may not start
//! from check or cross an attacked square.

use crate::movegen::{attacks_square, is_king_attacked, pseudo_legal_moves};
use crate::Board;
use chess_core::{Color, Move, Piece, PieceKind, Square};

/// Reason a position counts as drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// The same position occurred three times.
    ThreefoldRepetition,
    /// Neither side can possibly deliver mate.
    InsufficientMaterial,
    /// 100 plies without a pawn move or capture.
    FiftyMoveRule,
}

impl std::fmt::Display for DrawReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawReason::ThreefoldRepetition => write!(f, "threefold repetition"),
            DrawReason::InsufficientMaterial => write!(f, "insufficient material"),
            DrawReason::FiftyMoveRule => write!(f, "fifty-move rule"),
        }
    }
}

/// Legal moves of the piece on `sq`, provided it belongs to `side`.
pub fn legal_moves_from(board: &Board, sq: Square, side: Color) -> Vec<Move> {
    let Some(piece) = board.piece_at(sq).filter(|p| p.color == side) else {
        return Vec::new();
    };
    pseudo_legal_moves(board, sq)
        .into_iter()
        .filter(|mv| is_legal(board, piece, *mv))
        .collect()
}

/// All legal moves of `side`, in scan order then per-piece generation order.
pub fn legal_moves(board: &Board, side: Color) -> Vec<Move> {
    Square::all()
        .flat_map(|sq| legal_moves_from(board, sq, side))
        .collect()
}

/// Returns true if `side` has at least one legal move.
pub fn has_legal_move(board: &Board, side: Color) -> bool {
    board
        .pieces_of(side)
        .into_iter()
        .any(|piece| {
            pseudo_legal_moves(board, piece.square)
                .into_iter()
                .any(|mv| is_legal(board, piece, mv))
        })
}

/// Returns true if `side`'s king is attacked.
#[inline]
pub fn is_in_check(board: &Board, side: Color) -> bool {
    is_king_attacked(board, side)
}

fn is_legal(board: &Board, piece: Piece, mv: Move) -> bool {
    let col_delta = mv.to.col() as i8 - mv.from.col() as i8;
    if piece.kind == PieceKind::King && col_delta.abs() == 2 {
        let enemy = piece.color.opposite();
        if is_king_attacked(board, piece.color) {
            return false;
        }
        let crossed = mv.from.offset(0, col_delta.signum());
        if crossed.is_some_and(|sq| attacks_square(board, sq, enemy)) {
            return false;
        }
    }

    let mut probe = board.clone();
    probe.apply(mv);
    !is_king_attacked(&probe, piece.color)
}

/// Returns true if no sequence of legal moves can end in mate.
///
/// Covers bare kings, a single minor piece against a bare king, and any
/// number of bishops that all stand on squares of one color.
pub fn has_insufficient_material(board: &Board) -> bool {
    let mut minors = 0;
    let mut knights = 0;
    let mut bishop_shades = [false; 2];

    for piece in board.pieces() {
        match piece.kind {
            PieceKind::King => {}
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            PieceKind::Knight => {
                minors += 1;
                knights += 1;
            }
            PieceKind::Bishop => {
                minors += 1;
                bishop_shades[piece.square.is_dark() as usize] = true;
            }
        }
    }

    if minors <= 1 {
        return true;
    }
    knights == 0 && !(bishop_shades[0] && bishop_shades[1])
}
