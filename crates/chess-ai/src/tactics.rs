//! Cheap one-ply heuristics used by the weaker and the reactive opponents.
//!
//! None of these look beyond the current position: "attacked" means an enemy
//! piece attacks the square right now.

use chess_core::{Color, Move, Piece, PieceKind, Square};
use chess_engine::{attacks_square, is_king_attacked, legal_moves, legal_moves_from, Board};
use rand::seq::SliceRandom;
use rand::Rng;

/// Bonus for a defensive move that lands on an unattacked square.
pub const SAFE_SQUARE_BONUS: i32 = 50;

/// Bonus for a tactical move that gives check.
pub const CHECK_BONUS: i32 = 30;

/// Chance that a mediocre player goes for a capture on a guarded square.
pub const BAD_TRADE_PROBABILITY: f64 = 0.4;

/// Rough piece values for tactical scoring. Minor pieces are equal here.
pub const fn tactical_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight | PieceKind::Bishop => 300,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 10_000,
    }
}

fn attacked_by_enemy(board: &Board, sq: Square, side: Color) -> bool {
    attacks_square(board, sq, side.opposite())
}

/// `side`'s pieces that an enemy piece currently attacks.
pub fn threatened_pieces(board: &Board, side: Color) -> Vec<Piece> {
    board
        .pieces_of(side)
        .into_iter()
        .filter(|p| attacked_by_enemy(board, p.square, side))
        .collect()
}

/// Whether `mv` leaves the opponent of the mover in check.
pub fn gives_check(board: &Board, mv: Move) -> bool {
    let Some(piece) = board.piece_at(mv.from) else {
        return false;
    };
    let mut probe = board.clone();
    probe.apply(mv);
    is_king_attacked(&probe, piece.color.opposite())
}

/// Moves that save threatened pieces: retreats to unattacked squares, then
/// moves by other pieces that newly guard the threatened square.
pub fn defensive_moves(board: &Board, side: Color, threatened: &[Piece]) -> Vec<Move> {
    let mut moves = Vec::new();
    let legal = legal_moves(board, side);

    for target in threatened {
        moves.extend(
            legal_moves_from(board, target.square, side)
                .into_iter()
                .filter(|mv| !attacked_by_enemy(board, mv.to, side)),
        );

        if attacks_square(board, target.square, side) {
            continue;
        }
        moves.extend(legal.iter().copied().filter(|mv| {
            if mv.from == target.square {
                return false;
            }
            let mut probe = board.clone();
            probe.apply(*mv);
            probe.piece_at(target.square).is_some_and(|p| p.color == side)
                && attacks_square(&probe, target.square, side)
        }));
    }
    moves
}

/// Value of the moving piece, plus a bonus when it lands safely.
pub fn score_defensive_move(board: &Board, side: Color, mv: Move) -> i32 {
    let Some(piece) = board.piece_at(mv.from) else {
        return 0;
    };
    let mut score = tactical_value(piece.kind);
    if !attacked_by_enemy(board, mv.to, side) {
        score += SAFE_SQUARE_BONUS;
    }
    score
}

/// Captures and checking moves, each listed once.
pub fn tactical_moves(board: &Board, side: Color) -> Vec<Move> {
    legal_moves(board, side)
        .into_iter()
        .filter(|mv| is_capture(board, side, *mv) || gives_check(board, *mv))
        .collect()
}

/// Victim value plus a bonus for giving check.
pub fn score_tactical_move(board: &Board, side: Color, mv: Move) -> i32 {
    let mut score = board
        .piece_at(mv.to)
        .filter(|p| p.color != side)
        .map_or(0, |p| tactical_value(p.kind));
    if gives_check(board, mv) {
        score += CHECK_BONUS;
    }
    score
}

fn is_capture(board: &Board, side: Color, mv: Move) -> bool {
    board.piece_at(mv.to).is_some_and(|p| p.color != side)
}

/// Highest scoring move; ties go to the earliest.
pub fn best_by(moves: &[Move], mut score: impl FnMut(Move) -> i32) -> Option<Move> {
    let mut best: Option<(Move, i32)> = None;
    for &mv in moves {
        let s = score(mv);
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((mv, s));
        }
    }
    best.map(|(mv, _)| mv)
}

/// Random legal move favoring pawns (x3) and minor pieces (x2).
pub fn beginner_weighted<R: Rng>(board: &Board, side: Color, rng: &mut R) -> Option<Move> {
    let mut pool = Vec::new();
    for mv in legal_moves(board, side) {
        let weight = match board.piece_at(mv.from).map(|p| p.kind) {
            Some(PieceKind::Pawn) => 3,
            Some(kind) if kind.is_minor() => 2,
            _ => 1,
        };
        pool.extend(std::iter::repeat(mv).take(weight));
    }
    pool.choose(rng).copied()
}

/// Weighted pool of careless moves.
///
/// Non-king moves onto attacked squares come first, weighted pawn 3,
/// queen 1, others 2. Then every move of an unthreatened piece to an
/// unattacked square, once each, which ignores whatever is hanging.
pub fn bad_moves(board: &Board, side: Color) -> Vec<Move> {
    let mut pool = Vec::new();
    let legal = legal_moves(board, side);

    for &mv in &legal {
        let Some(piece) = board.piece_at(mv.from) else {
            continue;
        };
        if piece.kind == PieceKind::King || !attacked_by_enemy(board, mv.to, side) {
            continue;
        }
        let weight = match piece.kind {
            PieceKind::Pawn => 3,
            PieceKind::Queen => 1,
            _ => 2,
        };
        pool.extend(std::iter::repeat(mv).take(weight));
    }

    for &mv in &legal {
        if attacked_by_enemy(board, mv.from, side) || attacked_by_enemy(board, mv.to, side) {
            continue;
        }
        pool.push(mv);
    }
    pool
}

/// Weighted pool of middling moves.
///
/// Safe captures count three times, quiet moves to unattacked squares
/// once, and captures onto guarded squares make it in only sometimes.
pub fn mediocre_moves<R: Rng>(board: &Board, side: Color, rng: &mut R) -> Vec<Move> {
    let mut pool = Vec::new();
    for mv in legal_moves(board, side) {
        let guarded = attacked_by_enemy(board, mv.to, side);
        if is_capture(board, side, mv) {
            if !guarded {
                pool.extend([mv; 3]);
            } else if rng.gen::<f64>() < BAD_TRADE_PROBABILITY {
                pool.push(mv);
            }
        } else if !guarded {
            pool.push(mv);
        }
    }
    pool
}
