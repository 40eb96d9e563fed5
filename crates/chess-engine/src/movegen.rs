//! Pseudo-legal move generation.
//!
//! Moves produced here respect the board edges and never land on a piece of
//! the mover's own color, but they may leave the mover's king in check.
//! Filtering for king safety is done by [`crate::rules`].
//!
//! Each piece kind has a generator; [`GENERATORS`] is indexed by
//! [`PieceKind::index`].

use crate::Board;
use chess_core::{Color, Move, Piece, PieceKind, Square};

/// A per-kind generator appending the pseudo-legal moves of one piece.
pub type Generator = fn(&Board, Piece, &mut Vec<Move>);

/// Generators in [`PieceKind`] order.
pub const GENERATORS: [Generator; 6] = [
    pawn_moves,
    knight_moves,
    bishop_moves,
    rook_moves,
    queen_moves,
    king_moves,
];

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub(crate) const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub(crate) const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Pseudo-legal moves of the piece on `sq`; empty if the square is empty.
pub fn pseudo_legal_moves(board: &Board, sq: Square) -> Vec<Move> {
    match board.piece_at(sq) {
        Some(piece) => piece_moves(board, piece),
        None => Vec::new(),
    }
}

/// Pseudo-legal moves of a piece standing on the board.
pub fn piece_moves(board: &Board, piece: Piece) -> Vec<Move> {
    let mut moves = Vec::with_capacity(28);
    GENERATORS[piece.kind.index()](board, piece, &mut moves);
    moves
}

/// Pseudo-legal moves of every piece of one color, in scan order.
pub fn all_pseudo_legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for piece in board.pieces().filter(|p| p.color == color) {
        GENERATORS[piece.kind.index()](board, piece, &mut moves);
    }
    moves
}

/// Returns true if the target may be entered by `mover`: empty or enemy-held.
#[inline]
fn can_enter(board: &Board, target: Square, mover: Color) -> bool {
    board.piece_at(target).map_or(true, |p| p.color != mover)
}

fn push_steps(board: &Board, piece: Piece, offsets: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(dr, dc) in offsets {
        if let Some(target) = piece.square.offset(dr, dc) {
            if can_enter(board, target, piece.color) {
                moves.push(Move::new(piece.square, target));
            }
        }
    }
}

fn push_rays(board: &Board, piece: Piece, directions: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(dr, dc) in directions {
        let mut cursor = piece.square;
        while let Some(target) = cursor.offset(dr, dc) {
            match board.piece_at(target) {
                None => moves.push(Move::new(piece.square, target)),
                Some(other) => {
                    if other.color != piece.color {
                        moves.push(Move::new(piece.square, target));
                    }
                    break;
                }
            }
            cursor = target;
        }
    }
}

fn pawn_moves(board: &Board, piece: Piece, moves: &mut Vec<Move>) {
    let from = piece.square;
    let dir = piece.color.pawn_direction();

    if let Some(one) = from.offset(dir, 0).filter(|sq| board.is_empty(*sq)) {
        moves.push(Move::new(from, one));
        if !piece.has_moved && from.row() == piece.color.pawn_row() {
            if let Some(two) = from.offset(2 * dir, 0).filter(|sq| board.is_empty(*sq)) {
                moves.push(Move::new(from, two));
            }
        }
    }

    for dc in [-1, 1] {
        let Some(target) = from.offset(dir, dc) else {
            continue;
        };
        match board.piece_at(target) {
            Some(victim) if victim.color != piece.color => moves.push(Move::new(from, target)),
            Some(_) => {}
            None if board.en_passant() == Some(target) => {
                let bypassed = from.offset(0, dc).and_then(|sq| board.piece_at(sq));
                if bypassed.is_some_and(|p| p.kind == PieceKind::Pawn && p.color != piece.color) {
                    moves.push(Move::new(from, target));
                }
            }
            None => {}
        }
    }
}

fn knight_moves(board: &Board, piece: Piece, moves: &mut Vec<Move>) {
    push_steps(board, piece, &KNIGHT_OFFSETS, moves);
}

fn bishop_moves(board: &Board, piece: Piece, moves: &mut Vec<Move>) {
    push_rays(board, piece, &DIAGONAL, moves);
}

fn rook_moves(board: &Board, piece: Piece, moves: &mut Vec<Move>) {
    push_rays(board, piece, &ORTHOGONAL, moves);
}

fn queen_moves(board: &Board, piece: Piece, moves: &mut Vec<Move>) {
    push_rays(board, piece, &ORTHOGONAL, moves);
    push_rays(board, piece, &DIAGONAL, moves);
}

fn king_moves(board: &Board, piece: Piece, moves: &mut Vec<Move>) {
    push_steps(board, piece, &KING_OFFSETS, moves);

    if piece.has_moved {
        return;
    }
    // Castling: unmoved same-color rook in the corner and an empty path.
    let from = piece.square;
    for (corner_col, step) in [(7u8, 1i8), (0u8, -1i8)] {
        let rook = Square::new(from.row(), corner_col).and_then(|sq| board.piece_at(sq));
        if !rook.is_some_and(|r| r.kind == PieceKind::Rook && r.color == piece.color && !r.has_moved) {
            continue;
        }
        let (lo, hi) = if step > 0 {
            (from.col() + 1, corner_col)
        } else {
            (corner_col + 1, from.col())
        };
        let path_clear = (lo..hi)
            .filter_map(|col| Square::new(from.row(), col))
            .all(|sq| board.is_empty(sq));
        if let Some(target) = from.offset(0, 2 * step).filter(|_| path_clear) {
            moves.push(Move::new(from, target));
        }
    }
}

/// Returns true if any piece of `by` could capture on `target`.
///
/// The occupant of `target` is ignored, so a square holding one of `by`'s
/// own pieces reports whether that piece is defended.
pub fn attacks_square(board: &Board, target: Square, by: Color) -> bool {
    // A pawn of `by` attacks one row ahead of itself, so look one row back.
    let back = -by.pawn_direction();
    let pawn_sources = [(back, -1), (back, 1)];

    step_hits(board, target, by, &pawn_sources, PieceKind::Pawn)
        || step_hits(board, target, by, &KNIGHT_OFFSETS, PieceKind::Knight)
        || step_hits(board, target, by, &KING_OFFSETS, PieceKind::King)
        || ray_hits(board, target, by, &ORTHOGONAL, PieceKind::Rook)
        || ray_hits(board, target, by, &DIAGONAL, PieceKind::Bishop)
}

fn step_hits(board: &Board, target: Square, by: Color, offsets: &[(i8, i8)], kind: PieceKind) -> bool {
    offsets.iter().any(|&(dr, dc)| {
        target
            .offset(dr, dc)
            .and_then(|sq| board.piece_at(sq))
            .is_some_and(|p| p.color == by && p.kind == kind)
    })
}

/// Walks outward from `target`; the first piece met on each ray attacks it
/// when it is `by`'s slider of `kind` or a queen.
fn ray_hits(board: &Board, target: Square, by: Color, directions: &[(i8, i8)], kind: PieceKind) -> bool {
    directions.iter().any(|&(dr, dc)| {
        let mut cursor = target;
        while let Some(next) = cursor.offset(dr, dc) {
            if let Some(blocker) = board.piece_at(next) {
                return blocker.color == by
                    && (blocker.kind == kind || blocker.kind == PieceKind::Queen);
            }
            cursor = next;
        }
        false
    })
}

/// Returns true if `color`'s king stands on an attacked square.
///
/// A board without a king of that color is never in check.
pub fn is_king_attacked(board: &Board, color: Color) -> bool {
    board
        .king_of(color)
        .is_some_and(|king| attacks_square(board, king, color.opposite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn targets(moves: &[Move]) -> Vec<String> {
        let mut names: Vec<String> = moves.iter().map(|m| m.to.to_algebraic()).collect();
        names.sort();
        names
    }

    #[test]
    fn startpos_counts() {
        let board = Board::new();
        assert_eq!(all_pseudo_legal_moves(&board, Color::White).len(), 20);
        assert_eq!(all_pseudo_legal_moves(&board, Color::Black).len(), 20);
        assert!(pseudo_legal_moves(&board, sq("e4")).is_empty());
    }

    #[test]
    fn generator_table_matches_kind_order() {
        let board = Board::from_fen("8/8/8/8/3N4/8/8/8 w - - 0 1").unwrap();
        let knight = board.piece_at(sq("d4")).unwrap();
        let mut via_table = Vec::new();
        GENERATORS[PieceKind::Knight.index()](&board, knight, &mut via_table);
        assert_eq!(via_table.len(), 8);
        assert_eq!(via_table, pseudo_legal_moves(&board, sq("d4")));
    }

    #[test]
    fn knight_in_corner() {
        let board = Board::new();
        assert_eq!(targets(&pseudo_legal_moves(&board, Square::B1)), ["a3", "c3"]);
    }

    #[test]
    fn rook_stops_at_blockers() {
        let board = Board::from_fen("8/8/8/3p4/8/8/3R1P2/8 w - - 0 1").unwrap();
        let moves = pseudo_legal_moves(&board, sq("d2"));
        assert_eq!(
            targets(&moves),
            ["a2", "b2", "c2", "d1", "d3", "d4", "d5", "e2"]
        );
    }

    #[test]
    fn queen_combines_rays() {
        let board = Board::from_fen("8/8/8/8/3Q4/8/8/8 w - - 0 1").unwrap();
        assert_eq!(pseudo_legal_moves(&board, sq("d4")).len(), 27);
    }

    #[test]
    fn pawn_pushes_and_captures() {
        let board = Board::from_fen("8/8/8/8/8/3p1p2/4P3/8 w - - 0 1").unwrap();
        assert_eq!(
            targets(&pseudo_legal_moves(&board, sq("e2"))),
            ["d3", "e3", "e4", "f3"]
        );

        let blocked = Board::from_fen("8/8/8/8/4p3/8/4P3/8 w - - 0 1").unwrap();
        assert_eq!(targets(&pseudo_legal_moves(&blocked, sq("e2"))), ["e3"]);

        let black = Board::from_fen("8/4p3/8/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(targets(&pseudo_legal_moves(&black, sq("e7"))), ["e5", "e6"]);
    }

    #[test]
    fn moved_pawn_has_no_double_step() {
        let board = Board::from_fen("8/8/8/8/8/4P3/8/8 w - - 0 1").unwrap();
        assert_eq!(targets(&pseudo_legal_moves(&board, sq("e3"))), ["e4"]);
    }

    #[test]
    fn en_passant_only_with_target() {
        let with_target = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert!(targets(&pseudo_legal_moves(&with_target, sq("e5"))).contains(&"d6".to_string()));

        let without = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(!targets(&pseudo_legal_moves(&without, sq("e5"))).contains(&"d6".to_string()));
    }

    #[test]
    fn castling_generated_when_path_empty() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = targets(&pseudo_legal_moves(&board, Square::E1));
        assert!(moves.contains(&"g1".to_string()));
        assert!(moves.contains(&"c1".to_string()));

        let blocked = Board::from_fen("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1").unwrap();
        let moves = targets(&pseudo_legal_moves(&blocked, Square::E1));
        assert!(!moves.contains(&"g1".to_string()));
        assert!(!moves.contains(&"c1".to_string()));
    }

    #[test]
    fn castling_needs_unmoved_rook() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w K - 0 1").unwrap();
        let moves = targets(&pseudo_legal_moves(&board, Square::E1));
        assert!(moves.contains(&"g1".to_string()));
        assert!(!moves.contains(&"c1".to_string()));
    }

    #[test]
    fn attacks_by_each_kind() {
        let board = Board::from_fen("8/8/8/8/8/8/3p4/R3K3 w - - 0 1").unwrap();
        // Black pawn on d2 attacks c1 and e1.
        assert!(attacks_square(&board, Square::E1, Color::Black));
        assert!(attacks_square(&board, Square::C1, Color::Black));
        assert!(!attacks_square(&board, Square::D1, Color::Black));
        // White rook covers the first rank up to the king.
        assert!(attacks_square(&board, Square::D1, Color::White));
        assert!(attacks_square(&board, sq("a8"), Color::White));
        assert!(is_king_attacked(&board, Color::White));
        assert!(!is_king_attacked(&board, Color::Black));
    }

    #[test]
    fn attacks_report_defended_pieces() {
        let board = Board::from_fen("8/8/8/8/8/2N5/8/R7 w - - 0 1").unwrap();
        assert!(!attacks_square(&board, sq("c3"), Color::White));
        let board = Board::from_fen("8/8/8/8/8/2N5/1P6/8 w - - 0 1").unwrap();
        assert!(attacks_square(&board, sq("c3"), Color::White));
    }

    fn random_board(seed: u64, plies: usize) -> Board {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::new();
        let mut side = Color::White;
        for _ in 0..plies {
            let moves = all_pseudo_legal_moves(&board, side);
            let Some(mv) = moves.choose(&mut rng) else {
                break;
            };
            board.apply(*mv);
            if board.king_of(Color::White).is_none() || board.king_of(Color::Black).is_none() {
                break;
            }
            side = side.opposite();
        }
        board
    }

    proptest! {
        #[test]
        fn pseudo_legal_moves_stay_on_board_and_off_own_pieces(seed in any::<u64>(), plies in 0usize..60) {
            let board = random_board(seed, plies);
            for color in Color::BOTH {
                for mv in all_pseudo_legal_moves(&board, color) {
                    let mover = board.piece_at(mv.from).unwrap();
                    prop_assert_eq!(mover.color, color);
                    prop_assert!(mv.to.row() < 8 && mv.to.col() < 8);
                    prop_assert!(board.piece_at(mv.to).map_or(true, |p| p.color != color));
                }
            }
        }

        #[test]
        fn every_piece_sits_on_its_own_square(seed in any::<u64>(), plies in 0usize..60) {
            let board = random_board(seed, plies);
            for piece in board.pieces() {
                prop_assert_eq!(board.piece_at(piece.square), Some(piece));
            }
        }
    }
}
