//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"

use crate::rules::{has_legal_move, is_in_check, legal_moves};
use crate::Board;
use chess_core::{Color, Move, Piece, PieceKind, Square};
use thiserror::Error;

/// Error type for SAN parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    /// The SAN string is empty.
    #[error("empty SAN string")]
    Empty,
    /// The SAN string has invalid format.
    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),
    /// No legal move matches the SAN.
    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),
    /// Multiple legal moves match the SAN (ambiguous).
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Converts a move to SAN notation.
///
/// The board must be the state BEFORE the move is made, and the move should
/// be legal on it. A move from an empty square falls back to coordinate
/// notation.
pub fn move_to_san(board: &Board, mv: Move) -> String {
    let Some(piece) = board.piece_at(mv.from) else {
        return mv.to_coordinate();
    };

    let mut san = String::new();
    let col_delta = mv.to.col() as i8 - mv.from.col() as i8;

    if piece.kind == PieceKind::King && col_delta.abs() == 2 {
        san.push_str(if col_delta > 0 { "O-O" } else { "O-O-O" });
        return add_check_suffix(board, piece.color, mv, san);
    }

    if let Some(letter) = piece.kind.notation_letter() {
        san.push(letter);
        san.push_str(&disambiguation(board, mv, piece));
    }

    let is_capture =
        board.piece_at(mv.to).is_some() || (piece.kind == PieceKind::Pawn && col_delta != 0);
    if is_capture {
        if piece.kind == PieceKind::Pawn {
            san.push(mv.from.file_char());
        }
        san.push('x');
    }

    san.push_str(&mv.to.to_algebraic());

    if piece.kind == PieceKind::Pawn && mv.to.row() == piece.color.promotion_row() {
        san.push('=');
        san.push(
            promotion_kind(mv)
                .notation_letter()
                .unwrap_or('Q'),
        );
    }

    add_check_suffix(board, piece.color, mv, san)
}

/// The kind a promoting move turns into: its own choice, or a queen.
fn promotion_kind(mv: Move) -> PieceKind {
    match mv.promotion {
        Some(kind) if kind != PieceKind::Pawn && kind != PieceKind::King => kind,
        _ => PieceKind::Queen,
    }
}

/// Parses a SAN string and returns the matching legal move for `side`.
pub fn san_to_move(board: &Board, side: Color, san: &str) -> Result<Move, SanError> {
    let san = san.trim();
    if san.is_empty() {
        return Err(SanError::Empty);
    }

    // Remove check/checkmate suffix for parsing
    let san = san.trim_end_matches(['#', '+', '!', '?']);

    if san == "O-O" || san == "0-0" {
        return find_castling_move(board, side, true);
    }
    if san == "O-O-O" || san == "0-0-0" {
        return find_castling_move(board, side, false);
    }

    let parsed = parse_san_components(san)?;
    find_matching_move(board, side, &parsed, san)
}

/// Parsed components of a SAN string.
#[derive(Debug)]
struct ParsedSan {
    kind: PieceKind,
    from_col: Option<u8>,
    from_row: Option<u8>,
    to: Square,
    promotion: Option<PieceKind>,
}

fn parse_san_components(san: &str) -> Result<ParsedSan, SanError> {
    if !san.is_ascii() {
        return Err(SanError::InvalidFormat(san.to_string()));
    }
    let mut body = san;

    let kind = match body.chars().next().and_then(PieceKind::from_notation_letter) {
        Some(kind) => {
            body = &body[1..];
            kind
        }
        None => PieceKind::Pawn,
    };

    let (body, promotion) = match body.split_once('=') {
        Some((head, promo)) => {
            let mut letters = promo.chars();
            let promo_kind = match (letters.next(), letters.next()) {
                (Some(c), None) => PieceKind::from_notation_letter(c),
                _ => None,
            }
            .ok_or_else(|| SanError::InvalidFormat(format!("invalid promotion: {}", san)))?;
            (head, Some(promo_kind))
        }
        // Tolerate "e8Q" without the equals sign.
        None => match body.chars().last().filter(|c| "QRBN".contains(*c)) {
            Some(c) if kind == PieceKind::Pawn => {
                (&body[..body.len() - 1], PieceKind::from_notation_letter(c))
            }
            _ => (body, None),
        },
    };

    let body: String = body.chars().filter(|c| *c != 'x').collect();
    if body.len() < 2 {
        return Err(SanError::InvalidFormat(format!("too short: {}", san)));
    }

    let (disambig, dest) = body.split_at(body.len() - 2);
    let to = Square::from_algebraic(dest)
        .ok_or_else(|| SanError::InvalidFormat(format!("invalid destination: {}", san)))?;
    let (from_col, from_row) = parse_disambiguation(disambig)?;

    Ok(ParsedSan {
        kind,
        from_col,
        from_row,
        to,
        promotion,
    })
}

fn parse_disambiguation(s: &str) -> Result<(Option<u8>, Option<u8>), SanError> {
    let file = |c: char| ('a'..='h').contains(&c).then(|| c as u8 - b'a');
    let rank = |c: char| ('1'..='8').contains(&c).then(|| b'8' - c as u8);

    let chars: Vec<char> = s.chars().collect();
    match chars.as_slice() {
        [] => Ok((None, None)),
        [c] => match (file(*c), rank(*c)) {
            (Some(col), _) => Ok((Some(col), None)),
            (None, Some(row)) => Ok((None, Some(row))),
            _ => Err(SanError::InvalidFormat(format!(
                "invalid disambiguation: {}",
                s
            ))),
        },
        [f, r] => match (file(*f), rank(*r)) {
            (Some(col), Some(row)) => Ok((Some(col), Some(row))),
            _ => Err(SanError::InvalidFormat(format!(
                "invalid disambiguation: {}",
                s
            ))),
        },
        _ => Err(SanError::InvalidFormat(format!(
            "disambiguation too long: {}",
            s
        ))),
    }
}

fn find_castling_move(board: &Board, side: Color, kingside: bool) -> Result<Move, SanError> {
    let step: i8 = if kingside { 2 } else { -2 };
    legal_moves(board, side)
        .into_iter()
        .find(|mv| {
            board
                .piece_at(mv.from)
                .is_some_and(|p| p.kind == PieceKind::King)
                && mv.to.col() as i8 - mv.from.col() as i8 == step
        })
        .ok_or_else(|| SanError::NoMatchingMove(if kingside { "O-O" } else { "O-O-O" }.to_string()))
}

fn find_matching_move(
    board: &Board,
    side: Color,
    parsed: &ParsedSan,
    san: &str,
) -> Result<Move, SanError> {
    let mut matching: Vec<Move> = Vec::new();

    for mv in legal_moves(board, side) {
        if mv.to != parsed.to {
            continue;
        }
        let Some(piece) = board.piece_at(mv.from) else {
            continue;
        };
        if piece.kind != parsed.kind {
            continue;
        }
        if parsed.from_col.is_some_and(|col| mv.from.col() != col) {
            continue;
        }
        if parsed.from_row.is_some_and(|row| mv.from.row() != row) {
            continue;
        }

        let promotes = piece.kind == PieceKind::Pawn && mv.to.row() == side.promotion_row();
        match (promotes, parsed.promotion) {
            (true, Some(kind)) => matching.push(Move::with_promotion(mv.from, mv.to, kind)),
            (true, None) => matching.push(Move::with_promotion(mv.from, mv.to, PieceKind::Queen)),
            (false, Some(_)) => continue,
            (false, None) => matching.push(mv),
        }
    }

    match matching.as_slice() {
        [] => Err(SanError::NoMatchingMove(san.to_string())),
        [only] => Ok(*only),
        _ => Err(SanError::AmbiguousMove(san.to_string())),
    }
}

/// File, rank or full square needed to tell `mv` apart from other legal
/// moves of the same kind to the same square.
fn disambiguation(board: &Board, mv: Move, piece: Piece) -> String {
    let rivals: Vec<Square> = legal_moves(board, piece.color)
        .into_iter()
        .filter(|other| other.to == mv.to && other.from != mv.from)
        .filter(|other| {
            board
                .piece_at(other.from)
                .is_some_and(|p| p.kind == piece.kind)
        })
        .map(|other| other.from)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let from = mv.from;
    if rivals.iter().all(|sq| sq.col() != from.col()) {
        return from.file_char().to_string();
    }
    if rivals.iter().all(|sq| sq.row() != from.row()) {
        return from.rank_char().to_string();
    }
    from.to_algebraic()
}

fn add_check_suffix(board: &Board, mover: Color, mv: Move, mut san: String) -> String {
    let mut after = board.clone();
    after.apply(mv);
    let defender = mover.opposite();
    if is_in_check(&after, defender) {
        if has_legal_move(&after, defender) {
            san.push('+');
        } else {
            san.push('#');
        }
    }
    san
}
