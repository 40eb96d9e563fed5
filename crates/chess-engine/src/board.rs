//! Mailbox board representation.

use chess_core::{CastlingAvailability, Color, Fen, FenError, Move, Piece, PieceKind, Placement, Square};
use std::fmt;

/// An 8x8 board owning its pieces.
///
/// Every occupied slot holds a [`Piece`] whose `square` equals the slot, and
/// no square holds more than one piece. The board also remembers the
/// en-passant target left by the last double pawn step; any other move
/// clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
    en_passant: Option<Square>,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// Creates a board with no pieces.
    pub const fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
            en_passant: None,
        }
    }

    /// Creates the standard starting setup.
    pub fn new() -> Self {
        let mut board = Board::empty();
        for color in Color::BOTH {
            for (col, kind) in BACK_RANK.iter().enumerate() {
                if let Some(sq) = Square::new(color.back_row(), col as u8) {
                    board.place(Piece::new(*kind, color, sq));
                }
                if let Some(sq) = Square::new(color.pawn_row(), col as u8) {
                    board.place(Piece::new(PieceKind::Pawn, color, sq));
                }
            }
        }
        board
    }

    /// Builds a board from the placement, castling and en-passant fields of a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_fen_record(&Fen::parse(fen)?))
    }

    /// Builds a board from an already parsed FEN record.
    ///
    /// FEN carries no per-piece history, so `has_moved` is reconstructed:
    /// kings and rooks count as unmoved only where a castling right still
    /// names them, pawns only on their starting row.
    pub fn from_fen_record(fen: &Fen) -> Self {
        let mut board = Board::empty();
        for (row, cells) in fen.placement.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let (Some((kind, color)), Some(sq)) = (cell, Square::new(row as u8, col as u8)) else {
                    continue;
                };
                let (kingside, queenside) = fen.castling.for_color(*color);
                let on_back_row = sq.row() == color.back_row();
                let unmoved = match kind {
                    PieceKind::Pawn => sq.row() == color.pawn_row(),
                    PieceKind::King => on_back_row && sq.col() == 4 && (kingside || queenside),
                    PieceKind::Rook => {
                        on_back_row && ((sq.col() == 7 && kingside) || (sq.col() == 0 && queenside))
                    }
                    _ => true,
                };
                let piece = Piece::new(*kind, *color, sq);
                board.place(if unmoved { piece } else { piece.moved() });
            }
        }
        board.en_passant = fen.en_passant;
        board
    }

    /// Returns the piece on a square.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize]
    }

    /// Returns the piece at raw coordinates; `None` when off the board or empty.
    pub fn piece_at_coords(&self, row: i32, col: i32) -> Option<Piece> {
        Square::from_coords(row, col).and_then(|sq| self.piece_at(sq))
    }

    /// Returns true if nothing stands on the square.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Puts a piece on the square it names, replacing any occupant.
    pub fn place(&mut self, piece: Piece) {
        let sq = piece.square;
        self.squares[sq.row() as usize][sq.col() as usize] = Some(piece);
    }

    /// Takes the piece off a square.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize].take()
    }

    /// The square a pawn may capture onto en passant, if any.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Moves whatever stands on `from` to `to`, promoting to a queen when a
    /// pawn reaches its last row. No legality checking.
    pub fn apply_move(&mut self, from: Square, to: Square) {
        self.apply(Move::new(from, to));
    }

    /// Commits a move and returns the captured piece, if any.
    ///
    /// Besides the plain relocation this performs the side effects of the
    /// special moves: the rook hop of a two-column king move, removal of the
    /// bypassed pawn on an en-passant capture, and promotion (the move's
    /// promotion kind, or a queen). Moving from an empty square does nothing.
    pub fn apply(&mut self, mv: Move) -> Option<Piece> {
        let Some(mut piece) = self.remove(mv.from) else {
            return None;
        };

        let mut captured = self.remove(mv.to);

        if piece.kind == PieceKind::Pawn
            && captured.is_none()
            && mv.from.col() != mv.to.col()
            && self.en_passant == Some(mv.to)
        {
            captured = Square::new(mv.from.row(), mv.to.col()).and_then(|sq| self.remove(sq));
        }

        let col_delta = mv.to.col() as i8 - mv.from.col() as i8;
        if piece.kind == PieceKind::King && col_delta.abs() == 2 {
            self.relocate_castling_rook(piece.color, mv.from, col_delta.signum());
        }

        let row_delta = mv.to.row() as i8 - mv.from.row() as i8;
        self.en_passant = if piece.kind == PieceKind::Pawn && row_delta.abs() == 2 {
            mv.from.offset(row_delta.signum(), 0)
        } else {
            None
        };

        if piece.kind == PieceKind::Pawn && mv.to.row() == piece.color.promotion_row() {
            piece.kind = match mv.promotion {
                Some(kind) if kind != PieceKind::Pawn && kind != PieceKind::King => kind,
                _ => PieceKind::Queen,
            };
        }

        piece.square = mv.to;
        piece.has_moved = true;
        self.place(piece);
        captured
    }

    fn relocate_castling_rook(&mut self, color: Color, king_from: Square, step: i8) {
        let corner_col = if step > 0 { 7 } else { 0 };
        let (Some(corner), Some(target)) = (
            Square::new(king_from.row(), corner_col),
            king_from.offset(0, step),
        ) else {
            return;
        };
        match self.piece_at(corner) {
            Some(rook) if rook.kind == PieceKind::Rook && rook.color == color => {
                self.remove(corner);
                self.place(Piece {
                    square: target,
                    has_moved: true,
                    ..rook
                });
            }
            _ => {}
        }
    }

    /// Replaces the pawn on `sq` with a piece of the chosen kind and color.
    ///
    /// Does nothing if the square holds no pawn or the kind is a pawn or king.
    pub fn promote(&mut self, sq: Square, kind: PieceKind, color: Color) {
        if matches!(kind, PieceKind::Pawn | PieceKind::King) {
            return;
        }
        if let Some(pawn) = self.piece_at(sq).filter(|p| p.kind == PieceKind::Pawn) {
            self.place(Piece {
                kind,
                color,
                square: sq,
                has_moved: pawn.has_moved,
            });
        }
    }

    /// All pieces in scan order (row 0 first).
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.squares.iter().flatten().filter_map(|cell| *cell)
    }

    /// All pieces of one color in scan order.
    pub fn pieces_of(&self, color: Color) -> Vec<Piece> {
        self.pieces().filter(|p| p.color == color).collect()
    }

    /// Square of the given color's king.
    pub fn king_of(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|p| p.kind == PieceKind::King && p.color == color)
            .map(|p| p.square)
    }

    /// Castling availability implied by the `has_moved` flags.
    pub fn castling_availability(&self) -> CastlingAvailability {
        let side = |color: Color| -> (bool, bool) {
            let row = color.back_row();
            let unmoved = |col: u8, kind: PieceKind| {
                Square::new(row, col)
                    .and_then(|sq| self.piece_at(sq))
                    .is_some_and(|p| p.kind == kind && p.color == color && !p.has_moved)
            };
            if !unmoved(4, PieceKind::King) {
                return (false, false);
            }
            (unmoved(7, PieceKind::Rook), unmoved(0, PieceKind::Rook))
        };
        let (white_kingside, white_queenside) = side(Color::White);
        let (black_kingside, black_queenside) = side(Color::Black);
        CastlingAvailability {
            white_kingside,
            white_queenside,
            black_kingside,
            black_queenside,
        }
    }

    /// The board as a FEN placement grid.
    pub fn placement(&self) -> Placement {
        let mut grid: Placement = [[None; 8]; 8];
        for piece in self.pieces() {
            grid[piece.square.row() as usize][piece.square.col() as usize] =
                Some((piece.kind, piece.color));
        }
        grid
    }

    /// The first FEN field for this board.
    pub fn to_fen_placement(&self) -> String {
        Fen::placement_field(&self.placement())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders an ASCII diagram, rank 8 at the top, `.` for empty squares.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for (row, cells) in self.squares.iter().enumerate() {
            write!(f, "{} ", 8 - row)?;
            for cell in cells {
                match cell {
                    Some(piece) => write!(f, "{} ", piece.to_fen_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, "{}", 8 - row)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
