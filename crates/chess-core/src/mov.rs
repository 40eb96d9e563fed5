//! Move representation.

use crate::{PieceKind, Square};
use std::fmt;

/// A chess move: origin, destination and an optional promotion kind.
///
/// A pawn move onto the last row without an explicit promotion promotes to a
/// queen when it is committed. Castling is encoded as the two-column king
/// move; en passant as the diagonal pawn move onto the empty target square.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a move without promotion.
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    /// Creates a promoting move.
    #[inline]
    pub const fn with_promotion(from: Square, to: Square, kind: PieceKind) -> Self {
        Move {
            from,
            to,
            promotion: Some(kind),
        }
    }

    /// Returns true if origin and destination match, ignoring promotion.
    #[inline]
    pub fn same_squares(self, other: Move) -> bool {
        self.from == other.from && self.to == other.to
    }

    /// Returns the coordinate notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_coordinate(self) -> String {
        let promo = match self.promotion {
            Some(PieceKind::Knight) => "n",
            Some(PieceKind::Bishop) => "b",
            Some(PieceKind::Rook) => "r",
            Some(PieceKind::Queen) => "q",
            _ => "",
        };
        format!("{}{}{}", self.from, self.to, promo)
    }

    /// Parses a move from coordinate notation.
    ///
    /// Only the squares and the promotion letter are read; legality is the
    /// rule engine's business.
    pub fn from_coordinate(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() < 4 || s.len() > 5 || !s.is_ascii() {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s.chars().nth(4) {
            None => None,
            Some(c) => Some(match c.to_ascii_lowercase() {
                'n' => PieceKind::Knight,
                'b' => PieceKind::Bishop,
                'r' => PieceKind::Rook,
                'q' => PieceKind::Queen,
                _ => return None,
            }),
        };
        Some(Move {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_coordinate())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coordinate())
    }
}
