//! Board square representation.

use std::fmt;

/// A square on the chess board, addressed by `(row, col)`.
///
/// Row 0 is Black's back rank (rank 8) and row 7 is White's back rank
/// (rank 1); column 0 is the a-file. Internally the square is packed as
/// `row * 8 + col`, so the natural ordering is the board scan order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Creates a square from row and column, or `None` if either is off the board.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Square(row * 8 + col))
        } else {
            None
        }
    }

    /// Creates a square from signed coordinates, as produced by offset arithmetic.
    #[inline]
    pub const fn from_coords(row: i32, col: i32) -> Option<Self> {
        if row >= 0 && row < 8 && col >= 0 && col < 8 {
            Some(Square((row * 8 + col) as u8))
        } else {
            None
        }
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if file < b'a' || file > b'h' || rank < b'1' || rank > b'8' {
            return None;
        }
        Square::new(b'8' - rank, file - b'a')
    }

    /// Returns the packed index (0-63).
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the row (0-7).
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    /// Returns the column (0-7).
    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % 8
    }

    /// Returns the square displaced by `(d_row, d_col)`, if still on the board.
    #[inline]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        Square::from_coords(
            self.row() as i32 + d_row as i32,
            self.col() as i32 + d_col as i32,
        )
    }

    /// File letter ('a'-'h').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.col()) as char
    }

    /// Rank digit ('1'-'8').
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'8' - self.row()) as char
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    /// Returns true for the dark squares (a1, c1, ..., h8).
    #[inline]
    pub const fn is_dark(self) -> bool {
        (self.row() + self.col()) % 2 == 1
    }

    /// All 64 squares in scan order (row 0 first).
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }

    // Common squares
    pub const A1: Square = Square(56);
    pub const B1: Square = Square(57);
    pub const C1: Square = Square(58);
    pub const D1: Square = Square(59);
    pub const E1: Square = Square(60);
    pub const F1: Square = Square(61);
    pub const G1: Square = Square(62);
    pub const H1: Square = Square(63);
    pub const A8: Square = Square(0);
    pub const B8: Square = Square(1);
    pub const C8: Square = Square(2);
    pub const D8: Square = Square(3);
    pub const E8: Square = Square(4);
    pub const F8: Square = Square(5);
    pub const G8: Square = Square(6);
    pub const H8: Square = Square(7);
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
