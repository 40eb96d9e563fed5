//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{Color, PieceKind, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 to 6 fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Castling availability as written in the third FEN field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingAvailability {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingAvailability {
    /// Every right available.
    pub const ALL: CastlingAvailability = CastlingAvailability {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    /// Returns `(kingside, queenside)` for a color.
    pub const fn for_color(self, color: Color) -> (bool, bool) {
        match color {
            Color::White => (self.white_kingside, self.white_queenside),
            Color::Black => (self.black_kingside, self.black_queenside),
        }
    }

    fn parse(field: &str) -> Result<Self, FenError> {
        let mut rights = CastlingAvailability::default();
        if field == "-" {
            return Ok(rights);
        }
        for c in field.chars() {
            let slot = match c {
                'K' => &mut rights.white_kingside,
                'Q' => &mut rights.white_queenside,
                'k' => &mut rights.black_kingside,
                'q' => &mut rights.black_queenside,
                other => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "invalid character '{}'",
                        other
                    )))
                }
            };
            *slot = true;
        }
        Ok(rights)
    }

    fn to_field(self) -> String {
        let mut field = String::new();
        for (set, c) in [
            (self.white_kingside, 'K'),
            (self.white_queenside, 'Q'),
            (self.black_kingside, 'k'),
            (self.black_queenside, 'q'),
        ] {
            if set {
                field.push(c);
            }
        }
        if field.is_empty() {
            field.push('-');
        }
        field
    }
}

/// Placement grid: `grid[row][col]`, row 0 being rank 8.
pub type Placement = [[Option<(PieceKind, Color)>; 8]; 8];

/// A parsed FEN record.
///
/// The clocks are optional in the input (many hand-written positions stop
/// after the en-passant field) and default to `0 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    pub placement: Placement,
    pub side_to_move: Color,
    pub castling: CastlingAvailability,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&parts.len()) {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = CastlingAvailability::parse(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3])?;

        let halfmove_clock = match parts.get(4) {
            Some(field) => field
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmoveClock(field.to_string()))?,
            None => 0,
        };
        let fullmove_number = match parts.get(5) {
            Some(field) => field
                .parse::<u32>()
                .map_err(|_| FenError::InvalidFullmoveNumber(field.to_string()))?,
            None => 1,
        };

        Ok(Fen {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(field: &str) -> Result<Placement, FenError> {
        let rows: Vec<&str> = field.split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                rows.len()
            )));
        }

        let mut grid: Placement = [[None; 8]; 8];
        for (row, text) in rows.iter().enumerate() {
            let mut col = 0usize;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    col += skip as usize;
                } else if let Some(piece) = PieceKind::from_fen_char(c) {
                    if col < 8 {
                        grid[row][col] = Some(piece);
                    }
                    col += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - row
                    )));
                }
            }
            if col != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - row,
                    col
                )));
            }
        }
        Ok(grid)
    }

    fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
        if field == "-" {
            return Ok(None);
        }
        match Square::from_algebraic(field) {
            // Only the third and sixth ranks can hold a target.
            Some(sq) if sq.row() == 2 || sq.row() == 5 => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(field.to_string())),
        }
    }

    /// Serializes a placement grid as the first FEN field.
    pub fn placement_field(placement: &Placement) -> String {
        let mut field = String::new();
        for (row, cells) in placement.iter().enumerate() {
            let mut empty = 0;
            for cell in cells {
                match cell {
                    Some((kind, color)) => {
                        if empty > 0 {
                            field.push_str(&empty.to_string());
                            empty = 0;
                        }
                        field.push(kind.to_fen_char(*color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                field.push_str(&empty.to_string());
            }
            if row < 7 {
                field.push('/');
            }
        }
        field
    }

    /// Converts the record back to a FEN string.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            Self::placement_field(&self.placement),
            match self.side_to_move {
                Color::White => 'w',
                Color::Black => 'b',
            },
            self.castling.to_field(),
            self.en_passant
                .map(|sq| sq.to_algebraic())
                .unwrap_or_else(|| "-".to_string()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = Fen::parse(Fen::STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling, CastlingAvailability::ALL);
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(fen.placement[0][4], Some((PieceKind::King, Color::Black)));
        assert_eq!(fen.placement[7][3], Some((PieceKind::Queen, Color::White)));
        assert_eq!(fen.placement[4][4], None);
    }

    #[test]
    fn clocks_are_optional() {
        let fen = Fen::parse("6k1/5ppp/8/8/8/8/8/R3K3 w Q -").unwrap();
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(fen.castling.for_color(Color::White), (false, true));
    }

    #[test]
    fn roundtrip() {
        let original = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let parsed = Fen::parse(original).unwrap();
        assert_eq!(parsed.to_fen(), original);
        assert_eq!(parsed.en_passant, Square::from_algebraic("e3"));
    }

    #[test]
    fn invalid_part_count() {
        assert!(matches!(
            Fen::parse("invalid"),
            Err(FenError::InvalidPartCount(1))
        ));
    }

    #[test]
    fn invalid_active_color() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
    }

    #[test]
    fn invalid_piece_placement() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8 w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Fen::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn invalid_castling_and_en_passant() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - abc 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
    }

    #[test]
    fn invalid_clocks() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0 xyz"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
    }

    #[test]
    fn no_castling_field() {
        let fen = Fen::parse("8/8/8/8/8/8/8/8 w - - 0 1").unwrap();
        assert_eq!(fen.castling, CastlingAvailability::default());
        assert!(fen.to_fen().contains(" w - - "));
    }

    #[test]
    fn error_display_mentions_input() {
        let err = FenError::InvalidActiveColor("x".to_string());
        assert!(format!("{}", err).contains("x"));
        let err = FenError::InvalidEnPassantSquare("z9".to_string());
        assert!(format!("{}", err).contains("z9"));
    }
}
