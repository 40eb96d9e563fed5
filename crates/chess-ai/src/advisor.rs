//! Seam for an external move advisor.
//!
//! The strongest difficulty may ask an outside source (a language model, a
//! remote engine) for a move before falling back to its own search. The
//! advisor only ever proposes text; the selector parses it against the legal
//! moves and ignores anything it cannot use.

use chess_core::{Color, Fen, Move};
use chess_engine::{legal_moves, san_to_move, Board, GameState};
use thiserror::Error;

/// Instructions that accompany every request.
pub const ADVISOR_INSTRUCTIONS: &str = "\
You are a world-class chess grandmaster. You will be given a chess position and \
must respond with only the best move in standard algebraic notation \
(e.g. 'e4', 'Nf3', 'Qh5+', 'O-O', 'O-O-O').

Rules:
1. Respond with ONLY the move in standard algebraic notation
2. Do not include explanations, analysis, or additional text
3. Ensure the move is legal for the given position
4. If checkmate is possible, play it
5. For castling, use 'O-O' (kingside) or 'O-O-O' (queenside)
6. For pawn promotion, include the piece (e.g. 'e8=Q')";

/// Errors raised while obtaining advice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    /// No credentials or backend configured.
    #[error("advisor unavailable")]
    Unavailable,
    /// The backend failed to answer.
    #[error("advisor request failed: {0}")]
    Request(String),
    #[error("advisor returned an empty suggestion")]
    EmptySuggestion,
    /// The answer does not look like a chess move at all.
    #[error("advisor returned invalid move format: {0}")]
    InvalidFormat(String),
    /// The answer looks like a move but is not legal here.
    #[error("advisor suggested an illegal move: {0}")]
    IllegalMove(String),
}

/// Everything an advisor is told about the position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryRequest {
    pub fen: String,
    /// Numbered SAN history, e.g. `1. e4 e5 2. Nf3`.
    pub history: String,
    pub side: Color,
    /// ASCII board with file and rank labels.
    pub diagram: String,
}

impl AdvisoryRequest {
    /// Describes `board`, with side to move, clocks and history taken from
    /// `state`.
    pub fn new(board: &Board, state: &GameState) -> Self {
        let fen = Fen {
            placement: board.placement(),
            side_to_move: state.current_player(),
            castling: board.castling_availability(),
            en_passant: board.en_passant(),
            halfmove_clock: state.halfmove_clock(),
            fullmove_number: state.fullmove_number(),
        };
        AdvisoryRequest {
            fen: fen.to_fen(),
            history: history_or_placeholder(state),
            side: state.current_player(),
            diagram: board.to_string(),
        }
    }

    pub fn from_game(state: &GameState) -> Self {
        Self::new(state.board(), state)
    }

    /// Standing instructions, sent ahead of [`prompt`](Self::prompt).
    pub fn system_prompt(&self) -> &'static str {
        ADVISOR_INSTRUCTIONS
    }

    /// User-facing prompt body.
    pub fn prompt(&self) -> String {
        format!(
            "Current chess position:\n{}\n\nFEN: {}\n\nGame history (moves played so far):\n{}\n\n\
             You are playing as: {}\n\nWhat is the best move?",
            self.diagram, self.fen, self.history, self.side
        )
    }
}

fn history_or_placeholder(state: &GameState) -> String {
    if state.move_history().is_empty() {
        "(no moves yet)".to_string()
    } else {
        state.history_text()
    }
}

/// Source of suggested moves.
pub trait MoveAdvisor {
    /// Returns the suggested move as SAN or coordinate text.
    fn suggest(&mut self, request: &AdvisoryRequest) -> Result<String, AdvisorError>;

    /// Whether the advisor can be asked at all.
    fn is_available(&self) -> bool {
        true
    }
}

/// Cheap shape check before any parsing: castling, or 2 to 7 characters
/// drawn from files, ranks, piece letters and capture/promotion marks.
pub fn looks_like_move(text: &str) -> bool {
    let clean: String = text.chars().filter(|c| !matches!(c, '+' | '#' | '!' | '?')).collect();
    if matches!(clean.as_str(), "O-O" | "O-O-O" | "0-0" | "0-0-0") {
        return true;
    }
    (2..=7).contains(&clean.len())
        && clean
            .chars()
            .all(|c| matches!(c, 'a'..='h' | '1'..='8' | 'K' | 'Q' | 'R' | 'B' | 'N' | 'x' | '=' | 'q' | 'r' | 'n'))
}

/// Reads the first token of an advisor answer as SAN, then as coordinate
/// notation, and returns it only if legal for `side`.
pub fn parse_suggestion(board: &Board, side: Color, text: &str) -> Result<Move, AdvisorError> {
    let token = text
        .split_whitespace()
        .next()
        .map(|t| t.trim_matches(|c: char| matches!(c, '\'' | '"' | '`' | '.' | ',')))
        .unwrap_or_default();
    if token.is_empty() {
        return Err(AdvisorError::EmptySuggestion);
    }
    if !looks_like_move(token) {
        return Err(AdvisorError::InvalidFormat(token.to_string()));
    }

    if let Ok(mv) = san_to_move(board, side, token) {
        return Ok(mv);
    }

    let legal = legal_moves(board, side);
    Move::from_coordinate(token)
        .and_then(|mv| {
            legal
                .iter()
                .find(|m| m.same_squares(mv))
                .map(|m| if mv.promotion.is_some() { mv } else { *m })
        })
        .ok_or_else(|| AdvisorError::IllegalMove(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{PieceKind, Square};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn request_from_start() {
        let state = GameState::new();
        let req = AdvisoryRequest::from_game(&state);
        assert_eq!(req.fen, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(req.side, Color::White);
        assert_eq!(req.history, "(no moves yet)");
        assert!(req.diagram.starts_with("  a b c d e f g h\n8 r n b q k b n r 8"));

        let prompt = req.prompt();
        assert!(prompt.contains("You are playing as: White"));
        assert!(prompt.contains(&req.fen));
        assert_eq!(req.system_prompt(), ADVISOR_INSTRUCTIONS);
        assert!(req.system_prompt().contains("standard algebraic notation"));
    }

    #[test]
    fn request_describes_given_board() {
        let state = GameState::new();
        let mut board = state.board().clone();
        board.apply(Move::new(sq("e2"), sq("e4")));
        let req = AdvisoryRequest::new(&board, &state);
        assert_eq!(req.fen, "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3 0 1");
        assert_eq!(req.diagram, board.to_string());
        assert_eq!(req.side, Color::White);
        assert_ne!(req, AdvisoryRequest::from_game(&state));
    }

    #[test]
    fn request_carries_history() {
        let mut state = GameState::new();
        state.make_move_san("e4").unwrap();
        state.make_move_san("e5").unwrap();
        state.make_move_san("Nf3").unwrap();
        let req = AdvisoryRequest::from_game(&state);
        assert_eq!(req.history, "1. e4 e5 2. Nf3");
        assert_eq!(req.side, Color::Black);
    }

    #[test]
    fn shape_check() {
        for ok in ["e4", "Nf3", "Qh5+", "O-O", "O-O-O", "exd5", "e8=Q", "Rxe8#", "e2e4", "e7e8q"] {
            assert!(looks_like_move(ok), "{ok}");
        }
        for bad in ["", "e", "I resign", "Zz9", "e4e5e6e7"] {
            assert!(!looks_like_move(bad), "{bad}");
        }
    }

    #[test]
    fn parses_san_and_coordinates() {
        let board = Board::new();
        let expected = Move::new(sq("g1"), sq("f3"));
        assert_eq!(parse_suggestion(&board, Color::White, "Nf3"), Ok(expected));
        assert_eq!(parse_suggestion(&board, Color::White, "g1f3"), Ok(expected));
        assert_eq!(parse_suggestion(&board, Color::White, "'Nf3'."), Ok(expected));
        assert_eq!(parse_suggestion(&board, Color::White, "  Nf3 is best"), Ok(expected));
    }

    #[test]
    fn rejects_bad_suggestions() {
        let board = Board::new();
        assert_eq!(parse_suggestion(&board, Color::White, "   "), Err(AdvisorError::EmptySuggestion));
        assert_eq!(
            parse_suggestion(&board, Color::White, "Resign"),
            Err(AdvisorError::InvalidFormat("Resign".to_string()))
        );
        assert_eq!(
            parse_suggestion(&board, Color::White, "e5"),
            Err(AdvisorError::IllegalMove("e5".to_string()))
        );
        assert_eq!(
            parse_suggestion(&board, Color::Black, "e2e4"),
            Err(AdvisorError::IllegalMove("e2e4".to_string()))
        );
    }

    #[test]
    fn coordinate_promotion_is_kept() {
        let board = Board::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let mv = parse_suggestion(&board, Color::White, "e7e8n").unwrap();
        assert_eq!(mv.promotion, Some(PieceKind::Knight));
    }
}
