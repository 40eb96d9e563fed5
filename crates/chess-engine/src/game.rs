//! Game state management with history tracking.
//!
//! [`GameState`] owns the live board and is the only place moves are
//! committed during play. It tracks:
//! - the player to move and the derived [`GameStatus`]
//! - move history with SAN notation
//! - the clocks and position keys behind the draw predicates

use crate::rules::{self, DrawReason};
use crate::san::{move_to_san, san_to_move, SanError};
use crate::zobrist::position_key;
use crate::Board;
use chess_core::{Color, Fen, FenError, Move, PieceKind, Square};
use thiserror::Error;

/// A recorded move in game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    /// The move as committed.
    pub mov: Move,
    /// SAN notation for the move.
    pub notation: String,
}

/// Status of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    /// Returns true for checkmate and stalemate.
    pub const fn is_over(self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

/// Error type for game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The game has already ended.
    #[error("game has already ended")]
    GameAlreadyOver,
    /// Nothing stands on the source square.
    #[error("no piece on {0}")]
    NoPieceAtSource(Square),
    /// The source piece belongs to the side not on move.
    #[error("the piece on {0} belongs to the other player")]
    NotYourPiece(Square),
    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(Move),
    /// The SAN string could not be parsed.
    #[error("invalid SAN: {0}")]
    InvalidSan(#[from] SanError),
    /// The coordinate string could not be parsed.
    #[error("invalid coordinate move: {0}")]
    InvalidCoordinate(String),
}

/// A chess game in progress.
///
/// The status is recomputed after every committed move and is always
/// consistent with the board and the player to move.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current_player: Color,
    status: GameStatus,
    history: Vec<GameMove>,
    halfmove_clock: u32,
    fullmove_number: u32,
    /// Position keys, one per position reached including the start.
    position_keys: Vec<u64>,
    start_player: Color,
    start_fullmove: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::new(), Color::White, 0, 1)
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let record = Fen::parse(fen)?;
        Ok(Self::from_board(
            Board::from_fen_record(&record),
            record.side_to_move,
            record.halfmove_clock,
            record.fullmove_number.max(1),
        ))
    }

    /// Creates a game from an arbitrary board.
    pub fn from_board(board: Board, to_move: Color, halfmove_clock: u32, fullmove_number: u32) -> Self {
        let key = position_key(&board, to_move);
        let mut state = GameState {
            board,
            current_player: to_move,
            status: GameStatus::InProgress,
            history: Vec::new(),
            halfmove_clock,
            fullmove_number,
            position_keys: vec![key],
            start_player: to_move,
            start_fullmove: fullmove_number,
        };
        state.refresh_status();
        state
    }

    /// Returns the live board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move.
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    /// Returns the current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_check(&self) -> bool {
        self.status == GameStatus::Check
    }

    pub fn is_checkmate(&self) -> bool {
        self.status == GameStatus::Checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.status == GameStatus::Stalemate
    }

    /// Returns true after checkmate or stalemate.
    pub fn is_game_over(&self) -> bool {
        self.status.is_over()
    }

    /// Returns the move history.
    pub fn move_history(&self) -> &[GameMove] {
        &self.history
    }

    /// Returns the number of half-moves (plies) played.
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    /// Plies since the last pawn move or capture.
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Returns the current full move number.
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// All legal moves of the player to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        rules::legal_moves(&self.board, self.current_player)
    }

    /// Legal moves of the piece on `sq` if it belongs to the player to move.
    pub fn legal_moves_from(&self, sq: Square) -> Vec<Move> {
        rules::legal_moves_from(&self.board, sq, self.current_player)
    }

    /// Commits a move if legal; returns whether it was accepted.
    ///
    /// A refused move leaves the state untouched.
    pub fn try_move(&mut self, mv: Move) -> bool {
        self.make_move(mv).is_ok()
    }

    /// Commits a move, or reports why it was refused.
    pub fn make_move(&mut self, mv: Move) -> Result<(), GameError> {
        if self.status.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        let piece = self
            .board
            .piece_at(mv.from)
            .ok_or(GameError::NoPieceAtSource(mv.from))?;
        if piece.color != self.current_player {
            return Err(GameError::NotYourPiece(mv.from));
        }
        if matches!(mv.promotion, Some(PieceKind::Pawn | PieceKind::King)) {
            return Err(GameError::IllegalMove(mv));
        }
        if !self.legal_moves_from(mv.from).iter().any(|m| m.same_squares(mv)) {
            tracing::debug!(mv = %mv, player = %self.current_player, "rejected illegal move");
            return Err(GameError::IllegalMove(mv));
        }

        self.commit(mv, piece.kind);
        Ok(())
    }

    /// Parses a SAN move for the player to move and commits it.
    pub fn make_move_san(&mut self, san: &str) -> Result<(), GameError> {
        if self.status.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        let mv = san_to_move(&self.board, self.current_player, san)?;
        self.make_move(mv)
    }

    /// Parses a coordinate move such as `e2e4` or `e7e8q` and commits it.
    pub fn make_move_coordinate(&mut self, text: &str) -> Result<(), GameError> {
        let mv = Move::from_coordinate(text)
            .ok_or_else(|| GameError::InvalidCoordinate(text.to_string()))?;
        self.make_move(mv)
    }

    fn commit(&mut self, mv: Move, kind: PieceKind) {
        let notation = move_to_san(&self.board, mv);
        let captured = self.board.apply(mv);

        if kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if self.current_player == Color::Black {
            self.fullmove_number += 1;
        }
        self.current_player = self.current_player.opposite();
        self.position_keys
            .push(position_key(&self.board, self.current_player));

        tracing::debug!(mv = %mv, notation = %notation, "move committed");
        self.history.push(GameMove { mov: mv, notation });
        self.refresh_status();
    }

    fn refresh_status(&mut self) {
        let in_check = rules::is_in_check(&self.board, self.current_player);
        let can_move = rules::has_legal_move(&self.board, self.current_player);
        self.status = match (can_move, in_check) {
            (true, false) => GameStatus::InProgress,
            (true, true) => GameStatus::Check,
            (false, true) => GameStatus::Checkmate,
            (false, false) => GameStatus::Stalemate,
        };
    }

    /// Counts how many times the current position has occurred.
    pub fn position_count(&self) -> usize {
        match self.position_keys.last() {
            Some(current) => self.position_keys.iter().filter(|k| *k == current).count(),
            None => 0,
        }
    }

    /// The current position has occurred at least three times.
    pub fn is_draw_by_repetition(&self) -> bool {
        self.position_count() >= 3
    }

    /// Neither side has enough material left to mate.
    pub fn is_draw_by_insufficient_material(&self) -> bool {
        rules::has_insufficient_material(&self.board)
    }

    /// 100 plies have passed without a pawn move or capture.
    pub fn is_draw_by_fifty_move_rule(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Returns the first draw condition that holds, if any.
    ///
    /// Draws are reported only; they never change [`GameStatus`] or stop
    /// further moves.
    pub fn draw_reason(&self) -> Option<DrawReason> {
        if self.is_draw_by_repetition() {
            Some(DrawReason::ThreefoldRepetition)
        } else if self.is_draw_by_insufficient_material() {
            Some(DrawReason::InsufficientMaterial)
        } else if self.is_draw_by_fifty_move_rule() {
            Some(DrawReason::FiftyMoveRule)
        } else {
            None
        }
    }

    pub fn is_draw(&self) -> bool {
        self.draw_reason().is_some()
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        Fen {
            placement: self.board.placement(),
            side_to_move: self.current_player,
            castling: self.board.castling_availability(),
            en_passant: self.board.en_passant(),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_fen()
    }

    /// Numbered SAN history, e.g. `1. e4 e5 2. Nf3`.
    pub fn history_text(&self) -> String {
        let mut parts = Vec::with_capacity(self.history.len() * 3 / 2 + 1);
        let mut number = self.start_fullmove;
        let mut mover = self.start_player;
        for (i, entry) in self.history.iter().enumerate() {
            match mover {
                Color::White => parts.push(format!("{}.", number)),
                Color::Black if i == 0 => parts.push(format!("{}...", number)),
                Color::Black => {}
            }
            parts.push(entry.notation.clone());
            if mover == Color::Black {
                number += 1;
            }
            mover = mover.opposite();
        }
        parts.join(" ")
    }

    /// Generates SAN for a move in the current position.
    pub fn move_to_san(&self, mv: Move) -> String {
        move_to_san(&self.board, mv)
    }

    /// Parses SAN for the player to move.
    pub fn san_to_move(&self, san: &str) -> Result<Move, SanError> {
        san_to_move(&self.board, self.current_player, san)
    }
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

    #[test]
    fn new_game() {
        let game = GameState::new();
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.current_player(), Color::White);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert!(!game.is_game_over());
        assert!(!game.is_check());
        assert_eq!(game.to_fen(), Fen::STARTPOS);
    }

    #[test]
    fn make_move_coordinate() {
        let mut game = GameState::new();
        game.make_move_coordinate("e2e4").unwrap();
        assert_eq!(game.ply_count(), 1);
        assert_eq!(game.move_history()[0].notation, "e4");
        assert_eq!(game.current_player(), Color::Black);
        assert_eq!(
            game.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn make_move_san() {
        let mut game = GameState::new();
        game.make_move_san("e4").unwrap();
        game.make_move_san("e5").unwrap();
        assert_eq!(game.ply_count(), 2);
        assert_eq!(game.fullmove_number(), 2);
    }

    #[test]
    fn refusals_leave_state_untouched() {
        let mut game = GameState::new();
        let before = game.to_fen();

        assert_eq!(
            game.make_move(Move::new(sq("e4"), sq("e5"))),
            Err(GameError::NoPieceAtSource(sq("e4")))
        );
        assert_eq!(
            game.make_move(Move::new(sq("e7"), sq("e5"))),
            Err(GameError::NotYourPiece(sq("e7")))
        );
        assert!(matches!(
            game.make_move_coordinate("e2e5"),
            Err(GameError::IllegalMove(_))
        ));
        assert!(matches!(
            game.make_move_coordinate("zz"),
            Err(GameError::InvalidCoordinate(_))
        ));
        assert!(!game.try_move(Move::new(sq("e1"), sq("e2"))));

        assert_eq!(game.to_fen(), before);
        assert_eq!(game.ply_count(), 0);
    }

    #[test]
    fn checkmate_fools_mate() {
        let mut game = GameState::new();
        for san in ["f3", "e5", "g4", "Qh4"] {
            game.make_move_san(san).unwrap();
        }
        assert!(game.is_checkmate());
        assert!(game.is_game_over());
        assert_eq!(game.move_history()[3].notation, "Qh4#");
        assert_eq!(
            game.make_move_san("a3"),
            Err(GameError::GameAlreadyOver)
        );
        assert!(!game.try_move(Move::new(sq("a2"), sq("a3"))));
    }

    #[test]
    fn check_status() {
        let mut game = GameState::new();
        for san in ["e4", "f5", "Qh5"] {
            game.make_move_san(san).unwrap();
        }
        assert!(game.is_check());
        assert_eq!(game.move_history()[2].notation, "Qh5+");
    }

    #[test]
    fn stalemate() {
        let game = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(game.is_stalemate());
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn threefold_repetition() {
        let mut game = GameState::new();
        for san in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            game.make_move_san(san).unwrap();
        }
        assert_eq!(game.position_count(), 2);
        assert!(!game.is_draw_by_repetition());

        for san in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            game.make_move_san(san).unwrap();
        }
        assert_eq!(game.position_count(), 3);
        assert_eq!(game.draw_reason(), Some(DrawReason::ThreefoldRepetition));
        // Reported, not enforced.
        assert!(game.try_move(Move::new(sq("e2"), sq("e4"))));
    }

    #[test]
    fn fifty_move_rule() {
        let mut game = GameState::from_fen("8/8/8/8/8/8/8/R3K2k w - - 99 1").unwrap();
        assert!(!game.is_draw_by_fifty_move_rule());
        game.make_move_coordinate("a1a2").unwrap();
        assert_eq!(game.halfmove_clock(), 100);
        assert!(game.is_draw_by_fifty_move_rule());
        assert_eq!(game.draw_reason(), Some(DrawReason::FiftyMoveRule));
    }

    #[test]
    fn pawn_move_resets_clock() {
        let mut game = GameState::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 12 30").unwrap();
        game.make_move_coordinate("e1d1").unwrap();
        assert_eq!(game.halfmove_clock(), 13);
        game.make_move_coordinate("e8d8").unwrap();
        assert_eq!(game.fullmove_number(), 31);
        game.make_move_coordinate("e2e4").unwrap();
        assert_eq!(game.halfmove_clock(), 0);
    }

    #[test]
    fn insufficient_material() {
        let game = GameState::from_fen("8/8/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        assert!(game.is_draw());
        assert!(!game.is_game_over());
        assert_eq!(game.draw_reason(), Some(DrawReason::InsufficientMaterial));
    }

    #[test]
    fn promotion_choice_is_kept() {
        let mut game = GameState::from_fen("8/P7/8/8/8/8/8/4K1k1 w - - 0 1").unwrap();
        assert!(game.try_move(Move::with_promotion(sq("a7"), sq("a8"), PieceKind::Knight)));
        assert_eq!(game.board().piece_at(sq("a8")).unwrap().kind, PieceKind::Knight);
        assert_eq!(game.move_history()[0].notation, "a8=N");

        let mut game = GameState::from_fen("8/P7/8/8/8/8/8/4K1k1 w - - 0 1").unwrap();
        assert!(!game.try_move(Move::with_promotion(sq("a7"), sq("a8"), PieceKind::King)));
        game.make_move_coordinate("a7a8").unwrap();
        assert_eq!(game.board().piece_at(sq("a8")).unwrap().kind, PieceKind::Queen);
    }

    #[test]
    fn castling_through_game() {
        let mut game =
            GameState::from_fen("r3k2r/pppq1ppp/8/8/8/8/PPPQ1PPP/R3K2R w KQkq - 0 1").unwrap();
        game.make_move_san("O-O").unwrap();
        assert_eq!(game.board().piece_at(Square::F1).unwrap().kind, PieceKind::Rook);
        game.make_move_san("O-O-O").unwrap();
        assert_eq!(game.board().piece_at(Square::D8).unwrap().kind, PieceKind::Rook);
        assert_eq!(game.history_text(), "1. O-O O-O-O");
    }

    #[test]
    fn en_passant_only_right_after_double_step() {
        let mut game = GameState::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").unwrap();
        game.make_move_coordinate("d7d5").unwrap();
        assert!(game.legal_moves_from(sq("e5")).contains(&Move::new(sq("e5"), sq("d6"))));

        let mut later = game.clone();
        later.make_move_coordinate("e1d1").unwrap();
        later.make_move_coordinate("e8d8").unwrap();
        assert!(!later.legal_moves_from(sq("e5")).contains(&Move::new(sq("e5"), sq("d6"))));

        game.make_move_coordinate("e5d6").unwrap();
        assert!(game.board().piece_at(sq("d5")).is_none());
        assert_eq!(game.move_history()[1].notation, "exd6");
    }

    #[test]
    fn history_text_numbers_moves() {
        let mut game = GameState::new();
        for san in ["e4", "e5", "Nf3"] {
            game.make_move_san(san).unwrap();
        }
        assert_eq!(game.history_text(), "1. e4 e5 2. Nf3");

        let mut from_black = GameState::from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        )
        .unwrap();
        from_black.make_move_san("e5").unwrap();
        from_black.make_move_san("Nf3").unwrap();
        assert_eq!(from_black.history_text(), "1... e5 2. Nf3");
    }

    #[test]
    fn fen_roundtrip() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R b Kq - 7 21";
        assert_eq!(GameState::from_fen(fen).unwrap().to_fen(), fen);
    }

    proptest! {
        #[test]
        fn committed_moves_never_leave_own_king_attacked(seed in any::<u64>(), plies in 1usize..80) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut game = GameState::new();
            for _ in 0..plies {
                let moves = game.legal_moves();
                let Some(mv) = moves.choose(&mut rng).copied() else { break };
                let mover = game.current_player();
                prop_assert!(game.try_move(mv));
                prop_assert!(!rules::is_in_check(game.board(), mover));
            }
        }

        #[test]
        fn status_matches_board(seed in any::<u64>(), plies in 1usize..80) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut game = GameState::new();
            for _ in 0..plies {
                let moves = game.legal_moves();
                let Some(mv) = moves.choose(&mut rng).copied() else { break };
                game.try_move(mv);
            }
            let side = game.current_player();
            let attacked = rules::is_in_check(game.board(), side);
            let no_moves = game.legal_moves().is_empty();
            prop_assert_eq!(game.is_checkmate(), no_moves && attacked);
            prop_assert_eq!(game.is_stalemate(), no_moves && !attacked);
            prop_assert_eq!(game.is_check(), !no_moves && attacked);
        }
    }
}
