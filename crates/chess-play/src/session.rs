//! Line-oriented game loop.

use std::io::{self, BufRead, Write};

use chess_ai::MoveSelector;
use chess_core::{Color, Move};
use chess_engine::{GameError, GameState, GameStatus};
use rand::Rng;

const HELP: &str = "Enter moves as SAN (Nf3, exd5, O-O, e8=Q) or coordinates (g1f3, e7e8q).
Commands: moves, fen, history, help, quit";

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    Draw(String),
    /// The human left, input ran out, or the ply limit was reached.
    Unfinished,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Checkmate { winner } => write!(f, "Checkmate. {} wins.", winner),
            Outcome::Stalemate => write!(f, "Stalemate."),
            Outcome::Draw(reason) => write!(f, "Draw by {}.", reason),
            Outcome::Unfinished => write!(f, "Game unfinished."),
        }
    }
}

/// A game between a human (or nobody) and the computer.
pub struct Session<R> {
    game: GameState,
    ai: MoveSelector<R>,
}

impl<R: Rng> Session<R> {
    pub fn new(game: GameState, ai: MoveSelector<R>) -> Self {
        Session { game, ai }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Finished games report their outcome; running games return `None`.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.game.status() {
            GameStatus::Checkmate => Some(Outcome::Checkmate {
                winner: self.game.current_player().opposite(),
            }),
            GameStatus::Stalemate => Some(Outcome::Stalemate),
            _ => self.game.draw_reason().map(|r| Outcome::Draw(r.to_string())),
        }
    }

    /// Lets the computer move for the player to move; returns its notation.
    pub fn play_ai_move(&mut self) -> Option<String> {
        let board = self.game.board().clone();
        let mv = self.ai.next_move(&board, &self.game)?;
        let notation = self.game.move_to_san(mv);
        if let Err(e) = self.game.make_move(mv) {
            tracing::error!(mv = %mv, error = %e, "selector produced a move the game refused");
            return None;
        }
        tracing::info!(notation = %notation, nodes = self.ai.nodes(), "computer moved");
        Some(notation)
    }

    /// Plays a move typed by the human, in coordinate or SAN form.
    pub fn play_human_move(&mut self, input: &str) -> Result<String, GameError> {
        let input = input.trim();
        let mv = match Move::from_coordinate(input) {
            Some(mv) => mv,
            None => self.game.san_to_move(input)?,
        };
        let notation = self.game.move_to_san(mv);
        self.game.make_move(mv)?;
        Ok(notation)
    }

    /// Runs an interactive game with the human on `human`'s side.
    pub fn run<I: BufRead, O: Write>(&mut self, human: Color, input: I, out: &mut O) -> io::Result<Outcome> {
        writeln!(out, "{}", HELP)?;
        let mut lines = input.lines();
        loop {
            if let Some(outcome) = self.outcome() {
                writeln!(out, "{}\n{}", self.game.board(), outcome)?;
                return Ok(outcome);
            }

            if self.game.current_player() != human {
                match self.play_ai_move() {
                    Some(notation) => writeln!(out, "Computer plays {}", notation)?,
                    None => return Ok(Outcome::Unfinished),
                }
                continue;
            }

            writeln!(out, "{}", self.game.board())?;
            if self.game.is_check() {
                writeln!(out, "Check!")?;
            }
            write!(out, "{} to move> ", human)?;
            out.flush()?;

            let Some(line) = lines.next().transpose()? else {
                return Ok(Outcome::Unfinished);
            };
            match line.trim() {
                "" => {}
                "quit" | "exit" => return Ok(Outcome::Unfinished),
                "help" => writeln!(out, "{}", HELP)?,
                "fen" => writeln!(out, "{}", self.game.to_fen())?,
                "history" => writeln!(out, "{}", self.game.history_text())?,
                "moves" => {
                    let moves: Vec<String> = self
                        .game
                        .legal_moves()
                        .into_iter()
                        .map(|mv| self.game.move_to_san(mv))
                        .collect();
                    writeln!(out, "{}", moves.join(" "))?;
                }
                text => {
                    if let Err(e) = self.play_human_move(text) {
                        writeln!(out, "Illegal move: {}", e)?;
                    }
                }
            }
        }
    }

    /// Lets the computer play both sides for at most `max_plies` plies.
    pub fn self_play<O: Write>(&mut self, max_plies: u32, out: &mut O) -> io::Result<Outcome> {
        for _ in 0..max_plies {
            if let Some(outcome) = self.outcome() {
                writeln!(out, "{}\n{}\n{}", self.game.history_text(), self.game.board(), outcome)?;
                return Ok(outcome);
            }
            if self.play_ai_move().is_none() {
                break;
            }
        }
        let outcome = self.outcome().unwrap_or(Outcome::Unfinished);
        writeln!(out, "{}\n{}\n{}", self.game.history_text(), self.game.board(), outcome)?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_ai::{Difficulty, DifficultyProfile};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn session(fen: &str, depth: u32) -> Session<StdRng> {
        let ai = MoveSelector::with_profile(
            Difficulty::Hard,
            DifficultyProfile::search_only(depth),
            StdRng::seed_from_u64(8),
        );
        Session::new(GameState::from_fen(fen).unwrap(), ai)
    }

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn human_moves_in_both_notations() {
        let mut s = session(START, 1);
        assert_eq!(s.play_human_move("e2e4").unwrap(), "e4");
        assert_eq!(s.play_human_move("e5").unwrap(), "e5");
        assert_eq!(s.play_human_move(" Nf3 ").unwrap(), "Nf3");
        assert!(s.play_human_move("Ke3").is_err());
        assert_eq!(s.game().history_text(), "1. e4 e5 2. Nf3");
    }

    #[test]
    fn interactive_game_to_mate() {
        let mut s = session("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1", 2);
        let mut out = Vec::new();
        let outcome = s.run(Color::White, Cursor::new("moves\nRa9\nRa8\n"), &mut out).unwrap();
        assert_eq!(outcome, Outcome::Checkmate { winner: Color::White });

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Illegal move"));
        assert!(text.contains("Ra8#"));
        assert!(text.ends_with("Checkmate. White wins.\n"));
    }

    #[test]
    fn computer_answers_human() {
        let mut s = session(START, 1);
        let mut out = Vec::new();
        let outcome = s.run(Color::White, Cursor::new("e4\nquit\n"), &mut out).unwrap();
        assert_eq!(outcome, Outcome::Unfinished);
        assert_eq!(s.game().ply_count(), 2);
        assert!(String::from_utf8(out).unwrap().contains("Computer plays"));
    }

    #[test]
    fn computer_opens_when_human_is_black() {
        let mut s = session(START, 1);
        let mut out = Vec::new();
        s.run(Color::Black, Cursor::new(""), &mut out).unwrap();
        assert_eq!(s.game().ply_count(), 1);
        assert_eq!(s.game().current_player(), Color::Black);
    }

    #[test]
    fn self_play_respects_ply_limit() {
        let mut s = session(START, 1);
        let mut out = Vec::new();
        let outcome = s.self_play(6, &mut out).unwrap();
        assert!(s.game().ply_count() <= 6);
        if s.game().ply_count() == 6 {
            assert_eq!(outcome, Outcome::Unfinished);
        }
    }

    #[test]
    fn self_play_stops_at_mate() {
        let mut s = session("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1", 2);
        let mut out = Vec::new();
        let outcome = s.self_play(10, &mut out).unwrap();
        assert_eq!(outcome, Outcome::Checkmate { winner: Color::White });
        assert_eq!(s.game().history_text(), "1. Ra8#");
    }
}
