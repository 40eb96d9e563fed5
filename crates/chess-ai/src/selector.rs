//! Difficulty-driven move selection.

use chess_core::{Color, Move};
use chess_engine::{legal_moves, Board, GameState};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::advisor::{parse_suggestion, AdvisorError, AdvisoryRequest, MoveAdvisor};
use crate::difficulty::{Difficulty, DifficultyProfile, Policy};
use crate::search::Searcher;
use crate::tactics;

/// Chooses moves for the computer player.
///
/// The selector blends, in order: an optional advisor, random and
/// deliberately weak moves, one-ply reactive heuristics, and finally a
/// minimax search, as the active [`DifficultyProfile`] dictates.
pub struct MoveSelector<R> {
    difficulty: Difficulty,
    profile: DifficultyProfile,
    searcher: Searcher<R>,
    advisor: Option<Box<dyn MoveAdvisor + Send>>,
}

impl<R: Rng> MoveSelector<R> {
    pub fn new(difficulty: Difficulty, rng: R) -> Self {
        Self::with_profile(difficulty, difficulty.profile(), rng)
    }

    /// Uses `profile` instead of the difficulty's table row.
    pub fn with_profile(difficulty: Difficulty, profile: DifficultyProfile, rng: R) -> Self {
        MoveSelector {
            difficulty,
            profile,
            searcher: Searcher::new(rng),
            advisor: None,
        }
    }

    pub fn with_advisor(mut self, advisor: impl MoveAdvisor + Send + 'static) -> Self {
        self.set_advisor(advisor);
        self
    }

    pub fn set_advisor(&mut self, advisor: impl MoveAdvisor + Send + 'static) {
        self.advisor = Some(Box::new(advisor));
    }

    pub fn clear_advisor(&mut self) {
        self.advisor = None;
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    /// Switches level and resets the profile to that level's table row.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.profile = difficulty.profile();
    }

    /// Nodes visited by the most recent search.
    pub fn nodes(&self) -> u64 {
        self.searcher.nodes()
    }

    /// Picks a move for the player to move in `state`, on `board`.
    ///
    /// Returns `None` only when that player has no legal move.
    pub fn next_move(&mut self, board: &Board, state: &GameState) -> Option<Move> {
        let side = state.current_player();
        let legal = legal_moves(board, side);
        if legal.is_empty() {
            return None;
        }

        if self.profile.consult_advisor {
            match self.ask_advisor(board, state) {
                Ok(mv) => {
                    tracing::info!(mv = %mv, "playing advisor move");
                    return Some(mv);
                }
                Err(AdvisorError::Unavailable) => {
                    tracing::debug!("advisor not available, searching instead");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "advisor gave no usable move, falling back to search");
                }
            }
        }

        let policy = if self.profile.random_move_probability > 0.0
            || self.profile.suboptimal_move_probability > 0.0
        {
            let roll: f64 = self.searcher.rng_mut().gen();
            self.profile.policy(roll)
        } else {
            Policy::Search
        };

        match policy {
            Policy::Random => {
                tracing::info!(difficulty = %self.difficulty, "playing random move");
                return self.random_move(board, side);
            }
            Policy::Bad => {
                tracing::info!(difficulty = %self.difficulty, "playing bad move");
                let pool = tactics::bad_moves(board, side);
                return self.pick_or_random(&pool, board, side);
            }
            Policy::Mediocre => {
                tracing::info!(difficulty = %self.difficulty, "playing mediocre move");
                let pool = tactics::mediocre_moves(board, side, self.searcher.rng_mut());
                return self.pick_or_random(&pool, board, side);
            }
            Policy::Search => {}
        }

        if self.profile.reactive {
            if let Some(mv) = reactive_move(board, side) {
                tracing::info!(mv = %mv, "playing reactive move");
                return Some(mv);
            }
        }

        let best = self.searcher.find_best_move(board, state, self.profile.depth)?;
        let acceptance = self.profile.search_acceptance;
        if acceptance < 1.0 && self.searcher.rng_mut().gen::<f64>() >= acceptance {
            tracing::info!(difficulty = %self.difficulty, mv = %best, "discarding searched move");
            return self.random_move(board, side);
        }
        Some(best)
    }

    fn ask_advisor(&mut self, board: &Board, state: &GameState) -> Result<Move, AdvisorError> {
        let advisor = self
            .advisor
            .as_mut()
            .filter(|a| a.is_available())
            .ok_or(AdvisorError::Unavailable)?;
        let request = AdvisoryRequest::new(board, state);
        let text = advisor.suggest(&request)?;
        parse_suggestion(board, state.current_player(), &text)
    }

    fn random_move(&mut self, board: &Board, side: Color) -> Option<Move> {
        tactics::beginner_weighted(board, side, self.searcher.rng_mut())
    }

    /// Draws from a weighted pool, or a random move if the pool is empty.
    fn pick_or_random(&mut self, pool: &[Move], board: &Board, side: Color) -> Option<Move> {
        match pool.choose(self.searcher.rng_mut()) {
            Some(&mv) => Some(mv),
            None => self.random_move(board, side),
        }
    }
}

/// Saves threatened pieces first, then takes the best capture or check.
fn reactive_move(board: &Board, side: Color) -> Option<Move> {
    let threatened = tactics::threatened_pieces(board, side);
    if !threatened.is_empty() {
        let defensive = tactics::defensive_moves(board, side, &threatened);
        if let Some(mv) = tactics::best_by(&defensive, |mv| tactics::score_defensive_move(board, side, mv)) {
            return Some(mv);
        }
    }
    let tactical = tactics::tactical_moves(board, side);
    tactics::best_by(&tactical, |mv| tactics::score_tactical_move(board, side, mv))
}
