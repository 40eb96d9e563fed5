//! Depth-bounded minimax search with alpha-beta pruning.

use chess_core::{Color, Move};
use chess_engine::{is_king_attacked, legal_moves, Board, GameState};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::evaluation::{evaluate, MATE_SCORE};

/// Search window bound, wide enough to hold any evaluation.
const INFINITY: i32 = 1_000_000;

/// Result of a root search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: Option<Move>,
    /// Score of `best_move` from the mover's point of view.
    pub score: i32,
    pub nodes: u64,
}

/// Minimax searcher. Randomness is injected so play can be reproduced
/// from a seed.
pub struct Searcher<R> {
    rng: R,
    nodes: u64,
}

impl<R: Rng> Searcher<R> {
    pub fn new(rng: R) -> Self {
        Searcher { rng, nodes: 0 }
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Picks a move for the player to move in `state`, searching `board`.
    ///
    /// At depth 1 or below a uniformly random legal move is returned.
    pub fn find_best_move(&mut self, board: &Board, state: &GameState, depth: u32) -> Option<Move> {
        self.search(board, state.current_player(), depth).best_move
    }

    /// Root search for `side`. Ties keep the first move in generation order.
    pub fn search(&mut self, board: &Board, side: Color, depth: u32) -> SearchOutcome {
        self.nodes = 0;
        let moves = legal_moves(board, side);
        if moves.is_empty() {
            return SearchOutcome {
                best_move: None,
                score: 0,
                nodes: 0,
            };
        }

        let sign = if side == Color::White { 1 } else { -1 };

        if depth <= 1 {
            let mv = moves.choose(&mut self.rng).copied();
            let score = mv.map_or(0, |mv| {
                let mut child = board.clone();
                child.apply(mv);
                sign * evaluate(&child)
            });
            return SearchOutcome {
                best_move: mv,
                score,
                nodes: 1,
            };
        }

        let maximizing_child = side.opposite() == Color::White;
        let mut best_move = None;
        let mut best_score = -INFINITY;

        for mv in moves {
            let mut child = board.clone();
            child.apply(mv);
            let score = sign * self.minimax(&child, depth - 1, -INFINITY, INFINITY, maximizing_child);
            if best_move.is_none() || score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
        }

        tracing::debug!(
            depth,
            nodes = self.nodes,
            score = best_score,
            side = %side,
            "search complete"
        );

        SearchOutcome {
            best_move,
            score: best_score,
            nodes: self.nodes,
        }
    }

    /// Minimax value of `board` with White maximizing.
    ///
    /// White is to move iff `maximizing`. Mates score `-MATE_SCORE` when
    /// White is mated and `MATE_SCORE` when Black is; stalemate is 0.
    pub fn minimax(&mut self, board: &Board, depth: u32, mut alpha: i32, mut beta: i32, maximizing: bool) -> i32 {
        self.nodes += 1;

        if depth == 0 {
            return evaluate(board);
        }

        let side = if maximizing { Color::White } else { Color::Black };
        let moves = legal_moves(board, side);

        if moves.is_empty() {
            if !is_king_attacked(board, side) {
                return 0;
            }
            return if maximizing { -MATE_SCORE } else { MATE_SCORE };
        }

        if maximizing {
            let mut best = -INFINITY;
            for mv in moves {
                let mut child = board.clone();
                child.apply(mv);
                best = best.max(self.minimax(&child, depth - 1, alpha, beta, false));
                alpha = alpha.max(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = INFINITY;
            for mv in moves {
                let mut child = board.clone();
                child.apply(mv);
                best = best.min(self.minimax(&child, depth - 1, alpha, beta, true));
                beta = beta.min(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}
