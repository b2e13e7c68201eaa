//! Negamax implementation of Minimax with Alpha-Beta pruning.

use std::cmp;

use log::debug;

use crate::coretypes::{Move, PlyKind, Score, Sign};
use crate::evaluation::{evaluate, EvalParams, CHECKMATE};
use crate::state::GameState;

/// Fixed depth Negamax searcher with alpha-beta pruning.
///
/// The player whose turn it is to move for a position is always treated as the maxing player.
/// A node returns the max possible score of its maxing player,
/// so the score of a child node is negated when interpreted by its parent.
///
/// A `Negamax` records the best root move of the last search it ran,
/// along with counts of what it visited.
#[derive(Debug, Clone)]
pub struct Negamax {
    max_depth: PlyKind,
    params: EvalParams,
    cutoffs_enabled: bool,
    best_move: Option<Move>,
    nodes: u64,
    evaluations: u64,
    cutoffs: u64,
}

impl Negamax {
    /// A searcher whose root is at `max_depth`, with pruning enabled.
    pub fn new(max_depth: PlyKind, params: EvalParams) -> Self {
        Self {
            max_depth,
            params,
            cutoffs_enabled: true,
            best_move: None,
            nodes: 0,
            evaluations: 0,
            cutoffs: 0,
        }
    }

    /// Enable or disable the `alpha >= beta` cutoff. Disabling it changes no score.
    pub fn with_cutoffs(mut self, enabled: bool) -> Self {
        self.cutoffs_enabled = enabled;
        self
    }

    pub fn max_depth(&self) -> PlyKind {
        self.max_depth
    }

    pub fn params(&self) -> EvalParams {
        self.params
    }

    /// Best root move found by the last search, None if the root had no moves.
    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }

    /// Number of nodes visited, root included.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Number of nodes scored by the evaluator.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Number of nodes where remaining siblings were pruned.
    pub fn cutoffs(&self) -> u64 {
        self.cutoffs
    }

    /// Search `state` from the root with a full window.
    ///
    /// The root turn sign is positive when the side to move is the evaluation perspective,
    /// so the returned score is relative to the side to move at the root.
    pub fn run<G: GameState + ?Sized>(&mut self, state: &mut G, legal_moves: &[Move]) -> Score {
        self.best_move = None;
        self.nodes = 0;
        self.evaluations = 0;
        self.cutoffs = 0;

        let turn_sign = Sign::relative(state.side_to_move(), self.params.perspective);
        self.search(state, legal_moves, self.max_depth, -CHECKMATE, CHECKMATE, turn_sign)
    }

    /// Negamax node.
    ///
    /// Parameters:
    ///
    /// state: current position to search. Mutated in place and restored before returning.
    /// legal_moves: every legal move of `state`.
    /// depth: remaining depth to search to. The root is at `max_depth`.
    /// alpha: Best (greatest) guaranteed value for current player.
    /// beta: Best (lowest) guaranteed value for opposite player.
    /// turn_sign: Converts an evaluation into the current player's frame.
    pub fn search<G: GameState + ?Sized>(
        &mut self,
        state: &mut G,
        legal_moves: &[Move],
        depth: PlyKind,
        mut alpha: Score,
        beta: Score,
        turn_sign: Sign,
    ) -> Score {
        debug_assert!(alpha <= beta, "inverted search window ({alpha}, {beta})");
        self.nodes += 1;

        // Leaf nodes and terminal nodes, Checkmates/Stalemates, are scored directly.
        if depth == 0 || legal_moves.is_empty() {
            debug_assert!(
                depth == 0 || state.is_checkmate() || state.is_stalemate(),
                "no legal moves in a position that is not terminal"
            );
            self.evaluations += 1;
            return evaluate(state, self.params) * turn_sign;
        }

        let is_root = depth == self.max_depth;
        let mut max_score = -CHECKMATE;

        for &legal_move in legal_moves {
            state.do_move(legal_move);
            let replies = state.legal_moves();
            let score = -self.search(state, &replies, depth - 1, -beta, -alpha, -turn_sign);
            state.undo_move();

            if score > max_score {
                max_score = score;
                if is_root {
                    self.record_best(legal_move, score);
                }
            } else if is_root && self.best_move.is_none() {
                // Every move so far loses by mate. Keep one anyway.
                self.record_best(legal_move, score);
            }

            alpha = cmp::max(alpha, max_score);
            if self.cutoffs_enabled && alpha >= beta {
                self.cutoffs += 1;
                break;
            }
        }

        max_score
    }

    fn record_best(&mut self, best_move: Move, score: Score) {
        debug!("root best move {best_move} score {score}");
        self.best_move = Some(best_move);
    }
}
