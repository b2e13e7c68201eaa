//! Static evaluation of a position.
//!
//! Scores are absolute: positive favors White, negative favors Black,
//! unless a different perspective is requested through [`EvalParams`].

use crate::coretypes::{Color, Piece, PieceKind, Score, ScoreKind, Square};
use crate::coretypes::{Color::*, PieceKind::*};
use crate::state::{GameState, Orientation};
use crate::tables::{self, PieceTable};

/// Score of a forced win for White. A checkmate of White scores its negation.
pub const CHECKMATE: Score = Score::pawns(1000);
/// Score of a stalemated position.
pub const STALEMATE: Score = Score::ZERO;

/// Parameters fixed for the duration of one search.
///
/// * `perspective`: Color whose advantage is scored as positive.
/// * `orientation`: Which row each color's pawns promote on, selecting the pawn tables.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct EvalParams {
    pub perspective: Color,
    pub orientation: Orientation,
}

impl EvalParams {
    pub const fn new(perspective: Color, orientation: Orientation) -> Self {
        Self {
            perspective,
            orientation,
        }
    }

    /// Parameters for searching `state`, scored from `perspective`.
    pub fn for_state<G: GameState + ?Sized>(state: &G, perspective: Color) -> Self {
        Self::new(perspective, state.orientation())
    }
}

/// White perspective on a standard board.
impl Default for EvalParams {
    fn default() -> Self {
        Self::new(White, Orientation::WhiteBottom)
    }
}

impl PieceKind {
    /// Default, color independent value per piece in whole pawns.
    pub const fn material(&self) -> ScoreKind {
        match self {
            King => 0,
            Queen => 9,
            Rook => 5,
            Bishop => 3,
            Knight => 3,
            Pawn => 1,
        }
    }
}

/// Positional table for a piece. Pawn tables depend on which way that pawn advances,
/// every other piece kind shares one table between both colors.
fn piece_table(piece: Piece, orientation: Orientation) -> Option<&'static PieceTable> {
    match piece.piece_kind {
        King => None,
        Queen => Some(&tables::QUEEN),
        Rook => Some(&tables::ROOK),
        Bishop => Some(&tables::BISHOP),
        Knight => Some(&tables::KNIGHT),
        Pawn => match orientation.promotion_row(piece.color) {
            0 => Some(&tables::PAWN_PROMOTING_ON_TOP),
            _ => Some(&tables::PAWN_PROMOTING_ON_BOTTOM),
        },
    }
}

/// Positional bonus of `piece` standing on `square`, in tenths of a pawn.
pub fn positional(piece: Piece, square: Square, orientation: Orientation) -> Score {
    piece_table(piece, orientation).map_or(Score::ZERO, |table| {
        Score(table[square.row()][square.col()] as ScoreKind)
    })
}

/// Material plus positional worth of one piece, always non-negative.
pub fn piece_value(piece: Piece, square: Square, orientation: Orientation) -> Score {
    Score::pawns(piece.piece_kind.material()) + positional(piece, square, orientation)
}

/// Sum of material and position over the board, White positive.
pub fn material_and_position<G: GameState + ?Sized>(state: &G, orientation: Orientation) -> Score {
    Square::ALL
        .into_iter()
        .filter_map(|square| state.piece_at(square).map(|piece| (square, piece)))
        .fold(Score::ZERO, |total, (square, piece)| {
            let value = piece_value(piece, square, orientation);
            match piece.color {
                White => total + value,
                Black => total - value,
            }
        })
}

/// Primary evaluate function for engine.
///
/// Terminal flags are only read. A checkmated side to move loses by [`CHECKMATE`],
/// a stalemate scores [`STALEMATE`], and anything else is material plus position.
pub fn evaluate<G: GameState + ?Sized>(state: &G, params: EvalParams) -> Score {
    let absolute = if state.is_checkmate() {
        match state.side_to_move() {
            White => -CHECKMATE,
            Black => CHECKMATE,
        }
    } else if state.is_stalemate() {
        STALEMATE
    } else {
        material_and_position(state, params.orientation)
    };

    absolute * params.perspective.sign()
}
