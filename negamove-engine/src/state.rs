//! The game state contract consumed by evaluation and search.
//!
//! Search never looks inside a rules engine. It only enumerates moves,
//! makes and unmakes them in place, and reads terminal flags and squares.

use crate::coretypes::{Color, Move, Piece, Square};
use crate::movelist::MoveList;

/// Which side of the board each color's pawns start from.
///
/// Board row 0 is the top row. With `WhiteBottom`, White pawns advance toward
/// row 0 and promote there, which is the standard layout used by [`Square`].
/// A rules engine that stores its board flipped for a player playing Black
/// reports `BlackBottom`, so pawn tables follow the pawns instead of the rows.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Orientation {
    #[default]
    WhiteBottom,
    BlackBottom,
}

impl Orientation {
    /// Board row that pawns of `color` promote on.
    pub const fn promotion_row(&self, color: Color) -> usize {
        match (self, color) {
            (Orientation::WhiteBottom, Color::White) | (Orientation::BlackBottom, Color::Black) => 0,
            (Orientation::WhiteBottom, Color::Black) | (Orientation::BlackBottom, Color::White) => 7,
        }
    }
}

/// A mutable two-player board position owned exclusively by one search at a time.
///
/// Implementors guarantee that `undo_move` exactly reverses the most recent
/// `do_move`, restoring every observable field including terminal flags.
pub trait GameState {
    /// Returns every legal move for the side to move.
    /// Also refreshes the terminal flags of this position:
    /// afterwards `is_checkmate` and `is_stalemate` describe it.
    fn legal_moves(&mut self) -> MoveList;

    /// Apply a legal move in place.
    fn do_move(&mut self, move_: Move);

    /// Revert the most recent move applied with `do_move`.
    fn undo_move(&mut self);

    /// The side to move has no legal moves and is in check.
    fn is_checkmate(&self) -> bool;

    /// The side to move has no legal moves and is not in check.
    fn is_stalemate(&self) -> bool;

    fn side_to_move(&self) -> Color;

    fn orientation(&self) -> Orientation {
        Orientation::WhiteBottom
    }

    fn piece_at(&self, square: Square) -> Option<Piece>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_rows() {
        assert_eq!(Orientation::WhiteBottom.promotion_row(Color::White), 0);
        assert_eq!(Orientation::WhiteBottom.promotion_row(Color::Black), 7);
        assert_eq!(Orientation::BlackBottom.promotion_row(Color::White), 7);
        assert_eq!(Orientation::BlackBottom.promotion_row(Color::Black), 0);
    }
}
