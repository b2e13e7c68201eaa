//! MoveList types used in Negamove engine.
//!
//! A MoveList type alias keeps the underlying container easy to change.

use arrayvec::ArrayVec;

use crate::coretypes::{Move, MAX_MOVES};

/// MoveList is a container that can hold at most `MAX_MOVES`, the most number of moves per any chess position.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// Space separated long algebraic rendering of a sequence of moves.
pub fn display(moves: &[Move]) -> String {
    moves
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::PieceKind;
    use crate::coretypes::Square::*;

    #[test]
    fn display_moves() {
        let mut moves = MoveList::new();
        assert_eq!(display(&moves), "");
        moves.push(Move::new(E2, E4, None));
        moves.push(Move::new(A7, A8, Some(PieceKind::Queen)));
        assert_eq!(display(&moves), "e2e4 a7a8q");
    }
}
