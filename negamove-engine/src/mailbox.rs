//! A [mailbox](https://www.chessprogramming.org/Mailbox) is a square-centric
//! representation of a chess board.
//!
//! A Mailbox is an array of size Files x Ranks where each index may contain a
//! chess piece or be empty.

use std::fmt::{self, Display};
use std::ops::{Index, IndexMut};

use crate::coretypes::{Color, Piece, PieceKind, Square, NUM_FILES, NUM_RANKS, NUM_SQUARES};

/// Classic 8x8 square board representation of a chess board, indexed by board row.
/// A8 = idx 0
/// H8 = idx 7
/// A7 = idx 8
/// H1 = idx 63
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Mailbox {
    board: [Option<Piece>; Self::SIZE],
}

impl Mailbox {
    pub const FILES: usize = NUM_FILES;
    pub const RANKS: usize = NUM_RANKS;
    pub const SIZE: usize = NUM_SQUARES;

    /// Creates an empty Mailbox, where all squares are None.
    pub fn new() -> Self {
        Mailbox {
            board: [None; Mailbox::SIZE],
        }
    }

    /// Create Mailbox with pieces arranged in starting chess position.
    pub fn start_position() -> Self {
        use Color::*;
        use PieceKind::*;
        let mut mb = Self::new();
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        for (col, piece_kind) in back_rank.into_iter().enumerate() {
            mb.board[col] = Some(Piece::new(Black, piece_kind));
            mb.board[Self::FILES + col] = Some(Piece::new(Black, Pawn));
            mb.board[6 * Self::FILES + col] = Some(Piece::new(White, Pawn));
            mb.board[7 * Self::FILES + col] = Some(Piece::new(White, piece_kind));
        }

        mb
    }

    pub fn board(&self) -> &[Option<Piece>; Self::SIZE] {
        &self.board
    }

    /// Iterator over every occupied square and its piece.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::ALL
            .into_iter()
            .filter_map(move |square| self[square].map(|piece| (square, piece)))
    }

    /// Returns the square of the king of `color`, if it has one.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| *piece == Piece::new(color, PieceKind::King))
            .map(|(square, _)| square)
    }

    /// Returns pretty-printed chess board representation of Self.
    /// The chess board has borders and file/rank indicators.
    /// When `flipped` is true the board is drawn from Black's side.
    pub fn pretty(&self, flipped: bool) -> String {
        const RANK_SEP: &str = "+---+---+---+---+---+---+---+---+\n";
        let mut pretty = String::with_capacity(626);
        let rows: Vec<usize> = match flipped {
            false => (0..Self::RANKS).collect(),
            true => (0..Self::RANKS).rev().collect(),
        };
        let cols: Vec<usize> = match flipped {
            false => (0..Self::FILES).collect(),
            true => (0..Self::FILES).rev().collect(),
        };

        pretty.push_str(RANK_SEP);
        for &row in &rows {
            pretty.push_str("| ");
            for &col in &cols {
                pretty.push(match self.board[row * Self::FILES + col] {
                    Some(piece) => char::from(piece),
                    None => ' ',
                });
                pretty.push_str(" | ");
            }
            pretty.push_str(&(Self::RANKS - row).to_string());
            pretty.push('\n');
            pretty.push_str(RANK_SEP);
        }
        pretty.push(' ');
        for &col in &cols {
            pretty.push(' ');
            pretty.push((b'a' + col as u8) as char);
            pretty.push_str("  ");
        }
        pretty.push('\n');

        pretty
    }
}

impl Index<Square> for Mailbox {
    type Output = Option<Piece>;
    fn index(&self, square: Square) -> &Self::Output {
        &self.board[square.idx()]
    }
}

impl IndexMut<Square> for Mailbox {
    fn index_mut(&mut self, square: Square) -> &mut Self::Output {
        &mut self.board[square.idx()]
    }
}

/// Default value is that of a standard starting chess position.
impl Default for Mailbox {
    fn default() -> Self {
        Mailbox::start_position()
    }
}

impl Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Square::*;

    #[test]
    fn start_position_layout() {
        let mb = Mailbox::start_position();
        assert_eq!(mb[E1], Some(Piece::new(Color::White, PieceKind::King)));
        assert_eq!(mb[D8], Some(Piece::new(Color::Black, PieceKind::Queen)));
        assert_eq!(mb[A2], Some(Piece::new(Color::White, PieceKind::Pawn)));
        assert_eq!(mb[H7], Some(Piece::new(Color::Black, PieceKind::Pawn)));
        assert_eq!(mb[E4], None);
        assert_eq!(mb.pieces().count(), 32);
        assert_eq!(mb.king_square(Color::Black), Some(E8));
    }

    #[test]
    fn pretty_flips_for_black() {
        let mb = Mailbox::start_position();
        let white_view = mb.pretty(false);
        let black_view = mb.pretty(true);
        assert!(white_view.starts_with("+---"));
        assert!(white_view.lines().nth(1).unwrap().starts_with("| r |"));
        assert!(black_view.lines().nth(1).unwrap().starts_with("| R |"));
        assert!(black_view.trim_end().ends_with('a'));
    }
}
