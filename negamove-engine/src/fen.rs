//! Forsyth-Edwards Notation, a standard notation for describing a chess position.
//! [FEN](https://www.chessprogramming.org/Forsyth-Edwards_Notation)
//!
//! Fen ::= Placement ' ' Side ' ' Castling ' ' EnPassant [' ' HalfMove ' ' FullMove]

use std::convert::TryFrom;
use std::fmt::Write;

use crate::coretypes::{Castling, Color, Piece, PieceKind, Square};
use crate::coretypes::{NUM_FILES, NUM_RANKS};
use crate::error::{self, Error};
use crate::mailbox::Mailbox;
use crate::movegen;
use crate::position::Position;

/// Conversion between a type and its FEN string.
pub trait Fen: Sized {
    /// Attempt to parse a FEN string into a type.
    fn parse_fen(fen: &str) -> error::Result<Self>;

    /// Returns the FEN string representation of a type.
    fn to_fen(&self) -> String;
}

impl Fen for Position {
    fn parse_fen(fen: &str) -> error::Result<Self> {
        let malformed = |reason: &'static str| Error::Fen {
            fen: fen.to_string(),
            reason,
        };
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(fields.len() == 4 || fields.len() == 6) {
            return Err(malformed("expected 4 or 6 fields"));
        }

        let mailbox = parse_placement(fields[0]).ok_or_else(|| malformed("bad placement"))?;
        check_piece_counts(&mailbox).map_err(malformed)?;

        let side_to_move: Color = fields[1].parse().map_err(|_| malformed("bad side to move"))?;
        let castling: Castling = fields[2].parse().map_err(|_| malformed("bad castling"))?;
        let en_passant = match fields[3] {
            "-" => None,
            square => Some(
                square
                    .parse::<Square>()
                    .map_err(|_| malformed("bad en passant square"))?,
            ),
        };
        let (halfmoves, fullmoves) = match fields.get(4..6) {
            Some([halfmoves, fullmoves]) => (
                halfmoves.parse().map_err(|_| malformed("bad halfmove clock"))?,
                fullmoves.parse().map_err(|_| malformed("bad fullmove number"))?,
            ),
            _ => (0, 1),
        };

        if let Some(square) = en_passant {
            check_en_passant(&mailbox, side_to_move, square).map_err(malformed)?;
        }
        if movegen::in_check(&mailbox, !side_to_move) {
            return Err(malformed("side not to move is in check"));
        }

        let mut position = Position {
            mailbox,
            side_to_move,
            castling,
            en_passant,
            halfmoves,
            fullmoves,
            ..Position::start_position()
        };
        position.legal_moves();
        Ok(position)
    }

    fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for row in 0..NUM_RANKS {
            let mut empty = 0;
            for col in 0..NUM_FILES {
                match Square::from_row_col(row, col).and_then(|square| self.mailbox[square]) {
                    Some(piece) => {
                        if empty > 0 {
                            let _ = write!(fen, "{empty}");
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                let _ = write!(fen, "{empty}");
            }
            if row + 1 < NUM_RANKS {
                fen.push('/');
            }
        }

        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |square| square.to_string());
        let _ = write!(
            fen,
            " {} {} {} {} {}",
            self.side_to_move, self.castling, en_passant, self.halfmoves, self.fullmoves
        );
        fen
    }
}

/// Each side has one king, at most 16 pieces and 8 pawns, and no more
/// promoted pieces than missing pawns. No pawn stands on a back rank.
fn check_piece_counts(mailbox: &Mailbox) -> Result<(), &'static str> {
    use PieceKind::*;

    for (square, piece) in mailbox.pieces() {
        if piece.piece_kind() == Pawn && (square.row() == 0 || square.row() == NUM_RANKS - 1) {
            return Err("pawn on a back rank");
        }
    }

    for color in Color::iter() {
        let count = |kind: PieceKind| {
            mailbox
                .pieces()
                .filter(|(_, piece)| *piece == Piece::new(color, kind))
                .count()
        };
        if count(King) != 1 {
            return Err("each side needs exactly one king");
        }
        let pawns = count(Pawn);
        if pawns > 8 {
            return Err("more than 8 pawns for one side");
        }
        let total = mailbox
            .pieces()
            .filter(|(_, piece)| piece.color() == color)
            .count();
        if total > 16 {
            return Err("more than 16 pieces for one side");
        }
        let promoted = count(Queen).saturating_sub(1)
            + count(Rook).saturating_sub(2)
            + count(Bishop).saturating_sub(2)
            + count(Knight).saturating_sub(2);
        if promoted > 8 - pawns {
            return Err("more promoted pieces than missing pawns");
        }
    }
    Ok(())
}

/// The en passant square is on the mover's sixth rank, empty, and has the
/// enemy pawn that just double pushed directly behind it.
fn check_en_passant(
    mailbox: &Mailbox,
    side_to_move: Color,
    square: Square,
) -> Result<(), &'static str> {
    let expected_rank = match side_to_move {
        Color::White => '6',
        Color::Black => '3',
    };
    if square.rank_char() != expected_rank {
        return Err("en passant square on the wrong rank");
    }
    if mailbox[square].is_some() {
        return Err("en passant square is occupied");
    }
    let pushed_pawn = square
        .offset(-movegen::pawn_forward(side_to_move), 0)
        .and_then(|behind| mailbox[behind]);
    if pushed_pawn != Some(Piece::new(!side_to_move, PieceKind::Pawn)) {
        return Err("no enemy pawn behind en passant square");
    }
    Ok(())
}

/// Placement ::= Row '/' Row '/' ... Row, starting from the eighth rank.
fn parse_placement(placement: &str) -> Option<Mailbox> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != NUM_RANKS {
        return None;
    }

    let mut mailbox = Mailbox::new();
    for (row, row_str) in rows.into_iter().enumerate() {
        let mut col = 0;
        for ch in row_str.chars() {
            if let Some(skip) = ch.to_digit(10) {
                col += skip as usize;
            } else {
                let piece = Piece::try_from(ch).ok()?;
                mailbox[Square::from_row_col(row, col)?] = Some(piece);
                col += 1;
            }
            if col > NUM_FILES {
                return None;
            }
        }
        if col != NUM_FILES {
            return None;
        }
    }
    Some(mailbox)
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn parse_start_position() {
        let position = Position::parse_fen(START_FEN).unwrap();
        assert_eq!(position, Position::start_position());
        assert_eq!(Position::start_position().to_fen(), START_FEN);
    }

    #[test]
    fn round_trip() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 12",
        ] {
            assert_eq!(Position::parse_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn short_fen_defaults_counters() {
        let position = Position::parse_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(position.halfmoves(), 0);
        assert_eq!(position.fullmoves(), 1);
        assert_eq!(position.side_to_move(), Color::Black);
    }

    #[test]
    fn malformed_fens() {
        for fen in [
            "",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkz - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1",
            "rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQ - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNP w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3 0 1",
            "4k3/8/8/3PP3/8/8/8/4K3 w - d6 0 1",
            "4k3/8/3p4/3pP3/8/8/8/4K3 w - d6 0 1",
            "4k2R/8/8/8/8/8/8/4K3 w - - 0 1",
            "3Q4/1Q4Q1/4Q3/2Q4Q/Q4Q2/3Q4/1Q4Q1/K3Q2k w - - 0 1",
            "4k3/pppppppp/p7/8/8/8/8/4K3 w - - 0 1",
        ] {
            assert!(
                matches!(Position::parse_fen(fen), Err(Error::Fen { .. })),
                "{fen:?} should not parse"
            );
        }
    }

    #[test]
    fn en_passant_must_match_the_board() {
        let fen = "rnbqkbnr/pppp1ppp/8/8/3Pp3/8/PPP1PPPP/RNBQKBNR b KQkq d3 0 2";
        let position = Position::parse_fen(fen).unwrap();
        assert_eq!(position.en_passant, Some(Square::D3));

        let err = Position::parse_fen("4k3/8/8/3PP3/8/8/8/4K3 w - d6 0 1").unwrap_err();
        assert!(matches!(err, Error::Fen { reason, .. } if reason.contains("en passant")));
    }

    #[test]
    fn crowded_board_is_an_error_not_a_panic() {
        let fen = "3Q4/1Q4Q1/4Q3/2Q4Q/Q4Q2/3Q4/1Q4Q1/K3Q2k w - - 0 1";
        let result = std::panic::catch_unwind(|| Position::parse_fen(fen));
        assert!(matches!(result, Ok(Err(Error::Fen { .. }))));
    }
}
