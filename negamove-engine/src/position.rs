//! Holds Position struct, the reference rules engine the search runs on.
//! Position represents a chess position and the moves that led to it.

use std::fmt::{self, Display};

use crate::coretypes::{Castling, Color, Move, MoveCount, MoveInfo, MoveKind, Piece, Square};
use crate::coretypes::{Color::*, PieceKind::*, Status};
use crate::error::{self, Error};
use crate::fen::Fen;
use crate::mailbox::Mailbox;
use crate::movegen as mg;
use crate::movelist::MoveList;
use crate::state::GameState;

/// struct Position
/// A complete data set that can represent any chess position.
/// # Members:
/// * mailbox - a square-centric container of all pieces.
/// * side_to_move - Color of player whose turn it is.
/// * castling - Castling rights for both players.
/// * en_passant - Indicates if en passant is possible, and for which square.
/// * halfmoves - Tracker for 50 move draw rule. Resets after capture/pawn move.
/// * fullmoves - Starts at 1, increments after each black player's move.
/// * status - Terminal status, refreshed on each call to `legal_moves`.
/// * plays_as_black - The human player chose Black.
/// * history - Information to undo every move made on this position.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    pub(crate) mailbox: Mailbox,
    pub(crate) side_to_move: Color,
    pub(crate) castling: Castling,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmoves: MoveCount,
    pub(crate) fullmoves: MoveCount,
    pub(crate) status: Status,
    pub(crate) plays_as_black: bool,
    pub(crate) history: Vec<MoveInfo>,
}

impl Position {
    /// Standard chess start position.
    pub fn start_position() -> Self {
        Self {
            mailbox: Mailbox::start_position(),
            side_to_move: White,
            castling: Castling::ALL,
            en_passant: None,
            halfmoves: 0,
            fullmoves: 1,
            status: Status::Ongoing,
            plays_as_black: false,
            history: Vec::new(),
        }
    }

    /// Const getters.
    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn castling(&self) -> Castling {
        self.castling
    }
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }
    pub fn halfmoves(&self) -> MoveCount {
        self.halfmoves
    }
    pub fn fullmoves(&self) -> MoveCount {
        self.fullmoves
    }
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn history(&self) -> &[MoveInfo] {
        &self.history
    }
    pub fn plays_as_black(&self) -> bool {
        self.plays_as_black
    }

    /// Record which color the human player has chosen.
    pub fn set_plays_as_black(&mut self, plays_as_black: bool) {
        self.plays_as_black = plays_as_black;
    }

    pub fn is_checkmate(&self) -> bool {
        self.status == Status::Checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.status == Status::Stalemate
    }

    /// Returns true if active player's king is attacked.
    pub fn is_in_check(&self) -> bool {
        mg::in_check(&self.mailbox, self.side_to_move)
    }

    /// Returns a list of all legal moves for active player,
    /// and records whether the position is checkmate or stalemate.
    pub fn legal_moves(&mut self) -> MoveList {
        let legal_moves = mg::legal_moves(self);
        self.status = match (legal_moves.is_empty(), self.is_in_check()) {
            (false, _) => Status::Ongoing,
            (true, true) => Status::Checkmate,
            (true, false) => Status::Stalemate,
        };
        legal_moves
    }

    /// Apply a move to self, in place.
    /// `do_move` does not check if the move is legal or not,
    /// it simply executes it while assuming legality.
    /// The terminal status is unknown until the next call to `legal_moves`.
    ///
    /// # Panics
    ///
    /// Panics if there is no piece on the move's `from` square.
    pub fn do_move(&mut self, move_: Move) -> MoveInfo {
        let piece = match self.mailbox[move_.from] {
            Some(piece) => piece,
            None => panic!("do_move {move_} has no piece on {}", move_.from),
        };
        let captured = self.mailbox[move_.to];

        let move_kind = if piece.piece_kind == Pawn
            && captured.is_none()
            && move_.from.col() != move_.to.col()
        {
            MoveKind::EnPassant
        } else if piece.piece_kind == King && move_.from.col().abs_diff(move_.to.col()) == 2 {
            MoveKind::Castle
        } else if let Some(captured) = captured {
            MoveKind::Capture(captured)
        } else {
            MoveKind::Quiet
        };

        let move_info = MoveInfo {
            move_,
            piece,
            move_kind,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmoves: self.halfmoves,
            status: self.status,
        };

        // If promoting, set promoting piece. Otherwise set active piece.
        let placed = move_
            .promotion
            .map_or(piece, |piece_kind| Piece::new(piece.color, piece_kind));
        self.mailbox[move_.from] = None;
        self.mailbox[move_.to] = Some(placed);

        match move_kind {
            MoveKind::EnPassant => {
                if let Some(passed) = Square::from_row_col(move_.from.row(), move_.to.col()) {
                    self.mailbox[passed] = None;
                }
            }
            MoveKind::Castle => {
                let (rook_from, rook_to) = Self::castling_rook_squares(move_.to);
                self.mailbox[rook_to] = self.mailbox[rook_from].take();
            }
            MoveKind::Quiet | MoveKind::Capture(_) => (),
        }

        self.castling.clear(Castling::lost_on(move_.from) | Castling::lost_on(move_.to));

        // En Passant square is set to the skipped square after any double pawn push.
        self.en_passant = match piece.piece_kind == Pawn
            && move_.from.row().abs_diff(move_.to.row()) == 2
        {
            true => Square::from_row_col((move_.from.row() + move_.to.row()) / 2, move_.from.col()),
            false => None,
        };

        if piece.piece_kind == Pawn || move_info.is_capture() {
            self.halfmoves = 0;
        } else {
            self.halfmoves += 1;
        }
        if self.side_to_move == Black {
            self.fullmoves += 1;
        }

        self.side_to_move = !self.side_to_move;
        self.status = Status::Ongoing;
        self.history.push(move_info);
        move_info
    }

    /// Rook from and to squares for a castling king landing on `king_to`.
    fn castling_rook_squares(king_to: Square) -> (Square, Square) {
        use Square::*;
        match king_to {
            G1 => (H1, F1),
            C1 => (A1, D1),
            G8 => (H8, F8),
            _ => (A8, D8),
        }
    }

    /// Undo the most recent move, in place. Does nothing when no move was made.
    pub(crate) fn undo_unchecked(&mut self) -> Option<MoveInfo> {
        let move_info = self.history.pop()?;
        let move_ = move_info.move_;

        self.side_to_move = !self.side_to_move;
        if self.side_to_move == Black {
            self.fullmoves -= 1;
        }
        self.castling = move_info.castling;
        self.en_passant = move_info.en_passant;
        self.halfmoves = move_info.halfmoves;
        self.status = move_info.status;

        self.mailbox[move_.from] = Some(move_info.piece);
        self.mailbox[move_.to] = match move_info.move_kind {
            MoveKind::Capture(captured) => Some(captured),
            _ => None,
        };

        match move_info.move_kind {
            MoveKind::EnPassant => {
                if let Some(passed) = Square::from_row_col(move_.from.row(), move_.to.col()) {
                    self.mailbox[passed] = Some(Piece::new(!move_info.piece.color, Pawn));
                }
            }
            MoveKind::Castle => {
                let (rook_from, rook_to) = Self::castling_rook_squares(move_.to);
                self.mailbox[rook_from] = self.mailbox[rook_to].take();
            }
            MoveKind::Quiet | MoveKind::Capture(_) => (),
        }

        Some(move_info)
    }

    /// Take back the most recent move, returning what it was.
    pub fn take_back(&mut self) -> error::Result<MoveInfo> {
        self.undo_unchecked().ok_or(Error::NoMoveToUndo)
    }

    /// Checks if move is legal before applying it.
    /// On success the terminal status of the resulting position is up to date.
    pub fn do_legal_move(&mut self, move_: Move) -> error::Result<MoveInfo> {
        if !self.legal_moves().contains(&move_) {
            return Err(Error::IllegalMove(move_));
        }
        let move_info = self.do_move(move_);
        self.legal_moves();
        Ok(move_info)
    }
}

impl GameState for Position {
    fn legal_moves(&mut self) -> MoveList {
        Position::legal_moves(self)
    }

    fn do_move(&mut self, move_: Move) {
        Position::do_move(self, move_);
    }

    fn undo_move(&mut self) {
        let undone = self.undo_unchecked();
        debug_assert!(undone.is_some(), "undo_move called without a move to undo");
    }

    fn is_checkmate(&self) -> bool {
        Position::is_checkmate(self)
    }

    fn is_stalemate(&self) -> bool {
        Position::is_stalemate(self)
    }

    fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.mailbox[square]
    }
}

/// Defaults to standard chess start position.
impl Default for Position {
    fn default() -> Self {
        Self::start_position()
    }
}

/// Displays pretty-printed chess board and Fen string representing Position.
impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\n Fen: {}\n",
            self.mailbox.pretty(self.plays_as_black),
            self.to_fen()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::{PieceKind, Square::*};

    #[test]
    fn do_move_with_legal_move() {
        let mut position = Position::start_position();
        let move_info = position.do_move(Move::new(E2, E4, None));
        assert_eq!(position.mailbox[E4], Some(Piece::new(White, Pawn)));
        assert_eq!(position.mailbox[E2], None);
        assert_eq!(position.en_passant, Some(E3));
        assert_eq!(position.side_to_move, Black);
        assert_eq!(move_info.move_kind, MoveKind::Quiet);
    }

    #[test]
    fn undo_restores_every_field() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
            "r3k2r/1P6/8/8/8/8/6p1/R3K2R b KQkq - 3 40",
        ];
        for fen in fens {
            let mut position = Position::parse_fen(fen).unwrap();
            let before = position.clone();
            for legal_move in position.clone().legal_moves() {
                position.do_move(legal_move);
                position.undo_move();
                assert_eq!(position, before, "round trip of {legal_move} in {fen}");
            }
        }
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let mut position = Position::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        position.do_legal_move(Move::new(E1, G1, None)).unwrap();
        assert_eq!(position.mailbox[F1], Some(Piece::new(White, Rook)));
        assert_eq!(position.mailbox[H1], None);
        assert_eq!(position.castling.to_string(), "kq");

        // Capturing a rook on its home square removes that side's right.
        let mut position = Position::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        position.do_legal_move(Move::new(A1, A8, None)).unwrap();
        assert_eq!(position.castling.to_string(), "Kk");
    }

    #[test]
    fn en_passant_removes_passed_pawn() {
        let mut position = Position::parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let move_info = position.do_legal_move(Move::new(E5, D6, None)).unwrap();
        assert_eq!(move_info.move_kind, MoveKind::EnPassant);
        assert_eq!(position.mailbox[D5], None);
        assert_eq!(position.mailbox[D6], Some(Piece::new(White, Pawn)));
        position.take_back().unwrap();
        assert_eq!(position.mailbox[D5], Some(Piece::new(Black, Pawn)));
    }

    #[test]
    fn promotion_places_new_piece() {
        let mut position = Position::parse_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        position
            .do_legal_move(Move::new(B7, B8, Some(PieceKind::Knight)))
            .unwrap();
        assert_eq!(position.mailbox[B8], Some(Piece::new(White, Knight)));
    }

    #[test]
    fn illegal_move_is_rejected() {
        let mut position = Position::start_position();
        let result = position.do_legal_move(Move::new(E2, E5, None));
        assert_eq!(result, Err(Error::IllegalMove(Move::new(E2, E5, None))));
        assert_eq!(position.take_back(), Err(Error::NoMoveToUndo));
    }

    #[test]
    fn terminal_status() {
        let mut mated = Position::parse_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
        assert!(mated.legal_moves().is_empty());
        assert!(mated.is_checkmate());
        assert!(!mated.is_stalemate());

        let mut stalemated = Position::parse_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stalemated.legal_moves().is_empty());
        assert!(stalemated.is_stalemate());
        assert!(!stalemated.is_checkmate());
    }
}
