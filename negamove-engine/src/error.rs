//! Negamove Engine error type.

use std::result;

use thiserror::Error;

use crate::coretypes::{Move, PlyKind};

/// Negamove Engine generic result type.
pub type Result<T> = result::Result<T, Error>;

/// Recoverable errors of the Negamove engine.
///
/// Broken search invariants (an inverted alpha-beta window, a rules engine
/// reporting no moves for a live position) are programming defects and panic instead.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Square parse string malformed.
    #[error("parse square malformed: {0:?}")]
    ParseSquare(String),
    /// Color parse string malformed.
    #[error("parse color malformed: {0:?}")]
    ParseColor(String),
    /// Piece parse character malformed.
    #[error("parse piece malformed: {0:?}")]
    ParsePiece(char),
    /// Castling parse string malformed.
    #[error("parse castling malformed: {0:?}")]
    ParseCastling(String),
    /// Long algebraic move string malformed.
    #[error("parse move malformed: {0:?}")]
    ParseMove(String),
    /// Fen string could not be turned into a position.
    #[error("fen malformed, {reason}: {fen:?}")]
    Fen { fen: String, reason: &'static str },

    /// A move was provided that is not legal in the current position.
    #[error("illegal move {0}")]
    IllegalMove(Move),
    /// Undo requested with no moves played.
    #[error("no move to undo")]
    NoMoveToUndo,

    /// Search depth must be at least one ply for a best move to exist.
    #[error("search depth {0} is out of range, must be at least 1")]
    InvalidDepth(PlyKind),
    /// Engine is currently searching, so another search cannot be started.
    #[error("engine is already searching")]
    EngineAlreadySearching,
    /// Search worker finished without delivering its result.
    #[error("search result channel closed")]
    ResultChannelClosed,
}
