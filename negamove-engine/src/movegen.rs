//! Move generation over a mailbox board.
//!
//! Moves are generated pseudo-legally from piece movement patterns, then
//! filtered by making each move and rejecting any that leave the mover's king attacked.

use log::error;

use crate::coretypes::{Castling, Color, Move, Piece, PieceKind, Square};
use crate::coretypes::{Color::*, PieceKind::*, Square::*};
use crate::mailbox::Mailbox;
use crate::movelist::MoveList;
use crate::position::Position;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Row step of a pawn push. White pawns move toward row 0.
pub(crate) const fn pawn_forward(color: Color) -> i8 {
    match color {
        White => -1,
        Black => 1,
    }
}

const fn pawn_start_row(color: Color) -> usize {
    match color {
        White => 6,
        Black => 1,
    }
}

const fn pawn_promotion_row(color: Color) -> usize {
    match color {
        White => 0,
        Black => 7,
    }
}

/// Returns true if any piece of color `by` attacks `square`.
pub fn is_attacked(mailbox: &Mailbox, square: Square, by: Color) -> bool {
    let holds = |target: Option<Square>, kinds: &[PieceKind]| {
        target
            .and_then(|target| mailbox[target])
            .map_or(false, |piece| {
                piece.color == by && kinds.contains(&piece.piece_kind)
            })
    };

    // A pawn attacks diagonally forward, so look one row behind the square from its view.
    let pawn_row = -pawn_forward(by);
    if holds(square.offset(pawn_row, -1), &[Pawn]) || holds(square.offset(pawn_row, 1), &[Pawn]) {
        return true;
    }
    if KNIGHT_OFFSETS
        .iter()
        .any(|&(dr, dc)| holds(square.offset(dr, dc), &[Knight]))
    {
        return true;
    }
    if KING_OFFSETS
        .iter()
        .any(|&(dr, dc)| holds(square.offset(dr, dc), &[King]))
    {
        return true;
    }

    let slider_hits = |directions: &[(i8, i8)], kinds: &[PieceKind]| {
        directions.iter().any(|&(dr, dc)| {
            let mut current = square.offset(dr, dc);
            while let Some(target) = current {
                if mailbox[target].is_some() {
                    return holds(Some(target), kinds);
                }
                current = target.offset(dr, dc);
            }
            false
        })
    };

    slider_hits(&ROOK_DIRECTIONS, &[Rook, Queen]) || slider_hits(&BISHOP_DIRECTIONS, &[Bishop, Queen])
}

/// Returns true if the king of `color` is attacked. A board without that king is never in check.
pub fn in_check(mailbox: &Mailbox, color: Color) -> bool {
    mailbox
        .king_square(color)
        .map_or(false, |king| is_attacked(mailbox, king, !color))
}

/// Generate every legal move for the side to move of `position`.
/// The position is mutated while testing moves and restored before returning.
pub(crate) fn legal_moves(position: &mut Position) -> MoveList {
    let mover = position.side_to_move;
    let mut legal = MoveList::new();

    for candidate in pseudo_legal_moves(position) {
        position.do_move(candidate);
        let exposed = in_check(&position.mailbox, mover);
        position.undo_unchecked();

        if !exposed && legal.try_push(candidate).is_err() {
            error!("more than {} legal moves, dropping the rest", legal.capacity());
            break;
        }
    }
    legal
}

/// Moves that follow piece movement rules, without regard for the mover's king safety.
/// Castling moves are fully checked here since they depend on attacked squares.
fn pseudo_legal_moves(position: &Position) -> Vec<Move> {
    let mailbox = &position.mailbox;
    let mover = position.side_to_move;
    let mut moves = Vec::with_capacity(64);

    for (from, piece) in mailbox.pieces().filter(|(_, piece)| piece.color == mover) {
        match piece.piece_kind {
            Pawn => pawn_moves(position, from, mover, &mut moves),
            Knight => step_moves(mailbox, from, mover, &KNIGHT_OFFSETS, &mut moves),
            King => {
                step_moves(mailbox, from, mover, &KING_OFFSETS, &mut moves);
                castling_moves(position, from, &mut moves);
            }
            Rook => slide_moves(mailbox, from, mover, &ROOK_DIRECTIONS, &mut moves),
            Bishop => slide_moves(mailbox, from, mover, &BISHOP_DIRECTIONS, &mut moves),
            Queen => {
                slide_moves(mailbox, from, mover, &ROOK_DIRECTIONS, &mut moves);
                slide_moves(mailbox, from, mover, &BISHOP_DIRECTIONS, &mut moves);
            }
        }
    }
    moves
}

fn pawn_moves(position: &Position, from: Square, color: Color, moves: &mut Vec<Move>) {
    let mailbox = &position.mailbox;
    let forward = pawn_forward(color);

    if let Some(single) = from.offset(forward, 0) {
        if mailbox[single].is_none() {
            push_pawn_move(from, single, color, moves);

            if from.row() == pawn_start_row(color) {
                if let Some(double) = from.offset(2 * forward, 0) {
                    if mailbox[double].is_none() {
                        moves.push(Move::new(from, double, None));
                    }
                }
            }
        }
    }

    for d_col in [-1, 1] {
        if let Some(to) = from.offset(forward, d_col) {
            match mailbox[to] {
                Some(target) if target.color != color => push_pawn_move(from, to, color, moves),
                None if position.en_passant == Some(to) => moves.push(Move::new(from, to, None)),
                _ => (),
            }
        }
    }
}

/// Pushes a pawn move, expanding it into every promotion when it reaches the last row.
fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut Vec<Move>) {
    if to.row() == pawn_promotion_row(color) {
        for piece_kind in PieceKind::PROMOTIONS {
            moves.push(Move::new(from, to, Some(piece_kind)));
        }
    } else {
        moves.push(Move::new(from, to, None));
    }
}

fn step_moves(
    mailbox: &Mailbox,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(d_row, d_col) in offsets {
        if let Some(to) = from.offset(d_row, d_col) {
            if mailbox[to].map_or(true, |target| target.color != color) {
                moves.push(Move::new(from, to, None));
            }
        }
    }
}

fn slide_moves(
    mailbox: &Mailbox,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(d_row, d_col) in directions {
        let mut current = from.offset(d_row, d_col);
        while let Some(to) = current {
            match mailbox[to] {
                None => moves.push(Move::new(from, to, None)),
                Some(target) => {
                    if target.color != color {
                        moves.push(Move::new(from, to, None));
                    }
                    break;
                }
            }
            current = to.offset(d_row, d_col);
        }
    }
}

/// Castling requires the right, an unmoved rook, empty squares between king and rook,
/// and that the king does not start in, pass through, or land on an attacked square.
fn castling_moves(position: &Position, from: Square, moves: &mut Vec<Move>) {
    struct CastleSpec {
        rights: Castling,
        king_from: Square,
        king_to: Square,
        rook_from: Square,
        empty: &'static [Square],
        safe: &'static [Square],
    }

    const SPECS: [(Color, CastleSpec); 4] = [
        (
            White,
            CastleSpec {
                rights: Castling::W_KING,
                king_from: E1,
                king_to: G1,
                rook_from: H1,
                empty: &[F1, G1],
                safe: &[E1, F1, G1],
            },
        ),
        (
            White,
            CastleSpec {
                rights: Castling::W_QUEEN,
                king_from: E1,
                king_to: C1,
                rook_from: A1,
                empty: &[D1, C1, B1],
                safe: &[E1, D1, C1],
            },
        ),
        (
            Black,
            CastleSpec {
                rights: Castling::B_KING,
                king_from: E8,
                king_to: G8,
                rook_from: H8,
                empty: &[F8, G8],
                safe: &[E8, F8, G8],
            },
        ),
        (
            Black,
            CastleSpec {
                rights: Castling::B_QUEEN,
                king_from: E8,
                king_to: C8,
                rook_from: A8,
                empty: &[D8, C8, B8],
                safe: &[E8, D8, C8],
            },
        ),
    ];

    let mailbox = &position.mailbox;
    let mover = position.side_to_move;

    for (color, spec) in SPECS.iter() {
        if *color != mover || from != spec.king_from || !position.castling.has(spec.rights) {
            continue;
        }
        if mailbox[spec.rook_from] != Some(Piece::new(mover, Rook)) {
            continue;
        }
        if spec.empty.iter().any(|&square| mailbox[square].is_some()) {
            continue;
        }
        if spec
            .safe
            .iter()
            .any(|&square| is_attacked(mailbox, square, !mover))
        {
            continue;
        }
        moves.push(Move::new(spec.king_from, spec.king_to, None));
    }
}
