//! The fundamental and simple types of `negamove_engine`.

use std::convert::TryFrom;
use std::fmt::{self, Display, Write};
use std::ops::{Add, AddAssign, BitOr, Mul, Neg, Not, Sub, SubAssign};
use std::str::FromStr;

use crate::error::{self, Error};

///////////////
// Constants //
///////////////
pub const NUM_FILES: usize = 8; // a, b, c, d, e, f, g, h
pub const NUM_RANKS: usize = 8; // 8, 7, 6, 5, 4, 3, 2, 1 by row
pub const NUM_SQUARES: usize = NUM_FILES * NUM_RANKS;

// The max possible measured number of moves for any chess position.
pub const MAX_MOVES: usize = 218;

/////////////////////////
// Data and Structures //
/////////////////////////

/// Type alias for max ply/depth.
pub type PlyKind = u8;

/// Counter for half-move clock and full-moves.
pub type MoveCount = u16;

/// Inner type of Score, in tenths of a pawn.
pub type ScoreKind = i32;

/// A signed evaluation of a position in tenths of a pawn.
///
/// Material is whole pawns and positional table entries are a tenth of a pawn each,
/// so a fixed-point tenth keeps every score exact.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Score(pub ScoreKind);

/// Color can represent the color of a piece, or a player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Color {
    White,
    Black,
}

/// Multiplier that converts a score between the fixed reference frame
/// and the frame of the player to move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Piece {
    pub(crate) color: Color,
    pub(crate) piece_kind: PieceKind,
}

/// Castling rights for a position.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Castling(u8);

impl Castling {
    pub const W_KING: Castling = Castling(0b00000001);
    pub const W_QUEEN: Castling = Castling(0b00000010);
    pub const B_KING: Castling = Castling(0b00000100);
    pub const B_QUEEN: Castling = Castling(0b00001000);
    pub const W_SIDE: Castling = Castling(Self::W_KING.0 | Self::W_QUEEN.0);
    pub const B_SIDE: Castling = Castling(Self::B_KING.0 | Self::B_QUEEN.0);
    pub const ALL: Castling = Castling(Self::W_SIDE.0 | Self::B_SIDE.0);
    pub const NONE: Castling = Castling(0u8);
}

/// Every square of a chess board, in board row order.
///
/// Row 0 is the eighth rank and row 7 is the first rank, so `A8 as u8 == 0`
/// and `H1 as u8 == 63`. Evaluation tables are indexed the same way.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[rustfmt::skip]
#[repr(u8)]
pub enum Square {
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1 = 63u8,
}

/// Long Algebraic form of moving a single chess piece.
/// Equivalent to a chess "half move", or "ply".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Move {
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) promotion: Option<PieceKind>,
}

/// Enum describing the kind of a move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MoveKind {
    /// Moved to an empty square, including pawn pushes.
    Quiet,
    /// Captured the piece standing on the target square.
    Capture(Piece),
    /// En passant capture of the pawn behind the target square.
    EnPassant,
    /// King moved two squares and the rook jumped over it.
    Castle,
}

/// Terminal status of a position, as last computed by legal move generation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Status {
    Ongoing,
    Checkmate,
    Stalemate,
}

/// MoveInfo records everything needed to exactly reverse a move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MoveInfo {
    pub(crate) move_: Move,
    /// Piece that moved, before any promotion.
    pub(crate) piece: Piece,
    pub(crate) move_kind: MoveKind,
    /// State of the position before the move was made.
    pub(crate) castling: Castling,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmoves: MoveCount,
    pub(crate) status: Status,
}

//////////////////////
// Implementations  //
//////////////////////

impl Score {
    pub const ZERO: Score = Score(0);
    /// Number of Score units in one pawn.
    pub const PER_PAWN: ScoreKind = 10;

    /// Score worth a whole number of pawns.
    pub const fn pawns(pawns: ScoreKind) -> Self {
        Self(pawns * Self::PER_PAWN)
    }

    /// Returns the sign of the Score value, either 1, -1, or 0.
    pub const fn signum(&self) -> ScoreKind {
        self.0.signum()
    }
}

impl Add for Score {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}
impl Sub for Score {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
impl SubAssign for Score {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0
    }
}
impl Neg for Score {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
impl Mul<Sign> for Score {
    type Output = Self;
    fn mul(self, rhs: Sign) -> Self::Output {
        match rhs {
            Sign::Positive => self,
            Sign::Negative => -self,
        }
    }
}

/// Displays in pawns with one decimal place, always signed.
impl Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let magnitude = self.0.unsigned_abs();
        let per_pawn = Self::PER_PAWN.unsigned_abs();
        write!(f, "{sign}{}.{}", magnitude / per_pawn, magnitude % per_pawn)
    }
}

impl Color {
    /// FEN compliant conversion.
    pub const fn to_char(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Returns the absolute sign of a Color.
    /// Positive is good for White and negative is good for Black.
    pub const fn sign(&self) -> Sign {
        match self {
            Color::White => Sign::Positive,
            Color::Black => Sign::Negative,
        }
    }

    pub const fn iter() -> [Color; 2] {
        [Color::White, Color::Black]
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl TryFrom<char> for Color {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch {
            'w' => Ok(Color::White),
            'b' => Ok(Color::Black),
            _ => Err(Error::ParseColor(ch.to_string())),
        }
    }
}

impl FromStr for Color {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Color::try_from(ch),
            _ => Err(Error::ParseColor(s.to_string())),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.to_char())
    }
}

impl Sign {
    /// Sign of the frame where `color` is the maximizing player,
    /// relative to the frame where `perspective` is.
    pub fn relative(color: Color, perspective: Color) -> Self {
        if color == perspective {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }
}

impl Neg for Sign {
    type Output = Self;
    fn neg(self) -> Self::Output {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

impl PieceKind {
    /// FEN compliant conversion, defaults as white pieces.
    pub const fn to_char(&self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Rook => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Pawn => 'P',
        }
    }

    /// Piece kinds a pawn may promote into.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];
}

impl Piece {
    pub const fn new(color: Color, piece_kind: PieceKind) -> Self {
        Piece { color, piece_kind }
    }
    pub const fn color(&self) -> Color {
        self.color
    }
    pub const fn piece_kind(&self) -> PieceKind {
        self.piece_kind
    }

    /// FEN compliant conversion, uppercase for White and lowercase for Black.
    pub const fn to_char(&self) -> char {
        match self.color {
            Color::White => self.piece_kind.to_char(),
            Color::Black => self.piece_kind.to_char().to_ascii_lowercase(),
        }
    }
}

impl From<Piece> for char {
    fn from(piece: Piece) -> Self {
        piece.to_char()
    }
}

impl TryFrom<char> for Piece {
    type Error = error::Error;
    fn try_from(value: char) -> error::Result<Self> {
        let color = match value.is_ascii_uppercase() {
            true => Color::White,
            false => Color::Black,
        };
        let piece_kind = match value.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'R' => PieceKind::Rook,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => return Err(Error::ParsePiece(value)),
        };
        Ok(Piece { color, piece_kind })
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.to_char())
    }
}

impl Castling {
    /// Returns true if there are no castling rights.
    pub const fn is_none(&self) -> bool {
        self.0 == 0u8
    }

    /// Returns true if Castling mask has all of provided bits.
    pub const fn has(&self, rights: Castling) -> bool {
        self.0 & rights.0 == rights.0
    }

    /// Set given bits to '1' on Castling mask.
    pub fn set(&mut self, rights: Castling) {
        self.0 |= rights.0;
    }

    /// Set given bits to '0' on Castling mask.
    pub fn clear(&mut self, rights: Castling) {
        self.0 &= !rights.0;
    }

    /// Removes all castling rights for a color.
    pub fn clear_color(&mut self, color: Color) {
        match color {
            Color::White => self.clear(Self::W_SIDE),
            Color::Black => self.clear(Self::B_SIDE),
        }
    }

    /// Rights lost when a piece leaves or is captured on `square`.
    pub const fn lost_on(square: Square) -> Castling {
        match square {
            Square::E1 => Self::W_SIDE,
            Square::H1 => Self::W_KING,
            Square::A1 => Self::W_QUEEN,
            Square::E8 => Self::B_SIDE,
            Square::H8 => Self::B_KING,
            Square::A8 => Self::B_QUEEN,
            _ => Self::NONE,
        }
    }
}

impl Default for Castling {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for Castling {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Displays in FEN-component format.
impl Display for Castling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_none() {
            return f.write_char('-');
        }
        for (rights, ch) in [
            (Self::W_KING, 'K'),
            (Self::W_QUEEN, 'Q'),
            (Self::B_KING, 'k'),
            (Self::B_QUEEN, 'q'),
        ] {
            if self.has(rights) {
                f.write_char(ch)?;
            }
        }
        Ok(())
    }
}

/// Castling ::= '-' | ['K'] ['Q'] ['k'] ['q']
impl FromStr for Castling {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        if s == "-" {
            return Ok(Castling::NONE);
        }
        if s.is_empty() || s.len() > 4 {
            return Err(Error::ParseCastling(s.to_string()));
        }
        let mut castling_rights = Castling::NONE;
        for ch in s.chars() {
            match ch {
                'K' => castling_rights.set(Self::W_KING),
                'Q' => castling_rights.set(Self::W_QUEEN),
                'k' => castling_rights.set(Self::B_KING),
                'q' => castling_rights.set(Self::B_QUEEN),
                _ => return Err(Error::ParseCastling(s.to_string())),
            }
        }
        Ok(castling_rights)
    }
}

impl Square {
    #[rustfmt::skip]
    pub const ALL: [Square; NUM_SQUARES] = {
        use Square::*;
        [
            A8, B8, C8, D8, E8, F8, G8, H8,
            A7, B7, C7, D7, E7, F7, G7, H7,
            A6, B6, C6, D6, E6, F6, G6, H6,
            A5, B5, C5, D5, E5, F5, G5, H5,
            A4, B4, C4, D4, E4, F4, G4, H4,
            A3, B3, C3, D3, E3, F3, G3, H3,
            A2, B2, C2, D2, E2, F2, G2, H2,
            A1, B1, C1, D1, E1, F1, G1, H1,
        ]
    };

    /// Index of square in board row order, 0-63.
    pub const fn idx(&self) -> usize {
        *self as usize
    }

    /// Board row, 0 for the eighth rank through 7 for the first rank.
    pub const fn row(&self) -> usize {
        self.idx() / NUM_FILES
    }

    /// Board column, 0 for the a-file through 7 for the h-file.
    pub const fn col(&self) -> usize {
        self.idx() % NUM_FILES
    }

    pub const fn from_row_col(row: usize, col: usize) -> Option<Square> {
        if row < NUM_RANKS && col < NUM_FILES {
            Some(Self::ALL[row * NUM_FILES + col])
        } else {
            None
        }
    }

    /// Returns the square `d_row` rows and `d_col` columns away, or None if off the board.
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Square> {
        let row = self.row() as i8 + d_row;
        let col = self.col() as i8 + d_col;
        if (0..NUM_RANKS as i8).contains(&row) && (0..NUM_FILES as i8).contains(&col) {
            Self::from_row_col(row as usize, col as usize)
        } else {
            None
        }
    }

    /// Lowercase file letter.
    pub const fn file_char(&self) -> char {
        (b'a' + self.col() as u8) as char
    }

    /// Rank digit.
    pub const fn rank_char(&self) -> char {
        (b'8' - self.row() as u8) as char
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.file_char())?;
        f.write_char(self.rank_char())
    }
}

/// Square ::= [a-h][1-8]
impl FromStr for Square {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let bytes = s.as_bytes();
        match bytes {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => {
                let col = (file - b'a') as usize;
                let row = (b'8' - rank) as usize;
                Square::from_row_col(row, col).ok_or_else(|| Error::ParseSquare(s.to_string()))
            }
            _ => Err(Error::ParseSquare(s.to_string())),
        }
    }
}

impl Move {
    pub const fn new(from: Square, to: Square, promotion: Option<PieceKind>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }
    pub const fn from(&self) -> Square {
        self.from
    }
    pub const fn to(&self) -> Square {
        self.to
    }
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }
}

/// Move ::= Square Square [q|r|b|n]
impl FromStr for Move {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let malformed = || Error::ParseMove(s.to_string());
        if !(s.len() == 4 || s.len() == 5) || !s.is_ascii() {
            return Err(malformed());
        }
        let from: Square = s[0..2].parse().map_err(|_| malformed())?;
        let to: Square = s[2..4].parse().map_err(|_| malformed())?;
        let promotion = match s.as_bytes().get(4) {
            None => None,
            Some(b'q') => Some(PieceKind::Queen),
            Some(b'r') => Some(PieceKind::Rook),
            Some(b'b') => Some(PieceKind::Bishop),
            Some(b'n') => Some(PieceKind::Knight),
            Some(_) => return Err(malformed()),
        };
        Ok(Move::new(from, to, promotion))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece_kind) = self.promotion {
            f.write_char(piece_kind.to_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl MoveInfo {
    pub const fn move_(&self) -> Move {
        self.move_
    }
    pub const fn piece(&self) -> Piece {
        self.piece
    }
    pub const fn move_kind(&self) -> MoveKind {
        self.move_kind
    }
    pub const fn is_capture(&self) -> bool {
        matches!(self.move_kind, MoveKind::Capture(_) | MoveKind::EnPassant)
    }
}
