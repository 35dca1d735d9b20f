use std::{fmt::Display, ops::Not, str::FromStr};

use crate::error::EngineError;

#[derive(Default, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

impl Not for Side {
    type Output = Side;

    fn not(self) -> Self::Output {
        self.flip()
    }
}

impl Side {
    pub const SIDES: [Side; 2] = [Side::White, Side::Black];

    pub const fn flip(&self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub const fn index(&self) -> usize {
        match self {
            Side::White => 0,
            Side::Black => 1,
        }
    }

    /// Scores are always from White's point of view, so White maximizes.
    #[inline(always)]
    pub const fn is_maximizing(&self) -> bool {
        matches!(self, Side::White)
    }

    /// +1 for White, -1 for Black
    #[inline(always)]
    pub const fn sign(&self) -> i32 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// Row delta of a pawn push. White moves up the board (towards row 0).
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Side::White => -1,
            Side::Black => 1,
        }
    }

    /// Row holding this side's king and rooks at the start of the game
    #[inline(always)]
    pub const fn back_row(&self) -> u8 {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }

    #[inline(always)]
    pub const fn pawn_row(&self) -> u8 {
        match self {
            Side::White => 6,
            Side::Black => 1,
        }
    }
}

/// Closed set of piece kinds. Move rules and evaluation tables are indexed by
/// [`PieceKind::index`].
#[derive(Default, PartialEq, Eq, Debug, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum PieceKind {
    #[default]
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            PieceKind::Pawn => write!(f, "Pawn"),
            PieceKind::Knight => write!(f, "Knight"),
            PieceKind::Bishop => write!(f, "Bishop"),
            PieceKind::Rook => write!(f, "Rook"),
            PieceKind::Queen => write!(f, "Queen"),
            PieceKind::King => write!(f, "King"),
        }
    }
}

impl PieceKind {
    pub const KINDS: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub const PIECE_CHARS: [[char; 6]; 2] = [
        ['P', 'N', 'B', 'R', 'Q', 'K'], // White
        ['p', 'n', 'b', 'r', 'q', 'k'], // Black
    ];

    #[inline(always)]
    pub const fn index(&self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Only kings and rooks carry a castling flag
    #[inline(always)]
    pub const fn castles(&self) -> bool {
        matches!(self, PieceKind::King | PieceKind::Rook)
    }

    /// Upper case letter used in move labels
    pub const fn letter(&self) -> char {
        Self::PIECE_CHARS[0][self.index()]
    }

    pub const fn fen_char(&self, side: Side) -> char {
        Self::PIECE_CHARS[side.index()][self.index()]
    }

    pub fn from_fen_char(c: char) -> Option<(PieceKind, Side)> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, side))
    }
}

/// Index of a square on the board, row-major from the top-left corner:
///```text
///    col 0 ....................... col 7
///  | A8, B8, C8, D8, E8, F8, G8, H8,  <- row 0 (index 0..8)
///  | A7, B7, C7, D7, E7, F7, G7, H7,  <- row 1
///  | ...
///  | A2, B2, C2, D2, E2, F2, G2, H2,  <- row 6
///  v A1, B1, C1, D1, E1, F1, G1, H1,  <- row 7 (index 56..64)
///```
/// Piece-square tables are written in the same orientation, so White reads
/// them directly and Black reads them mirrored.
#[derive(Default, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    /// Returns a Square from a given index. Will return None if index is out of bounds
    /// index should be [0, 63]
    #[inline(always)]
    pub const fn new(index: usize) -> Option<Self> {
        if index < 64 {
            return Some(Self(index as u8));
        }
        None
    }

    /// Returns a Square from a given row and column.
    /// Will return None if either is out of bounds.
    #[inline(always)]
    pub const fn from_coords(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            return Some(Square(row * 8 + col));
        }
        None
    }

    /// Square reached by stepping `(d_row, d_col)`, if it is still on the board
    #[inline(always)]
    pub const fn offset(&self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row() as i8 + d_row;
        let col = self.col() as i8 + d_col;
        if row < 0 || row > 7 || col < 0 || col > 7 {
            return None;
        }
        Some(Square((row * 8 + col) as u8))
    }

    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.0 / 8
    }

    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.0 % 8
    }

    /// NOTE: Rank is 1 indexed
    #[inline(always)]
    pub const fn rank(&self) -> u8 {
        8 - self.row()
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Same square seen from the other side of the board
    #[inline(always)]
    pub const fn mirrored(&self) -> Self {
        Square(63 - self.0)
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }
}

impl From<Square> for usize {
    fn from(value: Square) -> Self {
        value.index()
    }
}

impl FromStr for Square {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(EngineError::InvalidSquare(s.to_string()));
        };
        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(EngineError::InvalidSquare(s.to_string()));
        }
        let col = file as u8 - b'a';
        let row = 8 - (rank as u8 - b'0');
        Ok(Square(row * 8 + col))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = (self.col() + b'a') as char;
        write!(f, "{}{}", file, self.rank())
    }
}

/// Stable handle of a piece in the board's arena. Identity survives moves and
/// captures; only the board's grid changes.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[repr(transparent)]
pub struct PieceId(pub(crate) u8);

impl PieceId {
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A piece with identity. Kind and side never change; position and flags are
/// updated in place as the piece moves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    pub square: Square,
    pub has_moved: bool,
    /// `Some` for kings and rooks only
    pub can_castle: Option<bool>,
}

impl Piece {
    pub fn new(kind: PieceKind, side: Side, square: Square) -> Self {
        Self {
            kind,
            side,
            square,
            has_moved: false,
            can_castle: kind.castles().then_some(false),
        }
    }

    #[inline(always)]
    pub fn is(&self, side: Side, kind: PieceKind) -> bool {
        self.side == side && self.kind == kind
    }

    #[inline(always)]
    pub fn may_castle(&self) -> bool {
        self.can_castle == Some(true)
    }

    pub fn fen_char(&self) -> char {
        self.kind.fen_char(self.side)
    }
}
