//! Material values and piece-square tables.
//!
//! Source: https://www.chessprogramming.org/Simplified_Evaluation_Function
//! Tables are written from White's side with a8 at index 0, the same layout
//! as [`Square`]. Black reads them mirrored.

use crate::prelude::*;

/// Indexed by [`PieceKind::index`]
pub const MATERIAL: [i32; NUM_PIECES] = [100, 320, 330, 500, 900, 20000];

// Just advance
#[rustfmt::skip]
pub const PAWN_TABLE: [i32; NUM_SQUARES] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

// Go towards the center
#[rustfmt::skip]
pub const KNIGHT_TABLE: [i32; NUM_SQUARES] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

// Avoid corners and borders
#[rustfmt::skip]
pub const BISHOP_TABLE: [i32; NUM_SQUARES] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
pub const ROOK_TABLE: [i32; NUM_SQUARES] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

// Mostly central squares good
#[rustfmt::skip]
pub const QUEEN_TABLE: [i32; NUM_SQUARES] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

// King midgame table
#[rustfmt::skip]
pub const KING_TABLE: [i32; NUM_SQUARES] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

pub const PIECE_SQUARE_TABLES: [[i32; NUM_SQUARES]; NUM_PIECES] = [
    PAWN_TABLE,
    KNIGHT_TABLE,
    BISHOP_TABLE,
    ROOK_TABLE,
    QUEEN_TABLE,
    KING_TABLE,
];

/// Material plus piece-square value for every (side, kind, square).
///
/// A piece's value depends on nothing but those three, so the whole table is
/// computed once up front and never invalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceValueTable {
    values: [[[i32; NUM_SQUARES]; NUM_PIECES]; NUM_SIDES],
}

pub static PIECE_VALUES: PieceValueTable =
    PieceValueTable::new(&MATERIAL, &PIECE_SQUARE_TABLES);

impl Default for PieceValueTable {
    fn default() -> Self {
        PIECE_VALUES.clone()
    }
}

impl PieceValueTable {
    pub const fn new(
        material: &[i32; NUM_PIECES],
        tables: &[[i32; NUM_SQUARES]; NUM_PIECES],
    ) -> Self {
        let mut values = [[[0; NUM_SQUARES]; NUM_PIECES]; NUM_SIDES];

        let mut kind = 0;
        while kind < NUM_PIECES {
            let mut sq = 0;
            while sq < NUM_SQUARES {
                values[Side::White.index()][kind][sq] = material[kind] + tables[kind][sq];
                values[Side::Black.index()][kind][sq] =
                    material[kind] + tables[kind][NUM_SQUARES - 1 - sq];
                sq += 1;
            }
            kind += 1;
        }

        Self { values }
    }

    #[inline(always)]
    pub fn value(&self, side: Side, kind: PieceKind, square: Square) -> i32 {
        self.values[side.index()][kind.index()][square.index()]
    }

    #[inline(always)]
    pub fn piece_value(&self, piece: &Piece) -> i32 {
        self.value(piece.side, piece.kind, piece.square)
    }
}
