pub mod board;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod moves;
pub mod prelude;
pub mod search;
pub mod utils;

pub mod consts {
    use crate::prelude::*;

    pub const NUM_SIDES: usize = Side::SIDES.len();
    pub const NUM_PIECES: usize = PieceKind::KINDS.len();
    pub const NUM_SQUARES: usize = 64;
    pub const NUM_FILES: usize = 8;
    pub const NUM_RANKS: usize = 8;

    /// Stand-in for +/- infinity in the alpha-beta window
    pub const SCORE_INFINITY: i32 = 1_000_000;
    pub const MATE_SCORE: i32 = 100_000;

    pub const MAX_PLY: usize = 64;

    /// Number of plies without a capture or pawn move that ends the game
    pub const FIFTY_MOVE_PLIES: u32 = 100;

    pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    pub const KIWIPETE: &str =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    pub const ENDGAME_POS: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
}
