//! Static evaluation.
//!
//! Scores are absolute: positive favours White, negative favours Black,
//! regardless of the side to move.

pub mod params;
pub mod tables;

use std::fmt::Debug;

use crate::prelude::*;
use tables::PIECE_VALUES;

pub trait Evaluator: Send + Sync + Debug {
    /// Material plus positional value of one piece where it stands
    fn piece_value(&self, piece: &Piece) -> i32;

    fn evaluate(&self, board: &Board) -> i32 {
        board
            .occupied()
            .map(|(_, piece)| piece.side.sign() * self.piece_value(piece))
            .sum()
    }

    fn name(&self) -> &str;
}

/// Material + piece-square table evaluator
#[derive(Debug, Clone)]
pub struct PieceSquareEvaluator {
    name: String,
    table: PieceValueTable,
}

impl Default for PieceSquareEvaluator {
    fn default() -> Self {
        Self {
            name: "PieceSquare".to_string(),
            table: PIECE_VALUES.clone(),
        }
    }
}

impl PieceSquareEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params(params: &EvalParams) -> Self {
        Self {
            name: "PieceSquare (custom)".to_string(),
            table: params.value_table(),
        }
    }

    pub fn table(&self) -> &PieceValueTable {
        &self.table
    }
}

impl Evaluator for PieceSquareEvaluator {
    #[inline(always)]
    fn piece_value(&self, piece: &Piece) -> i32 {
        self.table.piece_value(piece)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Standalone evaluation with the built-in tables
pub fn evaluate(board: &Board) -> i32 {
    board
        .occupied()
        .map(|(_, piece)| piece.side.sign() * PIECE_VALUES.piece_value(piece))
        .sum()
}
