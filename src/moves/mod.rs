//! Move representation and legal move generation.
//!
//! The search only sees the [`MoveGenerator`] trait. [`StandardMoveGen`] is
//! the stock implementation: per-kind rules from [`rules`] produce
//! pseudo-legal destinations which are then filtered by playing each one on
//! the position and checking the mover's king.

pub mod rules;
pub mod status;


use std::fmt::Debug;

use crate::prelude::*;

/// A piece and the square it travels to. The origin is carried along so a
/// stale move (one generated for a different position) can be detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub piece: PieceId,
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(piece: PieceId, from: Square, to: Square) -> Self {
        Self { piece, from, to }
    }

    /// Human readable label used by the visualization tree, e.g. `Ng1f3`.
    /// Pawn moves carry no letter.
    pub fn label(&self, board: &Board) -> String {
        match board.piece(self.piece).kind {
            PieceKind::Pawn => self.to_string(),
            kind => format!("{}{}", kind.letter(), self),
        }
    }

    /// Finds the move of whatever piece stands on `from`
    pub fn from_squares(board: &Board, from: Square, to: Square) -> Option<Self> {
        board.id_at(from).map(|id| Self::new(id, from, to))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Row/column steps. Row 0 is the eighth rank, so north is a negative row delta.
pub struct Direction;
impl Direction {
    pub const NORTH: (i8, i8) = (-1, 0);
    pub const SOUTH: (i8, i8) = (1, 0);
    pub const WEST: (i8, i8) = (0, -1);
    pub const EAST: (i8, i8) = (0, 1);
    pub const NORTHWEST: (i8, i8) = (-1, -1);
    pub const NORTHEAST: (i8, i8) = (-1, 1);
    pub const SOUTHWEST: (i8, i8) = (1, -1);
    pub const SOUTHEAST: (i8, i8) = (1, 1);

    pub const ORTHO: [(i8, i8); 4] = [Self::NORTH, Self::SOUTH, Self::WEST, Self::EAST];
    pub const DIAG: [(i8, i8); 4] = [
        Self::NORTHEAST,
        Self::SOUTHEAST,
        Self::SOUTHWEST,
        Self::NORTHWEST,
    ];
    pub const ALL: [(i8, i8); 8] = [
        Self::NORTH,
        Self::SOUTH,
        Self::WEST,
        Self::EAST,
        Self::NORTHEAST,
        Self::SOUTHEAST,
        Self::SOUTHWEST,
        Self::NORTHWEST,
    ];
    pub const KNIGHT: [(i8, i8); 8] = [
        (-2, -1),
        (-2, 1),
        (-1, -2),
        (-1, 2),
        (1, -2),
        (1, 2),
        (2, -1),
        (2, 1),
    ];
}

/// Source of legal moves for the search.
///
/// The search treats the generator as authoritative and never re-checks
/// legality. Both methods take the position mutably so implementations may
/// probe moves with make/unmake, but they must hand it back unchanged.
pub trait MoveGenerator: Send + Sync + Debug {
    /// Legal destinations of a single piece
    fn legal_moves(&self, position: &mut Position, piece: PieceId) -> EngineResult<Vec<Square>>;

    /// All legal moves for `side`, grouped by piece in board order
    fn generate(&self, position: &mut Position, side: Side) -> EngineResult<Vec<Move>> {
        let ids: Vec<PieceId> = position.board.pieces_of(side).map(|(id, _)| id).collect();
        let mut moves = Vec::with_capacity(48);
        for id in ids {
            let from = position.board.piece(id).square;
            moves.extend(
                self.legal_moves(position, id)?
                    .into_iter()
                    .map(|to| Move::new(id, from, to)),
            );
        }
        Ok(moves)
    }
}

/// Rule table generation with make/unmake legality filtering
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardMoveGen;

impl MoveGenerator for StandardMoveGen {
    fn legal_moves(&self, position: &mut Position, piece: PieceId) -> EngineResult<Vec<Square>> {
        let mover = position.board.piece(piece).clone();
        let mut candidates = Vec::with_capacity(28);
        rules::pseudo_legal(position, &mover, &mut candidates);

        let mut legal = Vec::with_capacity(candidates.len());
        for to in candidates {
            let guard = position.play(Move::new(piece, mover.square, to))?;
            if !rules::in_check(&guard.board, mover.side) {
                legal.push(to);
            }
        }
        Ok(legal)
    }
}
