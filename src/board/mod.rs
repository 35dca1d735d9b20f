pub mod components;
pub mod fen;
pub mod position;
pub mod state;

#[cfg(test)]
mod tests;

use std::fmt::{Display, Write};

use crate::error::{ContractViolation, EngineResult};
use crate::prelude::*;

/// 8x8 grid over an arena of pieces.
///
/// Every occupied cell refers to exactly one piece in the arena. Captured
/// pieces stay in the arena (so their identity survives an undo) but are not
/// referenced from the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    grid: [Option<PieceId>; NUM_SQUARES],
    pieces: Vec<Piece>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            grid: [None; NUM_SQUARES],
            pieces: Vec::with_capacity(32),
        }
    }
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a new piece on an empty square
    pub fn spawn(&mut self, kind: PieceKind, side: Side, square: Square) -> EngineResult<PieceId> {
        if self.grid[square.index()].is_some() {
            return Err(ContractViolation::OccupiedDestination { square }.into());
        }
        let id = PieceId(self.pieces.len() as u8);
        self.pieces.push(Piece::new(kind, side, square));
        self.grid[square.index()] = Some(id);
        Ok(id)
    }

    #[inline(always)]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// `None` for ids that were never spawned on this board
    #[inline(always)]
    pub fn try_piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    #[inline(always)]
    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.index()]
    }

    #[inline(always)]
    pub fn id_at(&self, square: Square) -> Option<PieceId> {
        self.grid[square.index()]
    }

    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.grid[square.index()].map(|id| self.piece(id))
    }

    #[inline(always)]
    pub fn is_empty(&self, square: Square) -> bool {
        self.grid[square.index()].is_none()
    }

    /// Low level relocation primitive used by [`Position::simulate`] for the
    /// mover and the castling rook. Does NOT handle captures: the destination
    /// must already be empty.
    ///
    /// [`Position::simulate`]: crate::board::position::Position::simulate
    pub fn relocate(&mut self, id: PieceId, to: Square) -> EngineResult<()> {
        let Some(from) = self.try_piece(id).map(|p| p.square) else {
            return Err(ContractViolation::UnknownPiece { id: id.index() }.into());
        };
        if self.grid[from.index()] != Some(id) {
            return Err(ContractViolation::PieceNotOnSquare { square: from }.into());
        }
        if from != to && self.grid[to.index()].is_some() {
            return Err(ContractViolation::OccupiedDestination { square: to }.into());
        }
        self.grid[from.index()] = None;
        self.place(id, to);
        Ok(())
    }

    /// Clears a square and returns whatever stood there
    #[inline(always)]
    pub(crate) fn lift(&mut self, square: Square) -> Option<PieceId> {
        self.grid[square.index()].take()
    }

    /// Puts a piece on a square, overwriting the cell
    #[inline(always)]
    pub(crate) fn place(&mut self, id: PieceId, square: Square) {
        self.grid[square.index()] = Some(id);
        self.pieces[id.index()].square = square;
    }

    /// All pieces currently on the board, in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.grid
            .iter()
            .filter_map(|cell| cell.map(|id| (id, self.piece(id))))
    }

    /// Pieces of one side currently on the board, in row-major order
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.occupied().filter(move |(_, p)| p.side == side)
    }

    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pieces_of(side)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(_, p)| p.square)
    }

    pub fn count(&self, side: Side, kind: PieceKind) -> usize {
        self.pieces_of(side).filter(|(_, p)| p.kind == kind).count()
    }

    /// Piece placement field of a FEN string
    pub fn to_fen_pieces(&self) -> String {
        let mut fen = String::new();
        for row in 0..8 {
            let mut empty_count = 0;
            for col in 0..8 {
                let square = Square::from_coords(row, col).expect("row and col are < 8");
                match self.piece_at(square) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.fen_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if row < 7 {
                fen.push('/');
            }
        }
        fen
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::with_capacity(256);
        for row in 0..8u8 {
            write!(out, "{} ", 8 - row)?;
            for col in 0..8u8 {
                let square = Square::from_coords(row, col).ok_or(std::fmt::Error)?;
                let c = self.piece_at(square).map_or('.', Piece::fen_char);
                write!(out, "{c} ")?;
            }
            out = out.trim_end().to_owned();
            writeln!(out)?;
        }
        write!(out, "  a b c d e f g h")?;
        f.write_str(&out)
    }
}
