//! Make/unmake on a shared mutable position.
//!
//! The search never copies the board. Each ply is applied in place with
//! [`Position::simulate`], which pushes exactly one [`MoveRecord`], and taken
//! back with [`Position::undo`], which pops exactly one. [`Position::play`]
//! wraps the pair in a [`MoveGuard`] so the undo happens on every exit path.

use std::ops::{Deref, DerefMut};

use crate::error::{ContractViolation, EngineResult};
use crate::prelude::*;

/// A piece taken off the board by a move, and where it stood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capture {
    pub piece: PieceId,
    /// Differs from the move's destination for en passant
    pub square: Square,
}

/// Rook displacement caused by castling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RookShift {
    pub rook: PieceId,
    pub from: Square,
    pub to: Square,
    pub could_castle: Option<bool>,
}

/// Everything needed to take one simulated ply back
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    pub piece: PieceId,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Capture>,
    pub castle: Option<RookShift>,
    pub had_moved: bool,
    pub could_castle: Option<bool>,
    // GameState snapshot from before the move
    pub side_to_move: Side,
    pub en_passant_target: Option<Square>,
    pub half_move_clock: u32,
    pub full_move_counter: u32,
}

impl MoveRecord {
    pub fn is_en_passant(&self) -> bool {
        self.captured.is_some_and(|c| c.square != self.to)
    }

    pub fn as_move(&self) -> Move {
        Move::new(self.piece, self.from, self.to)
    }
}

/// Board, game state and the LIFO stack of simulated plies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub board: Board,
    pub state: GameState,
    history: Vec<MoveRecord>,
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl Position {
    pub fn new(board: Board, state: GameState) -> Self {
        Self {
            board,
            state,
            history: Vec::with_capacity(MAX_PLY),
        }
    }

    pub fn starting() -> Self {
        Self::from_fen(START_FEN).expect("START_FEN is a valid FEN")
    }

    /// Simulated plies that have not been undone yet, oldest first
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_record(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    /// Applies `mv` in place and pushes one record onto the undo stack.
    ///
    /// All preconditions are checked before anything is touched, so a failed
    /// call leaves the position exactly as it was.
    pub fn simulate(&mut self, mv: Move) -> EngineResult<&MoveRecord> {
        let Move { piece: id, from, to } = mv;
        let Some(mover) = self.board.try_piece(id).cloned() else {
            return Err(ContractViolation::PieceNotOnSquare { square: from }.into());
        };

        if mover.square != from || self.board.id_at(from) != Some(id) {
            return Err(ContractViolation::PieceNotOnSquare { square: from }.into());
        }

        let target = self.board.id_at(to);
        if let Some(target) = target
            && self.board.piece(target).side == mover.side
        {
            return Err(ContractViolation::SelfCapture { square: to }.into());
        }

        let is_pawn = mover.kind == PieceKind::Pawn;
        let is_castle = mover.kind == PieceKind::King && from.col().abs_diff(to.col()) == 2;
        let is_double_step = is_pawn && from.row().abs_diff(to.row()) == 2;
        let is_en_passant = is_pawn
            && from.col() != to.col()
            && target.is_none()
            && self.state.en_passant_target == Some(to);

        let castle = if is_castle {
            Some(self.castling_rook(&mover, to)?)
        } else {
            None
        };

        let mut captured = target.map(|piece| Capture { piece, square: to });
        if is_en_passant {
            captured = Some(self.en_passant_victim(&mover, to)?);
        }

        let record = MoveRecord {
            piece: id,
            from,
            to,
            captured,
            castle,
            had_moved: mover.has_moved,
            could_castle: mover.can_castle,
            side_to_move: self.state.side_to_move,
            en_passant_target: self.state.en_passant_target,
            half_move_clock: self.state.half_move_clock,
            full_move_counter: self.state.full_move_counter,
        };

        // Every precondition was checked above, so neither relocate can fail
        self.state.en_passant_target = None;
        self.state.half_move_clock += 1;
        self.state.full_move_counter += 1;
        self.state.side_to_move = !self.state.side_to_move;

        if let Some(shift) = castle {
            self.board.relocate(shift.rook, shift.to)?;
            self.board.piece_mut(shift.rook).can_castle = Some(false);
        }

        if is_double_step {
            let passed_row = (from.row() + to.row()) / 2;
            self.state.en_passant_target = Square::from_coords(passed_row, to.col());
        }

        if let Some(capture) = captured {
            self.board.lift(capture.square);
        }

        if captured.is_some() || is_pawn {
            self.state.half_move_clock = 0;
        }

        self.board.relocate(id, to)?;
        let piece = self.board.piece_mut(id);
        piece.has_moved = true;
        if piece.can_castle.is_some() {
            piece.can_castle = Some(false);
        }

        trace!("simulate {} (stack height {})", mv, self.history.len() + 1);
        self.history.push(record);
        Ok(self.history.last().expect("record was just pushed"))
    }

    /// Pops the most recent record and restores board and state to exactly
    /// what they were before the matching [`Position::simulate`].
    pub fn undo(&mut self) -> EngineResult<MoveRecord> {
        let record = self
            .history
            .pop()
            .ok_or(ContractViolation::EmptyUndoStack)?;

        self.board.lift(record.to);
        self.board.place(record.piece, record.from);

        if let Some(capture) = record.captured {
            self.board.place(capture.piece, capture.square);
        }

        let piece = self.board.piece_mut(record.piece);
        piece.has_moved = record.had_moved;
        piece.can_castle = record.could_castle;

        if let Some(shift) = record.castle {
            self.board.lift(shift.to);
            self.board.place(shift.rook, shift.from);
            self.board.piece_mut(shift.rook).can_castle = shift.could_castle;
        }

        self.state.side_to_move = record.side_to_move;
        self.state.en_passant_target = record.en_passant_target;
        self.state.half_move_clock = record.half_move_clock;
        self.state.full_move_counter = record.full_move_counter;

        trace!("undo {} (stack height {})", record.as_move(), self.history.len());
        Ok(record)
    }

    /// Simulates `mv` and returns a guard that undoes it when dropped
    pub fn play(&mut self, mv: Move) -> EngineResult<MoveGuard<'_>> {
        self.simulate(mv)?;
        Ok(MoveGuard { position: self })
    }

    /// Commits a real game move: the move is applied and its record dropped,
    /// so the undo stack stays as it was.
    pub fn apply(&mut self, mv: Move) -> EngineResult<()> {
        self.simulate(mv)?;
        self.history.pop();
        Ok(())
    }

    fn castling_rook(&self, king: &Piece, to: Square) -> EngineResult<RookShift> {
        let row = king.square.row();
        let (rook_col, new_col) = if to.col() > king.square.col() {
            (7, 5)
        } else {
            (0, 3)
        };
        let rook_square = Square::from_coords(row, rook_col).expect("corner square is valid");
        let new_square = Square::from_coords(row, new_col).expect("rook target is valid");

        let rook = self
            .board
            .id_at(rook_square)
            .filter(|&id| self.board.piece(id).is(king.side, PieceKind::Rook))
            .ok_or(ContractViolation::MissingCastlingRook {
                square: rook_square,
            })?;
        if !self.board.is_empty(new_square) {
            return Err(ContractViolation::OccupiedDestination { square: new_square }.into());
        }

        Ok(RookShift {
            rook,
            from: rook_square,
            to: new_square,
            could_castle: self.board.piece(rook).can_castle,
        })
    }

    /// The enemy pawn sits beside the capturing pawn, not on the destination
    fn en_passant_victim(&self, pawn: &Piece, to: Square) -> EngineResult<Capture> {
        let square = Square::from_coords(pawn.square.row(), to.col())
            .expect("row and col come from valid squares");
        self.board
            .id_at(square)
            .filter(|&id| self.board.piece(id).is(!pawn.side, PieceKind::Pawn))
            .map(|piece| Capture { piece, square })
            .ok_or_else(|| ContractViolation::MissingEnPassantVictim { square }.into())
    }
}

/// Scoped make/unmake. Dereferences to the [`Position`] with the move applied
/// and undoes it on drop, including during unwinding or early `?` returns.
#[derive(Debug)]
pub struct MoveGuard<'a> {
    position: &'a mut Position,
}

impl MoveGuard<'_> {
    pub fn record(&self) -> &MoveRecord {
        self.position
            .last_record()
            .expect("a guard always owns the top record")
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Self::Target {
        self.position
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.position
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.position.undo() {
            error!("Failed to undo a guarded move: {err}");
            if !std::thread::panicking() {
                panic!("make/unmake stack corrupted: {err}");
            }
        }
    }
}
