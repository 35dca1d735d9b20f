//! Error types for the engine.
//!
//! Two classes of failure exist: [`ContractViolation`]s are logic errors (a
//! caller or collaborator broke an invariant of the make/unmake protocol) and
//! are never meant to be recovered from; everything else is ordinary input
//! validation.

use miette::Diagnostic;
use thiserror::Error;

use crate::board::components::Square;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Errors that can occur in the engine
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Broken precondition of the engine. Indicates a bug, not bad input.
    #[error("contract violation: {0}")]
    #[diagnostic(
        code(minimax_chess::contract),
        help("this is a programming error in the caller or the move generator")
    )]
    Contract(#[from] ContractViolation),

    /// FEN string could not be parsed
    #[error("invalid FEN '{fen}': {reason}")]
    #[diagnostic(code(minimax_chess::fen))]
    InvalidFen { fen: String, reason: String },

    /// Square notation could not be parsed
    #[error("invalid square '{0}', expected something like 'e4'")]
    #[diagnostic(code(minimax_chess::square))]
    InvalidSquare(String),

    /// Configuration or evaluation parameters are unusable
    #[error("configuration error: {0}")]
    #[diagnostic(code(minimax_chess::config))]
    Config(String),
}

impl EngineError {
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, EngineError::Contract(_))
    }

    pub(crate) fn fen(fen: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidFen {
            fen: fen.to_string(),
            reason: reason.into(),
        }
    }
}

/// Broken invariants of the board / search protocol
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("undo called with an empty move record stack")]
    EmptyUndoStack,

    #[error("move to {square} would capture a piece of the mover's own side")]
    SelfCapture { square: Square },

    #[error("moving piece is not on its recorded square {square}")]
    PieceNotOnSquare { square: Square },

    #[error("piece id {id} does not exist on this board")]
    UnknownPiece { id: usize },

    #[error("destination {square} is already occupied")]
    OccupiedDestination { square: Square },

    #[error("castling rook missing on {square}")]
    MissingCastlingRook { square: Square },

    #[error("no enemy pawn to capture en passant on {square}")]
    MissingEnPassantVictim { square: Square },

    #[error("undo stack height {found} after search, expected {expected}")]
    UnbalancedUndoStack { expected: usize, found: usize },
}
