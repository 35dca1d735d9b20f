pub use crate::board::fen;
pub use crate::board::{
    self, Board,
    components::{Piece, PieceId, PieceKind, Side, Square},
    position::{Capture, MoveGuard, MoveRecord, Position, RookShift},
    state::{GameState, Outcome},
};
pub use crate::config::EngineConfig;
pub use crate::consts::*;
pub use crate::error::{ContractViolation, EngineError, EngineResult};
pub use crate::evaluation::{
    self, Evaluator, PieceSquareEvaluator, evaluate, params::EvalParams, tables::PieceValueTable,
};
pub use crate::moves::{self, Move, MoveGenerator, StandardMoveGen};
pub use crate::search::{
    self, AlphaBetaSearch, SearchConfig, SearchCounters, SearchNode, SearchResult, SearchStats,
    observer::{JsonFileObserver, SearchObserver, SearchReport},
};
pub use crate::utils::{self, log::*, perft::*};
pub use miette::{self, Context, IntoDiagnostic, Result};
pub use std::fmt::Display;
pub use std::str::FromStr;
pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
