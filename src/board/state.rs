use crate::prelude::*;

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Checkmate { winner: Side },
    Stalemate,
    FiftyMoveRule,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Checkmate { winner } => write!(f, "Checkmate, {winner} wins"),
            Outcome::Stalemate => write!(f, "Stalemate"),
            Outcome::FiftyMoveRule => write!(f, "Draw by fifty-move rule"),
        }
    }
}

/// Auxiliary game state that travels with the board
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    pub side_to_move: Side,
    /// Square a pawn passed over on its last double step
    pub en_passant_target: Option<Square>,
    /// Plies since the last capture or pawn move
    pub half_move_clock: u32,
    /// Incremented on every ply
    pub full_move_counter: u32,
    /// Set by whoever adjudicates the game, never by the search
    outcome: Option<Outcome>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            side_to_move: Side::White,
            en_passant_target: None,
            half_move_clock: 0,
            full_move_counter: 1,
            outcome: None,
        }
    }
}

impl GameState {
    pub fn new(
        side_to_move: Side,
        en_passant_target: Option<Square>,
        half_move_clock: u32,
        full_move_counter: u32,
    ) -> Self {
        Self {
            side_to_move,
            en_passant_target,
            half_move_clock,
            full_move_counter,
            outcome: None,
        }
    }

    #[inline(always)]
    pub fn game_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn set_outcome(&mut self, outcome: Option<Outcome>) {
        self.outcome = outcome;
    }
}
