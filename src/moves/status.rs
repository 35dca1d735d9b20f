//! Game-over adjudication. The search never calls this; the game loop does,
//! and stores the result in [`GameState`].

use crate::moves::rules::in_check;
use crate::prelude::*;

/// Outcome of the position for the side to move, if the game is over
pub fn detect_outcome(
    position: &mut Position,
    generator: &dyn MoveGenerator,
) -> EngineResult<Option<Outcome>> {
    let side = position.state.side_to_move;
    let has_moves = !generator.generate(position, side)?.is_empty();

    if !has_moves {
        if in_check(&position.board, side) {
            return Ok(Some(Outcome::Checkmate { winner: !side }));
        }
        return Ok(Some(Outcome::Stalemate));
    }

    if position.state.half_move_clock >= FIFTY_MOVE_PLIES {
        return Ok(Some(Outcome::FiftyMoveRule));
    }

    Ok(None)
}

/// Runs [`detect_outcome`] and records the result on the position
pub fn refresh_outcome(
    position: &mut Position,
    generator: &dyn MoveGenerator,
) -> EngineResult<Option<Outcome>> {
    let outcome = detect_outcome(position, generator)?;
    if outcome != position.state.outcome() {
        debug!("Game outcome changed to {outcome:?}");
    }
    position.state.set_outcome(outcome);
    Ok(outcome)
}
