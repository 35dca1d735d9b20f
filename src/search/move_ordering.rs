use std::cmp::Reverse;

use crate::prelude::*;

/// Destination holds a piece of the other side
#[inline]
pub fn is_capture(board: &Board, mv: Move) -> bool {
    let mover = board.piece(mv.piece).side;
    board.piece_at(mv.to).is_some_and(|p| p.side != mover)
}

/// Most Valuable Victim - Least Valuable Attacker, using the evaluator's
/// per-square values. `None` for quiet moves.
pub fn mvv_lva_score(board: &Board, evaluator: &dyn Evaluator, mv: Move) -> Option<i32> {
    let attacker = board.piece(mv.piece);
    let victim = board.piece_at(mv.to)?;
    (victim.side != attacker.side)
        .then(|| evaluator.piece_value(victim) - evaluator.piece_value(attacker))
}

/// Captures first, sorted by descending MVV-LVA, then quiet moves in the
/// order the generator produced them. Both sorts are stable, so equal keys
/// keep generator order.
pub fn order_moves(board: &Board, evaluator: &dyn Evaluator, moves: Vec<Move>) -> Vec<Move> {
    let (mut captures, quiet): (Vec<Move>, Vec<Move>) =
        moves.into_iter().partition(|&mv| is_capture(board, mv));

    captures.sort_by_cached_key(|&mv| Reverse(mvv_lva_score(board, evaluator, mv)));

    captures.extend(quiet);
    captures
}
