//! Per-kind move rules.
//!
//! Each [`PieceKind`] maps to one [`RuleFn`] in [`RULES`]. A rule appends the
//! pseudo-legal destinations of a piece: empty squares and squares holding an
//! enemy piece. Whether the move exposes the mover's own king is left to the
//! generator.

use crate::moves::Direction;
use crate::prelude::*;

pub type RuleFn = fn(&Position, &Piece, &mut Vec<Square>);

/// Indexed by [`PieceKind::index`]
pub const RULES: [RuleFn; NUM_PIECES] = [
    pawn_moves,
    knight_moves,
    bishop_moves,
    rook_moves,
    queen_moves,
    king_moves,
];

#[inline]
pub fn pseudo_legal(position: &Position, piece: &Piece, out: &mut Vec<Square>) {
    RULES[piece.kind.index()](position, piece, out);
}

#[inline(always)]
fn is_enemy(board: &Board, square: Square, side: Side) -> bool {
    board.piece_at(square).is_some_and(|p| p.side != side)
}

fn steps(board: &Board, piece: &Piece, deltas: &[(i8, i8)], out: &mut Vec<Square>) {
    for &(dr, dc) in deltas {
        if let Some(to) = piece.square.offset(dr, dc)
            && (board.is_empty(to) || is_enemy(board, to, piece.side))
        {
            out.push(to);
        }
    }
}

fn rays(board: &Board, piece: &Piece, dirs: &[(i8, i8)], out: &mut Vec<Square>) {
    for &(dr, dc) in dirs {
        let mut current = piece.square;
        while let Some(to) = current.offset(dr, dc) {
            match board.piece_at(to) {
                None => out.push(to),
                Some(other) => {
                    if other.side != piece.side {
                        out.push(to);
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

fn pawn_moves(position: &Position, piece: &Piece, out: &mut Vec<Square>) {
    let board = &position.board;
    let forward = piece.side.forward();

    if let Some(one) = piece.square.offset(forward, 0)
        && board.is_empty(one)
    {
        out.push(one);
        if piece.square.row() == piece.side.pawn_row()
            && let Some(two) = one.offset(forward, 0)
            && board.is_empty(two)
        {
            out.push(two);
        }
    }

    for dc in [-1, 1] {
        let Some(to) = piece.square.offset(forward, dc) else {
            continue;
        };
        if is_enemy(board, to, piece.side) {
            out.push(to);
        } else if position.state.en_passant_target == Some(to) && board.is_empty(to) {
            let victim = Square::from_coords(piece.square.row(), to.col());
            let has_victim = victim
                .and_then(|sq| board.piece_at(sq))
                .is_some_and(|p| p.is(!piece.side, PieceKind::Pawn));
            if has_victim {
                out.push(to);
            }
        }
    }
}

fn knight_moves(position: &Position, piece: &Piece, out: &mut Vec<Square>) {
    steps(&position.board, piece, &Direction::KNIGHT, out);
}

fn bishop_moves(position: &Position, piece: &Piece, out: &mut Vec<Square>) {
    rays(&position.board, piece, &Direction::DIAG, out);
}

fn rook_moves(position: &Position, piece: &Piece, out: &mut Vec<Square>) {
    rays(&position.board, piece, &Direction::ORTHO, out);
}

fn queen_moves(position: &Position, piece: &Piece, out: &mut Vec<Square>) {
    rays(&position.board, piece, &Direction::ALL, out);
}

fn king_moves(position: &Position, piece: &Piece, out: &mut Vec<Square>) {
    let board = &position.board;
    steps(board, piece, &Direction::ALL, out);

    let row = piece.side.back_row();
    if !piece.may_castle() || piece.square != home(row, 4) || in_check(board, piece.side) {
        return;
    }
    // (rook col, squares that must be empty, squares the king crosses, king target col)
    let wings: [(u8, &[u8], [u8; 2], u8); 2] = [
        (7, &[5, 6], [5, 6], 6),
        (0, &[1, 2, 3], [3, 2], 2),
    ];
    for (rook_col, empty, crossed, target) in wings {
        let rook_ok = board
            .piece_at(home(row, rook_col))
            .is_some_and(|p| p.is(piece.side, PieceKind::Rook) && p.may_castle());
        if !rook_ok {
            continue;
        }
        if empty.iter().any(|&col| !board.is_empty(home(row, col))) {
            continue;
        }
        if crossed
            .iter()
            .any(|&col| is_attacked(board, home(row, col), !piece.side))
        {
            continue;
        }
        out.push(home(row, target));
    }
}

#[inline(always)]
fn home(row: u8, col: u8) -> Square {
    Square::from_coords(row, col).unwrap_or_default()
}

/// Whether any piece of side `by` attacks `square`
pub fn is_attacked(board: &Board, square: Square, by: Side) -> bool {
    let holds = |sq: Option<Square>, kinds: &[PieceKind]| {
        sq.and_then(|sq| board.piece_at(sq))
            .is_some_and(|p| p.side == by && kinds.contains(&p.kind))
    };

    // A pawn of `by` attacks diagonally forward, so look one row behind it
    let back = -by.forward();
    if [-1, 1]
        .into_iter()
        .any(|dc| holds(square.offset(back, dc), &[PieceKind::Pawn]))
    {
        return true;
    }

    if Direction::KNIGHT
        .iter()
        .any(|&(dr, dc)| holds(square.offset(dr, dc), &[PieceKind::Knight]))
    {
        return true;
    }

    if Direction::ALL
        .iter()
        .any(|&(dr, dc)| holds(square.offset(dr, dc), &[PieceKind::King]))
    {
        return true;
    }

    let sliders = [
        (Direction::ORTHO, [PieceKind::Rook, PieceKind::Queen]),
        (Direction::DIAG, [PieceKind::Bishop, PieceKind::Queen]),
    ];
    for (dirs, kinds) in sliders {
        for (dr, dc) in dirs {
            let mut current = square;
            while let Some(next) = current.offset(dr, dc) {
                if let Some(p) = board.piece_at(next) {
                    if p.side == by && kinds.contains(&p.kind) {
                        return true;
                    }
                    break;
                }
                current = next;
            }
        }
    }

    false
}

/// Whether `side`'s king is attacked. A board without that king is never in check.
pub fn in_check(board: &Board, side: Side) -> bool {
    board
        .king_square(side)
        .is_some_and(|sq| is_attacked(board, sq, !side))
}
