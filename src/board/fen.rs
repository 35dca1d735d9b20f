use crate::error::{EngineError, EngineResult};
use crate::prelude::*;

impl Position {
    /// Parses a full six-field FEN string
    pub fn from_fen(fen: &str) -> EngineResult<Self> {
        parse_fen(fen)
    }

    pub fn to_fen(&self) -> String {
        let ep = self
            .state
            .en_passant_target
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{} {} {} {} {} {}",
            self.board.to_fen_pieces(),
            match self.state.side_to_move {
                Side::White => 'w',
                Side::Black => 'b',
            },
            castling_field(&self.board),
            ep,
            self.state.half_move_clock,
            self.state.full_move_counter
        )
    }
}

/// Parse the FEN string into a position.
///
/// Pieces are spawned in FEN order (rank 8 first). The castling field is
/// translated into per-piece flags: a right is granted to the king on its home
/// square and the rook in the matching corner.
pub fn parse_fen(fen: &str) -> EngineResult<Position> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 6 {
        return Err(EngineError::fen(fen, "expected 6 space separated fields"));
    }

    let mut board = Board::empty();
    place_pieces(&mut board, parts[0]).map_err(|reason| EngineError::fen(fen, reason))?;
    for side in Side::SIDES {
        if board.count(side, PieceKind::King) != 1 {
            return Err(EngineError::fen(fen, format!("{side} must have exactly one king")));
        }
    }

    let side_to_move = match parts[1] {
        "w" => Side::White,
        "b" => Side::Black,
        other => return Err(EngineError::fen(fen, format!("invalid side to move '{other}'"))),
    };

    parse_castle(&mut board, parts[2]).map_err(|reason| EngineError::fen(fen, reason))?;

    let en_passant_target =
        parse_enpassant(parts[3]).map_err(|e| EngineError::fen(fen, e.to_string()))?;

    let half_move_clock = parts[4]
        .parse::<u32>()
        .map_err(|e| EngineError::fen(fen, format!("half move clock: {e}")))?;
    let full_move_counter = parts[5]
        .parse::<u32>()
        .map_err(|e| EngineError::fen(fen, format!("full move counter: {e}")))?;

    let state = GameState::new(
        side_to_move,
        en_passant_target,
        half_move_clock,
        full_move_counter,
    );

    Ok(Position::new(board, state))
}

fn place_pieces(board: &mut Board, placement: &str) -> std::result::Result<(), String> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(format!("expected 8 ranks, found {}", rows.len()));
    }
    for (row, rank) in rows.iter().enumerate() {
        let mut col = 0u8;
        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(format!("rank {} has an empty run of {skip}", 8 - row));
                }
                col = col.saturating_add(skip as u8);
                continue;
            }
            let (kind, side) =
                PieceKind::from_fen_char(c).ok_or_else(|| format!("unknown piece '{c}'"))?;
            let square = Square::from_coords(row as u8, col)
                .ok_or_else(|| format!("rank {} overflows", 8 - row))?;
            board.spawn(kind, side, square).map_err(|e| e.to_string())?;
            col += 1;
        }
        if col != 8 {
            return Err(format!("rank {} describes {col} files", 8 - row));
        }
    }
    Ok(())
}

fn parse_castle(board: &mut Board, castle: &str) -> std::result::Result<(), String> {
    if castle == "-" {
        return Ok(());
    }
    for c in castle.chars() {
        let (side, rook_col) = match c {
            'K' => (Side::White, 7),
            'Q' => (Side::White, 0),
            'k' => (Side::Black, 7),
            'q' => (Side::Black, 0),
            _ => return Err(format!("unexpected character '{c}' in castling rights")),
        };
        let row = side.back_row();
        let king_home = Square::from_coords(row, 4).expect("e-file is on the board");
        let rook_home = Square::from_coords(row, rook_col).expect("corner is on the board");

        let king = board
            .id_at(king_home)
            .filter(|&id| board.piece(id).is(side, PieceKind::King))
            .ok_or_else(|| format!("castling right '{c}' without a king on {king_home}"))?;
        let rook = board
            .id_at(rook_home)
            .filter(|&id| board.piece(id).is(side, PieceKind::Rook))
            .ok_or_else(|| format!("castling right '{c}' without a rook on {rook_home}"))?;

        board.piece_mut(king).can_castle = Some(true);
        board.piece_mut(rook).can_castle = Some(true);
    }
    Ok(())
}

fn parse_enpassant(enpassant: &str) -> EngineResult<Option<Square>> {
    if enpassant == "-" {
        return Ok(None);
    }
    let square = Square::from_str(enpassant)?;
    if square.rank() != 3 && square.rank() != 6 {
        return Err(EngineError::InvalidSquare(enpassant.to_string()));
    }
    Ok(Some(square))
}

fn castling_field(board: &Board) -> String {
    let mut out = String::new();
    for (side, letters) in [(Side::White, ['K', 'Q']), (Side::Black, ['k', 'q'])] {
        let row = side.back_row();
        let king_ok = Square::from_coords(row, 4)
            .and_then(|sq| board.piece_at(sq))
            .is_some_and(|p| p.is(side, PieceKind::King) && p.may_castle());
        if !king_ok {
            continue;
        }
        for (rook_col, letter) in [(7, letters[0]), (0, letters[1])] {
            let rook_ok = Square::from_coords(row, rook_col)
                .and_then(|sq| board.piece_at(sq))
                .is_some_and(|p| p.is(side, PieceKind::Rook) && p.may_castle());
            if rook_ok {
                out.push(letter);
            }
        }
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}
