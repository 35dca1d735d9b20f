use crate::prelude::*;

fn sq(s: &str) -> Square {
    Square::from_str(s).unwrap()
}

fn mv(position: &Position, from: &str, to: &str) -> Move {
    let id = position
        .board
        .id_at(sq(from))
        .unwrap_or_else(|| panic!("no piece on {from}"));
    Move::new(id, sq(from), sq(to))
}

// simulate followed by undo must restore every observable field
fn assert_round_trip(fen: &str, from: &str, to: &str) -> Position {
    let mut position = Position::from_fen(fen).unwrap();
    let original = position.clone();
    let m = mv(&position, from, to);

    position
        .simulate(m)
        .unwrap_or_else(|e| panic!("simulate {m} on '{fen}' failed: {e}"));
    assert_ne!(position, original, "{m} did not change '{fen}'");
    let after = position.clone();

    position.undo().unwrap();
    assert_eq!(position, original, "undo of {m} did not restore '{fen}'");
    after
}

#[cfg(test)]
mod make_unmake_tests {
    use super::*;

    #[test]
    fn test_quiet_move_round_trip() {
        let after = assert_round_trip(START_FEN, "g1", "f3");
        assert!(after.board.is_empty(sq("g1")));
        let knight = after.board.piece_at(sq("f3")).unwrap();
        assert!(knight.is(Side::White, PieceKind::Knight));
        assert!(knight.has_moved);
        assert_eq!(after.state.side_to_move, Side::Black);
        assert_eq!(after.history().len(), 1);
    }

    #[test]
    fn test_capture_round_trip() {
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2";
        let after = assert_round_trip(fen, "e4", "d5");
        assert_eq!(after.board.count(Side::Black, PieceKind::Pawn), 7);
        let record = after.last_record().unwrap();
        let captured = record.captured.unwrap();
        assert_eq!(captured.square, sq("d5"));
        assert!(!record.is_en_passant());
    }

    #[test]
    fn test_kingside_castle_round_trip() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let after = assert_round_trip(fen, "e1", "g1");
        let king = after.board.piece_at(sq("g1")).unwrap();
        let rook = after.board.piece_at(sq("f1")).unwrap();
        assert!(king.is(Side::White, PieceKind::King));
        assert!(rook.is(Side::White, PieceKind::Rook));
        assert!(!king.may_castle());
        assert!(!rook.may_castle());
        assert!(after.board.is_empty(sq("h1")));
        assert!(after.board.piece_at(sq("a1")).unwrap().may_castle());
    }

    #[test]
    fn test_queenside_castle_round_trip() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1";
        let after = assert_round_trip(fen, "e8", "c8");
        assert!(after.board.piece_at(sq("c8")).unwrap().is(Side::Black, PieceKind::King));
        assert!(after.board.piece_at(sq("d8")).unwrap().is(Side::Black, PieceKind::Rook));
        assert!(after.board.is_empty(sq("a8")));
        assert!(after.board.is_empty(sq("e8")));
        assert_eq!(after.to_fen().split(' ').nth(2), Some("KQ"));
    }

    #[test]
    fn test_en_passant_round_trip() {
        let fen = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
        let after = assert_round_trip(fen, "e5", "f6");
        let record = after.last_record().unwrap();
        assert!(record.is_en_passant());
        assert_eq!(record.captured.unwrap().square, sq("f5"));
        assert!(after.board.is_empty(sq("f5")));
        assert!(after.board.piece_at(sq("d5")).is_some());
        assert_eq!(after.state.half_move_clock, 0);
    }

    #[test]
    fn test_double_step_sets_en_passant_target() {
        let after = assert_round_trip(START_FEN, "e2", "e4");
        assert_eq!(after.state.en_passant_target, Some(sq("e3")));

        let after = assert_round_trip(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "c7",
            "c5",
        );
        assert_eq!(after.state.en_passant_target, Some(sq("c6")));
    }

    #[test]
    fn test_en_passant_target_cleared_by_next_move() {
        let mut position = Position::starting();
        position.simulate(mv(&position, "e2", "e4")).unwrap();
        position.simulate(mv(&position, "g8", "f6")).unwrap();
        assert_eq!(position.state.en_passant_target, None);
        position.undo().unwrap();
        assert_eq!(position.state.en_passant_target, Some(sq("e3")));
    }

    #[test]
    fn test_moving_rook_loses_castling_right_until_undo() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let mut position = Position::from_fen(fen).unwrap();
        position.simulate(mv(&position, "h1", "h4")).unwrap();
        assert_eq!(position.to_fen().split(' ').nth(2), Some("Qkq"));
        position.undo().unwrap();
        assert_eq!(position.to_fen(), fen);
    }

    #[test]
    fn test_nested_sequence_unwinds_in_order() {
        let mut position = Position::from_fen(KIWIPETE).unwrap();
        let original = position.clone();
        for (from, to) in [("e1", "c1"), ("h3", "g2"), ("d5", "e6"), ("e8", "g8")] {
            position.simulate(mv(&position, from, to)).unwrap();
        }
        assert_eq!(position.history().len(), 4);
        for _ in 0..4 {
            position.undo().unwrap();
        }
        assert_eq!(position, original);
    }
}

#[cfg(test)]
mod clock_tests {
    use super::*;

    #[test]
    fn test_quiet_piece_move_increments_half_move_clock() {
        let mut position =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 3 7")
                .unwrap();
        position.simulate(mv(&position, "g8", "f6")).unwrap();
        assert_eq!(position.state.half_move_clock, 4);
        assert_eq!(position.state.full_move_counter, 8);
    }

    #[test]
    fn test_pawn_move_resets_half_move_clock() {
        let mut position =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 3 7")
                .unwrap();
        position.simulate(mv(&position, "a7", "a6")).unwrap();
        assert_eq!(position.state.half_move_clock, 0);
    }

    #[test]
    fn test_capture_resets_half_move_clock() {
        let mut position = Position::from_fen("4k3/8/8/3r4/8/8/8/3RK3 w - - 12 40").unwrap();
        position.simulate(mv(&position, "d1", "d5")).unwrap();
        assert_eq!(position.state.half_move_clock, 0);
        position.undo().unwrap();
        assert_eq!(position.state.half_move_clock, 12);
        assert_eq!(position.state.full_move_counter, 40);
    }

    #[test]
    fn test_full_move_counter_increments_every_ply() {
        let mut position = Position::starting();
        position.simulate(mv(&position, "e2", "e4")).unwrap();
        position.simulate(mv(&position, "e7", "e5")).unwrap();
        assert_eq!(position.state.full_move_counter, 3);
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_empty_undo_stack_is_contract_violation() {
        let mut position = Position::starting();
        let err = position.undo().unwrap_err();
        assert_eq!(err, EngineError::Contract(ContractViolation::EmptyUndoStack));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_self_capture_leaves_position_untouched() {
        let mut position = Position::starting();
        let original = position.clone();
        let err = position.simulate(mv(&position, "d1", "d2")).unwrap_err();
        assert_eq!(
            err,
            EngineError::from(ContractViolation::SelfCapture { square: sq("d2") })
        );
        assert_eq!(position, original);
        assert!(position.history().is_empty());
    }

    #[test]
    fn test_stale_origin_is_rejected() {
        let mut position = Position::starting();
        let id = position.board.id_at(sq("g1")).unwrap();
        let err = position
            .simulate(Move::new(id, sq("e4"), sq("e5")))
            .unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(position, Position::starting());
    }

    #[test]
    fn test_castle_without_rook_is_rejected() {
        let mut position = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let err = position.simulate(mv(&position, "e1", "g1")).unwrap_err();
        assert_eq!(
            err,
            EngineError::from(ContractViolation::MissingCastlingRook { square: sq("h1") })
        );
    }

    #[test]
    fn test_move_from_another_board_is_rejected() {
        let mut kiwipete = Position::from_fen(KIWIPETE).unwrap();
        let foreign = *StandardMoveGen
            .generate(&mut kiwipete, Side::White)
            .unwrap()
            .last()
            .unwrap();

        let mut position = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let original = position.clone();
        let err = position.simulate(foreign).unwrap_err();
        assert_eq!(
            err,
            EngineError::from(ContractViolation::PieceNotOnSquare {
                square: foreign.from
            })
        );
        assert_eq!(position, original);
    }

    #[test]
    fn test_relocate_unknown_piece() {
        let kiwipete = Position::from_fen(KIWIPETE).unwrap();
        let (far_id, _) = kiwipete.board.occupied().last().unwrap();
        let mut board = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap().board;
        assert!(board.try_piece(far_id).is_none());
        let err = board.relocate(far_id, sq("d4")).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Contract(ContractViolation::UnknownPiece { .. })
        ));
    }

    #[test]
    fn test_simulate_moves_through_relocate() {
        // castling shifts both king and rook; the grid and the arena agree
        let mut position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let king = position.board.id_at(sq("e1")).unwrap();
        let rook = position.board.id_at(sq("h1")).unwrap();
        position.simulate(mv(&position, "e1", "g1")).unwrap();
        assert_eq!(position.board.piece(king).square, sq("g1"));
        assert_eq!(position.board.piece(rook).square, sq("f1"));
        assert_eq!(position.board.id_at(sq("f1")), Some(rook));
        assert!(position.board.is_empty(sq("h1")));
        assert!(position.board.is_empty(sq("e1")));
    }

    #[test]
    fn test_relocate_requires_empty_destination() {
        let mut board = Position::starting().board;
        let knight = board.id_at(sq("g1")).unwrap();
        assert!(board.relocate(knight, sq("e2")).unwrap_err().is_contract_violation());
        board.relocate(knight, sq("f3")).unwrap();
        assert_eq!(board.id_at(sq("f3")), Some(knight));
        assert!(board.is_empty(sq("g1")));
    }
}

#[cfg(test)]
mod guard_tests {
    use super::*;

    fn descend(position: &mut Position, line: &[(&str, &str)]) -> EngineResult<usize> {
        let Some(((from, to), rest)) = line.split_first() else {
            return Ok(position.history().len());
        };
        let m = mv(position, from, to);
        let mut guard = position.play(m)?;
        descend(&mut guard, rest)
    }

    #[test]
    fn test_guard_undoes_on_drop() {
        let mut position = Position::starting();
        {
            let mut guard = position.play(mv(&Position::starting(), "e2", "e4")).unwrap();
            assert_eq!(guard.record().to, sq("e4"));
            assert_eq!(guard.history().len(), 1);
            let reply = mv(&guard, "e7", "e5");
            let inner = guard.play(reply).unwrap();
            assert_eq!(inner.history().len(), 2);
        }
        assert_eq!(position, Position::starting());
    }

    #[test]
    fn test_guard_unwinds_on_error_propagation() {
        let mut position = Position::starting();
        let deepest = descend(&mut position, &[("e2", "e4"), ("e7", "e5")]).unwrap();
        assert_eq!(deepest, 2);
        assert_eq!(position, Position::starting());

        // the third move is a self capture, the first two must still be undone
        let err = descend(&mut position, &[("e2", "e4"), ("e7", "e5"), ("d1", "d2")]);
        assert!(err.unwrap_err().is_contract_violation());
        assert_eq!(position, Position::starting());
    }

    #[test]
    fn test_apply_commits_without_record() {
        let mut position = Position::starting();
        position.apply(mv(&position, "e2", "e4")).unwrap();
        assert!(position.history().is_empty());
        assert_eq!(
            position.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 2"
        );
        assert!(position.undo().unwrap_err().is_contract_violation());
    }
}

#[cfg(test)]
mod board_tests {
    use super::*;

    #[test]
    fn test_board_display() {
        let board = Position::starting().board;
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "8 r n b q k b n r");
        assert_eq!(lines[7], "1 R N B Q K B N R");
        assert_eq!(lines[8], "  a b c d e f g h");
    }

    #[test]
    fn test_pieces_of_side() {
        let board = Position::starting().board;
        assert_eq!(board.pieces_of(Side::White).count(), 16);
        assert_eq!(board.king_square(Side::Black), Some(sq("e8")));
        assert_eq!(board.count(Side::White, PieceKind::Pawn), 8);
    }
}
