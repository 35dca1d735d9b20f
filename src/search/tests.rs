use std::sync::mpsc::{Sender, channel};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::moves::rules::in_check;
use crate::prelude::*;
use crate::search::common::no_moves_score;

fn sq(s: &str) -> Square {
    Square::from_str(s).unwrap()
}

/// Full-width minimax without pruning or ordering. Returns the score and the
/// number of simulated moves.
fn brute_force(position: &mut Position, depth: u8, ply: usize, side: Side) -> (i32, u64) {
    if depth == 0 {
        return (evaluate(&position.board), 0);
    }
    let moves = StandardMoveGen.generate(position, side).unwrap();
    if moves.is_empty() {
        return (no_moves_score(side, in_check(&position.board, side), ply), 0);
    }

    let mut nodes = 0;
    let mut scores = Vec::with_capacity(moves.len());
    for mv in moves {
        let mut guard = position.play(mv).unwrap();
        let (score, sub_nodes) = brute_force(&mut guard, depth - 1, ply + 1, !side);
        nodes += 1 + sub_nodes;
        scores.push(score);
    }
    let best = if side.is_maximizing() {
        scores.into_iter().max()
    } else {
        scores.into_iter().min()
    };
    (best.unwrap_or_default(), nodes)
}

fn search(fen: &str, depth: u8) -> (AlphaBetaSearch, Position, SearchResult) {
    let mut position = Position::from_fen(fen).unwrap();
    let mut engine = AlphaBetaSearch::default();
    let result = engine.choose_move(&mut position, depth).unwrap();
    (engine, position, result)
}

#[cfg(test)]
mod search_tests {
    use super::*;

    #[test]
    fn test_depth_zero_is_static_eval() {
        for fen in [START_FEN, KIWIPETE, ENDGAME_POS] {
            let (engine, position, result) = search(fen, 0);
            assert_eq!(result.score, evaluate(&position.board), "{fen}");
            assert_eq!(result.best_move, None);
            assert_eq!(result.nodes_visited, 0);
            assert_eq!(engine.stats().root_branching, 0);
            assert_eq!(result.tree.unwrap().evaluation, Some(result.score));
        }
    }

    #[test]
    fn test_pruning_never_changes_the_score() {
        let cases: &[(&str, u8)] = &[
            (START_FEN, 3),
            (ENDGAME_POS, 3),
            (KIWIPETE, 2),
            ("4k3/5p2/8/4q2Q/3P4/8/8/K7 w - - 0 1", 3),
            ("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 3),
            ("k7/8/4p3/3Q4/8/8/8/7K b - - 0 1", 3),
        ];
        for &(fen, max_depth) in cases {
            for depth in 1..=max_depth {
                let (_, mut position, result) = search(fen, depth);
                let side = position.state.side_to_move;
                let (expected, unpruned) = brute_force(&mut position, depth, 0, side);
                assert_eq!(result.score, expected, "{fen} at depth {depth}");
                assert!(
                    result.nodes_visited <= unpruned,
                    "{fen} at depth {depth}: {} > {unpruned}",
                    result.nodes_visited
                );
            }
        }
    }

    #[test]
    fn test_search_is_deterministic() {
        let (_, _, first) = search(KIWIPETE, 2);
        let (_, _, second) = search(KIWIPETE, 2);
        assert_eq!(first.score, second.score);
        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.nodes_visited, second.nodes_visited);
        assert_eq!(first.tree, second.tree);

        let mut position = Position::from_fen(KIWIPETE).unwrap();
        let mut engine = AlphaBetaSearch::default();
        let third = engine.choose_move(&mut position, 2).unwrap();
        let fourth = engine.choose_move(&mut position, 2).unwrap();
        assert_eq!((third.score, third.best_move), (first.score, first.best_move));
        assert_eq!((fourth.score, fourth.best_move), (first.score, first.best_move));
    }

    #[test]
    fn test_position_is_restored() {
        for fen in [START_FEN, KIWIPETE, ENDGAME_POS] {
            let original = Position::from_fen(fen).unwrap();
            let (_, position, _) = search(fen, 3);
            assert_eq!(position, original, "{fen}");
        }
    }

    #[test]
    fn test_starting_position_depth_one() {
        let (engine, mut position, result) = search(START_FEN, 1);
        let best = result.best_move.unwrap();

        let legal = StandardMoveGen.generate(&mut position, Side::White).unwrap();
        assert_eq!(legal.len(), 20);
        assert!(legal.contains(&best));

        position.apply(best).unwrap();
        assert_eq!(result.score, evaluate(&position.board));
        assert!(result.score >= 0);

        // Nc3 and Nf3 both gain 50; the knight on b1 is generated first
        assert_eq!(result.score, 50);
        assert_eq!(best.from, sq("b1"));
        assert_eq!(best.to, sq("c3"));

        let stats = engine.stats();
        assert_eq!(stats.root_branching, 20);
        assert_eq!(stats.nodes_visited, 20);
        assert_eq!(stats.current_best, Some(50));
    }

    #[test]
    fn test_root_branching_on_start_position() {
        for depth in 1..=3 {
            let (engine, mut position, result) = search(START_FEN, depth);
            assert_eq!(engine.stats().root_branching, 20, "depth {depth}");
            let (_, unpruned) = brute_force(&mut position, depth, 0, Side::White);
            assert!(result.nodes_visited <= unpruned);
        }
    }

    #[test]
    fn test_capture_is_searched_first() {
        let (_, _, result) = search("4k3/5p2/8/4q2Q/3P4/8/8/K7 w - - 0 1", 1);
        let tree = result.tree.unwrap();
        assert_eq!(tree.children[0].label, "d4e5");
        assert!(tree.children[1].label.starts_with('Q'));
        // ordering only decides what is searched first: the queen lands on a
        // better square than the pawn and wins the tie on score
        let best = result.best_move.unwrap();
        assert_eq!((best.from, best.to), (sq("h5"), sq("e5")));
        assert_eq!(tree.children[0].evaluation.unwrap() + 5, result.score);
    }

    #[test]
    fn test_pawn_capture_wins_when_it_scores_best() {
        // only the pawn can reach the queen
        let (_, mut position, result) = search("4k3/8/8/4q3/3P4/8/8/K7 w - - 0 1", 1);
        let tree = result.tree.unwrap();
        assert_eq!(tree.children[0].label, "d4e5");
        let best = result.best_move.unwrap();
        assert_eq!((best.from, best.to), (sq("d4"), sq("e5")));
        position.apply(best).unwrap();
        assert_eq!(result.score, evaluate(&position.board));
    }

    #[test]
    fn test_black_minimizes() {
        let (_, _, result) = search("k7/8/4p3/3Q4/8/8/8/7K b - - 0 1", 1);
        let best = result.best_move.unwrap();
        assert_eq!((best.from, best.to), (sq("e6"), sq("d5")));
        assert!(result.score < 0);
    }

    #[test]
    fn test_finds_mate_in_one() {
        let (_, _, result) = search("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 2);
        let best = result.best_move.unwrap();
        assert_eq!((best.from, best.to), (sq("a1"), sq("a8")));
        assert_eq!(result.score, MATE_SCORE - 1);
        assert!(result.is_mate());
    }

    #[test]
    fn test_mated_side_has_no_move() {
        let fools_mate = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
        let (engine, _, result) = search(fools_mate, 2);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, -MATE_SCORE);
        assert_eq!(result.nodes_visited, 0);
        assert_eq!(engine.stats().root_branching, 0);
    }

    #[test]
    fn test_stalemate_scores_zero() {
        let (_, _, result) = search("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3);
        assert_eq!(result.score, 0);
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut position = Position::starting();
        position.state.set_outcome(Some(Outcome::FiftyMoveRule));
        let mut engine = AlphaBetaSearch::default();
        let result = engine.choose_move(&mut position, 3).unwrap();
        assert_eq!(result.score, evaluate(&position.board));
        assert_eq!(result.best_move, None);
        assert_eq!(result.nodes_visited, 0);
    }

    #[test]
    fn test_explicit_window_search() {
        let mut position = Position::starting();
        let mut engine = AlphaBetaSearch::default();
        let full = engine
            .search(&mut position, 2, -SCORE_INFINITY, SCORE_INFINITY, Side::White, None)
            .unwrap();
        let (expected, _) = brute_force(&mut position, 2, 0, Side::White);
        assert_eq!(full.0, expected);
        assert!(full.1.is_some());
        assert!(position.history().is_empty());
    }
}

#[cfg(test)]
mod stats_tests {
    use super::*;

    #[test]
    fn test_counters_accumulate_and_reset() {
        let mut position = Position::starting();
        let mut engine = AlphaBetaSearch::default();
        let counters = engine.counters();

        let first = engine.choose_move(&mut position, 1).unwrap();
        let second = engine.choose_move(&mut position, 1).unwrap();
        assert_eq!(first.nodes_visited, 20);
        assert_eq!(second.nodes_visited, 20);
        assert_eq!(counters.nodes_visited(), 40);
        assert_eq!(counters.root_branching(), 40);

        engine.reset_stats();
        assert_eq!(counters.nodes_visited(), 0);
        assert_eq!(counters.root_branching(), 0);
        assert_eq!(counters.current_best(), None);
        assert_eq!(engine.stats(), SearchStats::default());
    }

    #[test]
    fn test_current_best_tracks_root_score() {
        let (engine, _, result) = search(KIWIPETE, 2);
        assert_eq!(engine.stats().current_best, Some(result.score));
        assert_eq!(engine.stats().depth, 2);
    }

    #[test]
    fn test_pruned_percent_reported() {
        let (engine, _, _) = search(START_FEN, 3);
        let stats = engine.stats();
        assert!(stats.nodes_visited > stats.root_branching);
        assert!(stats.pruned_percent().is_some());
    }
}

#[cfg(test)]
mod tree_tests {
    use super::*;

    #[test]
    fn test_tree_mirrors_search() {
        let (engine, _, result) = search(START_FEN, 2);
        let tree = result.tree.unwrap();
        assert_eq!(tree.label, SearchNode::ROOT_LABEL);
        assert_eq!(tree.evaluation, Some(result.score));
        // the root never cuts off under a full window
        assert_eq!(tree.children.len(), 20);
        assert!(tree.children.iter().all(|c| !c.pruned));
        // one node per simulated move
        assert_eq!(tree.size() as u64 - 1, engine.stats().nodes_visited);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_cutoff_child_is_marked() {
        let (_, _, result) = search(START_FEN, 2);
        let tree = result.tree.unwrap();
        let pruned: Vec<&SearchNode> = tree
            .children
            .iter()
            .flat_map(|c| c.children.iter())
            .filter(|g| g.pruned)
            .collect();
        assert!(!pruned.is_empty());
        // a pruned grandchild is always the last one searched under its parent
        for child in &tree.children {
            if let Some(pos) = child.children.iter().position(|g| g.pruned) {
                assert_eq!(pos, child.children.len() - 1, "{}", child.label);
            }
        }
    }

    #[test]
    fn test_leaf_evaluations_are_static() {
        let (_, mut position, result) = search(START_FEN, 1);
        let tree = result.tree.unwrap();
        let moves = StandardMoveGen.generate(&mut position, Side::White).unwrap();
        for (child, mv) in tree.children.iter().zip(moves) {
            assert_eq!(child.label, mv.label(&position.board));
            let guard = position.play(mv).unwrap();
            assert_eq!(child.evaluation, Some(evaluate(&guard.board)));
            assert!(child.children.is_empty());
        }
    }

    #[test]
    fn test_tree_can_be_disabled() {
        let mut position = Position::starting();
        let config = SearchConfig {
            build_tree: false,
            ..Default::default()
        };
        let mut engine = AlphaBetaSearch::default().with_config(config);
        let result = engine.choose_move(&mut position, 2).unwrap();
        assert!(result.tree.is_none());
        assert!(result.best_move.is_some());
    }
}

#[cfg(test)]
mod observer_tests {
    use super::*;

    #[derive(Debug)]
    struct ChannelObserver(Mutex<Sender<SearchReport>>);

    impl SearchObserver for ChannelObserver {
        fn on_search_complete(&self, report: &SearchReport) -> miette::Result<()> {
            self.0
                .lock()
                .map_err(|e| miette::miette!("{e}"))?
                .send(report.clone())
                .into_diagnostic()
        }
    }

    #[derive(Debug)]
    struct FailingObserver;

    impl SearchObserver for FailingObserver {
        fn on_search_complete(&self, _: &SearchReport) -> miette::Result<()> {
            miette::bail!("dashboard unreachable")
        }
    }

    #[test]
    fn test_observer_receives_report() {
        let (tx, rx) = channel();
        let observer = Arc::new(ChannelObserver(Mutex::new(tx)));
        let mut engine = AlphaBetaSearch::default().with_observer(observer);
        let mut position = Position::starting();
        let result = engine.choose_move(&mut position, 2).unwrap();

        let report = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(report.score, result.score);
        assert_eq!(report.depth, 2);
        assert_eq!(report.fen, START_FEN);
        assert_eq!(
            report.best_move,
            result.best_move.map(|m| m.label(&position.board))
        );
        assert_eq!(report.tree, result.tree);
        assert_eq!(report.stats.root_branching, 20);
    }

    #[test]
    fn test_failing_observer_does_not_affect_result() {
        let mut with_failure = AlphaBetaSearch::default().with_observer(Arc::new(FailingObserver));
        let mut plain = AlphaBetaSearch::default();
        let mut position = Position::starting();

        let a = with_failure.choose_move(&mut position, 2).unwrap();
        let b = plain.choose_move(&mut position, 2).unwrap();
        assert_eq!((a.score, a.best_move), (b.score, b.best_move));
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;

    /// Behaves like the standard generator at the root, then slips in a move
    /// onto a friendly piece one ply down
    #[derive(Debug)]
    struct SelfCaptureGen;

    impl MoveGenerator for SelfCaptureGen {
        fn legal_moves(&self, position: &mut Position, piece: PieceId) -> EngineResult<Vec<Square>> {
            StandardMoveGen.legal_moves(position, piece)
        }

        fn generate(&self, position: &mut Position, side: Side) -> EngineResult<Vec<Move>> {
            let mut moves = StandardMoveGen.generate(position, side)?;
            if !position.history().is_empty() {
                let own: Vec<(PieceId, Square)> = position
                    .board
                    .pieces_of(side)
                    .map(|(id, p)| (id, p.square))
                    .take(2)
                    .collect();
                if let [(id, from), (_, to)] = own[..] {
                    moves.push(Move::new(id, from, to));
                }
            }
            Ok(moves)
        }
    }

    #[test]
    fn test_bad_generator_is_a_contract_violation() {
        let mut position = Position::starting();
        let original = position.clone();
        let mut engine = AlphaBetaSearch::new(
            Box::new(PieceSquareEvaluator::default()),
            Box::new(SelfCaptureGen),
        );
        let err = engine.choose_move(&mut position, 2).unwrap_err();
        assert!(err.is_contract_violation(), "{err}");
        assert!(matches!(
            err,
            EngineError::Contract(ContractViolation::SelfCapture { .. })
        ));
        // every guard on the way up undid its move
        assert_eq!(position, original);
    }
}
