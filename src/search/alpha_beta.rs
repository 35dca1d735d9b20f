//! MiniMax Search with Alpha-Beta pruning.
//!
//! Scores are absolute (White maximizes, Black minimizes). Moves are played
//! on the caller's position with make/unmake; every ply is wrapped in a
//! [`MoveGuard`] so it is undone on every exit path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info_span;

use crate::moves::rules::in_check;
use crate::prelude::*;
use crate::search::common::no_moves_score;
use crate::search::move_ordering::order_moves;
use crate::search::observer::notify_detached;

#[derive(Debug)]
pub struct AlphaBetaSearch {
    /// Search params
    config: SearchConfig,
    /// External deps
    evaluator: Box<dyn Evaluator>,
    generator: Box<dyn MoveGenerator>,
    observer: Option<Arc<dyn SearchObserver>>,
    /// Pollable from other threads
    counters: Arc<SearchCounters>,
    /// Last completed search
    last_depth: u8,
    last_time: Duration,
}

impl Default for AlphaBetaSearch {
    fn default() -> Self {
        Self::new(
            Box::new(PieceSquareEvaluator::default()),
            Box::new(StandardMoveGen),
        )
    }
}

impl AlphaBetaSearch {
    pub fn new(evaluator: Box<dyn Evaluator>, generator: Box<dyn MoveGenerator>) -> Self {
        Self {
            config: SearchConfig::default(),
            evaluator,
            generator,
            observer: None,
            counters: Arc::new(SearchCounters::new()),
            last_depth: 0,
            last_time: Duration::ZERO,
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Observer notified once after every [`Self::choose_move`]
    pub fn with_observer(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn set_evaluator(&mut self, evaluator: Box<dyn Evaluator>) {
        self.evaluator = evaluator;
    }

    pub fn set_depth(&mut self, depth: u8) {
        self.config.max_depth = depth;
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn evaluator(&self) -> &dyn Evaluator {
        &*self.evaluator
    }

    pub fn generator(&self) -> &dyn MoveGenerator {
        &*self.generator
    }

    /// Shared handle to the live counters
    pub fn counters(&self) -> Arc<SearchCounters> {
        Arc::clone(&self.counters)
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            depth: self.last_depth,
            time_elapsed: self.last_time,
            ..self.counters.snapshot()
        }
    }

    pub fn reset_stats(&mut self) {
        self.counters.reset();
        self.last_depth = 0;
        self.last_time = Duration::ZERO;
    }
}

// Main search
impl AlphaBetaSearch {
    /// Picks a move for the side to move with a full window search.
    ///
    /// The position is mutated during the search and handed back exactly as
    /// it came in; a mismatch in undo stack height is reported as a contract
    /// violation.
    pub fn choose_move(
        &mut self,
        position: &mut Position,
        depth: u8,
    ) -> EngineResult<SearchResult> {
        let span = info_span!("search_root", depth);
        let _guard = span.enter();

        let side = position.state.side_to_move;
        debug!(
            "Finding best move for '{}' ({side} to move) at depth {depth}",
            position.to_fen()
        );

        let start_time = Instant::now();
        let stack_height = position.history().len();
        let nodes_before = self.counters.nodes_visited();
        let mut tree = self.config.build_tree.then(SearchNode::root);

        let (score, best_move) = self.search(
            position,
            depth,
            -SCORE_INFINITY,
            SCORE_INFINITY,
            side,
            tree.as_mut(),
        )?;

        let found = position.history().len();
        if found != stack_height {
            error!("Undo stack unbalanced after search: {found} != {stack_height}");
            return Err(ContractViolation::UnbalancedUndoStack {
                expected: stack_height,
                found,
            }
            .into());
        }

        self.last_depth = depth;
        self.last_time = start_time.elapsed();

        let result = SearchResult {
            best_move,
            score,
            depth,
            nodes_visited: self.counters.nodes_visited().saturating_sub(nodes_before),
            time_taken: self.last_time,
            tree,
        };

        let label = best_move.map(|mv| mv.label(&position.board));
        debug!(
            "Best move {} score {score} nodes {} in {:?}",
            label.as_deref().unwrap_or("none"),
            result.nodes_visited,
            result.time_taken
        );
        if self.config.log_stats {
            self.stats().log_summary();
        }

        if let Some(observer) = &self.observer {
            let report = SearchReport {
                fen: position.to_fen(),
                depth,
                score,
                best_move: label,
                stats: self.stats(),
                tree: result.tree.clone(),
            };
            notify_detached(Arc::clone(observer), report);
        }

        Ok(result)
    }

    /// Window-explicit search from `position` for `side`. The call itself is
    /// the root (ply 0) for statistics.
    ///
    /// `node`, when given, receives one child per move actually searched.
    pub fn search(
        &mut self,
        position: &mut Position,
        depth: u8,
        alpha: i32,
        beta: i32,
        side: Side,
        node: Option<&mut SearchNode>,
    ) -> EngineResult<(i32, Option<Move>)> {
        self.alpha_beta(position, depth, 0, alpha, beta, side, node)
    }

    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &self,
        position: &mut Position,
        depth: u8,
        ply: usize,
        mut alpha: i32,
        mut beta: i32,
        side: Side,
        mut node: Option<&mut SearchNode>,
    ) -> EngineResult<(i32, Option<Move>)> {
        if depth == 0 || position.state.game_over() {
            let eval = self.evaluator.evaluate(&position.board);
            if let Some(node) = node {
                node.evaluation = Some(eval);
            }
            return Ok((eval, None));
        }

        let moves = self.generator.generate(position, side)?;
        let moves = order_moves(&position.board, &*self.evaluator, moves);

        if ply == 0 {
            self.counters.add_root_branching(moves.len());
        }

        if moves.is_empty() {
            let score = no_moves_score(side, in_check(&position.board, side), ply);
            trace!("No moves for {side} at ply {ply}: {score}");
            if let Some(node) = node {
                node.evaluation = Some(score);
            }
            return Ok((score, None));
        }

        let maximizing = side.is_maximizing();
        let mut best_score = if maximizing {
            -SCORE_INFINITY
        } else {
            SCORE_INFINITY
        };
        let mut best_move = None;

        for mv in moves {
            let mut child = node
                .as_deref_mut()
                .map(|n| n.push_child(mv.label(&position.board)));

            let score = {
                let mut guard = position.play(mv)?;
                self.counters.record_node();
                let (score, _) = self.alpha_beta(
                    &mut guard,
                    depth - 1,
                    ply + 1,
                    alpha,
                    beta,
                    !side,
                    child.as_deref_mut(),
                )?;
                score
            };

            // Ties keep the earlier move
            let improved = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if improved {
                best_score = score;
                best_move = Some(mv);
                if maximizing {
                    alpha = alpha.max(best_score);
                } else {
                    beta = beta.min(best_score);
                }
            }

            if ply == 0 {
                self.counters.set_current_best(best_score);
            }

            if let Some(child) = child.as_deref_mut() {
                child.evaluation = Some(score);
            }

            if beta <= alpha {
                trace!("Cutoff after {mv} at ply {ply}: alpha {alpha} beta {beta}");
                if let Some(child) = child {
                    child.pruned = true;
                }
                break;
            }
        }

        if let Some(node) = node {
            node.evaluation = Some(best_score);
        }

        Ok((best_score, best_move))
    }
}
