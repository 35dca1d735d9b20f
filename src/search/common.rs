use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug_span;

use crate::prelude::*;

/// Stored in [`SearchCounters::current_best`] while the root has no score yet
const NO_SCORE: i32 = i32::MIN;

/// Score of a node whose side to move has no legal moves.
///
/// Mates closer to the root score higher for the winner, so the search
/// prefers the fastest mate and the longest defence.
#[inline]
pub fn no_moves_score(side: Side, in_check: bool, ply: usize) -> i32 {
    if !in_check {
        return 0;
    }
    let ply = ply as i32;
    match side {
        Side::White => -MATE_SCORE + ply,
        Side::Black => MATE_SCORE - ply,
    }
}

/// Whether `score` encodes a forced mate rather than an evaluation
pub fn is_mate_score(score: i32) -> bool {
    score.abs() > MATE_SCORE - MAX_PLY as i32
}

/// Live counters of a running search.
///
/// Shared through an `Arc` so a UI or telemetry thread can poll them while the
/// search runs. Counters accumulate across searches until [`Self::reset`].
#[derive(Debug)]
pub struct SearchCounters {
    nodes_visited: AtomicU64,
    root_branching: AtomicU64,
    current_best: AtomicI32,
}

impl Default for SearchCounters {
    fn default() -> Self {
        Self {
            nodes_visited: AtomicU64::new(0),
            root_branching: AtomicU64::new(0),
            current_best: AtomicI32::new(NO_SCORE),
        }
    }
}

impl SearchCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// One more simulated move, at any depth
    #[inline(always)]
    pub fn record_node(&self) {
        self.nodes_visited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_root_branching(&self, moves: usize) {
        self.root_branching
            .fetch_add(moves as u64, Ordering::Relaxed);
    }

    pub fn set_current_best(&self, score: i32) {
        self.current_best.store(score, Ordering::Relaxed);
    }

    pub fn nodes_visited(&self) -> u64 {
        self.nodes_visited.load(Ordering::Relaxed)
    }

    pub fn root_branching(&self) -> u64 {
        self.root_branching.load(Ordering::Relaxed)
    }

    /// Best score found so far in the root's move loop
    pub fn current_best(&self) -> Option<i32> {
        match self.current_best.load(Ordering::Relaxed) {
            NO_SCORE => None,
            score => Some(score),
        }
    }

    pub fn reset(&self) {
        self.nodes_visited.store(0, Ordering::Relaxed);
        self.root_branching.store(0, Ordering::Relaxed);
        self.current_best.store(NO_SCORE, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SearchStats {
        SearchStats {
            nodes_visited: self.nodes_visited(),
            root_branching: self.root_branching(),
            current_best: self.current_best(),
            ..Default::default()
        }
    }
}

/// Point-in-time copy of [`SearchCounters`] plus timing of the last search
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub nodes_visited: u64,
    pub root_branching: u64,
    pub current_best: Option<i32>,
    pub depth: u8,
    pub time_elapsed: Duration,
}

impl SearchStats {
    /// The dashboard's "% of search tree pruned" figure.
    /// `None` until both counters are non-zero.
    pub fn pruned_percent(&self) -> Option<f64> {
        if self.nodes_visited == 0 || self.root_branching == 0 {
            return None;
        }
        Some(100.0 - self.nodes_visited as f64 / self.root_branching as f64 * 100.0)
    }

    pub fn nps(&self) -> u64 {
        let time_ms = self.time_elapsed.as_millis().max(1) as u64;
        (self.nodes_visited * 1000) / time_ms
    }

    pub fn log_summary(&self) {
        let _span = debug_span!("search_stats").entered();
        debug!("=> SEARCH STATISTICS (depth {})", self.depth);
        debug!(
            "NODES total={} time={:?} nps={}",
            self.nodes_visited,
            self.time_elapsed,
            self.nps()
        );
        debug!("  - Root Branching:   {:>9}", self.root_branching);
        match self.current_best {
            Some(score) => debug!("  - Current Best:     {:>9}", score),
            None => debug!("  - Current Best:          none"),
        }
        if let Some(pruned) = self.pruned_percent() {
            debug!("  - Pruned:           {:>8.2}%", pruned);
        }
    }
}

/// Configuration for search behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Depth used when the caller does not pass one
    pub max_depth: u8,
    /// Build the visualization tree during [`AlphaBetaSearch::choose_move`]
    pub build_tree: bool,
    /// Log a [`SearchStats`] summary after every search
    pub log_stats: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            build_tree: true,
            log_stats: false,
        }
    }
}

/// Result of a search
#[derive(Debug, Default, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: u8,
    /// Nodes visited by this search alone
    pub nodes_visited: u64,
    pub time_taken: Duration,
    pub tree: Option<SearchNode>,
}

impl SearchResult {
    pub fn nps(&self) -> u64 {
        let time_ms = self.time_taken.as_millis().max(1) as u64;
        (self.nodes_visited * 1000) / time_ms
    }

    pub fn is_mate(&self) -> bool {
        is_mate_score(self.score)
    }
}
