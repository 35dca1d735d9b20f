pub mod alpha_beta;
pub mod common;
pub mod move_ordering;
pub mod observer;
pub mod tree;

#[cfg(test)]
mod tests;

pub use alpha_beta::AlphaBetaSearch;
pub use common::{SearchConfig, SearchCounters, SearchResult, SearchStats};
pub use tree::SearchNode;
