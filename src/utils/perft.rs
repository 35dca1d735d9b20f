use crate::prelude::*;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct PerftResult {
    /// Total nodes counted
    pub nodes: u64,
    /// Time taken
    pub duration: Duration,
    /// Nodes per second
    pub nps: u64,
    /// Move breakdown showing count for each move
    pub move_counts: Option<Vec<(Move, u64)>>,
}

impl PerftResult {
    /// Creates a new PerftResult with the given data
    pub fn new(nodes: u64, duration: Duration, move_counts: Option<Vec<(Move, u64)>>) -> Self {
        let nanos = duration.as_nanos();
        let nps = if nanos > 0 {
            (nodes as u128 * 1_000_000_000 / nanos) as u64
        } else {
            0
        };

        Self {
            nodes,
            duration,
            nps,
            move_counts,
        }
    }
}

/// Counts leaf nodes of the legal move tree. Every move is played through a
/// [`MoveGuard`], so the position comes back unchanged.
pub fn perft(
    position: &mut Position,
    generator: &dyn MoveGenerator,
    depth: u8,
    divide: bool,
) -> EngineResult<PerftResult> {
    let start_time = Instant::now();

    if depth == 0 {
        return Ok(PerftResult::new(1, start_time.elapsed(), None));
    }

    let side = position.state.side_to_move;
    let legal_moves = generator.generate(position, side)?;

    if depth == 1 {
        let move_counts = divide.then(|| legal_moves.iter().map(|&m| (m, 1)).collect());
        return Ok(PerftResult::new(
            legal_moves.len() as u64,
            start_time.elapsed(),
            move_counts,
        ));
    }

    let mut total_nodes = 0;
    let mut move_counts = divide.then(|| Vec::with_capacity(legal_moves.len()));

    for m in legal_moves {
        let sub_nodes = {
            let mut guard = position.play(m)?;
            perft(&mut guard, generator, depth - 1, false)?.nodes
        };

        total_nodes += sub_nodes;

        if let Some(ref mut counts) = move_counts {
            counts.push((m, sub_nodes));
        }
    }

    Ok(PerftResult::new(
        total_nodes,
        start_time.elapsed(),
        move_counts,
    ))
}

/// Performs a Perft test and prints a detailed breakdown
pub fn perft_divide(
    position: &mut Position,
    generator: &dyn MoveGenerator,
    depth: u8,
) -> EngineResult<PerftResult> {
    info!("Starting perft divide at depth {depth}");
    let result = perft(position, generator, depth, true)?;

    if let Some(ref move_counts) = result.move_counts {
        println!("Perft results at depth {depth}");
        println!("----------------------------");

        for (mov, count) in move_counts {
            println!("{}: {count}", mov.label(&position.board));
        }

        println!("----------------------------");
        println!("Total nodes: {}", result.nodes);
        println!("Time: {} ms", result.duration.as_millis());
        println!("Nodes per second: {}", result.nps);
    }

    Ok(result)
}

/// Runs perft for depths 1 through max_depth
pub fn run_perft_suite(
    position: &mut Position,
    generator: &dyn MoveGenerator,
    max_depth: u8,
) -> EngineResult<()> {
    println!("Running Perft suite up to depth {max_depth}");
    println!("----------------------------");

    for depth in 1..=max_depth {
        let result = perft(position, generator, depth, false)?;
        println!(
            "Depth {}: {} nodes in {} ms ({} nps)",
            depth,
            result.nodes,
            result.duration.as_millis(),
            result.nps
        );
    }

    println!("----------------------------");
    Ok(())
}
