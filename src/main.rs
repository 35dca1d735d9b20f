use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use minimax_chess::moves::status::refresh_outcome;
use minimax_chess::prelude::*;
use minimax_chess::utils::cli::{Cli, Commands, GameCommand, GameSubcommand};
use tracing::{Level, span, trace};

fn main() -> miette::Result<()> {
    init();

    let span = span!(Level::DEBUG, "main");
    let _guard = span.enter();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };
    set_log_level(config.log.level()?)?;
    toggle_file_logging(config.log.file)?;

    match cli.command {
        Some(Commands::Search { fen, depth, tree }) => {
            trace!("Searching fen: {fen:?}, depth: {depth:?}");
            search_once(&config, &fen, depth, tree)?;
        }
        Some(Commands::Eval { fen }) => {
            let position = Position::from_fen(&fen)?;
            let evaluator = config.evaluator()?;
            println!("{}", position.board);
            println!("Evaluation ({}): {}", evaluator.name(), evaluator.evaluate(&position.board));
        }
        Some(Commands::Perft { fen, depth, divide }) => {
            trace!("Running perft with fen: {fen:?}, depth: {depth:?}, divide: {divide:?}");
            let mut position = Position::from_fen(&fen)?;
            println!("{}", position.board);
            if divide {
                perft_divide(&mut position, &StandardMoveGen, depth)?;
            } else {
                run_perft_suite(&mut position, &StandardMoveGen, depth)?;
            }
        }
        Some(Commands::Play { fen, depth }) => {
            trace!("Starting game with fen: {fen:?}, depth: {depth:?}");
            game_loop(&config, &fen, depth.unwrap_or(config.search.max_depth))?;
        }
        None => {
            println!("Starting default game");
            game_loop(&config, START_FEN, config.search.max_depth)?;
        }
    }
    Ok(())
}

fn search_once(
    config: &EngineConfig,
    fen: &str,
    depth: Option<u8>,
    tree: Option<PathBuf>,
) -> miette::Result<()> {
    let mut position = Position::from_fen(fen)?;
    let depth = depth.unwrap_or(config.search.max_depth);

    let mut engine = config.build_engine()?;
    if let Some(path) = tree {
        engine = engine.with_observer(Arc::new(JsonFileObserver::new(path)));
    }

    println!("{}", position.board);
    let result = engine.choose_move(&mut position, depth)?;
    let stats = engine.stats();

    match result.best_move {
        Some(mv) => println!("Best move: {}", mv.label(&position.board)),
        None => println!("No move: {side} cannot move", side = position.state.side_to_move),
    }
    println!("Score: {}{}", result.score, if result.is_mate() { " (mate)" } else { "" });
    println!("Nodes visited: {}", stats.nodes_visited);
    println!("Root branching: {}", stats.root_branching);
    match stats.pruned_percent() {
        Some(pct) => println!("Pruned: {pct:.1}%"),
        None => println!("Pruned: n/a"),
    }
    println!("Time: {:?} ({} nps)", result.time_taken, result.nps());
    Ok(())
}

fn game_loop(config: &EngineConfig, fen: &str, depth: u8) -> miette::Result<()> {
    let start = Position::from_fen(fen)?;
    let mut position = start.clone();
    let mut engine = config.build_engine()?;
    engine.set_depth(depth);
    let human = position.state.side_to_move;
    // Positions before each of the human's moves
    let mut committed: Vec<Position> = Vec::new();

    println!("{}", position.board);
    println!("You play {human}. Type 'help' for commands.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().into_diagnostic()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.into_diagnostic()?;
        let words = match shell_words::split(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(e) => {
                println!("Could not parse input: {e}");
                continue;
            }
        };
        let cmd = match GameCommand::try_parse_from(words) {
            Ok(cmd) => cmd.cmd,
            Err(e) => {
                let _ = e.print();
                continue;
            }
        };

        match cmd {
            GameSubcommand::Move { from, to } => {
                if let Some(outcome) = position.state.outcome() {
                    println!("Game is over: {outcome}. Restart or undo.");
                    continue;
                }
                let mv = match parse_human_move(&mut position, engine.generator(), &from, &to) {
                    Ok(mv) => mv,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };

                committed.push(position.clone());
                position.apply(mv)?;
                println!("{}", position.board);
                if report_outcome(&mut position, engine.generator())? {
                    continue;
                }

                let depth = engine.config().max_depth;
                let result = engine.choose_move(&mut position, depth)?;
                match result.best_move {
                    Some(reply) => {
                        println!(
                            "Engine plays {} (score {})",
                            reply.label(&position.board),
                            result.score
                        );
                        position.apply(reply)?;
                        println!("{}", position.board);
                        report_outcome(&mut position, engine.generator())?;
                    }
                    None => println!("Engine has no move"),
                }
            }
            GameSubcommand::Print => {
                println!("{}", position.board);
                println!("{}", position.to_fen());
            }
            GameSubcommand::Undo => match committed.pop() {
                Some(previous) => {
                    position = previous;
                    println!("{}", position.board);
                }
                None => println!("Nothing to undo"),
            },
            GameSubcommand::Evaluate => {
                println!("Evaluation: {}", engine.evaluator().evaluate(&position.board));
            }
            GameSubcommand::Depth { depth: new_depth } => {
                engine.set_depth(new_depth);
                println!("Search depth set to {new_depth}");
            }
            GameSubcommand::Stats => {
                let stats = engine.stats();
                println!(
                    "nodes {} | root branching {} | pruned {} | last depth {} in {:?}",
                    stats.nodes_visited,
                    stats.root_branching,
                    stats
                        .pruned_percent()
                        .map_or("n/a".to_string(), |p| format!("{p:.1}%")),
                    stats.depth,
                    stats.time_elapsed
                );
            }
            GameSubcommand::Clear => utils::clear_screen()?,
            GameSubcommand::Restart => {
                position = start.clone();
                committed.clear();
                engine.reset_stats();
                println!("{}", position.board);
            }
            GameSubcommand::Quit => break,
        }
    }
    Ok(())
}

fn parse_human_move(
    position: &mut Position,
    generator: &dyn MoveGenerator,
    from: &str,
    to: &str,
) -> miette::Result<Move> {
    let from = Square::from_str(from)?;
    let to = Square::from_str(to)?;
    let mv = Move::from_squares(&position.board, from, to)
        .ok_or_else(|| miette::miette!("No piece on {from}"))?;

    let side = position.board.piece(mv.piece).side;
    miette::ensure!(
        side == position.state.side_to_move,
        "It is {}'s turn",
        position.state.side_to_move
    );
    let legal = generator.legal_moves(position, mv.piece)?;
    miette::ensure!(legal.contains(&to), "Illegal move {mv}");
    Ok(mv)
}

/// Prints the outcome if the game just ended
fn report_outcome(position: &mut Position, generator: &dyn MoveGenerator) -> miette::Result<bool> {
    match refresh_outcome(position, generator)? {
        Some(outcome) => {
            println!("{outcome}");
            Ok(true)
        }
        None => Ok(false),
    }
}
