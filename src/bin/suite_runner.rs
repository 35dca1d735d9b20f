use clap::Parser;
use minimax_chess::prelude::*;
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{BufRead, BufReader},
    path::PathBuf,
    time::{Duration, Instant},
};

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Searches every position of a FEN suite, each on its own board
#[derive(Parser, Debug)]
#[command(version, about)]
struct SuiteCli {
    /// File with one FEN per line, optionally followed by `; bm <from><to>`
    #[arg(required = true)]
    path: PathBuf,

    /// Search depth
    #[arg(short, long, default_value_t = 3)]
    depth: u8,

    /// TOML engine config (evaluation parameters and search settings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write all results as JSON
    #[arg(short, long)]
    json: Option<PathBuf>,

    #[cfg(feature = "parallel")]
    #[arg(
        long,
        default_value_t = 0,
        help = "Number of threads to use (0 for auto) [requires 'parallel' feature]"
    )]
    threads: usize,
}

#[derive(Debug, Clone)]
struct SuiteEntry {
    line: usize,
    fen: String,
    expected: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct EntryResult {
    line: usize,
    fen: String,
    best_move: Option<String>,
    score: Option<i32>,
    nodes_visited: u64,
    root_branching: u64,
    pruned_percent: Option<f64>,
    time_taken: Duration,
    expected: Option<String>,
    error: Option<String>,
}

impl EntryResult {
    fn passed(&self) -> Option<bool> {
        let expected = self.expected.as_ref()?;
        Some(self.best_move.as_ref() == Some(expected))
    }
}

fn main() -> miette::Result<()> {
    init();
    let cli = SuiteCli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };
    let entries = load_suite(&cli.path)?;
    miette::ensure!(
        !entries.is_empty(),
        "No positions found in {}",
        cli.path.display()
    );
    println!(
        "Running {} positions from {} at depth {}",
        entries.len(),
        cli.path.display(),
        cli.depth
    );

    let start = Instant::now();
    let results = run_suite(&cli, &config, &entries)?;
    print_summary(&results, start.elapsed());

    if let Some(path) = &cli.json {
        let json = serde_json::to_string_pretty(&results).into_diagnostic()?;
        fs::write(path, json)
            .into_diagnostic()
            .with_context(|| format!("Writing results to {}", path.display()))?;
        println!("Results written to {}", path.display());
    }
    Ok(())
}

fn load_suite(path: &PathBuf) -> miette::Result<Vec<SuiteEntry>> {
    let file = File::open(path)
        .into_diagnostic()
        .with_context(|| format!("Opening suite {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.into_diagnostic()?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (fen, expected) = match line.split_once(';') {
            Some((fen, rest)) => (
                fen.trim(),
                rest.trim().strip_prefix("bm").map(|m| m.trim().to_string()),
            ),
            None => (line, None),
        };
        entries.push(SuiteEntry {
            line: idx + 1,
            fen: fen.to_string(),
            expected,
        });
    }
    Ok(entries)
}

/// Every entry gets a fresh engine and its own position
fn run_entry(entry: &SuiteEntry, config: &EngineConfig, depth: u8) -> EntryResult {
    let mut result = EntryResult {
        line: entry.line,
        fen: entry.fen.clone(),
        best_move: None,
        score: None,
        nodes_visited: 0,
        root_branching: 0,
        pruned_percent: None,
        time_taken: Duration::ZERO,
        expected: entry.expected.clone(),
        error: None,
    };

    let searched = Position::from_fen(&entry.fen).and_then(|mut position| {
        let mut engine = AlphaBetaSearch::new(Box::new(config.evaluator()?), Box::new(StandardMoveGen))
            .with_config(SearchConfig {
                build_tree: false,
                ..config.search
            });
        let found = engine.choose_move(&mut position, depth)?;
        Ok((found, engine.stats()))
    });

    match searched {
        Ok((found, stats)) => {
            result.best_move = found.best_move.map(|m| m.to_string());
            result.score = Some(found.score);
            result.nodes_visited = stats.nodes_visited;
            result.root_branching = stats.root_branching;
            result.pruned_percent = stats.pruned_percent();
            result.time_taken = found.time_taken;
        }
        Err(e) => {
            warn!("Line {}: {e}", entry.line);
            result.error = Some(e.to_string());
        }
    }
    result
}

#[cfg(feature = "parallel")]
fn run_suite(
    cli: &SuiteCli,
    config: &EngineConfig,
    entries: &[SuiteEntry],
) -> miette::Result<Vec<EntryResult>> {
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .into_diagnostic()?;
    }

    let pb = ProgressBar::new(entries.len() as u64);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
            .into_diagnostic()?
            .progress_chars("#>-"),
    );

    let results = entries
        .par_iter()
        .map(|entry| {
            let result = run_entry(entry, config, cli.depth);
            pb.inc(1);
            result
        })
        .collect();

    pb.finish_with_message("Done");
    Ok(results)
}

#[cfg(not(feature = "parallel"))]
fn run_suite(
    cli: &SuiteCli,
    config: &EngineConfig,
    entries: &[SuiteEntry],
) -> miette::Result<Vec<EntryResult>> {
    Ok(entries
        .iter()
        .map(|entry| run_entry(entry, config, cli.depth))
        .collect())
}

fn print_summary(results: &[EntryResult], elapsed: Duration) {
    println!("{:-<100}", "");
    println!(
        "{:<6} {:<10} {:>8} {:>12} {:>8}  {}",
        "line", "move", "score", "nodes", "pruned", "result"
    );
    for r in results {
        let verdict = match (&r.error, r.passed()) {
            (Some(e), _) => format!("ERROR {e}"),
            (None, Some(true)) => "PASS".to_string(),
            (None, Some(false)) => format!(
                "FAIL (expected {})",
                r.expected.as_deref().unwrap_or_default()
            ),
            (None, None) => String::new(),
        };
        println!(
            "{:<6} {:<10} {:>8} {:>12} {:>7}  {}",
            r.line,
            r.best_move.as_deref().unwrap_or("-"),
            r.score.map_or("-".to_string(), |s| s.to_string()),
            r.nodes_visited,
            r.pruned_percent
                .map_or("-".to_string(), |p| format!("{p:.1}%")),
            verdict
        );
    }
    println!("{:-<100}", "");

    let total_nodes: u64 = results.iter().map(|r| r.nodes_visited).sum();
    let errors = results.iter().filter(|r| r.error.is_some()).count();
    let checked: Vec<bool> = results.iter().filter_map(EntryResult::passed).collect();
    let passed = checked.iter().filter(|&&p| p).count();

    println!(
        "{} positions, {} errors, {total_nodes} nodes in {elapsed:?}",
        results.len(),
        errors
    );
    if !checked.is_empty() {
        println!("Best move matched: {passed}/{}", checked.len());
    }
}
