use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::consts::START_FEN;

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), version = env!("APP_VERSION"), about = env!("CARGO_PKG_DESCRIPTION") )]
pub struct Cli {
    /// TOML engine config
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the given position and report the best move
    Search {
        /// FEN string for the position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        /// search depth, overrides the config
        #[arg(short, long)]
        depth: Option<u8>,
        /// write the search tree report as JSON to this path
        #[arg(short, long)]
        tree: Option<PathBuf>,
    },

    /// Print the static evaluation of a position
    Eval {
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
    },

    /// Run perft on game with given FEN and depth, or use default fen
    Perft {
        /// FEN string for starting position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        /// set search depth
        #[arg(short, long, default_value = "4")]
        depth: u8,
        /// set divide flag
        #[arg(long, default_value = "false")]
        divide: bool,
    },

    /// Start game with given FEN and depth, or use default fen
    Play {
        /// FEN string for starting position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        /// engine search depth, overrides the config
        #[arg(short, long)]
        depth: Option<u8>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "game_cmd", no_binary_name = true)]
pub struct GameCommand {
    #[command(subcommand)]
    pub cmd: GameSubcommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum GameSubcommand {
    /// Make a move on the board
    #[clap(visible_alias = "m")]
    Move { from: String, to: String },

    /// Print the current board state
    #[clap(visible_alias = "p")]
    Print,

    /// Take back the last full move (yours and the engine's reply)
    #[clap(visible_alias = "u")]
    Undo,

    /// Show the current evaluation of the position
    #[clap(visible_alias = "e")]
    Evaluate,

    /// Change the engine search depth
    #[clap(visible_alias = "d")]
    Depth { depth: u8 },

    /// Show counters of the engine's searches so far
    #[clap(visible_alias = "s")]
    Stats,

    /// Clear screen
    #[clap(visible_alias = "c")]
    Clear,

    /// Restart game with same fen
    #[clap(visible_alias = "r")]
    Restart,

    /// Quit game
    #[clap(visible_alias = "q")]
    Quit,
}
