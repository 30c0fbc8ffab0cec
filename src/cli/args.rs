//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::services::Puzzle;

/// Advent calendar puzzle solvers: snailfish trees, tiled grids, origami folds, polymer chains,
/// packets, trajectories and image enhancement
#[derive(Parser, Debug)]
#[command(name = "advent")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more: -d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding puzzle inputs (default: from config, else cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub input_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve both parts of a puzzle
    Solve {
        /// Puzzle to solve
        #[arg(value_enum)]
        puzzle: PuzzleArg,
        /// Input file (default: <input-dir>/<puzzle>/input.txt, then <input-dir>/input.txt)
        #[arg(value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
    },

    /// Snailfish number arithmetic
    Snail {
        #[command(subcommand)]
        command: SnailCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Puzzle names accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleArg {
    /// Day 9
    #[value(name = "smoke-basin", alias = "9", alias = "day9")]
    SmokeBasin,
    /// Day 13
    #[value(alias = "13", alias = "day13")]
    Origami,
    /// Day 14
    #[value(alias = "14", alias = "day14")]
    Polymer,
    /// Day 15
    #[value(alias = "15", alias = "day15")]
    Chiton,
    /// Day 16
    #[value(name = "packet-decoder", alias = "16", alias = "day16")]
    PacketDecoder,
    /// Day 17
    #[value(name = "trick-shot", alias = "17", alias = "day17")]
    TrickShot,
    /// Day 18
    #[value(alias = "18", alias = "day18")]
    Snailfish,
    /// Day 20
    #[value(name = "trench-map", alias = "20", alias = "day20")]
    TrenchMap,
}

impl From<PuzzleArg> for Puzzle {
    fn from(arg: PuzzleArg) -> Self {
        match arg {
            PuzzleArg::SmokeBasin => Puzzle::SmokeBasin,
            PuzzleArg::Origami => Puzzle::Origami,
            PuzzleArg::Polymer => Puzzle::Polymer,
            PuzzleArg::Chiton => Puzzle::Chiton,
            PuzzleArg::PacketDecoder => Puzzle::PacketDecoder,
            PuzzleArg::TrickShot => Puzzle::TrickShot,
            PuzzleArg::Snailfish => Puzzle::Snailfish,
            PuzzleArg::TrenchMap => Puzzle::TrenchMap,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum SnailCommands {
    /// Add numbers left to right; prints the reduced sum and its magnitude
    Add {
        /// Numbers such as [[1,2],3]
        #[arg(required = true)]
        numbers: Vec<String>,
    },

    /// Magnitude of one number as written
    Magnitude {
        number: String,
    },

    /// Fully reduce one number
    Reduce {
        number: String,
    },

    /// Show a number as a tree
    Tree {
        number: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
