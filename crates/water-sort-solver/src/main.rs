//! CLI entry point for the water sort solver.
//!
//! Usage:
//!   water-sort-solver solve <puzzle.json> [options]
//!   water-sort-solver solve --stdin [options]
//!   water-sort-solver generate --colors <n> --empty <n> --capacity <n> [--seed <n>]
//!   water-sort-solver verify <puzzle.json> --moves "0>2,1>0"
//!
//! Solve options:
//!   --algorithm <name>      backtrack | best-first (default: best-first)
//!   --timeout <seconds>     Maximum search time (default: unbounded)
//!   --max-expansions <n>    Maximum expanded states (default: unbounded)
//!   --max-states <n>        Maximum stored states before failing (default: unbounded)

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, error};
use serde::Serialize;

use water_sort_solver::{
    generate, replay, Game, Move, PuzzleConfig, SearchStatus, Solver, SolverConfig, SolverError,
    SolverResult,
};

#[derive(Parser)]
#[command(name = "water-sort-solver")]
#[command(about = "Backtracking and best-first solvers for the water sort tube puzzle")]
#[command(version)]
struct Cli {
    /// Log search progress (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Algorithm {
    /// Depth-first backtracking, first solution found
    Backtrack,
    /// Best-first search on moves plus misplaced runs
    BestFirst,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a sequence of pours that sorts the puzzle
    Solve {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Search algorithm
        #[arg(long, value_enum, default_value_t = Algorithm::BestFirst)]
        algorithm: Algorithm,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Maximum number of states to expand
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Maximum number of states held in memory
        #[arg(long)]
        max_states: Option<usize>,
    },

    /// Print a randomly shuffled puzzle as JSON
    Generate {
        /// Number of colors (one full tube each)
        #[arg(long)]
        colors: usize,

        /// Number of extra empty tubes
        #[arg(long, default_value = "2")]
        empty: usize,

        /// Units per tube
        #[arg(long, default_value = "4")]
        capacity: usize,

        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Replay a move list and report whether it sorts the puzzle
    Verify {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Comma-separated moves, e.g. "0>2,1>0"
        #[arg(long, value_delimiter = ',')]
        moves: Vec<Move>,
    },
}

/// Output format for a solve run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    algorithm: Algorithm,
    solved: bool,
    status: SearchStatus,
    budget_expired: bool,
    moves: Vec<Move>,
    move_count: usize,
    states_expanded: usize,
    states_generated: usize,
    time_elapsed_ms: u64,
}

/// Output format for a verify run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOutput {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    move_count: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Run a command, returning whether it succeeded in the puzzle sense
/// (solved, or moves verified).
fn run(command: Commands) -> Result<bool, SolverError> {
    match command {
        Commands::Solve {
            file,
            stdin,
            algorithm,
            timeout,
            max_expansions,
            max_states,
        } => {
            let puzzle = read_puzzle(file, stdin)?;

            let config = SolverConfig {
                max_expansions,
                timeout: timeout.map(Duration::from_secs),
                max_stored_states: max_states,
            };
            debug!("solving with {:?} and {:?}", algorithm, config);

            let solver = Solver::with_config(&puzzle, config);
            let result = match algorithm {
                Algorithm::Backtrack => solver.solve(puzzle.initial_state())?,
                Algorithm::BestFirst => solver.optimal_solve(puzzle.initial_state())?,
            };

            let solved = result.solved;
            let output = format_result(puzzle.id.clone(), algorithm, result);
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(solved)
        }

        Commands::Generate {
            colors,
            empty,
            capacity,
            seed,
        } => {
            let puzzle = generate(colors, empty, capacity, seed)?;
            println!("{}", serde_json::to_string_pretty(&puzzle)?);
            Ok(true)
        }

        Commands::Verify { file, stdin, moves } => {
            let puzzle = read_puzzle(file, stdin)?;

            let output = match replay(&puzzle, puzzle.initial_state(), &moves) {
                Ok(end) if puzzle.check_victory(&end) => VerifyOutput {
                    valid: true,
                    reason: None,
                    move_count: moves.len(),
                },
                Ok(_) => VerifyOutput {
                    valid: false,
                    reason: Some("puzzle is not sorted after the last move".to_string()),
                    move_count: moves.len(),
                },
                Err(e @ SolverError::InvalidMove { .. }) => VerifyOutput {
                    valid: false,
                    reason: Some(e.to_string()),
                    move_count: moves.len(),
                },
                Err(e) => return Err(e),
            };

            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(output.valid)
        }
    }
}

fn read_puzzle(file: Option<PathBuf>, stdin: bool) -> Result<PuzzleConfig, SolverError> {
    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path).map_err(|source| SolverError::PuzzleRead { path, source })?
    } else {
        return Err(SolverError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "must provide either a file path or --stdin",
        )));
    };

    PuzzleConfig::from_json(&json_content)
}

fn format_result(id: Option<String>, algorithm: Algorithm, result: SolverResult) -> SolveOutput {
    SolveOutput {
        id,
        algorithm,
        solved: result.solved,
        status: result.status,
        budget_expired: result.budget_expired,
        move_count: result.moves.len(),
        moves: result.moves,
        states_expanded: result.states_expanded,
        states_generated: result.states_generated,
        time_elapsed_ms: result.time_elapsed_ms,
    }
}
