//! CLI entry point for the water sort solver.
//!
//! Usage:
//!   water-sort-solver solve <puzzle.json> [options]
//!   water-sort-solver solve --stdin [options]
//!   water-sort-solver generate [options]
//!
//! Solve options:
//!   --max-steps <n>       Maximum node expansions (default: 500000)
//!   --timeout <seconds>   Maximum search time (default: 300)
//!   --max-branching <n>   Moves explored per expansion (default: 15)
//!   --steps               Print a step-by-step replay to stderr
//!
//! Generate options:
//!   --count <n>           Puzzles to generate before filtering (default: 100)
//!   --seed <n>            Seed for reproducible output
//!   --bottles, --capacity, --spare, --colors   Puzzle shape
//!   --filter-steps, --filter-timeout           Solvability budget

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use water_sort_solver::{
    execute, generate_valid_puzzles, GeneratorConfig, Move, Solver, SolverConfig, SolverResult,
    State,
};

#[derive(Parser)]
#[command(name = "water-sort-solver")]
#[command(about = "Bounded best-first solver for water sort puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle and print the moves as JSON
    Solve {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Maximum node expansions
        #[arg(long, default_value = "500000")]
        max_steps: usize,

        /// Maximum search time in seconds
        #[arg(long, default_value = "300")]
        timeout: u64,

        /// Maximum candidate moves explored per expansion
        #[arg(long, default_value = "15")]
        max_branching: usize,

        /// Print every intermediate state to stderr
        #[arg(long)]
        steps: bool,
    },
    /// Generate random puzzles and print the solvable ones, one JSON object per line
    Generate {
        /// Number of puzzles to generate before filtering
        #[arg(long, default_value = "100")]
        count: usize,

        /// Seed for the random generator
        #[arg(long)]
        seed: Option<u64>,

        /// Total number of bottles
        #[arg(long, default_value = "19")]
        bottles: usize,

        /// Units per bottle
        #[arg(long, default_value = "4")]
        capacity: usize,

        /// Bottles' worth of free space
        #[arg(long, default_value = "2")]
        spare: usize,

        /// Number of palette colors to use (1-7)
        #[arg(long, default_value = "7")]
        colors: usize,

        /// Node expansions allowed when checking solvability
        #[arg(long, default_value = "10000")]
        filter_steps: usize,

        /// Seconds allowed when checking solvability
        #[arg(long, default_value = "3")]
        filter_timeout: u64,
    },
}

/// Output format for a solve run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<Move>>,
    steps: usize,
    states_visited: usize,
    max_frontier: usize,
    time_elapsed_ms: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            max_steps,
            timeout,
            max_branching,
            steps,
        } => {
            let json_content = if stdin {
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read puzzle from stdin")?;
                buffer
            } else if let Some(path) = file {
                fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read puzzle file {}", path.display()))?
            } else {
                bail!("Must provide either a file path or --stdin");
            };

            let puzzle = State::from_json(&json_content).context("Failed to load puzzle")?;

            let config = SolverConfig {
                max_steps,
                timeout: Duration::from_secs(timeout),
                max_branching,
                ..SolverConfig::default()
            };

            let solver = Solver::with_state(puzzle);
            let result = solver.solve_with(&config);

            if steps {
                print_walkthrough(solver.initial_state(), &result);
            }

            println!("{}", serde_json::to_string_pretty(&format_result(&result))?);

            if !result.solved() {
                std::process::exit(1);
            }
        }
        Commands::Generate {
            count,
            seed,
            bottles,
            capacity,
            spare,
            colors,
            filter_steps,
            filter_timeout,
        } => {
            if capacity == 0 {
                bail!("--capacity must be at least 1");
            }

            let config = GeneratorConfig {
                bottles,
                capacity,
                spare_bottles: spare,
                colors,
                filter: SolverConfig::with_budget(filter_steps, Duration::from_secs(filter_timeout)),
            };
            let mut rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_entropy(),
            };

            for puzzle in generate_valid_puzzles(&mut rng, &config, count) {
                println!("{}", serde_json::to_string(&puzzle)?);
            }
        }
    }

    Ok(())
}

fn format_result(result: &SolverResult) -> SolveOutput {
    SolveOutput {
        solved: result.solved(),
        moves: result.solution.clone(),
        steps: result.stats.steps,
        states_visited: result.stats.states_visited,
        max_frontier: result.stats.max_frontier,
        time_elapsed_ms: result.stats.time_elapsed_ms,
    }
}

/// Replay the solution and print each state to stderr.
fn print_walkthrough(initial: &State, result: &SolverResult) {
    let Some(moves) = &result.solution else {
        eprintln!("No solution found after {} steps", result.stats.steps);
        return;
    };

    eprintln!("Solution in {} moves", moves.len());
    eprintln!("Initial state:\n{}", initial);

    let replay = execute(initial, moves);
    for (idx, (mv, state)) in moves.iter().zip(replay.states.iter().skip(1)).enumerate() {
        eprintln!("Step {}: {}\n{}", idx + 1, mv, state);
    }
}
