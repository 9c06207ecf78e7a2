//! Water sort puzzle solver.
//!
//! This crate searches for a sequence of pours that sorts every bottle into a
//! single full color. The search is a bounded best-first search driven by a
//! pruned, ranked move list and a cheap remaining-cost estimate. Puzzle
//! generation and replay of found solutions are layered on the same public API.

pub mod error;
pub mod executor;
pub mod generator;
pub mod heuristic;
pub mod priority;
pub mod pruning;
pub mod puzzle;
pub mod solver;

// Re-export main types
pub use error::PuzzleError;
pub use executor::{apply_move, execute, verify_solution, ExecutionResult, ExecutionStatus};
pub use generator::{generate_puzzle, generate_valid_puzzles, GeneratorConfig};
pub use heuristic::heuristic;
pub use priority::{ranked_moves, MoveWeights, RankedMove};
pub use pruning::{is_useful_move, is_valid_pour};
pub use puzzle::{Bottle, Color, Fingerprint, Move, State, DEFAULT_CAPACITY};
pub use solver::{search, SearchStats, Solver, SolverConfig, SolverResult};
