//! Error type for the input and replay boundaries.
//!
//! The search itself never fails: "no solution" is a normal outcome and is
//! reported as `None`. These errors only arise when loading puzzles or when a
//! caller replays a move list that does not fit the state it is applied to.

/// Errors raised when loading a puzzle or replaying moves.
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    /// The puzzle text is not valid JSON for either accepted layout.
    #[error("invalid puzzle JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Bottles of capacity zero cannot hold anything.
    #[error("bottle capacity must be at least 1")]
    ZeroCapacity,
    /// A bottle holds more units than the capacity allows.
    #[error("bottle {bottle} holds {len} units, capacity is {capacity}")]
    Overfilled {
        bottle: usize,
        len: usize,
        capacity: usize,
    },
    /// A move refers to a bottle that does not exist.
    #[error("move {from} -> {to} is out of range for {bottles} bottles")]
    MoveOutOfRange {
        from: usize,
        to: usize,
        bottles: usize,
    },
    /// A move is not a physically possible pour in the current state.
    #[error("illegal pour {from} -> {to}")]
    IllegalPour { from: usize, to: usize },
}
