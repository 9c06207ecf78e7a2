//! Move-list replay.
//!
//! Callers that present a solution replay it from the initial puzzle with
//! [`apply_move`] or [`execute`]; both reproduce exactly what the search's
//! pour did, and both reject moves that do not fit the state they meet.

use crate::error::PuzzleError;
use crate::pruning::is_valid_pour;
use crate::puzzle::{Move, State};

/// Result status of replaying a move list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Every move applied and the final state is solved
    Solved,
    /// Every move applied but the final state is not solved
    Unsolved,
    /// The move at this position could not be applied
    Rejected(usize),
}

/// Result of replaying a move list
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    /// Initial state followed by the state after each applied move
    pub states: Vec<State>,
}

impl ExecutionResult {
    pub fn solved(&self) -> bool {
        self.status == ExecutionStatus::Solved
    }

    /// Last state reached.
    pub fn final_state(&self) -> &State {
        // states always holds at least the initial state
        &self.states[self.states.len() - 1]
    }
}

/// Apply one move to `state`, returning the new state.
///
/// The pour must be legal and must transfer exactly `mv.count()` units,
/// which holds for every move the solver produced from this state.
pub fn apply_move(state: &State, mv: &Move) -> Result<State, PuzzleError> {
    let (from, to) = (mv.from(), mv.to());
    let bottles = state.bottles().len();
    if from >= bottles || to >= bottles {
        return Err(PuzzleError::MoveOutOfRange { from, to, bottles });
    }
    if from == to || !is_valid_pour(state.bottle(from), state.bottle(to), state.capacity()) {
        return Err(PuzzleError::IllegalPour { from, to });
    }

    let (next, moved) = state.pour(from, to);
    if moved != mv.count() {
        return Err(PuzzleError::IllegalPour { from, to });
    }
    Ok(next)
}

/// Replay `moves` from `initial`, stopping at the first move that does not apply.
pub fn execute(initial: &State, moves: &[Move]) -> ExecutionResult {
    let mut states = Vec::with_capacity(moves.len() + 1);
    states.push(initial.clone());

    for (idx, mv) in moves.iter().enumerate() {
        let current = &states[states.len() - 1];
        match apply_move(current, mv) {
            Ok(next) => states.push(next),
            Err(err) => {
                tracing::debug!(index = idx, %err, "Replay rejected move");
                return ExecutionResult {
                    status: ExecutionStatus::Rejected(idx),
                    states,
                };
            }
        }
    }

    let status = if states[states.len() - 1].is_solved() {
        ExecutionStatus::Solved
    } else {
        ExecutionStatus::Unsolved
    };
    ExecutionResult { status, states }
}

/// Simple verification: does the move list solve the puzzle?
pub fn verify_solution(initial: &State, moves: &[Move]) -> bool {
    execute(initial, moves).solved()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Color::{Blue as B, Red as R};

    fn swap_puzzle() -> State {
        State::new(2, vec![vec![R, B], vec![B, R], vec![]])
    }

    fn swap_solution() -> Vec<Move> {
        vec![Move::new(0, 2, 1), Move::new(1, 0, 1), Move::new(1, 2, 1)]
    }

    #[test]
    fn test_apply_move_matches_pour() {
        let state = swap_puzzle();
        let next = apply_move(&state, &Move::new(0, 2, 1)).unwrap();
        assert_eq!(next, state.pour(0, 2).0);
        assert_eq!(next.bottle(0).units(), &[R]);
        assert_eq!(next.bottle(2).units(), &[B]);
    }

    #[test]
    fn test_apply_move_rejections() {
        let state = swap_puzzle();
        assert!(matches!(
            apply_move(&state, &Move::new(0, 7, 1)),
            Err(PuzzleError::MoveOutOfRange { bottles: 3, .. })
        ));
        // destination full
        assert!(matches!(
            apply_move(&state, &Move::new(0, 1, 1)),
            Err(PuzzleError::IllegalPour { from: 0, to: 1 })
        ));
        // count disagrees with what the pour would move
        assert!(matches!(
            apply_move(&state, &Move::new(0, 2, 2)),
            Err(PuzzleError::IllegalPour { .. })
        ));
        assert!(apply_move(&state, &Move::new(2, 0, 0)).is_err());
    }

    #[test]
    fn test_execute_solution() {
        let result = execute(&swap_puzzle(), &swap_solution());
        assert!(result.solved());
        assert_eq!(result.states.len(), 4);
        assert!(result.final_state().is_solved());
        assert!(verify_solution(&swap_puzzle(), &swap_solution()));
    }

    #[test]
    fn test_execute_partial_and_rejected() {
        let moves = swap_solution();
        let partial = execute(&swap_puzzle(), &moves[..2]);
        assert_eq!(partial.status, ExecutionStatus::Unsolved);

        let bad = vec![moves[0], moves[0]];
        let rejected = execute(&swap_puzzle(), &bad);
        assert_eq!(rejected.status, ExecutionStatus::Rejected(1));
        assert_eq!(rejected.states.len(), 2);
        assert!(!verify_solution(&swap_puzzle(), &bad));
    }

    #[test]
    fn test_empty_move_list() {
        let solved = State::new(2, vec![vec![R, R], vec![]]);
        assert!(verify_solution(&solved, &[]));
        assert_eq!(execute(&swap_puzzle(), &[]).status, ExecutionStatus::Unsolved);
    }
}
