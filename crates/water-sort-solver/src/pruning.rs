//! Pour legality and search space pruning rules.
//!
//! `is_valid_pour` describes the physically possible pours. `is_useful_move`
//! rejects legal pours that can never contribute to a solution, which keeps the
//! branching factor small without cutting off any solvable line.

use crate::puzzle::{Bottle, State};

/// A pour is possible when the source has units, the destination has room, and
/// the destination is either empty or shows the same color on top.
pub fn is_valid_pour(from: &Bottle, to: &Bottle, capacity: usize) -> bool {
    if from.is_empty() || to.is_full(capacity) {
        return false;
    }

    match to.top() {
        None => true,
        top => top == from.top(),
    }
}

/// Check whether a legal pour is worth exploring.
pub fn is_useful_move(state: &State, from_idx: usize, to_idx: usize) -> bool {
    let capacity = state.capacity();
    let from = state.bottle(from_idx);
    let to = state.bottle(to_idx);

    // Rule 1: finished bottles are never touched
    if from.is_complete(capacity) || to.is_complete(capacity) {
        return false;
    }

    // Rule 2: moving a full single-color bottle into an empty one changes nothing
    if to.is_empty() && from.is_single_color() && from.len() == capacity {
        return false;
    }

    // Rule 3: two single-color bottles merge only if the merge completes the destination
    if from.is_single_color() && to.is_single_color() && from.top() == to.top() {
        let (_, run) = from.top_run();
        if to.len() + run < capacity {
            return false;
        }
    }

    // Rule 4: don't bury a bottle that is sorted from the bottom up under a foreign color
    if to.len() >= 2 && to.is_single_color() && from.top() != to.bottom() {
        return false;
    }

    true
}

/// Both legal and useful.
pub fn is_candidate(state: &State, from_idx: usize, to_idx: usize) -> bool {
    from_idx != to_idx
        && is_valid_pour(state.bottle(from_idx), state.bottle(to_idx), state.capacity())
        && is_useful_move(state, from_idx, to_idx)
}
