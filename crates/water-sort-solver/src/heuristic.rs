//! Remaining-cost estimate used to order the search frontier.
//!
//! The estimate is not admissible. It only biases best-first order, so found
//! solutions are short in practice but not guaranteed minimal.

use std::collections::BTreeMap;

use crate::puzzle::{Color, State};

/// Cost added for every bottle beyond the first that holds a given color.
pub const FRAGMENTATION_PENALTY: f64 = 2.0;

/// Cost added for every non-empty bottle that is not yet complete.
pub const INCOMPLETE_BOTTLE_PENALTY: f64 = 0.5;

/// Estimate how far `state` is from being solved. Pure function of the state.
pub fn heuristic(state: &State) -> f64 {
    let capacity = state.capacity();
    let mut h = 0.0;

    // Bottle indices holding each color
    let mut color_bottles: BTreeMap<Color, Vec<usize>> = BTreeMap::new();
    for (idx, bottle) in state.bottles().iter().enumerate() {
        for &color in &Color::ALL {
            if bottle.contains(color) {
                color_bottles.entry(color).or_default().push(idx);
            }
        }
    }

    for (&color, indices) in &color_bottles {
        h += (indices.len() - 1) as f64 * FRAGMENTATION_PENALTY;

        for &idx in indices {
            let bottle = state.bottle(idx);
            if bottle.is_complete(capacity) || bottle.top() == Some(color) {
                continue;
            }
            // buried color: everything above it has to move first
            h += bottle.units_above(color) as f64;
        }
    }

    let incomplete = state
        .bottles()
        .iter()
        .filter(|b| !b.is_empty() && !b.is_complete(capacity))
        .count();
    h += incomplete as f64 * INCOMPLETE_BOTTLE_PENALTY;

    h
}
