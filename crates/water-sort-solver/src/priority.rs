//! Move prioritizer: ranks candidate pours and caps the branching factor.
//!
//! The cap makes the search incomplete on purpose. A solution whose next step
//! is not among the top-ranked moves of some state can be missed; in exchange
//! each expansion stays cheap enough for full-size puzzles.

use crate::pruning::is_candidate;
use crate::puzzle::State;

/// Score table for ranking candidate moves. Higher scores are explored first;
/// every rule is evaluated independently and the results are summed.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveWeights {
    /// Matching colors and the pour fills the destination exactly.
    pub complete_fill: i32,
    /// Matching colors and the destination ends above `near_fill_ratio` of capacity.
    pub near_fill: i32,
    /// Fraction of capacity the destination must exceed for `near_fill`.
    pub near_fill_ratio: f64,
    /// The source consists of its top run only, so the run leaves nothing beneath it.
    pub drains_source: i32,
    /// Non-empty destination with a matching top color.
    pub joins_matching: i32,
    /// Empty destination and a full single-color source.
    pub full_into_empty: i32,
    /// Empty destination and any other source.
    pub opens_empty: i32,
    /// Per unit transferred.
    pub per_unit: i32,
    /// Single-color source, full or not.
    pub pure_source: i32,
}

impl Default for MoveWeights {
    fn default() -> Self {
        Self {
            complete_fill: 1000,
            near_fill: 500,
            near_fill_ratio: 0.75,
            drains_source: 300,
            joins_matching: 200,
            full_into_empty: 10,
            opens_empty: 150,
            per_unit: 10,
            pure_source: 100,
        }
    }
}

/// A candidate pour with its priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedMove {
    pub from: usize,
    pub to: usize,
    pub score: i32,
}

/// Score a single candidate pour. The pour must be legal.
pub fn score_move(state: &State, from_idx: usize, to_idx: usize, weights: &MoveWeights) -> i32 {
    let capacity = state.capacity();
    let from = state.bottle(from_idx);
    let to = state.bottle(to_idx);

    let (from_color, from_count) = from.top_run();
    let can_pour = from_count.min(capacity.saturating_sub(to.len()));
    let matching = to.top().is_some() && to.top() == from_color;

    let mut score = 0;

    if matching {
        let total = to.len() + can_pour;
        if total == capacity {
            score += weights.complete_fill;
        } else if total as f64 > capacity as f64 * weights.near_fill_ratio {
            score += weights.near_fill;
        }
    }

    if from.len() == from_count {
        score += weights.drains_source;
    }

    if matching {
        score += weights.joins_matching;
    }

    if to.is_empty() {
        if from.is_single_color() && from.len() == capacity {
            score += weights.full_into_empty;
        } else {
            score += weights.opens_empty;
        }
    }

    score += can_pour as i32 * weights.per_unit;

    if from.is_single_color() {
        score += weights.pure_source;
    }

    score
}

/// All legal, useful pours of `state`, best first, truncated to `limit`.
///
/// Ties keep a fixed order (higher source index, then higher destination index
/// first) so the search is reproducible.
pub fn ranked_moves(state: &State, weights: &MoveWeights, limit: usize) -> Vec<RankedMove> {
    let capacity = state.capacity();
    let count = state.bottles().len();
    let mut moves = Vec::new();

    for from in 0..count {
        let source = state.bottle(from);
        if source.is_empty() || source.is_complete(capacity) {
            continue;
        }
        for to in 0..count {
            if !is_candidate(state, from, to) {
                continue;
            }
            moves.push(RankedMove {
                from,
                to,
                score: score_move(state, from, to, weights),
            });
        }
    }

    moves.sort_unstable_by(|a, b| {
        (b.score, b.from, b.to).cmp(&(a.score, a.from, a.to))
    });
    moves.truncate(limit);
    moves
}
