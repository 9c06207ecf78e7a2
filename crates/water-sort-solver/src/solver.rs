//! Bounded best-first search over puzzle states.
//!
//! The frontier is ordered by `f = g + h` where `g` counts pours taken and `h`
//! is [`heuristic`]. The heuristic is not admissible, so this behaves as a
//! greedy best-first search: solutions are good, not necessarily shortest.
//!
//! A state is marked visited the first time it is generated and is never queued
//! again, even if a cheaper path to it turns up later. This gives up optimality
//! for speed and is intentional.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashSet};
use std::time::{Duration, Instant};

use ordered_float::OrderedFloat;

use crate::heuristic::heuristic;
use crate::priority::{ranked_moves, MoveWeights};
use crate::puzzle::{Bottle, Color, Fingerprint, Move, State, DEFAULT_CAPACITY};

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum number of node expansions
    pub max_steps: usize,
    /// Maximum wall-clock time to search
    pub timeout: Duration,
    /// Maximum candidate moves explored per expansion
    pub max_branching: usize,
    /// Move ranking weights
    pub weights: MoveWeights,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_steps: 500_000,
            timeout: Duration::from_secs(300),
            max_branching: 15,
            weights: MoveWeights::default(),
        }
    }
}

impl SolverConfig {
    /// Default configuration with the two budgets replaced.
    pub fn with_budget(max_steps: usize, timeout: Duration) -> Self {
        Self {
            max_steps,
            timeout,
            ..Self::default()
        }
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped from the frontier
    pub steps: usize,
    /// Distinct states ever enqueued, the start state included
    pub states_visited: usize,
    /// Largest frontier size observed
    pub max_frontier: usize,
    /// Most complete bottles seen in any expanded state
    pub best_complete: usize,
    pub time_elapsed_ms: u64,
}

/// Result of the solver search
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// Pours from the initial state to a solved state, or `None` when no
    /// solution was found within the budget.
    pub solution: Option<Vec<Move>>,
    pub stats: SearchStats,
}

impl SolverResult {
    pub fn solved(&self) -> bool {
        self.solution.is_some()
    }
}

/// One edge of the search tree: the move taken and the edge that led to its source.
#[derive(Debug, Clone, Copy)]
struct Trail {
    parent: Option<usize>,
    mv: Move,
}

/// A pending state on the frontier.
///
/// `BinaryHeap` is a max-heap, so the ordering is reversed: lower `f` is
/// greater, then lower `g`, then earlier insertion.
#[derive(Debug, Clone)]
struct FrontierNode {
    f: OrderedFloat<f64>,
    g: usize,
    seq: usize,
    state: State,
    /// Index into the trail arena, `None` for the start state.
    trail: Option<usize>,
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierNode {}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.g.cmp(&self.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Follow trail links back to the start, returning moves in play order.
fn collect_path(trails: &[Trail], last: Option<usize>) -> Vec<Move> {
    let mut path = Vec::new();
    let mut current = last;
    while let Some(idx) = current {
        path.push(trails[idx].mv);
        current = trails[idx].parent;
    }
    path.reverse();
    path
}

/// Search for a sequence of pours that solves `initial`.
///
/// The frontier and visited set are built fresh for every call. Running out of
/// frontier, steps or time all produce `solution: None`.
pub fn search(initial: &State, config: &SolverConfig) -> SolverResult {
    let start_time = Instant::now();
    let mut stats = SearchStats::default();

    let mut frontier: BinaryHeap<FrontierNode> = BinaryHeap::new();
    let mut visited: HashSet<Fingerprint> = HashSet::new();
    let mut trails: Vec<Trail> = Vec::new();
    let mut seq: usize = 0;

    visited.insert(initial.fingerprint());
    frontier.push(FrontierNode {
        f: OrderedFloat(heuristic(initial)),
        g: 0,
        seq,
        state: initial.clone(),
        trail: None,
    });

    tracing::debug!(
        bottles = initial.bottles().len(),
        capacity = initial.capacity(),
        max_steps = config.max_steps,
        timeout_s = config.timeout.as_secs_f64(),
        "Starting search"
    );

    let solution = loop {
        stats.max_frontier = stats.max_frontier.max(frontier.len());

        // Checked before every expansion so wide frontiers still honor the budget
        if start_time.elapsed() >= config.timeout {
            tracing::debug!(steps = stats.steps, "Search timed out");
            break None;
        }
        if stats.steps >= config.max_steps {
            tracing::debug!(steps = stats.steps, "Step budget exhausted");
            break None;
        }

        let Some(node) = frontier.pop() else {
            tracing::debug!(steps = stats.steps, "Frontier exhausted");
            break None;
        };
        stats.steps += 1;

        if node.state.is_solved() {
            break Some(collect_path(&trails, node.trail));
        }

        stats.best_complete = stats.best_complete.max(node.state.count_complete());

        for ranked in ranked_moves(&node.state, &config.weights, config.max_branching) {
            let (next, count) = node.state.pour(ranked.from, ranked.to);
            if !visited.insert(next.fingerprint()) {
                continue;
            }

            trails.push(Trail {
                parent: node.trail,
                mv: Move::new(ranked.from, ranked.to, count),
            });
            seq += 1;

            let g = node.g + 1;
            let h = heuristic(&next);
            frontier.push(FrontierNode {
                f: OrderedFloat(g as f64 + h),
                g,
                seq,
                state: next,
                trail: Some(trails.len() - 1),
            });
        }

        tracing::trace!(
            step = stats.steps,
            g = node.g,
            f = %node.f,
            frontier = frontier.len(),
            "Expanded node"
        );
    };

    stats.states_visited = visited.len();
    stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;

    if let Some(path) = &solution {
        tracing::debug!(
            moves = path.len(),
            steps = stats.steps,
            states = stats.states_visited,
            elapsed_ms = stats.time_elapsed_ms,
            "Solution found"
        );
    }

    SolverResult { solution, stats }
}

/// Holds one puzzle and runs searches over it.
#[derive(Debug, Clone)]
pub struct Solver {
    initial_state: State,
    color_counts: BTreeMap<Color, usize>,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Solver {
    /// A solver with an empty puzzle of the given bottle capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            initial_state: State::new(capacity, Vec::<Bottle>::new()),
            color_counts: BTreeMap::new(),
        }
    }

    /// A solver that owns `state` as its puzzle.
    pub fn with_state(state: State) -> Self {
        let mut solver = Self::new(state.capacity());
        solver.set_state(state);
        solver
    }

    /// Replace the puzzle with a copy of `bottles`, keeping the capacity.
    pub fn set_puzzle<B>(&mut self, bottles: &[B])
    where
        B: Clone + Into<Bottle>,
    {
        let state = State::new(self.initial_state.capacity(), bottles.iter().cloned());
        self.set_state(state);
    }

    /// Replace the puzzle, capacity included.
    pub fn set_state(&mut self, state: State) {
        self.color_counts = state.color_counts();

        // Not enforced: solvable puzzles hold whole bottles of every color
        let capacity = state.capacity();
        for (color, &count) in &self.color_counts {
            if capacity == 0 || count % capacity != 0 {
                tracing::warn!(?color, count, capacity, "Color total is not a multiple of capacity");
            }
        }

        self.initial_state = state;
    }

    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    /// Units of each color in the current puzzle.
    pub fn color_counts(&self) -> &BTreeMap<Color, usize> {
        &self.color_counts
    }

    /// Search with the given budgets. `None` means no solution was found.
    pub fn solve(&self, max_steps: usize, time_limit: Duration) -> Option<Vec<Move>> {
        self.solve_with(&SolverConfig::with_budget(max_steps, time_limit))
            .solution
    }

    /// Search with a full configuration, returning statistics as well.
    pub fn solve_with(&self, config: &SolverConfig) -> SolverResult {
        search(&self.initial_state, config)
    }
}
