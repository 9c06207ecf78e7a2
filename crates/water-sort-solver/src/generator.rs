//! Random puzzle generation.
//!
//! Generation knows nothing about the search: it deals shuffled units into
//! bottles and then asks a [`Solver`] whether the result can be solved within a
//! small budget, discarding puzzles that cannot.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::puzzle::{Bottle, Color, State, DEFAULT_CAPACITY};
use crate::solver::{Solver, SolverConfig};

/// Shape of generated puzzles.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Total number of bottles
    pub bottles: usize,
    /// Units per bottle
    pub capacity: usize,
    /// Bottles' worth of space left free; the first this-many bottles are dealt half full
    pub spare_bottles: usize,
    /// Number of palette colors to draw from
    pub colors: usize,
    /// Budget used to decide whether a puzzle is solvable
    pub filter: SolverConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            bottles: 19,
            capacity: DEFAULT_CAPACITY,
            spare_bottles: 2,
            colors: Color::ALL.len(),
            filter: SolverConfig::with_budget(10_000, Duration::from_secs(3)),
        }
    }
}

/// Deal a random puzzle.
///
/// Each of `bottles - spare_bottles` color blocks is a full bottle of one color
/// drawn from the palette, so a color may appear in several blocks. Units are
/// shuffled and dealt half a bottle into each of the first `spare_bottles`
/// bottles, then a full bottle into each following one until none are left.
pub fn generate_puzzle<R: Rng + ?Sized>(rng: &mut R, config: &GeneratorConfig) -> State {
    let palette = &Color::ALL[..config.colors.clamp(1, Color::ALL.len())];
    let blocks = config.bottles.saturating_sub(config.spare_bottles);

    let mut units: Vec<Color> = Vec::with_capacity(blocks * config.capacity);
    for _ in 0..blocks {
        let color = palette[rng.gen_range(0..palette.len())];
        units.extend(std::iter::repeat(color).take(config.capacity));
    }
    units.shuffle(rng);

    let mut remaining = units.as_slice();
    let bottles: Vec<Bottle> = (0..config.bottles)
        .map(|idx| {
            let want = if idx < config.spare_bottles {
                config.capacity / 2
            } else {
                config.capacity
            };
            let (dealt, rest) = remaining.split_at(want.min(remaining.len()));
            remaining = rest;
            Bottle::from(dealt)
        })
        .collect();

    State::new(config.capacity, bottles)
}

/// Generate `attempts` puzzles and keep the ones solvable within `config.filter`.
pub fn generate_valid_puzzles<R: Rng + ?Sized>(
    rng: &mut R,
    config: &GeneratorConfig,
    attempts: usize,
) -> Vec<State> {
    let mut solver = Solver::new(config.capacity);
    let mut valid = Vec::new();

    for attempt in 0..attempts {
        let puzzle = generate_puzzle(rng, config);
        solver.set_state(puzzle);
        let result = solver.solve_with(&config.filter);
        if !result.solved() {
            tracing::debug!(attempt, steps = result.stats.steps, "Discarding puzzle");
            continue;
        }
        valid.push(solver.initial_state().clone());
    }

    tracing::debug!(attempts, kept = valid.len(), "Generation finished");
    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_reference_layout() {
        let mut rng = SmallRng::seed_from_u64(514514);
        let config = GeneratorConfig::default();
        let puzzle = generate_puzzle(&mut rng, &config);

        let lens: Vec<usize> = puzzle.bottles().iter().map(|b| b.len()).collect();
        assert_eq!(lens.len(), 19);
        assert_eq!(&lens[..2], &[2, 2]);
        assert!(lens[2..18].iter().all(|&l| l == 4));
        assert_eq!(lens[18], 0);
        assert!(puzzle.validate().is_ok());
    }

    #[test]
    fn test_color_totals_are_whole_bottles() {
        let mut rng = SmallRng::seed_from_u64(7);
        let config = GeneratorConfig::default();
        for _ in 0..20 {
            let puzzle = generate_puzzle(&mut rng, &config);
            let counts = puzzle.color_counts();
            assert_eq!(counts.values().sum::<usize>(), 17 * 4);
            assert!(counts.values().all(|&c| c % 4 == 0));
        }
    }

    #[test]
    fn test_palette_restriction() {
        let mut rng = SmallRng::seed_from_u64(3);
        let config = GeneratorConfig {
            colors: 2,
            ..GeneratorConfig::default()
        };
        let puzzle = generate_puzzle(&mut rng, &config);
        assert!(puzzle
            .color_counts()
            .keys()
            .all(|c| *c == Color::Red || *c == Color::Blue));
    }

    #[test]
    fn test_same_seed_same_puzzle() {
        let config = GeneratorConfig::default();
        let a = generate_puzzle(&mut SmallRng::seed_from_u64(42), &config);
        let b = generate_puzzle(&mut SmallRng::seed_from_u64(42), &config);
        assert_eq!(a, b);
    }
}
