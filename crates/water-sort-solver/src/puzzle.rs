//! Puzzle representation: colors, bottles, states and moves.
//!
//! A bottle is a stack of color units (index 0 is the bottom). A state is the
//! ordered collection of bottles plus the shared capacity. States are never
//! mutated once built: `pour` returns a fresh copy, so states held by the
//! frontier, the visited set and callers never alias.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::PuzzleError;

/// Capacity used by the reference puzzle configuration.
pub const DEFAULT_CAPACITY: usize = 4;

/// Unit color. Absence of a unit is expressed with `Option<Color>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Orange,
    Purple,
    Cyan,
    Yellow,
}

impl Color {
    /// The full palette, in declaration order.
    pub const ALL: [Color; 7] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Orange,
        Color::Purple,
        Color::Cyan,
        Color::Yellow,
    ];

    /// Single-letter form used for text output.
    pub fn to_char(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Blue => 'B',
            Color::Green => 'G',
            Color::Orange => 'O',
            Color::Purple => 'P',
            Color::Cyan => 'C',
            Color::Yellow => 'Y',
        }
    }

    /// Non-zero byte code; zero is reserved as the bottle separator in fingerprints.
    fn code(self) -> u8 {
        self as u8 + 1
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A capacity-bounded stack of units, bottom first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bottle(SmallVec<[Color; 8]>);

impl Bottle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Units from bottom to top.
    pub fn units(&self) -> &[Color] {
        &self.0
    }

    pub fn top(&self) -> Option<Color> {
        self.0.last().copied()
    }

    pub fn bottom(&self) -> Option<Color> {
        self.0.first().copied()
    }

    /// Color on top and how many consecutive units of it sit at the top.
    /// An empty bottle yields `(None, 0)`.
    pub fn top_run(&self) -> (Option<Color>, usize) {
        match self.top() {
            None => (None, 0),
            Some(color) => {
                let count = self.0.iter().rev().take_while(|&&c| c == color).count();
                (Some(color), count)
            }
        }
    }

    /// Non-empty and every unit shares one color (need not be full).
    pub fn is_single_color(&self) -> bool {
        match self.bottom() {
            Some(first) => self.0.iter().all(|&c| c == first),
            None => false,
        }
    }

    /// Exactly full and single-colored.
    pub fn is_complete(&self, capacity: usize) -> bool {
        self.len() == capacity && self.is_single_color()
    }

    pub fn is_full(&self, capacity: usize) -> bool {
        self.len() >= capacity
    }

    pub fn contains(&self, color: Color) -> bool {
        self.0.contains(&color)
    }

    /// Number of units stacked above the topmost unit of `color`.
    /// Returns the whole length when `color` is absent.
    pub fn units_above(&self, color: Color) -> usize {
        self.0.iter().rev().take_while(|&&c| c != color).count()
    }

    fn pop(&mut self) -> Option<Color> {
        self.0.pop()
    }

    fn push(&mut self, color: Color) {
        self.0.push(color);
    }
}

impl From<Vec<Color>> for Bottle {
    fn from(units: Vec<Color>) -> Self {
        Self(SmallVec::from_vec(units))
    }
}

impl From<&[Color]> for Bottle {
    fn from(units: &[Color]) -> Self {
        Self(SmallVec::from_slice(units))
    }
}

impl FromIterator<Color> for Bottle {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Bottle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in &self.0 {
            write!(f, "{}", color)?;
        }
        Ok(())
    }
}

/// A pour that was performed: `count` units went from bottle `from` to bottle `to`.
///
/// Moves are only produced by pouring; they serialize as `{"from", "to", "count"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    from: usize,
    to: usize,
    count: usize,
}

impl Move {
    pub(crate) fn new(from: usize, to: usize, count: usize) -> Self {
        Self { from, to, count }
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.count)
    }
}

/// Canonical, lossless encoding of a full state, used to deduplicate the search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(SmallVec<[u8; 96]>);

/// A complete puzzle state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct State {
    capacity: usize,
    bottles: Vec<Bottle>,
}

/// Puzzle layout carrying an explicit capacity.
#[derive(Deserialize)]
struct SizedPuzzle {
    capacity: usize,
    bottles: Vec<Bottle>,
}

impl State {
    /// Build a state without validation. Bottles longer than `capacity` are a
    /// caller error; use [`State::validate`] at input boundaries.
    pub fn new<I, B>(capacity: usize, bottles: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bottle>,
    {
        Self {
            capacity,
            bottles: bottles.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a puzzle from JSON and validate its shape.
    ///
    /// Accepts `{"capacity": 4, "bottles": [["red", "blue"], []]}` or a bare
    /// bottle list, which uses [`DEFAULT_CAPACITY`].
    pub fn from_json(text: &str) -> Result<Self, PuzzleError> {
        // Dispatch on shape so decoding errors keep the offending value
        let value: serde_json::Value = serde_json::from_str(text)?;
        let state = if value.is_array() {
            Self {
                capacity: DEFAULT_CAPACITY,
                bottles: serde_json::from_value(value)?,
            }
        } else {
            let SizedPuzzle { capacity, bottles } = serde_json::from_value(value)?;
            Self { capacity, bottles }
        };
        state.validate()?;
        Ok(state)
    }

    /// Check the capacity bound of every bottle.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        if self.capacity == 0 {
            return Err(PuzzleError::ZeroCapacity);
        }
        for (idx, bottle) in self.bottles.iter().enumerate() {
            if bottle.len() > self.capacity {
                return Err(PuzzleError::Overfilled {
                    bottle: idx,
                    len: bottle.len(),
                    capacity: self.capacity,
                });
            }
        }
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn bottles(&self) -> &[Bottle] {
        &self.bottles
    }

    pub fn bottle(&self, index: usize) -> &Bottle {
        &self.bottles[index]
    }

    /// Every bottle is either empty or complete.
    pub fn is_solved(&self) -> bool {
        self.bottles
            .iter()
            .all(|b| b.is_empty() || b.is_complete(self.capacity))
    }

    /// Number of complete bottles.
    pub fn count_complete(&self) -> usize {
        self.bottles
            .iter()
            .filter(|b| b.is_complete(self.capacity))
            .count()
    }

    /// Total units of each color across all bottles.
    pub fn color_counts(&self) -> BTreeMap<Color, usize> {
        let mut counts = BTreeMap::new();
        for bottle in &self.bottles {
            for &color in bottle.units() {
                *counts.entry(color).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Copy of this state with the top run of `from` poured into `to`, and the
    /// number of units moved.
    ///
    /// The whole top run moves, limited by the free space in `to`. The pour must
    /// have been checked with [`crate::pruning::is_valid_pour`]; an empty source
    /// or `from == to` moves nothing.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn pour(&self, from: usize, to: usize) -> (State, usize) {
        let mut next = self.clone();
        let moved = next.pour_in_place(from, to);
        (next, moved)
    }

    fn pour_in_place(&mut self, from: usize, to: usize) -> usize {
        if from == to {
            return 0;
        }
        let Some(color) = self.bottles[from].top() else {
            return 0;
        };

        let mut moved = 0;
        while self.bottles[from].top() == Some(color) && self.bottles[to].len() < self.capacity {
            self.bottles[from].pop();
            self.bottles[to].push(color);
            moved += 1;
        }
        moved
    }

    /// Order-sensitive byte encoding: each bottle's color codes followed by a zero.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut bytes = SmallVec::with_capacity(self.bottles.len() * (self.capacity + 1));
        for bottle in &self.bottles {
            bytes.extend(bottle.units().iter().map(|c| c.code()));
            bytes.push(0);
        }
        Fingerprint(bytes)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, bottle) in self.bottles.iter().enumerate() {
            write!(f, "{:>3}: {}", idx, bottle)?;
            for _ in bottle.len()..self.capacity {
                write!(f, ".")?;
            }
            if bottle.is_complete(self.capacity) {
                write!(f, " *")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Color::{Blue as B, Green as G, Red as R};

    fn state(capacity: usize, bottles: Vec<Vec<Color>>) -> State {
        State::new(capacity, bottles)
    }

    #[test]
    fn test_top_run() {
        assert_eq!(Bottle::new().top_run(), (None, 0));
        assert_eq!(Bottle::from(vec![R, B, B]).top_run(), (Some(B), 2));
        assert_eq!(Bottle::from(vec![G, G, G]).top_run(), (Some(G), 3));
        assert_eq!(Bottle::from(vec![B, R]).top_run(), (Some(R), 1));
    }

    #[test]
    fn test_bottle_predicates() {
        let full = Bottle::from(vec![R, R, R, R]);
        let partial = Bottle::from(vec![R, R]);
        let mixed = Bottle::from(vec![R, B, R, R]);

        assert!(full.is_complete(4));
        assert!(full.is_single_color());
        assert!(!partial.is_complete(4));
        assert!(partial.is_single_color());
        assert!(!mixed.is_complete(4));
        assert!(!mixed.is_single_color());
        assert!(!Bottle::new().is_single_color());
        assert!(!Bottle::new().is_complete(4));
    }

    #[test]
    fn test_units_above() {
        let bottle = Bottle::from(vec![R, B, G, G]);
        assert_eq!(bottle.units_above(B), 2);
        assert_eq!(bottle.units_above(R), 3);
        assert_eq!(bottle.units_above(G), 0);
    }

    #[test]
    fn test_is_solved() {
        assert!(state(4, vec![vec![R, R, R, R], vec![], vec![]]).is_solved());
        assert!(state(2, vec![vec![R, R], vec![B, B], vec![]]).is_solved());
        assert!(!state(4, vec![vec![R, R, R], vec![R], vec![]]).is_solved());
        assert!(!state(2, vec![vec![R, B], vec![B, R], vec![]]).is_solved());
        assert!(state(4, Vec::<Vec<Color>>::new()).is_solved());
    }

    #[test]
    fn test_pour_moves_whole_run() {
        let start = state(4, vec![vec![R, B, B], vec![G, B], vec![]]);
        let (next, moved) = start.pour(0, 2);
        assert_eq!(moved, 2);
        assert_eq!(next.bottle(0).units(), &[R]);
        assert_eq!(next.bottle(2).units(), &[B, B]);
        // source state untouched
        assert_eq!(start.bottle(0).units(), &[R, B, B]);
    }

    #[test]
    fn test_pour_limited_by_capacity() {
        let start = state(4, vec![vec![B, B, B], vec![R, R, B]]);
        let (next, moved) = start.pour(0, 1);
        assert_eq!(moved, 1);
        assert_eq!(next.bottle(0).units(), &[B, B]);
        assert_eq!(next.bottle(1).units(), &[R, R, B, B]);
    }

    #[test]
    fn test_pour_is_deterministic() {
        let start = state(4, vec![vec![R, G, G], vec![G], vec![]]);
        assert_eq!(start.pour(0, 1), start.pour(0, 1));
    }

    #[test]
    fn test_pour_degenerate_moves_nothing() {
        let start = state(4, vec![vec![], vec![R]]);
        assert_eq!(start.pour(0, 1).1, 0);
        assert_eq!(start.pour(1, 1).1, 0);
        assert_eq!(start.pour(1, 1).0, start);
    }

    #[test]
    fn test_fingerprint_is_lossless() {
        let a = state(4, vec![vec![R], vec![R, R]]);
        let b = state(4, vec![vec![R, R], vec![R]]);
        let c = state(4, vec![vec![R, R, R], vec![]]);
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_ne!(b.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
    }

    #[test]
    fn test_color_counts() {
        let s = state(4, vec![vec![R, B], vec![B, B, G], vec![]]);
        let counts = s.color_counts();
        assert_eq!(counts[&R], 1);
        assert_eq!(counts[&B], 3);
        assert_eq!(counts[&G], 1);
        assert_eq!(counts.get(&Color::Cyan), None);
    }

    #[test]
    fn test_from_json_layouts() {
        let sized = State::from_json(r#"{"capacity": 2, "bottles": [["red", "blue"], []]}"#)
            .unwrap();
        assert_eq!(sized.capacity(), 2);
        assert_eq!(sized.bottle(0).units(), &[R, B]);
        assert!(sized.bottle(1).is_empty());

        let bare = State::from_json(r#"[["green"], ["green", "green", "green"]]"#).unwrap();
        assert_eq!(bare.capacity(), DEFAULT_CAPACITY);
        assert_eq!(bare.bottles().len(), 2);
    }

    #[test]
    fn test_from_json_rejects_bad_shapes() {
        let overfilled = State::from_json(r#"{"capacity": 1, "bottles": [["red", "red"]]}"#);
        assert!(matches!(
            overfilled,
            Err(PuzzleError::Overfilled { bottle: 0, len: 2, capacity: 1 })
        ));

        let zero = State::from_json(r#"{"capacity": 0, "bottles": []}"#);
        assert!(matches!(zero, Err(PuzzleError::ZeroCapacity)));

        assert!(matches!(
            State::from_json(r#"[["magenta"]]"#),
            Err(PuzzleError::Json(_))
        ));
    }

    #[test]
    fn test_from_json_error_names_unknown_color() {
        for text in [
            r#"[["red"], ["magenta"]]"#,
            r#"{"capacity": 2, "bottles": [["red"], ["magenta"]]}"#,
        ] {
            let err = State::from_json(text).unwrap_err();
            assert!(err.to_string().contains("magenta"), "{}", err);
        }

        let err = State::from_json(r#"{"bottles": [["red"]]}"#).unwrap_err();
        assert!(err.to_string().contains("capacity"), "{}", err);
    }

    #[test]
    fn test_display() {
        let s = state(2, vec![vec![R, R], vec![B], vec![]]);
        assert_eq!(s.to_string(), "  0: RR *\n  1: B.\n  2: ..\n");
    }
}
