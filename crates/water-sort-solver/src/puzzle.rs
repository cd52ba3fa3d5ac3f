//! Puzzle representation types: tubes, states, moves and the `Game` contract.
//!
//! The JSON shape of [`PuzzleConfig`] is the format read by the CLI and
//! written by the generator.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{Result, SolverError};

/// Color identifier. Colors are small positive integers; `0` is never a color.
pub type Color = u8;

/// Units stored inline before a tube spills to the heap.
const INLINE_UNITS: usize = 8;

/// A single tube, bottom unit first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tube(SmallVec<[Color; INLINE_UNITS]>);

impl Tube {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn units(&self) -> &[Color] {
        &self.0
    }

    /// Color of the top unit, if any
    pub fn top(&self) -> Option<Color> {
        self.0.last().copied()
    }

    /// Length of the maximal run of same-colored units at the top
    pub fn top_run_length(&self) -> usize {
        match self.top() {
            None => 0,
            Some(top) => self.0.iter().rev().take_while(|&&c| c == top).count(),
        }
    }

    /// True if the tube is non-empty and holds exactly one distinct color
    pub fn is_uniform(&self) -> bool {
        match self.0.first() {
            None => false,
            Some(&bottom) => self.0.iter().all(|&c| c == bottom),
        }
    }

    /// True if the tube is full and holds a single color
    pub fn is_complete(&self, capacity: usize) -> bool {
        self.len() == capacity && self.is_uniform()
    }

    /// Maximal uniform runs, bottom to top, as `(color, length)` pairs
    pub fn runs(&self) -> impl Iterator<Item = (Color, usize)> + '_ {
        let mut rest = self.units();
        std::iter::from_fn(move || {
            let (&color, _) = rest.split_first()?;
            let len = rest.iter().take_while(|&&c| c == color).count();
            rest = &rest[len..];
            Some((color, len))
        })
    }

    pub(crate) fn pop_units(&mut self, count: usize) {
        let keep = self.0.len().saturating_sub(count);
        self.0.truncate(keep);
    }

    pub(crate) fn push_units(&mut self, color: Color, count: usize) {
        self.0.extend(std::iter::repeat(color).take(count));
    }
}

impl From<Vec<Color>> for Tube {
    fn from(units: Vec<Color>) -> Self {
        Tube(SmallVec::from_vec(units))
    }
}

impl From<&[Color]> for Tube {
    fn from(units: &[Color]) -> Self {
        Tube(SmallVec::from_slice(units))
    }
}

impl FromIterator<Color> for Tube {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        Tube(iter.into_iter().collect())
    }
}

/// The whole puzzle at one instant: an ordered sequence of tubes.
///
/// Equality and hashing are structural over the ordered tube sequence, so two
/// states with the same tubes in different positions are distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    tubes: Vec<Tube>,
}

impl State {
    pub fn new(tubes: Vec<Tube>) -> Self {
        Self { tubes }
    }

    /// Build a state from plain color lists, bottom unit first.
    pub fn from_units<T: AsRef<[Color]>>(tubes: &[T]) -> Self {
        Self {
            tubes: tubes.iter().map(|t| Tube::from(t.as_ref())).collect(),
        }
    }

    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }

    pub fn tube(&self, index: usize) -> &Tube {
        &self.tubes[index]
    }

    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    /// Number of units of each color across all tubes
    pub fn color_totals(&self) -> BTreeMap<Color, usize> {
        let mut totals = BTreeMap::new();
        for tube in &self.tubes {
            for &color in tube.units() {
                *totals.entry(color).or_insert(0) += 1;
            }
        }
        totals
    }

    pub(crate) fn tube_mut(&mut self, index: usize) -> &mut Tube {
        &mut self.tubes[index]
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tube) in self.tubes.iter().enumerate() {
            write!(f, "{:>3}: [", i)?;
            for (k, color) in tube.units().iter().enumerate() {
                if k > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", color)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

/// A pour from one tube to another. Serialized as `[source, destination]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Move {
    pub source: usize,
    pub destination: usize,
}

impl Move {
    pub fn new(source: usize, destination: usize) -> Self {
        Self {
            source,
            destination,
        }
    }
}

impl From<(usize, usize)> for Move {
    fn from((source, destination): (usize, usize)) -> Self {
        Self::new(source, destination)
    }
}

impl From<Move> for (usize, usize) {
    fn from(mv: Move) -> Self {
        (mv.source, mv.destination)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{}", self.source, self.destination)
    }
}

impl FromStr for Move {
    type Err = String;

    /// Parses `"<source>>destination"`, e.g. `"0>2"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (source, destination) = s
            .trim()
            .split_once('>')
            .ok_or_else(|| format!("expected '<source>><destination>', found '{}'", s))?;
        let source = source
            .trim()
            .parse()
            .map_err(|e| format!("bad source tube '{}': {}", source, e))?;
        let destination = destination
            .trim()
            .parse()
            .map_err(|e| format!("bad destination tube '{}': {}", destination, e))?;
        Ok(Move::new(source, destination))
    }
}

/// The rules collaborator the solvers are written against.
pub trait Game {
    /// Maximum units per tube
    fn tube_capacity(&self) -> usize;

    fn color_count(&self) -> usize;

    fn empty_tube_count(&self) -> usize;

    fn tube_count(&self) -> usize {
        self.color_count() + self.empty_tube_count()
    }

    /// True iff every tube is empty or full with a single color
    fn check_victory(&self, state: &State) -> bool;

    /// Check the structural preconditions the solvers rely on.
    ///
    /// Does not check reachability (e.g. that every color has exactly
    /// `tube_capacity` units).
    fn validate_state(&self, state: &State) -> Result<()> {
        if state.tube_count() != self.tube_count() {
            return Err(SolverError::invalid_state(format!(
                "expected {} tubes ({} colors + {} empty), found {}",
                self.tube_count(),
                self.color_count(),
                self.empty_tube_count(),
                state.tube_count()
            )));
        }

        let capacity = self.tube_capacity();
        if capacity == 0 {
            return Err(SolverError::invalid_state("tube capacity must be positive"));
        }

        let mut colors = BTreeSet::new();
        for (i, tube) in state.tubes().iter().enumerate() {
            if tube.len() > capacity {
                return Err(SolverError::invalid_state(format!(
                    "tube {} holds {} units but capacity is {}",
                    i,
                    tube.len(),
                    capacity
                )));
            }
            if tube.units().contains(&0) {
                return Err(SolverError::invalid_state(format!(
                    "tube {} contains color 0; colors must be positive",
                    i
                )));
            }
            colors.extend(tube.units().iter().copied());
        }

        if colors.len() > self.color_count() {
            return Err(SolverError::invalid_state(format!(
                "found {} distinct colors but the puzzle declares {}",
                colors.len(),
                self.color_count()
            )));
        }

        Ok(())
    }
}

/// True iff every tube is empty or complete at the given capacity
pub fn is_sorted(state: &State, capacity: usize) -> bool {
    state
        .tubes()
        .iter()
        .all(|t| t.is_empty() || t.is_complete(capacity))
}

/// A complete puzzle description, loadable from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub capacity: usize,
    pub color_count: usize,
    pub empty_tube_count: usize,
    pub tubes: State,
}

impl PuzzleConfig {
    pub fn new(capacity: usize, color_count: usize, empty_tube_count: usize, tubes: State) -> Self {
        Self {
            id: None,
            title: None,
            capacity,
            color_count,
            empty_tube_count,
            tubes,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn initial_state(&self) -> &State {
        &self.tubes
    }
}

impl Game for PuzzleConfig {
    fn tube_capacity(&self) -> usize {
        self.capacity
    }

    fn color_count(&self) -> usize {
        self.color_count
    }

    fn empty_tube_count(&self) -> usize {
        self.empty_tube_count
    }

    fn check_victory(&self, state: &State) -> bool {
        is_sorted(state, self.capacity)
    }
}
