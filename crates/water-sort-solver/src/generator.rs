//! Seeded random puzzle generation.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Result, SolverError};
use crate::puzzle::{Color, PuzzleConfig, State, Tube};

/// Generate a puzzle with `color_count` full tubes of shuffled units followed
/// by `empty_tube_count` empty tubes.
///
/// Every color gets exactly `capacity` units. The same seed always produces
/// the same puzzle. The result is not guaranteed to be solvable.
pub fn generate(
    color_count: usize,
    empty_tube_count: usize,
    capacity: usize,
    seed: u64,
) -> Result<PuzzleConfig> {
    if color_count == 0 || capacity == 0 {
        return Err(SolverError::invalid_state(
            "a puzzle needs at least one color and a positive capacity",
        ));
    }
    if color_count > Color::MAX as usize {
        return Err(SolverError::invalid_state(format!(
            "at most {} colors are supported, requested {}",
            Color::MAX,
            color_count
        )));
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut units: Vec<Color> = (1..=color_count as Color)
        .flat_map(|color| std::iter::repeat(color).take(capacity))
        .collect();
    units.shuffle(&mut rng);

    let tubes: Vec<Tube> = units
        .chunks(capacity)
        .map(Tube::from)
        .chain(std::iter::repeat_with(Tube::new).take(empty_tube_count))
        .collect();

    let mut puzzle = PuzzleConfig::new(capacity, color_count, empty_tube_count, State::new(tubes));
    puzzle.id = Some(format!("generated-{}x{}-{}-{}", color_count, capacity, empty_tube_count, seed));
    Ok(puzzle)
}
