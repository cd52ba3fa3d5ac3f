//! Misplaced-run heuristic for the best-first solver.

use std::collections::{BTreeMap, BTreeSet};

use crate::puzzle::{Color, State};

/// Estimates the number of pours still needed to sort `state`.
///
/// Every maximal same-colored run counts one for its color. A color that
/// forms the bottom run of at least one tube already has a home, so one of
/// its runs is free. The estimate is the sum over all colors.
///
/// This is a cost-biasing term, not a proven lower bound: it is not known to
/// be admissible, so the best-first solver's answers are short but not
/// guaranteed optimal.
pub fn misplaced_runs(state: &State) -> u32 {
    let mut runs: BTreeMap<Color, u32> = BTreeMap::new();
    let mut floored: BTreeSet<Color> = BTreeSet::new();

    for tube in state.tubes() {
        for (k, (color, _)) in tube.runs().enumerate() {
            if k == 0 {
                floored.insert(color);
            }
            *runs.entry(color).or_insert(0) += 1;
        }
    }

    runs.iter()
        .map(|(color, &count)| {
            if floored.contains(color) {
                count - 1
            } else {
                count
            }
        })
        .sum()
}
