//! Search front end: configuration, results and the [`Solver`] handle.
//!
//! Two algorithms are available:
//!
//! - [`Solver::solve`] runs an exhaustive depth-first backtracking search and
//!   returns the first solution it finds;
//! - [`Solver::optimal_solve`] runs a best-first search ordered by moves made
//!   plus the [misplaced-run estimate](crate::heuristic::misplaced_runs),
//!   which usually yields a much shorter solution.
//!
//! Every call builds its own search context (visited set, stack or frontier),
//! so a `Solver` can be reused for any number of independent searches.

mod backtrack;
mod best_first;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};
use crate::puzzle::{Game, Move, State};

/// Limits applied to a single search
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Stop after expanding this many states
    pub max_expansions: Option<usize>,
    /// Stop after this much wall-clock time
    pub timeout: Option<Duration>,
    /// Fail with [`SolverError::SearchResourceExhausted`] once the search
    /// holds more than this many states
    pub max_stored_states: Option<usize>,
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Solved,
    Exhausted,
}

/// Result of a search
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub solved: bool,
    pub status: SearchStatus,
    /// Moves from the initial state to a sorted state; empty unless solved
    pub moves: Vec<Move>,
    /// The search stopped on its expansion or time budget rather than
    /// running out of states
    pub budget_expired: bool,
    pub states_expanded: usize,
    pub states_generated: usize,
    pub time_elapsed_ms: u64,
}

impl SolverResult {
    /// The `(solved, moves)` pair
    pub fn into_solution(self) -> (bool, Vec<Move>) {
        (self.solved, self.moves)
    }

    fn solved(moves: Vec<Move>, stats: &SearchStats) -> Self {
        Self::finish(SearchStatus::Solved, moves, false, stats)
    }

    fn exhausted(stats: &SearchStats) -> Self {
        Self::finish(SearchStatus::Exhausted, Vec::new(), false, stats)
    }

    fn budget_expired(stats: &SearchStats) -> Self {
        Self::finish(SearchStatus::Exhausted, Vec::new(), true, stats)
    }

    fn finish(status: SearchStatus, moves: Vec<Move>, budget_expired: bool, stats: &SearchStats) -> Self {
        Self {
            solved: status == SearchStatus::Solved,
            status,
            moves,
            budget_expired,
            states_expanded: stats.expanded,
            states_generated: stats.generated,
            time_elapsed_ms: stats.start.elapsed().as_millis() as u64,
        }
    }
}

/// Counters and limits shared by both algorithms
struct SearchStats {
    start: Instant,
    deadline: Option<Instant>,
    max_expansions: Option<usize>,
    max_stored_states: Option<usize>,
    expanded: usize,
    generated: usize,
}

impl SearchStats {
    fn new(config: &SolverConfig) -> Self {
        let start = Instant::now();
        Self {
            start,
            deadline: config.timeout.map(|t| start + t),
            max_expansions: config.max_expansions,
            max_stored_states: config.max_stored_states,
            expanded: 0,
            generated: 0,
        }
    }

    /// Has the expansion or time budget run out?
    fn budget_expired(&self) -> bool {
        if let Some(max) = self.max_expansions {
            if self.expanded >= max {
                return true;
            }
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    fn check_storage(&self, stored_states: usize) -> Result<()> {
        match self.max_stored_states {
            Some(limit) if stored_states > limit => Err(SolverError::SearchResourceExhausted {
                stored_states,
                limit,
            }),
            _ => Ok(()),
        }
    }
}

/// Solver bound to a game's rules.
#[derive(Debug, Clone)]
pub struct Solver<'a, G: Game + ?Sized> {
    game: &'a G,
    config: SolverConfig,
}

impl<'a, G: Game + ?Sized> Solver<'a, G> {
    pub fn new(game: &'a G) -> Self {
        Self::with_config(game, SolverConfig::default())
    }

    pub fn with_config(game: &'a G, config: SolverConfig) -> Self {
        Self { game, config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Find any solution with depth-first backtracking.
    ///
    /// Fails with [`SolverError::InvalidState`] if `initial` does not satisfy
    /// the game's structural rules.
    pub fn solve(&self, initial: &State) -> Result<SolverResult> {
        self.game.validate_state(initial)?;
        backtrack::search(self.game, initial, &self.config)
    }

    /// Find a short solution with best-first search.
    pub fn optimal_solve(&self, initial: &State) -> Result<SolverResult> {
        self.game.validate_state(initial)?;
        best_first::search(self.game, initial, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::puzzle::PuzzleConfig;
    use crate::transition::verify_solution;

    fn puzzle(capacity: usize, colors: usize, empty: usize, tubes: &[Vec<u8>]) -> PuzzleConfig {
        PuzzleConfig::new(capacity, colors, empty, State::from_units(tubes))
    }

    fn both(solver: &Solver<PuzzleConfig>, state: &State) -> [SolverResult; 2] {
        [
            solver.solve(state).unwrap(),
            solver.optimal_solve(state).unwrap(),
        ]
    }

    #[test]
    fn test_already_solved() {
        let p = puzzle(2, 1, 1, &[vec![1, 1], vec![]]);
        for result in both(&Solver::new(&p), p.initial_state()) {
            assert!(result.solved);
            assert_eq!(result.status, SearchStatus::Solved);
            assert!(result.moves.is_empty());
        }
    }

    #[test]
    fn test_no_legal_moves_is_unsolved() {
        let p = puzzle(2, 2, 0, &[vec![1, 2], vec![2, 1]]);
        for result in both(&Solver::new(&p), p.initial_state()) {
            assert!(!result.solved);
            assert_eq!(result.status, SearchStatus::Exhausted);
            assert!(!result.budget_expired);
            assert!(result.moves.is_empty());
        }
    }

    #[test]
    fn test_small_puzzle_both_solvers() {
        let p = puzzle(2, 2, 1, &[vec![1, 2], vec![2, 1], vec![]]);
        let solver = Solver::new(&p);
        let [dfs, best] = both(&solver, p.initial_state());

        assert!(dfs.solved);
        assert!(best.solved);
        assert!(verify_solution(&p, p.initial_state(), &dfs.moves));
        assert!(verify_solution(&p, p.initial_state(), &best.moves));
        assert_eq!(
            dfs.moves,
            vec![Move::new(0, 2), Move::new(1, 0), Move::new(1, 2)]
        );
        assert!(best.moves.len() <= dfs.moves.len());
    }

    #[test]
    fn test_into_solution() {
        let p = puzzle(2, 2, 1, &[vec![1, 2], vec![2, 1], vec![]]);
        let (solved, moves) = Solver::new(&p)
            .solve(p.initial_state())
            .unwrap()
            .into_solution();
        assert!(solved);
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn test_solver_is_reusable() {
        let p = puzzle(3, 3, 2, &[vec![1, 2, 3], vec![3, 1, 2], vec![2, 3, 1], vec![], vec![]]);
        let solver = Solver::new(&p);
        let first = solver.solve(p.initial_state()).unwrap();
        let second = solver.solve(p.initial_state()).unwrap();
        assert_eq!(first.moves, second.moves);
        assert_eq!(first.states_expanded, second.states_expanded);

        let first = solver.optimal_solve(p.initial_state()).unwrap();
        let second = solver.optimal_solve(p.initial_state()).unwrap();
        assert_eq!(first.moves, second.moves);
    }

    #[test]
    fn test_invalid_state_is_rejected() {
        let p = puzzle(2, 2, 1, &[vec![1, 2], vec![2, 1], vec![]]);
        let solver = Solver::new(&p);
        let bad = State::from_units(&[vec![1, 2, 1], vec![2], vec![]]);
        assert!(matches!(solver.solve(&bad), Err(SolverError::InvalidState { .. })));
        assert!(matches!(
            solver.optimal_solve(&bad),
            Err(SolverError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_expansion_budget() {
        let p = puzzle(2, 2, 1, &[vec![1, 2], vec![2, 1], vec![]]);
        let config = SolverConfig {
            max_expansions: Some(1),
            ..Default::default()
        };
        for result in both(&Solver::with_config(&p, config), p.initial_state()) {
            assert!(!result.solved);
            assert!(result.budget_expired);
            assert_eq!(result.status, SearchStatus::Exhausted);
            assert!(result.moves.is_empty());
        }
    }

    #[test]
    fn test_time_budget() {
        let p = puzzle(2, 2, 1, &[vec![1, 2], vec![2, 1], vec![]]);
        let config = SolverConfig {
            timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        for result in both(&Solver::with_config(&p, config), p.initial_state()) {
            assert!(!result.solved);
            assert!(result.budget_expired);
        }
    }

    #[test]
    fn test_budget_does_not_hide_solved_start() {
        let p = puzzle(2, 1, 1, &[vec![1, 1], vec![]]);
        let config = SolverConfig {
            max_expansions: Some(0),
            ..Default::default()
        };
        for result in both(&Solver::with_config(&p, config), p.initial_state()) {
            assert!(result.solved);
        }
    }

    #[test]
    fn test_stored_state_limit() {
        let p = puzzle(2, 2, 1, &[vec![1, 2], vec![2, 1], vec![]]);
        let config = SolverConfig {
            max_stored_states: Some(2),
            ..Default::default()
        };
        let solver = Solver::with_config(&p, config);
        assert!(matches!(
            solver.solve(p.initial_state()),
            Err(SolverError::SearchResourceExhausted { limit: 2, .. })
        ));
        assert!(matches!(
            solver.optimal_solve(p.initial_state()),
            Err(SolverError::SearchResourceExhausted { limit: 2, .. })
        ));
    }

    #[test]
    fn test_generated_puzzles_agree() {
        for seed in 0..20 {
            let p = generate(3, 2, 3, seed).unwrap();
            let solver = Solver::new(&p);
            let [dfs, best] = both(&solver, p.initial_state());

            // Both searches are exhaustive over the same move graph.
            assert_eq!(dfs.solved, best.solved, "seed {}", seed);
            if dfs.solved {
                assert!(verify_solution(&p, p.initial_state(), &dfs.moves), "seed {}", seed);
                assert!(verify_solution(&p, p.initial_state(), &best.moves), "seed {}", seed);
            }
        }
    }
}
