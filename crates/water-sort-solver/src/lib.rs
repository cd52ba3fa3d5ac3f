//! Solver library for the water sort tube puzzle.
//!
//! Given tubes of stacked color units, find a sequence of pours that leaves
//! every tube empty or full of a single color. Two searches share the same
//! move enumeration and pour simulation: an exhaustive depth-first
//! backtracking search and a best-first search guided by a misplaced-run
//! heuristic.

pub mod error;
pub mod generator;
pub mod heuristic;
pub mod moves;
pub mod puzzle;
pub mod solver;
pub mod transition;

// Re-export main types
pub use error::{Result, SolverError};
pub use generator::generate;
pub use heuristic::misplaced_runs;
pub use moves::{check_pour, legal_moves, MoveList};
pub use puzzle::{is_sorted, Color, Game, Move, PuzzleConfig, State, Tube};
pub use solver::{SearchStatus, Solver, SolverConfig, SolverResult};
pub use transition::{apply_move, replay, verify_solution};
