//! Depth-first backtracking search.
//!
//! The search keeps an explicit stack of frames instead of recursing, so deep
//! puzzles cannot overflow the call stack. `path[k]` is always the move that
//! led from `stack[k]` to `stack[k + 1]`; popping a frame pops its move.

use std::collections::HashSet;

use log::{debug, trace};

use super::{SearchStats, SolverConfig, SolverResult};
use crate::error::Result;
use crate::moves::{legal_moves, MoveList};
use crate::puzzle::{Game, Move, State};
use crate::transition::apply_move;

/// A state on the current path and the moves not yet tried from it
struct Frame {
    state: State,
    moves: MoveList,
    next: usize,
}

impl Frame {
    fn new(state: State, capacity: usize) -> Self {
        let moves = legal_moves(&state, capacity);
        Self {
            state,
            moves,
            next: 0,
        }
    }

    fn next_move(&mut self) -> Option<Move> {
        let mv = self.moves.get(self.next).copied();
        self.next += 1;
        mv
    }
}

pub(super) fn search<G: Game + ?Sized>(
    game: &G,
    initial: &State,
    config: &SolverConfig,
) -> Result<SolverResult> {
    let mut stats = SearchStats::new(config);
    let capacity = game.tube_capacity();

    if game.check_victory(initial) {
        debug!("backtrack: initial state is already sorted");
        return Ok(SolverResult::solved(Vec::new(), &stats));
    }

    let mut visited: HashSet<State> = HashSet::new();
    visited.insert(initial.clone());

    let mut path: Vec<Move> = Vec::new();
    let mut stack: Vec<Frame> = vec![Frame::new(initial.clone(), capacity)];
    stats.expanded = 1;

    while let Some(frame) = stack.last_mut() {
        let Some(mv) = frame.next_move() else {
            // Dead end: backtrack
            stack.pop();
            path.pop();
            continue;
        };

        let next = apply_move(&frame.state, mv, capacity);
        if visited.contains(&next) {
            continue;
        }
        stats.generated += 1;

        if game.check_victory(&next) {
            path.push(mv);
            debug!(
                "backtrack: solved in {} moves after {} expansions",
                path.len(),
                stats.expanded
            );
            return Ok(SolverResult::solved(path, &stats));
        }

        if stats.budget_expired() {
            debug!("backtrack: budget expired after {} expansions", stats.expanded);
            return Ok(SolverResult::budget_expired(&stats));
        }

        visited.insert(next.clone());
        stats.check_storage(visited.len() + stack.len())?;

        trace!("backtrack: depth {} move {}", path.len() + 1, mv);
        path.push(mv);
        stack.push(Frame::new(next, capacity));
        stats.expanded += 1;
    }

    debug!(
        "backtrack: search space exhausted after {} expansions",
        stats.expanded
    );
    Ok(SolverResult::exhausted(&stats))
}
