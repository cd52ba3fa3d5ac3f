//! Best-first (A*-style) search ordered by `moves so far + misplaced runs`.
//!
//! Nodes live in an arena and refer to their parent by index. The frontier
//! orders entries by priority, then by insertion sequence, so expansion order
//! is fully deterministic.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use log::{debug, trace};

use super::{SearchStats, SolverConfig, SolverResult};
use crate::error::Result;
use crate::heuristic::misplaced_runs;
use crate::moves::legal_moves;
use crate::puzzle::{Game, Move, State};
use crate::transition::apply_move;

/// A search tree node. The root has no parent link.
struct Node {
    /// Moves made from the initial state
    g: u32,
    state: State,
    /// Parent index and the move that produced this node from it
    via: Option<(usize, Move)>,
}

/// Frontier entry: `(priority, insertion sequence, arena index)`, min first
type Entry = Reverse<(u32, u64, usize)>;

pub(super) fn search<G: Game + ?Sized>(
    game: &G,
    initial: &State,
    config: &SolverConfig,
) -> Result<SolverResult> {
    let mut stats = SearchStats::new(config);
    let capacity = game.tube_capacity();

    let mut arena: Vec<Node> = vec![Node {
        g: 0,
        state: initial.clone(),
        via: None,
    }];
    let mut frontier: BinaryHeap<Entry> = BinaryHeap::new();
    let mut sequence: u64 = 0;
    frontier.push(Reverse((misplaced_runs(initial), sequence, 0)));

    let mut visited: HashSet<State> = HashSet::new();

    while let Some(Reverse((priority, _, index))) = frontier.pop() {
        // The same state may be queued more than once before its first expansion.
        if !visited.insert(arena[index].state.clone()) {
            continue;
        }

        if game.check_victory(&arena[index].state) {
            let moves = reconstruct_path(&arena, index);
            debug!(
                "best-first: solved in {} moves after {} expansions",
                moves.len(),
                stats.expanded
            );
            return Ok(SolverResult::solved(moves, &stats));
        }

        if stats.budget_expired() {
            debug!("best-first: budget expired after {} expansions", stats.expanded);
            return Ok(SolverResult::budget_expired(&stats));
        }

        stats.expanded += 1;
        let g = arena[index].g + 1;
        trace!("best-first: expanding node {} (f = {}, g = {})", index, priority, g - 1);

        for mv in legal_moves(&arena[index].state, capacity) {
            let next = apply_move(&arena[index].state, mv, capacity);
            if visited.contains(&next) {
                continue;
            }
            let f = g + misplaced_runs(&next);
            arena.push(Node {
                g,
                state: next,
                via: Some((index, mv)),
            });
            sequence += 1;
            frontier.push(Reverse((f, sequence, arena.len() - 1)));
            stats.generated += 1;
        }

        stats.check_storage(arena.len() + visited.len())?;
    }

    debug!(
        "best-first: frontier exhausted after {} expansions",
        stats.expanded
    );
    Ok(SolverResult::exhausted(&stats))
}

/// Walk parent links from `index` back to the root, returning the moves in
/// root-to-goal order.
fn reconstruct_path(arena: &[Node], mut index: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    while let Some((parent, mv)) = arena[index].via {
        moves.push(mv);
        index = parent;
    }
    moves.reverse();
    moves
}
