//! Pour simulation and move-list replay.

use log::trace;

use crate::error::{Result, SolverError};
use crate::moves::check_pour;
use crate::puzzle::{Game, Move, State};

/// Apply `mv` to `state`, returning the successor state.
///
/// The move is assumed legal and is not re-validated. The top run of the
/// source is poured until it is exhausted or the destination is full; if
/// nothing fits, the result equals the input.
pub fn apply_move(state: &State, mv: Move, capacity: usize) -> State {
    let mut next = state.clone();

    let source = state.tube(mv.source);
    let Some(color) = source.top() else {
        return next;
    };
    let space = capacity.saturating_sub(state.tube(mv.destination).len());
    let poured = source.top_run_length().min(space);

    if poured > 0 {
        next.tube_mut(mv.source).pop_units(poured);
        next.tube_mut(mv.destination).push_units(color, poured);
    }
    next
}

/// Replay `moves` from `state`, checking each against the pour rules.
pub fn replay<G: Game + ?Sized>(game: &G, state: &State, moves: &[Move]) -> Result<State> {
    game.validate_state(state)?;
    let capacity = game.tube_capacity();

    let mut current = state.clone();
    for (index, &mv) in moves.iter().enumerate() {
        check_pour(&current, mv, capacity)
            .map_err(|reason| SolverError::InvalidMove { index, mv, reason })?;
        current = apply_move(&current, mv, capacity);
        trace!("replayed move {} ({})", index, mv);
    }
    Ok(current)
}

/// Does replaying `moves` from `state` end in a victorious state?
pub fn verify_solution<G: Game + ?Sized>(game: &G, state: &State, moves: &[Move]) -> bool {
    match replay(game, state, moves) {
        Ok(end) => game.check_victory(&end),
        Err(_) => false,
    }
}
