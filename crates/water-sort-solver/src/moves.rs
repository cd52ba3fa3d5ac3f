//! Legal-move enumeration for the search.
//!
//! Besides the physical pour rules, the enumerator prunes moves that can never
//! make progress, so the solvers skip large, redundant parts of the state
//! space:
//!
//! - a complete tube (full, one color) is never a source;
//! - a single-color tube is never poured into an empty tube;
//! - of several empty destinations, only the first is offered.

use smallvec::SmallVec;

use crate::puzzle::{Move, State};

/// Moves generated for one state. Most states have only a handful.
pub type MoveList = SmallVec<[Move; 16]>;

/// Enumerate the legal moves of `state`, sources then destinations in
/// ascending tube order.
pub fn legal_moves(state: &State, capacity: usize) -> MoveList {
    let mut moves = MoveList::new();

    for (i, source) in state.tubes().iter().enumerate() {
        let uniform = source.is_uniform();
        // Empty or already complete
        if source.is_empty() || (uniform && source.len() == capacity) {
            continue;
        }

        let mut offered_empty = false;
        for (j, destination) in state.tubes().iter().enumerate() {
            if j == i {
                continue;
            }
            if destination.is_empty() {
                if !uniform && !offered_empty {
                    moves.push(Move::new(i, j));
                    offered_empty = true;
                }
            } else if source.top() == destination.top() && destination.len() < capacity {
                moves.push(Move::new(i, j));
            }
        }
    }

    moves
}

/// Check a move against the physical pour rules only.
///
/// Used to validate replayed move lists; unlike [`legal_moves`] it accepts any
/// empty destination and single-color sources.
pub fn check_pour(state: &State, mv: Move, capacity: usize) -> Result<(), String> {
    let tubes = state.tube_count();
    if mv.source >= tubes || mv.destination >= tubes {
        return Err(format!("tube index out of range (puzzle has {} tubes)", tubes));
    }
    if mv.source == mv.destination {
        return Err("source and destination are the same tube".to_string());
    }

    let source = state.tube(mv.source);
    let destination = state.tube(mv.destination);
    if source.is_empty() {
        return Err(format!("tube {} is empty", mv.source));
    }
    if destination.len() >= capacity {
        return Err(format!("tube {} is full", mv.destination));
    }
    if !destination.is_empty() && destination.top() != source.top() {
        return Err(format!(
            "top colors differ ({:?} onto {:?})",
            source.top(),
            destination.top()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moves_of(tubes: &[Vec<u8>], capacity: usize) -> Vec<(usize, usize)> {
        legal_moves(&State::from_units(tubes), capacity)
            .into_iter()
            .map(Into::into)
            .collect()
    }

    #[test]
    fn test_single_empty_destination_per_source() {
        let moves = moves_of(&[vec![1, 2], vec![2, 1], vec![], vec![]], 2);
        assert_eq!(moves, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_matching_tops_and_capacity() {
        // Tubes 0 and 2 both top with 2, but tube 2 is full.
        let moves = moves_of(&[vec![1, 2], vec![1], vec![1, 2, 2]], 3);
        assert_eq!(moves, vec![(2, 0)]);
    }

    #[test]
    fn test_uniform_tube_not_poured_into_empty() {
        let moves = moves_of(&[vec![1], vec![2, 1], vec![]], 2);
        // Tube 0 is uniform, so it may not go to the empty tube.
        assert_eq!(moves, vec![(1, 0), (1, 2)]);
    }

    #[test]
    fn test_complete_tube_is_never_a_source() {
        let moves = moves_of(&[vec![1, 1], vec![1], vec![]], 2);
        assert_eq!(moves, Vec::<(usize, usize)>::new());
    }

    #[test]
    fn test_no_moves_when_tops_differ_and_no_empty_tube() {
        assert!(moves_of(&[vec![1, 2], vec![2, 1]], 2).is_empty());
    }

    #[test]
    fn test_enumerated_moves_respect_invariants() {
        let state = State::from_units(&[vec![1, 2, 3], vec![3, 2, 1], vec![2, 1, 3], vec![], vec![]]);
        let capacity = 3;
        let moves = legal_moves(&state, capacity);
        assert!(!moves.is_empty());

        let mut empty_targets_per_source = std::collections::HashMap::new();
        for mv in &moves {
            assert!(!state.tube(mv.source).is_empty());
            assert!(state.tube(mv.destination).len() < capacity);
            assert_ne!(mv.source, mv.destination);
            if state.tube(mv.destination).is_empty() {
                *empty_targets_per_source.entry(mv.source).or_insert(0) += 1;
            }
            assert!(check_pour(&state, *mv, capacity).is_ok());
        }
        assert!(empty_targets_per_source.values().all(|&n| n == 1));
    }

    #[test]
    fn test_check_pour() {
        let state = State::from_units(&[vec![1, 2], vec![2], vec![1, 1], vec![]]);
        assert!(check_pour(&state, Move::new(0, 1), 2).is_ok());
        assert!(check_pour(&state, Move::new(0, 3), 2).is_ok());
        assert!(check_pour(&state, Move::new(3, 0), 2).is_err());
        assert!(check_pour(&state, Move::new(1, 2), 2).is_err());
        assert!(check_pour(&state, Move::new(0, 0), 2).is_err());
        assert!(check_pour(&state, Move::new(0, 9), 2).is_err());
        assert!(check_pour(&state, Move::new(1, 0), 2).is_err());
    }
}
