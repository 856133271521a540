use std::fmt::Debug;

use crate::{coordinates::Square, piece::Piece, r#move::CastlingRight, r#move::Move};

/// The maximum number of moves that can be made on a position without being unmade.
pub const MAX_PLY: usize = 2048;

/// The part of a position that cannot be recovered by inverting a move. One entry is recorded by each `make` and
/// consumed by the matching `unmake`. Both move counters saturate, so they are recorded too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateInfo {
    /// The move that created this entry. Used to detect unmake calls that do not match the last make.
    pub mv: Move,
    /// The piece that was on the destination square before the move.
    pub captured: Option<Piece>,
    pub castling_rights: CastlingRight,
    pub en_passant_square: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

/// A stack of `StateInfo` indexed by ply.
///
/// This structure stores the state from previous moves to enable move undoing. It uses a fixed-size array to avoid
/// heap allocations during search.
///
/// # Panics
/// Pushing on a full history or popping an empty one panics: either means make and unmake calls are not paired.
#[derive(Clone)]
pub struct History {
    states: [StateInfo; MAX_PLY],
    count: usize,
}

impl Default for History {
    fn default() -> Self {
        Self { states: [StateInfo::default(); MAX_PLY], count: 0 }
    }
}

impl History {
    /// Adds a state on top of the history.
    pub fn push(&mut self, state: StateInfo) {
        assert!(self.count < MAX_PLY, "The history is full ({MAX_PLY} plies)");

        self.states[self.count] = state;
        self.count += 1;
    }

    /// Removes and returns the most recent state.
    pub fn pop(&mut self) -> StateInfo {
        assert!(self.count > 0, "Cannot unmake a move: the history is empty");

        self.count -= 1;
        self.states[self.count]
    }

    /// Returns the most recent state without removing it.
    pub fn last(&self) -> Option<&StateInfo> {
        self.as_slice().last()
    }

    /// Returns the number of recorded states, which is the number of plies made on the position.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the live entries, oldest first.
    pub fn as_slice(&self) -> &[StateInfo] {
        &self.states[..self.count]
    }
}

/// Only the live entries take part in comparisons; slots above the top of the stack are stale.
impl PartialEq for History {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for History {}

impl Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(mv: Move, halfmove_clock: u16) -> StateInfo {
        StateInfo { mv, halfmove_clock, ..StateInfo::default() }
    }

    #[test]
    fn test_push_and_pop() {
        let mut history = History::default();
        let first = state(Move::new(Square::G1, Square::F3), 0);
        let second = state(Move::new(Square::G8, Square::F6), 1);

        history.push(first);
        history.push(second);
        assert_eq!(history.len(), 2);
        assert_eq!(history.last(), Some(&second));

        assert_eq!(history.pop(), second);
        assert_eq!(history.pop(), first);
        assert!(history.is_empty());
    }

    #[test]
    fn test_pop_empty_history_panics() {
        let result = std::panic::catch_unwind(|| {
            let mut history = History::default();
            history.pop();
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_push_full_history_panics() {
        let result = std::panic::catch_unwind(|| {
            let mut history = History::default();
            for _ in 0..=MAX_PLY {
                history.push(StateInfo::default());
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_equality_ignores_stale_entries() {
        let mut a = History::default();
        let b = History::default();

        a.push(state(Move::new(Square::E2, Square::E3), 4));
        a.pop();

        assert_eq!(a, b);
    }
}
