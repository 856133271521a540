use crate::r#move::Move;

/// The maximum number of moves in a position. No legal chess position has more than 218.
pub const MAX_MOVES: usize = 256;

/// Structure to store a list of chess moves without heap allocations.
///
/// # Panics
/// Pushing on a full list panics.
#[derive(Debug, Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    count: usize,
}

impl Default for MoveList {
    fn default() -> Self {
        Self { moves: [Move::default(); MAX_MOVES], count: 0 }
    }
}

impl MoveList {
    /// Adds a move to the list.
    pub fn push(&mut self, mv: Move) {
        assert!(self.count < MAX_MOVES, "The move list is full");

        self.moves[self.count] = mv;
        self.count += 1;
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Checks if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of moves in the list.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns whether the list holds the move.
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.count]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Move> for MoveList {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut list = MoveList::default();
        for mv in iter {
            list.push(mv);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::Square;

    #[test]
    fn test_move_list_push() {
        let mut list = MoveList::default();
        assert!(list.is_empty());

        let mv = Move::new(Square::E2, Square::E3);
        list.push(mv);
        assert_eq!(list.len(), 1);
        assert!(!list.is_empty());
        assert!(list.contains(mv));
        assert!(!list.contains(Move::new(Square::E2, Square::E4)));
    }

    #[test]
    fn test_move_list_iter_preserves_order() {
        let moves = [Move::new(Square::A2, Square::A3), Move::new_double_pawn_push(Square::B2, Square::B4)];
        let list: MoveList = moves.iter().copied().collect();

        assert_eq!(list.iter().copied().collect::<Vec<_>>(), moves.to_vec());

        let mut list = list;
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_move_list_full_panics() {
        let result = std::panic::catch_unwind(|| {
            let mut list = MoveList::default();
            for _ in 0..=MAX_MOVES {
                list.push(Move::new(Square::A1, Square::A2));
            }
        });
        assert!(result.is_err());
    }
}
