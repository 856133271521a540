pub mod attacks;
pub mod generation;
pub mod move_list;

use crate::{coordinates::Square, piece::Color, position::Position};

use move_list::MoveList;

/// The rules of the game as seen by the legality filter: which moves a position offers, and which squares a side
/// attacks.
pub trait Rules {
    /// Appends every pseudo-legal move of the side to move to `list`. Moves that leave the mover's king in check are
    /// allowed.
    fn generate_pseudo_legal_moves(&self, position: &Position, list: &mut MoveList);

    /// Returns whether a piece of color `by` attacks `square`. Must not modify anything.
    fn is_square_attacked(&self, position: &Position, square: Square, by: Color) -> bool;
}

/// The standard chess rules, backed by the attack tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRules;

impl Rules for StandardRules {
    fn generate_pseudo_legal_moves(&self, position: &Position, list: &mut MoveList) {
        generation::generate_moves(position, list);
    }

    fn is_square_attacked(&self, position: &Position, square: Square, by: Color) -> bool {
        attacks::is_square_attacked(position, square, by)
    }
}

/// Generates the legal moves of the side to move.
///
/// Each pseudo-legal move is made, kept if the mover's king is not attacked, then unmade. The position is left as it
/// was.
pub fn generate_legal_moves(position: &mut Position, list: &mut MoveList) {
    let mut pseudo_legal = MoveList::default();
    StandardRules.generate_pseudo_legal_moves(position, &mut pseudo_legal);

    let color = position.side_to_move();
    for mv in pseudo_legal.iter().copied() {
        position.make(mv);
        if !StandardRules.is_square_attacked(position, position.king_square(color), !color) {
            list.push(mv);
        }
        position.unmake(mv);
    }
}
