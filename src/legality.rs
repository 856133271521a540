use thiserror::Error;

use crate::{
    coordinates::{square_from_index, Square},
    move_gen::{move_list::MoveList, Rules, StandardRules},
    notation::{parse_coordinate_notation, NotationError},
    piece::PieceType,
    position::Position,
    r#move::Move,
};

/// The reasons a move supplied from outside the engine is refused. A refused move leaves the position untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoveRejection {
    #[error("The square index {0} is outside of the board")]
    OffBoard(u8),

    #[error("There is no piece of the side to move on {0}")]
    NotOwnPiece(Square),

    #[error("The side to move already has a piece on {0}")]
    OwnPieceOnTarget(Square),

    #[error("{from}{to} is not a move in this position")]
    NotPseudoLegal { from: Square, to: Square },

    #[error("The move {from}{to} must specify a promotion piece")]
    PromotionRequired { from: Square, to: Square },

    #[error("The move would leave the king in check")]
    LeavesKingInCheck,
}

/// Errors from applying a move typed in coordinate notation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoveError {
    #[error("{0}")]
    Notation(#[from] NotationError),

    #[error("{0}")]
    Rejected(#[from] MoveRejection),
}

/// A refused move in a sequence of moves, with its position in the sequence.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unable to play {notation} (move {index}): {error}")]
pub struct MoveSequenceError {
    pub index: usize,
    pub notation: String,
    pub error: MoveError,
}

impl Position {
    /// Validates a move coming from an untrusted source and, if it is legal, makes it.
    ///
    /// `from` and `to` are raw square indexes. The move is looked up in the list of pseudo-legal moves, which supplies
    /// its flag, and matched on the promotion piece as well. It is then made speculatively and unmade if it leaves the
    /// mover's king attacked.
    ///
    /// On success the position is left with the move made and the move is returned. On failure the position is
    /// unchanged.
    pub fn attempt_move(&mut self, from: u8, to: u8, promotion: Option<PieceType>) -> Result<Move, MoveRejection> {
        self.attempt_move_with(&StandardRules, from, to, promotion)
    }

    /// Same as `attempt_move`, with the move generation and attack detection supplied by `rules`.
    pub fn attempt_move_with<R: Rules>(
        &mut self,
        rules: &R,
        from: u8,
        to: u8,
        promotion: Option<PieceType>,
    ) -> Result<Move, MoveRejection> {
        let from = square_from_index(from).map_err(|_| MoveRejection::OffBoard(from))?;
        let to = square_from_index(to).map_err(|_| MoveRejection::OffBoard(to))?;

        let color = self.side_to_move();
        if !self[from].is_some_and(|piece| piece.color() == color) {
            return Err(MoveRejection::NotOwnPiece(from));
        }
        if self[to].is_some_and(|piece| piece.color() == color) {
            return Err(MoveRejection::OwnPieceOnTarget(to));
        }

        let mut list = MoveList::default();
        rules.generate_pseudo_legal_moves(self, &mut list);

        let mut candidates = list.iter().filter(|mv| mv.from_square() == from && mv.to_square() == to).peekable();
        if candidates.peek().is_none() {
            return Err(MoveRejection::NotPseudoLegal { from, to });
        }
        let mv = match candidates.find(|mv| mv.promotion() == promotion) {
            Some(mv) => *mv,
            None if promotion.is_none() => return Err(MoveRejection::PromotionRequired { from, to }),
            None => return Err(MoveRejection::NotPseudoLegal { from, to }),
        };

        self.make(mv);
        if rules.is_square_attacked(self, self.king_square(color), !color) {
            self.unmake(mv);
            return Err(MoveRejection::LeavesKingInCheck);
        }

        Ok(mv)
    }

    /// Parses a move in coordinate notation ("e2e4", "e7e8q") and applies it through `attempt_move`.
    pub fn attempt_coordinate_move(&mut self, notation: &str) -> Result<Move, MoveError> {
        let parsed = parse_coordinate_notation(notation)?;
        Ok(self.attempt_move(parsed.from.into(), parsed.to.into(), parsed.promotion)?)
    }

    /// Plays a game record given as a sequence of moves in coordinate notation.
    ///
    /// Either every move is made or none is: when a move is refused, the moves already played are unmade.
    pub fn play_coordinate_moves<S: AsRef<str>>(&mut self, moves: &[S]) -> Result<Vec<Move>, MoveSequenceError> {
        let mut played = Vec::with_capacity(moves.len());

        for (index, notation) in moves.iter().enumerate() {
            match self.attempt_coordinate_move(notation.as_ref()) {
                Ok(mv) => played.push(mv),
                Err(error) => {
                    for mv in played.iter().rev() {
                        self.unmake(*mv);
                    }
                    return Err(MoveSequenceError { index, notation: notation.as_ref().to_string(), error });
                }
            }
        }

        Ok(played)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        piece::{Color, Piece},
        r#move::{CastlingRight, MoveFlag},
    };

    fn play(position: &mut Position, moves: &[&str]) {
        for notation in moves {
            position.attempt_coordinate_move(notation).unwrap();
        }
    }

    #[test]
    fn test_attempt_move_double_pawn_push() {
        let mut position = Position::new();

        let mv = position.attempt_move(Square::E2.into(), Square::E4.into(), None).unwrap();

        assert_eq!(mv.flag(), MoveFlag::DoublePawnPush);
        assert_eq!(position.en_passant_square(), Some(Square::E3));
        assert_eq!(position.halfmove_clock(), 0);

        position.unmake(mv);
        assert_eq!(position.en_passant_square(), None);
        assert_eq!(position, Position::new());
    }

    #[test]
    fn test_attempt_move_rejects_invalid_input_without_mutation() {
        let mut position = Position::new();
        let before = position.clone();

        assert_eq!(position.attempt_move(64, 0, None), Err(MoveRejection::OffBoard(64)));
        assert_eq!(position.attempt_move(12, 200, None), Err(MoveRejection::OffBoard(200)));
        assert_eq!(
            position.attempt_move(Square::E7.into(), Square::E5.into(), None),
            Err(MoveRejection::NotOwnPiece(Square::E7))
        );
        assert_eq!(
            position.attempt_move(Square::E4.into(), Square::E5.into(), None),
            Err(MoveRejection::NotOwnPiece(Square::E4))
        );
        assert_eq!(
            position.attempt_move(Square::A1.into(), Square::A2.into(), None),
            Err(MoveRejection::OwnPieceOnTarget(Square::A2))
        );
        assert_eq!(
            position.attempt_move(Square::E2.into(), Square::E5.into(), None),
            Err(MoveRejection::NotPseudoLegal { from: Square::E2, to: Square::E5 })
        );
        assert_eq!(position, before);
    }

    #[test]
    fn test_attempt_move_castling_requires_a_clear_path() {
        let mut position = Position::new();

        assert_eq!(
            position.attempt_coordinate_move("e1g1"),
            Err(MoveError::Rejected(MoveRejection::OwnPieceOnTarget(Square::G1)))
        );
        assert_eq!(position, Position::new());

        play(&mut position, &["e2e4", "a7a6", "g1f3", "b7b6"]);
        assert_eq!(
            position.attempt_coordinate_move("e1g1"),
            Err(MoveError::Rejected(MoveRejection::NotPseudoLegal { from: Square::E1, to: Square::G1 }))
        );

        play(&mut position, &["f1c4", "c7c6"]);
        let mv = position.attempt_coordinate_move("e1g1").unwrap();

        assert_eq!(mv.flag(), MoveFlag::Castling);
        assert_eq!(position[Square::G1], Some(Piece::WHITE_KING));
        assert_eq!(position[Square::F1], Some(Piece::WHITE_ROOK));
        assert_eq!(position[Square::E1], None);
        assert_eq!(position[Square::H1], None);
        assert_eq!(position.castling_availability(), CastlingRight::for_color(Color::Black));
        assert_eq!(position.king_square(Color::White), Square::G1);
    }

    #[test]
    fn test_attempt_move_en_passant() {
        let mut position = Position::new();
        play(&mut position, &["e2e4", "a7a6", "e4e5", "d7d5"]);
        let before = position.clone();

        let mv = position.attempt_coordinate_move("e5d6").unwrap();

        assert_eq!(mv.flag(), MoveFlag::EnPassant);
        assert_eq!(position[Square::D6], Some(Piece::WHITE_PAWN));
        assert_eq!(position[Square::D5], None);
        assert_eq!(position[Square::E5], None);

        position.unmake(mv);
        assert_eq!(position[Square::D5], Some(Piece::BLACK_PAWN));
        assert_eq!(position[Square::D6], None);
        assert_eq!(position, before);
    }

    #[test]
    fn test_attempt_move_pinned_piece() {
        let mut position = Position::new_from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let before = position.clone();

        assert_eq!(
            position.attempt_move(Square::E2.into(), Square::C3.into(), None),
            Err(MoveRejection::LeavesKingInCheck)
        );
        assert_eq!(position, before);
        assert_eq!(position.ply(), 0);
    }

    #[test]
    fn test_attempt_move_king_into_check() {
        let mut position = Position::new_from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1").unwrap();
        let before = position.clone();

        assert_eq!(
            position.attempt_coordinate_move("e1d1"),
            Err(MoveError::Rejected(MoveRejection::LeavesKingInCheck))
        );
        assert_eq!(position, before);

        assert!(position.attempt_coordinate_move("e1d2").is_ok());
        assert_eq!(position[Square::D2], Some(Piece::WHITE_KING));
    }

    #[test]
    fn test_attempt_move_promotion() {
        let mut position = Position::new_from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();

        assert_eq!(
            position.attempt_move(Square::A7.into(), Square::A8.into(), None),
            Err(MoveRejection::PromotionRequired { from: Square::A7, to: Square::A8 })
        );

        let mv = position.attempt_move(Square::A7.into(), Square::A8.into(), Some(PieceType::Knight)).unwrap();
        assert_eq!(mv.promotion(), Some(PieceType::Knight));
        assert_eq!(position[Square::A8], Some(Piece::WHITE_KNIGHT));
    }

    #[test]
    fn test_attempt_move_promotion_on_non_promotion_move() {
        let mut position = Position::new();

        assert_eq!(
            position.attempt_coordinate_move("e2e4q"),
            Err(MoveError::Rejected(MoveRejection::NotPseudoLegal { from: Square::E2, to: Square::E4 }))
        );
    }

    #[test]
    fn test_attempt_coordinate_move_invalid_notation() {
        let mut position = Position::new();

        assert!(matches!(position.attempt_coordinate_move("e2"), Err(MoveError::Notation(_))));
        assert_eq!(position, Position::new());
    }

    /// Offers a single move and reports every square as attacked.
    struct HostileRules(Move);

    impl Rules for HostileRules {
        fn generate_pseudo_legal_moves(&self, _position: &Position, list: &mut MoveList) {
            list.push(self.0);
        }

        fn is_square_attacked(&self, _position: &Position, _square: Square, _by: Color) -> bool {
            true
        }
    }

    #[test]
    fn test_play_coordinate_moves() {
        let mut position = Position::new();

        let played = position.play_coordinate_moves(&["e2e4", "e7e5", "g1f3"]).unwrap();

        assert_eq!(played.len(), 3);
        assert_eq!(played[0].flag(), MoveFlag::DoublePawnPush);
        assert_eq!(position.last_move(), Some(played[2]));
        assert_eq!(position.to_fen(), "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2");
    }

    #[test]
    fn test_play_coordinate_moves_refused_move_undoes_sequence() {
        let mut position = Position::new();

        assert_eq!(
            position.play_coordinate_moves(&["e2e4", "e7e5", "e1e3"]),
            Err(MoveSequenceError {
                index: 2,
                notation: "e1e3".to_string(),
                error: MoveError::Rejected(MoveRejection::NotPseudoLegal { from: Square::E1, to: Square::E3 }),
            })
        );
        assert_eq!(position, Position::new());

        let error = position.play_coordinate_moves(&["d2d4", "e7"]).unwrap_err();
        assert_eq!(error.index, 1);
        assert!(matches!(error.error, MoveError::Notation(_)));
        assert_eq!(position, Position::new());
    }

    #[test]
    fn test_attempt_move_with_custom_rules() {
        let mut position = Position::new();
        let rules = HostileRules(Move::new(Square::G1, Square::F3));

        assert_eq!(
            position.attempt_move_with(&rules, Square::G1.into(), Square::F3.into(), None),
            Err(MoveRejection::LeavesKingInCheck)
        );
        assert_eq!(
            position.attempt_move_with(&rules, Square::B1.into(), Square::C3.into(), None),
            Err(MoveRejection::NotPseudoLegal { from: Square::B1, to: Square::C3 })
        );
        assert_eq!(position, Position::new());
    }
}
