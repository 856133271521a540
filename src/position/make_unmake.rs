use crate::{
    coordinates::Square,
    history::StateInfo,
    piece::{Color, Piece, PieceType},
    r#move::{CastlingRight, Move, MoveFlag},
};

use super::Position;

/// Rights kept when a piece moves from or to a square. Only the king and rook home squares clear anything.
const CASTLING_RIGHTS_MASK: [CastlingRight; Square::COUNT] = {
    let mut mask = [CastlingRight::all(); Square::COUNT];

    mask[Square::A1.index()] = CastlingRight::all().difference(CastlingRight::WHITE_QUEENSIDE);
    mask[Square::H1.index()] = CastlingRight::all().difference(CastlingRight::WHITE_KINGSIDE);
    mask[Square::E1.index()] =
        CastlingRight::all().difference(CastlingRight::WHITE_KINGSIDE.union(CastlingRight::WHITE_QUEENSIDE));

    mask[Square::A8.index()] = CastlingRight::all().difference(CastlingRight::BLACK_QUEENSIDE);
    mask[Square::H8.index()] = CastlingRight::all().difference(CastlingRight::BLACK_KINGSIDE);
    mask[Square::E8.index()] =
        CastlingRight::all().difference(CastlingRight::BLACK_KINGSIDE.union(CastlingRight::BLACK_QUEENSIDE));

    mask
};

/// Returns the (from, to) squares of the rook for a castling move whose king lands on `king_to`.
fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    match king_to {
        Square::G1 => (Square::H1, Square::F1),
        Square::C1 => (Square::A1, Square::D1),
        Square::G8 => (Square::H8, Square::F8),
        Square::C8 => (Square::A8, Square::D8),
        _ => panic!("{king_to} is not the destination of a castling king"),
    }
}

impl Position {
    fn make_normal(&mut self, mv: Move, captured: Option<Piece>) {
        if captured.is_some() {
            self.remove_piece(mv.to_square());
        }
        let piece = self.piece_on(mv.from_square()).expect("The moving piece must be on the from square.");
        self.move_piece(piece, mv.from_square(), mv.to_square());
    }

    fn make_castling(&mut self, mv: Move) {
        let king = Piece::new(self.side_to_move, PieceType::King);
        let rook = Piece::new(self.side_to_move, PieceType::Rook);
        let (rook_from, rook_to) = castling_rook_squares(mv.to_square());

        self.move_piece(king, mv.from_square(), mv.to_square());
        self.move_piece(rook, rook_from, rook_to);
    }

    fn make_en_passant(&mut self, mv: Move) {
        // The captured pawn stands beside the capturer: destination file, origin rank.
        let capture_square = Square::new(mv.to_square().file(), mv.from_square().rank());
        debug_assert_eq!(self[capture_square], Some(Piece::new(!self.side_to_move, PieceType::Pawn)));

        self.remove_piece(capture_square);
        self.move_piece(Piece::new(self.side_to_move, PieceType::Pawn), mv.from_square(), mv.to_square());
    }

    fn make_promotion(&mut self, mv: Move, captured: Option<Piece>) {
        let promotion = mv.promotion().expect("A promotion move always carries a promotion piece.");

        if captured.is_some() {
            self.remove_piece(mv.to_square());
        }
        self.remove_piece(mv.from_square());
        self.put_piece(Piece::new(self.side_to_move, promotion), mv.to_square());
    }

    /// Applies a pseudo-legal move to the position.
    ///
    /// The irreversible part of the state (captured piece, castling rights, en passant square and move counters) is
    /// recorded in the history so that `unmake` can restore it exactly.
    ///
    /// # Panics
    /// Panics if the history is full. Making a move that is not pseudo-legal in this position corrupts it; debug
    /// builds catch most of these cases with assertions.
    pub fn make(&mut self, mv: Move) {
        let from = mv.from_square();
        let to = mv.to_square();
        let moving = self.piece_on(from).expect("There is no piece on the from square of the move.");
        debug_assert_eq!(moving.color(), self.side_to_move);

        let captured = match mv.flag() {
            MoveFlag::EnPassant => Some(Piece::new(!self.side_to_move, PieceType::Pawn)),
            MoveFlag::Castling => None,
            _ => self[to],
        };

        self.history.push(StateInfo {
            mv,
            captured,
            castling_rights: self.castling_rights,
            en_passant_square: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        });

        self.castling_rights &= CASTLING_RIGHTS_MASK[usize::from(from)] & CASTLING_RIGHTS_MASK[usize::from(to)];

        self.en_passant_square = None;
        if mv.flag() == MoveFlag::DoublePawnPush {
            self.en_passant_square = Some(Square::midpoint(from, to));
        }

        self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        if moving.piece_type() == PieceType::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        }

        match mv.flag() {
            MoveFlag::Normal | MoveFlag::DoublePawnPush => self.make_normal(mv, captured),
            MoveFlag::Castling => self.make_castling(mv),
            MoveFlag::EnPassant => self.make_en_passant(mv),
            MoveFlag::Promotion => self.make_promotion(mv, captured),
        }

        if self.side_to_move == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = !self.side_to_move;
    }

    fn unmake_normal(&mut self, mv: Move, captured: Option<Piece>) {
        let piece = self.piece_on(mv.to_square()).expect("The moved piece must be on the to square.");
        self.move_piece(piece, mv.to_square(), mv.from_square());
        if let Some(captured) = captured {
            self.put_piece(captured, mv.to_square());
        }
    }

    fn unmake_castling(&mut self, mv: Move) {
        let king = Piece::new(self.side_to_move, PieceType::King);
        let rook = Piece::new(self.side_to_move, PieceType::Rook);
        let (rook_from, rook_to) = castling_rook_squares(mv.to_square());

        self.move_piece(rook, rook_to, rook_from);
        self.move_piece(king, mv.to_square(), mv.from_square());
    }

    fn unmake_en_passant(&mut self, mv: Move) {
        let capture_square = Square::new(mv.to_square().file(), mv.from_square().rank());

        self.move_piece(Piece::new(self.side_to_move, PieceType::Pawn), mv.to_square(), mv.from_square());
        self.put_piece(Piece::new(!self.side_to_move, PieceType::Pawn), capture_square);
    }

    fn unmake_promotion(&mut self, mv: Move, captured: Option<Piece>) {
        self.remove_piece(mv.to_square());
        self.put_piece(Piece::new(self.side_to_move, PieceType::Pawn), mv.from_square());
        if let Some(captured) = captured {
            self.put_piece(captured, mv.to_square());
        }
    }

    /// Reverts `mv`, which must be the last move made on the position.
    ///
    /// The board is restored by inverting the move, and the irreversible state is taken back from the history.
    ///
    /// # Panics
    /// Panics if no move was made on the position, or if `mv` is not the last move made.
    pub fn unmake(&mut self, mv: Move) {
        let state = self.history.pop();
        assert_eq!(state.mv, mv, "Cannot unmake {mv}: the last move made is {}", state.mv);

        self.side_to_move = !self.side_to_move;
        self.fullmove_number = state.fullmove_number;
        self.castling_rights = state.castling_rights;
        self.en_passant_square = state.en_passant_square;
        self.halfmove_clock = state.halfmove_clock;

        match mv.flag() {
            MoveFlag::Normal | MoveFlag::DoublePawnPush => self.unmake_normal(mv, state.captured),
            MoveFlag::Castling => self.unmake_castling(mv),
            MoveFlag::EnPassant => self.unmake_en_passant(mv),
            MoveFlag::Promotion => self.unmake_promotion(mv, state.captured),
        }
    }

    /// Returns the last move made on the position and not yet unmade.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|state| state.mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_unmake(fen: &str, mv: Move, expected_fen: &str) -> Position {
        let original = Position::new_from_fen(fen).unwrap();
        let mut position = original.clone();

        position.make(mv);
        assert_eq!(position.to_fen(), expected_fen);
        assert!(position.is_consistent());

        position.unmake(mv);
        assert_eq!(position, original);
        position
    }

    #[test]
    fn test_castling_rights_mask() {
        assert_eq!(CASTLING_RIGHTS_MASK[usize::from(Square::E4)], CastlingRight::all());
        assert_eq!(
            CASTLING_RIGHTS_MASK[usize::from(Square::E1)],
            CastlingRight::BLACK_KINGSIDE | CastlingRight::BLACK_QUEENSIDE
        );
        assert!(!CASTLING_RIGHTS_MASK[usize::from(Square::H8)].contains(CastlingRight::BLACK_KINGSIDE));
        assert!(CASTLING_RIGHTS_MASK[usize::from(Square::H8)].contains(CastlingRight::BLACK_QUEENSIDE));
    }

    #[test]
    fn test_make_double_pawn_push_sets_en_passant() {
        let mut position = Position::new();
        let mv = Move::new_double_pawn_push(Square::E2, Square::E4);

        position.make(mv);
        assert_eq!(position.en_passant_square(), Some(Square::E3));
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.side_to_move(), Color::Black);
        assert_eq!(position.ply(), 1);
        assert_eq!(position.last_move(), Some(mv));

        position.unmake(mv);
        assert_eq!(position.en_passant_square(), None);
        assert_eq!(position.ply(), 0);
        assert_eq!(position, Position::new());
    }

    #[test]
    fn test_make_quiet_move_increments_halfmove_clock() {
        make_unmake(
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10",
            Move::new(Square::A1, Square::B1),
            "r3k2r/8/8/8/8/8/8/1R2K2R b Kkq - 4 10",
        );
    }

    #[test]
    fn test_make_capture() {
        make_unmake(
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
            Move::new(Square::E4, Square::D5),
            "rnbqkbnr/ppp1pppp/8/3P4/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2",
        );
    }

    #[test]
    fn test_make_capture_of_rook_clears_opponent_right() {
        make_unmake(
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
            Move::new(Square::H1, Square::H8),
            "r3k2R/8/8/8/8/8/8/R3K3 b Qq - 0 1",
        );
    }

    #[test]
    fn test_make_black_move_increments_fullmove_number() {
        make_unmake(
            "4k3/8/8/8/8/8/8/4K3 b - - 0 7",
            Move::new(Square::E8, Square::D7),
            "8/3k4/8/8/8/8/8/4K3 w - - 1 8",
        );
    }

    #[test]
    fn test_make_castling() {
        for (mv, expected) in [
            (Move::new_castling(Square::E1, Square::G1), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1"),
            (Move::new_castling(Square::E1, Square::C1), "r3k2r/8/8/8/8/8/8/2KR3R b kq - 1 1"),
        ] {
            make_unmake("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", mv, expected);
        }

        for (mv, expected) in [
            (Move::new_castling(Square::E8, Square::G8), "r4rk1/8/8/8/8/8/8/R3K2R w KQ - 1 2"),
            (Move::new_castling(Square::E8, Square::C8), "2kr3r/8/8/8/8/8/8/R3K2R w KQ - 1 2"),
        ] {
            make_unmake("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", mv, expected);
        }
    }

    #[test]
    fn test_make_castling_updates_king_cache() {
        let mut position = Position::new_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mv = Move::new_castling(Square::E1, Square::G1);

        position.make(mv);
        assert_eq!(position.king_square(Color::White), Square::G1);

        position.unmake(mv);
        assert_eq!(position.king_square(Color::White), Square::E1);
    }

    #[test]
    fn test_make_en_passant() {
        let position = make_unmake(
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            Move::new_en_passant(Square::E5, Square::F6),
            "rnbqkbnr/ppp1p1pp/5P2/3p4/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3",
        );
        assert_eq!(position[Square::F5], Some(Piece::BLACK_PAWN));

        make_unmake(
            "4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1",
            Move::new_en_passant(Square::E4, Square::D3),
            "4k3/8/8/8/8/3p4/8/4K3 w - - 0 2",
        );
    }

    #[test]
    fn test_make_promotion() {
        make_unmake(
            "4k3/1P6/8/8/8/8/8/4K3 w - - 5 40",
            Move::new_promotion(Square::B7, Square::B8, PieceType::Knight),
            "1N2k3/8/8/8/8/8/8/4K3 b - - 0 40",
        );
    }

    #[test]
    fn test_make_capture_promotion() {
        make_unmake(
            "r3k3/1P6/8/8/8/8/8/4K3 w q - 0 1",
            Move::new_promotion(Square::B7, Square::A8, PieceType::Queen),
            "Q3k3/8/8/8/8/8/8/4K3 b - - 0 1",
        );
    }

    #[test]
    fn test_make_saturates_halfmove_clock() {
        let mut position = Position::new_from_fen("4k3/8/8/8/8/8/8/4K3 w - - 65535 1").unwrap();
        let before = position.clone();

        let mv = position.attempt_coordinate_move("e1d1").unwrap();
        assert_eq!(position.halfmove_clock(), u16::MAX);

        position.unmake(mv);
        assert_eq!(position, before);
    }

    #[test]
    fn test_make_saturates_fullmove_number() {
        let mut position = Position::new_from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 65535").unwrap();
        let before = position.clone();

        let mv = position.attempt_coordinate_move("e8d8").unwrap();
        assert_eq!(position.fullmove_number(), u16::MAX);
        assert_eq!(position.to_fen(), "3k4/8/8/8/8/8/8/4K3 w - - 1 65535");

        position.unmake(mv);
        assert_eq!(position, before);
        assert_eq!(position.fullmove_number(), u16::MAX);
    }

    #[test]
    fn test_unmake_without_make_panics() {
        let result = std::panic::catch_unwind(|| {
            let mut position = Position::new();
            position.unmake(Move::new(Square::G1, Square::F3));
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_unmake_mismatched_move_panics() {
        let result = std::panic::catch_unwind(|| {
            let mut position = Position::new();
            position.make(Move::new(Square::G1, Square::F3));
            position.unmake(Move::new(Square::B1, Square::C3));
        });
        assert!(result.is_err());
    }
}
