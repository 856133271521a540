use std::fmt::Display;

use bitflags::bitflags;

use crate::{
    coordinates::Square,
    piece::{Color, PieceType},
};

//======================================================================================================================
// Castling
//======================================================================================================================

/// The two sides a king can castle towards.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CastlingSide {
    Kingside = 0,
    Queenside = 1,
}

impl CastlingSide {
    pub const COUNT: usize = 2;
    pub const ALL: [CastlingSide; CastlingSide::COUNT] = [CastlingSide::Kingside, CastlingSide::Queenside];
}

impl From<CastlingSide> for usize {
    fn from(side: CastlingSide) -> Self {
        side as usize
    }
}

bitflags! {
    /// The four castling rights of a position, one bit per color and side.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CastlingRight: u8 {
        const WHITE_KINGSIDE = 0b0001;
        const WHITE_QUEENSIDE = 0b0010;
        const BLACK_KINGSIDE = 0b0100;
        const BLACK_QUEENSIDE = 0b1000;
    }
}

impl CastlingRight {
    /// Returns the right to castle on `side` for `color`.
    pub fn new(color: Color, side: CastlingSide) -> Self {
        match (color, side) {
            (Color::White, CastlingSide::Kingside) => CastlingRight::WHITE_KINGSIDE,
            (Color::White, CastlingSide::Queenside) => CastlingRight::WHITE_QUEENSIDE,
            (Color::Black, CastlingSide::Kingside) => CastlingRight::BLACK_KINGSIDE,
            (Color::Black, CastlingSide::Queenside) => CastlingRight::BLACK_QUEENSIDE,
        }
    }

    /// Returns both rights of `color`.
    pub fn for_color(color: Color) -> Self {
        CastlingRight::new(color, CastlingSide::Kingside) | CastlingRight::new(color, CastlingSide::Queenside)
    }
}

//======================================================================================================================
// Move flag
//======================================================================================================================

/// The special-move category of a move. It tells the make/unmake engine which board transform to apply.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub enum MoveFlag {
    /// A quiet move or a capture on the destination square.
    #[default]
    Normal = 0,
    DoublePawnPush = 1,
    EnPassant = 2,
    /// A king move of two squares. The rook is relocated by the engine.
    Castling = 3,
    Promotion = 4,
}

impl MoveFlag {
    const COUNT: u8 = 5;
}

impl From<u8> for MoveFlag {
    fn from(value: u8) -> Self {
        match value {
            0 => MoveFlag::Normal,
            1 => MoveFlag::DoublePawnPush,
            2 => MoveFlag::EnPassant,
            3 => MoveFlag::Castling,
            4 => MoveFlag::Promotion,
            _ => panic!("Invalid move flag value: {value}"),
        }
    }
}

//======================================================================================================================
// Move
//======================================================================================================================

/// A move encoded in a single `u32`.
///
/// The value is packed as follows:
/// Bits     Content
/// -------  ---------
///  0 - 5   From square
///  6 - 11  To square
/// 12 - 14  Move flag
/// 15 - 16  Promotion piece (knight, bishop, rook, queen), only meaningful for promotions
///
/// A move carries no board context. It only makes sense when interpreted against the position it was generated for.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct Move(u32);

impl Move {
    const SQUARE_MASK: u32 = 0b11_1111;
    const FLAG_SHIFT: u32 = 12;
    const FLAG_MASK: u32 = 0b111;
    const PROMOTION_SHIFT: u32 = 15;
    const PROMOTION_MASK: u32 = 0b11;
    const VALID_BITS: u32 = (1 << 17) - 1;

    /// Packs a move. `promotion` must be given for, and only for, promotion moves and must be a knight, bishop, rook
    /// or queen.
    ///
    /// # Panics
    /// Panics if the promotion piece does not match the flag.
    pub fn encode(from: Square, to: Square, flag: MoveFlag, promotion: Option<PieceType>) -> Self {
        let promotion_bits = match (flag, promotion) {
            (MoveFlag::Promotion, Some(piece_type)) => {
                assert!(
                    !matches!(piece_type, PieceType::Pawn | PieceType::King),
                    "Cannot promote to a {piece_type}"
                );
                u8::from(piece_type) as u32 - u8::from(PieceType::Knight) as u32
            }
            (MoveFlag::Promotion, None) => panic!("A promotion move needs a promotion piece"),
            (_, Some(_)) => panic!("Only promotion moves can have a promotion piece"),
            (_, None) => 0,
        };

        Move(
            u8::from(from) as u32
                | (u8::from(to) as u32) << 6
                | (flag as u32) << Self::FLAG_SHIFT
                | promotion_bits << Self::PROMOTION_SHIFT,
        )
    }

    /// Unpacks a move into its `(from, to, flag, promotion)` components.
    pub fn decode(self) -> (Square, Square, MoveFlag, Option<PieceType>) {
        (self.from_square(), self.to_square(), self.flag(), self.promotion())
    }

    /// Creates a quiet move or a capture.
    pub fn new(from: Square, to: Square) -> Self {
        Self::encode(from, to, MoveFlag::Normal, None)
    }

    pub fn new_double_pawn_push(from: Square, to: Square) -> Self {
        Self::encode(from, to, MoveFlag::DoublePawnPush, None)
    }

    pub fn new_en_passant(from: Square, to: Square) -> Self {
        Self::encode(from, to, MoveFlag::EnPassant, None)
    }

    /// Creates a castling move. `from` and `to` are the squares of the king.
    pub fn new_castling(from: Square, to: Square) -> Self {
        Self::encode(from, to, MoveFlag::Castling, None)
    }

    pub fn new_promotion(from: Square, to: Square, promotion: PieceType) -> Self {
        Self::encode(from, to, MoveFlag::Promotion, Some(promotion))
    }

    /// Returns the source square of the move.
    pub fn from_square(self) -> Square {
        Square::from((self.0 & Self::SQUARE_MASK) as u8)
    }

    /// Returns the destination square of the move.
    pub fn to_square(self) -> Square {
        Square::from((self.0 >> 6 & Self::SQUARE_MASK) as u8)
    }

    pub fn flag(self) -> MoveFlag {
        MoveFlag::from((self.0 >> Self::FLAG_SHIFT & Self::FLAG_MASK) as u8)
    }

    /// Returns the piece type a pawn promotes to, if the move is a promotion.
    pub fn promotion(self) -> Option<PieceType> {
        match self.flag() {
            MoveFlag::Promotion => {
                let bits = (self.0 >> Self::PROMOTION_SHIFT & Self::PROMOTION_MASK) as u8;
                Some(PieceType::from(u8::from(PieceType::Knight) + bits))
            }
            _ => None,
        }
    }

    /// Returns the move in coordinate notation (e.g. "e2e4", "e7e8q").
    pub fn to_uci_string(self) -> String {
        match self.promotion() {
            Some(promotion) => format!("{}{}{}", self.from_square(), self.to_square(), char::from(promotion)),
            None => format!("{}{}", self.from_square(), self.to_square()),
        }
    }
}

impl From<Move> for u32 {
    fn from(mv: Move) -> u32 {
        mv.0
    }
}

impl From<u32> for Move {
    /// Converts a raw value back into a move.
    ///
    /// # Panics
    /// Panics if the value has bits outside of the encoding, an unknown flag, or a promotion payload on a move that is
    /// not a promotion.
    fn from(value: u32) -> Self {
        assert!(value & !Self::VALID_BITS == 0, "Invalid encoded move: {value:#x}");

        let flag = (value >> Self::FLAG_SHIFT & Self::FLAG_MASK) as u8;
        assert!(flag < MoveFlag::COUNT, "Invalid move flag in encoded move: {value:#x}");
        assert!(
            flag == MoveFlag::Promotion as u8 || value >> Self::PROMOTION_SHIFT == 0,
            "Promotion payload on a move that is not a promotion: {value:#x}"
        );

        Move(value)
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uci_string())
    }
}
