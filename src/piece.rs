use std::fmt::Display;

use thiserror::Error;

/// Errors produced when converting characters into pieces.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PieceError {
    #[error("Invalid piece character: {0}")]
    InvalidCharacter(char),
}

//======================================================================================================================
// Color
//======================================================================================================================

/// Represents the color of a chess piece.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const COUNT: usize = 2;

    /// Represents all colors of chess pieces.
    pub const ALL: [Color; Color::COUNT] = [Color::White, Color::Black];
}

impl std::ops::Not for Color {
    type Output = Color;

    /// Returns the opposite color.
    fn not(self) -> Self::Output {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> Self {
        color as u8
    }
}

impl From<Color> for usize {
    fn from(color: Color) -> Self {
        color as usize
    }
}

impl From<u8> for Color {
    fn from(value: u8) -> Self {
        assert!(value <= Color::Black.into());
        Color::ALL[value as usize]
    }
}

/// The active color character used in FEN.
impl From<Color> for char {
    fn from(color: Color) -> Self {
        match color {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

//======================================================================================================================
// PieceType
//======================================================================================================================

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceType {
    pub const COUNT: usize = 6;

    /// Represents all piece types.
    pub const ALL: [PieceType; PieceType::COUNT] =
        [PieceType::Pawn, PieceType::Knight, PieceType::Bishop, PieceType::Rook, PieceType::Queen, PieceType::King];

    /// The piece types a pawn can promote to, from the most to the least valuable.
    pub const PROMOTIONS: [PieceType; 4] = [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight];
}

impl From<PieceType> for u8 {
    fn from(piece_type: PieceType) -> Self {
        piece_type as u8
    }
}

impl From<PieceType> for usize {
    fn from(piece_type: PieceType) -> Self {
        piece_type as usize
    }
}

impl From<u8> for PieceType {
    fn from(value: u8) -> Self {
        assert!(value <= PieceType::King.into());
        PieceType::ALL[value as usize]
    }
}

impl From<PieceType> for char {
    /// Converts a `PieceType` to its lowercase letter.
    fn from(piece_type: PieceType) -> Self {
        match piece_type {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }
}

impl TryFrom<char> for PieceType {
    type Error = PieceError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase() {
            'p' => Ok(PieceType::Pawn),
            'n' => Ok(PieceType::Knight),
            'b' => Ok(PieceType::Bishop),
            'r' => Ok(PieceType::Rook),
            'q' => Ok(PieceType::Queen),
            'k' => Ok(PieceType::King),
            _ => Err(PieceError::InvalidCharacter(value)),
        }
    }
}

impl Display for PieceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "Pawn"),
            PieceType::Knight => write!(f, "Knight"),
            PieceType::Bishop => write!(f, "Bishop"),
            PieceType::Rook => write!(f, "Rook"),
            PieceType::Queen => write!(f, "Queen"),
            PieceType::King => write!(f, "King"),
        }
    }
}

//======================================================================================================================
// Piece
//======================================================================================================================

/// Represents a chess piece.
///
/// A `Piece` is a combination of a `Color` and a `PieceType`. It is represented as a single byte,
/// with the lowest bit representing the `Color` and the higher bits representing the `PieceType`.
/// The values 0 to 11 represent all possible combinations of `Color` and `PieceType`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece(u8);

impl Piece {
    pub const WHITE_PAWN: Piece = Piece(0);
    pub const BLACK_PAWN: Piece = Piece(1);
    pub const WHITE_KNIGHT: Piece = Piece(2);
    pub const BLACK_KNIGHT: Piece = Piece(3);
    pub const WHITE_BISHOP: Piece = Piece(4);
    pub const BLACK_BISHOP: Piece = Piece(5);
    pub const WHITE_ROOK: Piece = Piece(6);
    pub const BLACK_ROOK: Piece = Piece(7);
    pub const WHITE_QUEEN: Piece = Piece(8);
    pub const BLACK_QUEEN: Piece = Piece(9);
    pub const WHITE_KING: Piece = Piece(10);
    pub const BLACK_KING: Piece = Piece(11);

    pub const COUNT: usize = 12;

    /// Creates a new `Piece` with the given `Color` and `PieceType`.
    pub fn new(color: Color, piece_type: PieceType) -> Self {
        Piece(u8::from(piece_type) << 1 | u8::from(color))
    }

    /// Returns the Color of the piece.
    pub fn color(self) -> Color {
        Color::from(self.0 & 1)
    }

    /// Returns the PieceType of the piece.
    pub fn piece_type(self) -> PieceType {
        PieceType::from(self.0 >> 1)
    }
}

impl From<Piece> for u8 {
    fn from(piece: Piece) -> Self {
        piece.0
    }
}

impl From<Piece> for usize {
    fn from(piece: Piece) -> Self {
        piece.0 as usize
    }
}

impl From<u8> for Piece {
    fn from(value: u8) -> Self {
        assert!((value as usize) < Piece::COUNT);
        Piece(value)
    }
}

impl From<Piece> for char {
    /// Converts a `Piece` to its FEN character: uppercase for white, lowercase for black.
    fn from(piece: Piece) -> Self {
        match piece.color() {
            Color::White => char::from(piece.piece_type()).to_ascii_uppercase(),
            Color::Black => char::from(piece.piece_type()),
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = PieceError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let color = if value.is_ascii_uppercase() { Color::White } else { Color::Black };
        Ok(Piece::new(color, PieceType::try_from(value)?))
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color(), self.piece_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod color_tests {
        use super::*;

        #[test]
        fn test_color_display() {
            assert_eq!(format!("{}", Color::White), "White");
            assert_eq!(format!("{}", Color::Black), "Black");
        }

        #[test]
        fn test_color_conversion() {
            assert_eq!(u8::from(Color::White), 0);
            assert_eq!(u8::from(Color::Black), 1);
            assert_eq!(Color::from(0u8), Color::White);
            assert_eq!(Color::from(1u8), Color::Black);
        }

        #[test]
        fn test_not() {
            assert_eq!(!Color::White, Color::Black);
            assert_eq!(!Color::Black, Color::White);
        }
    }

    mod piece_type_tests {
        use super::*;

        #[test]
        fn test_piece_type_try_from_char() {
            assert_eq!(PieceType::try_from('N'), Ok(PieceType::Knight));
            assert_eq!(PieceType::try_from('q'), Ok(PieceType::Queen));
            assert_eq!(PieceType::try_from('x'), Err(PieceError::InvalidCharacter('x')));
        }

        #[test]
        fn test_piece_type_conversion() {
            for piece_type in PieceType::ALL {
                assert_eq!(PieceType::from(u8::from(piece_type)), piece_type);
            }
        }
    }

    mod piece_tests {
        use super::*;

        #[test]
        fn test_piece_new() {
            assert_eq!(Piece::new(Color::White, PieceType::Pawn), Piece::WHITE_PAWN);
            assert_eq!(Piece::new(Color::Black, PieceType::Knight), Piece::BLACK_KNIGHT);
            assert_eq!(Piece::new(Color::White, PieceType::Queen), Piece::WHITE_QUEEN);
            assert_eq!(Piece::new(Color::Black, PieceType::King), Piece::BLACK_KING);
        }

        #[test]
        fn test_piece_color_and_type() {
            for color in Color::ALL {
                for piece_type in PieceType::ALL {
                    let piece = Piece::new(color, piece_type);
                    assert_eq!(piece.color(), color);
                    assert_eq!(piece.piece_type(), piece_type);
                }
            }
        }

        #[test]
        fn test_piece_char_conversion() {
            assert_eq!(char::from(Piece::WHITE_KING), 'K');
            assert_eq!(char::from(Piece::BLACK_ROOK), 'r');
            assert_eq!(Piece::try_from('B'), Ok(Piece::WHITE_BISHOP));
            assert_eq!(Piece::try_from('p'), Ok(Piece::BLACK_PAWN));
            assert!(Piece::try_from('1').is_err());
        }

        #[test]
        fn test_invalid_conversion_do_panic() {
            assert!(std::panic::catch_unwind(|| Piece::from(12)).is_err());
        }
    }
}
