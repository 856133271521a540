use std::fmt::Display;

use thiserror::Error;

use crate::piece::Color;

/// Errors produced when converting values into board coordinates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinatesError {
    #[error("Invalid file: {0}")]
    InvalidFile(char),

    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid square notation: \"{0}\"")]
    InvalidSquare(String),

    #[error("The index {0} is outside of the board")]
    OffBoard(u8),

    #[error("The coordinate would move outside of the board")]
    OutOfBounds,
}

pub type CoordinatesResult<T> = Result<T, CoordinatesError>;

//======================================================================================================================
// File
//======================================================================================================================

/// Represents a file (column) on a chess board.
///
/// Files are labeled from A to H, going from left to right when viewing the board from White's
/// perspective.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    pub const COUNT: usize = 8;

    /// Represents all files on a chess board.
    pub const ALL: [File; File::COUNT] = [File::A, File::B, File::C, File::D, File::E, File::F, File::G, File::H];

    /// Returns the file `count` columns to the right (towards the H file).
    pub fn right(self, count: i8) -> CoordinatesResult<File> {
        let value = u8::from(self) as i8 + count;
        if (0..File::COUNT as i8).contains(&value) {
            Ok(File::from(value as u8))
        } else {
            Err(CoordinatesError::OutOfBounds)
        }
    }

    /// Returns the file `count` columns to the left (towards the A file).
    pub fn left(self, count: i8) -> CoordinatesResult<File> {
        self.right(-count)
    }
}

impl Display for File {
    /// Formats the file as a single character.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

impl From<u8> for File {
    /// Converts a `u8` value to a `File`.
    fn from(value: u8) -> Self {
        assert!(value <= File::H.into());
        File::ALL[value as usize]
    }
}

impl From<File> for u8 {
    fn from(file: File) -> Self {
        file as u8
    }
}

impl From<File> for char {
    fn from(file: File) -> Self {
        (b'a' + u8::from(file)) as char
    }
}

impl TryFrom<char> for File {
    type Error = CoordinatesError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase() {
            c @ 'a'..='h' => Ok(File::from(c as u8 - b'a')),
            _ => Err(CoordinatesError::InvalidFile(value)),
        }
    }
}

//======================================================================================================================
// Rank
//======================================================================================================================

/// Represents a rank (row) on a chess board.
///
/// Ranks are labeled from 1 to 8, going from the bottom to the top when viewing the board from
/// White's perspective.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

impl Rank {
    pub const COUNT: usize = 8;

    /// Represents all ranks on a chess board.
    pub const ALL: [Rank; Rank::COUNT] =
        [Rank::R1, Rank::R2, Rank::R3, Rank::R4, Rank::R5, Rank::R6, Rank::R7, Rank::R8];

    /// Returns the rank `count` rows up (towards rank 8).
    pub fn up(self, count: i8) -> CoordinatesResult<Rank> {
        let value = u8::from(self) as i8 + count;
        if (0..Rank::COUNT as i8).contains(&value) {
            Ok(Rank::from(value as u8))
        } else {
            Err(CoordinatesError::OutOfBounds)
        }
    }

    /// Returns the rank `count` rows down (towards rank 1).
    pub fn down(self, count: i8) -> CoordinatesResult<Rank> {
        self.up(-count)
    }

    /// Returns this rank as seen from the side of `color`. Rank 1 of black is rank 8 of the board.
    pub fn relative_to_color(self, color: Color) -> Rank {
        match color {
            Color::White => self,
            Color::Black => Rank::from(7 - u8::from(self)),
        }
    }
}

impl Display for Rank {
    /// Formats the rank as a single character.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

impl From<u8> for Rank {
    /// Converts a `u8` value to a `Rank`.
    fn from(value: u8) -> Self {
        assert!(value <= Rank::R8.into());
        Rank::ALL[value as usize]
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank as u8
    }
}

impl From<Rank> for char {
    fn from(rank: Rank) -> Self {
        (b'1' + u8::from(rank)) as char
    }
}

impl TryFrom<char> for Rank {
    type Error = CoordinatesError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1'..='8' => Ok(Rank::from(value as u8 - b'1')),
            _ => Err(CoordinatesError::InvalidRank(value)),
        }
    }
}

//======================================================================================================================
// Square
//======================================================================================================================

/// Represents a square on a chess board.
///
/// Squares are indexed from 0 to 63, starting from A1 and ending at H8 with B1 being at index 1.
/// In other words, the file value is stored in the lower 3 bits and the rank value is stored in the
/// next 3 bits. The last two bits are unused and always 0.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A2: Square = Square(8);
    pub const B2: Square = Square(9);
    pub const C2: Square = Square(10);
    pub const D2: Square = Square(11);
    pub const E2: Square = Square(12);
    pub const F2: Square = Square(13);
    pub const G2: Square = Square(14);
    pub const H2: Square = Square(15);
    pub const A3: Square = Square(16);
    pub const B3: Square = Square(17);
    pub const C3: Square = Square(18);
    pub const D3: Square = Square(19);
    pub const E3: Square = Square(20);
    pub const F3: Square = Square(21);
    pub const G3: Square = Square(22);
    pub const H3: Square = Square(23);
    pub const A4: Square = Square(24);
    pub const B4: Square = Square(25);
    pub const C4: Square = Square(26);
    pub const D4: Square = Square(27);
    pub const E4: Square = Square(28);
    pub const F4: Square = Square(29);
    pub const G4: Square = Square(30);
    pub const H4: Square = Square(31);
    pub const A5: Square = Square(32);
    pub const B5: Square = Square(33);
    pub const C5: Square = Square(34);
    pub const D5: Square = Square(35);
    pub const E5: Square = Square(36);
    pub const F5: Square = Square(37);
    pub const G5: Square = Square(38);
    pub const H5: Square = Square(39);
    pub const A6: Square = Square(40);
    pub const B6: Square = Square(41);
    pub const C6: Square = Square(42);
    pub const D6: Square = Square(43);
    pub const E6: Square = Square(44);
    pub const F6: Square = Square(45);
    pub const G6: Square = Square(46);
    pub const H6: Square = Square(47);
    pub const A7: Square = Square(48);
    pub const B7: Square = Square(49);
    pub const C7: Square = Square(50);
    pub const D7: Square = Square(51);
    pub const E7: Square = Square(52);
    pub const F7: Square = Square(53);
    pub const G7: Square = Square(54);
    pub const H7: Square = Square(55);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    pub const COUNT: usize = 64;

    /// All the squares of the board, from A1 to H8.
    pub const ALL: [Square; Square::COUNT] = {
        let mut all = [Square(0); Square::COUNT];
        let mut index = 0;
        while index < Square::COUNT {
            all[index] = Square(index as u8);
            index += 1;
        }
        all
    };

    /// Creates a new square from a file and a rank.
    pub fn new(file: File, rank: Rank) -> Square {
        Square(u8::from(rank) << 3 | u8::from(file))
    }

    /// Returns the index of the square, usable in constant contexts.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the rank of the square.
    pub fn rank(self) -> Rank {
        (self.0 >> 3).into()
    }

    /// Returns the file of the square.
    pub fn file(self) -> File {
        (self.0 & 0b111).into()
    }

    pub fn up(self, count: i8) -> CoordinatesResult<Square> {
        Ok(Square::new(self.file(), self.rank().up(count)?))
    }

    pub fn down(self, count: i8) -> CoordinatesResult<Square> {
        Ok(Square::new(self.file(), self.rank().down(count)?))
    }

    pub fn right(self, count: i8) -> CoordinatesResult<Square> {
        Ok(Square::new(self.file().right(count)?, self.rank()))
    }

    pub fn left(self, count: i8) -> CoordinatesResult<Square> {
        Ok(Square::new(self.file().left(count)?, self.rank()))
    }

    /// Returns the square between two squares of the same file that are two ranks apart.
    pub fn midpoint(a: Square, b: Square) -> Square {
        debug_assert_eq!(a.file(), b.file());
        Square((a.0 + b.0) / 2)
    }
}

impl Display for Square {
    /// Formats the square as a two-character string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl From<u8> for Square {
    /// Converts a square index to a `Square`. The index must be on the board.
    fn from(value: u8) -> Self {
        assert!((value as usize) < Square::COUNT);
        Square(value)
    }
}

impl From<Square> for u8 {
    fn from(square: Square) -> Self {
        square.0
    }
}

impl From<Square> for usize {
    fn from(square: Square) -> Self {
        square.0 as usize
    }
}

impl TryFrom<&str> for Square {
    type Error = CoordinatesError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Ok(Square::new(File::try_from(file)?, Rank::try_from(rank)?)),
            _ => Err(CoordinatesError::InvalidSquare(value.to_string())),
        }
    }
}

/// Validates an untrusted square index, e.g. one received from an interactive front end.
pub fn square_from_index(index: u8) -> CoordinatesResult<Square> {
    if (index as usize) < Square::COUNT {
        Ok(Square(index))
    } else {
        Err(CoordinatesError::OffBoard(index))
    }
}
