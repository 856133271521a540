use thiserror::Error;

use crate::{
    coordinates::{CoordinatesError, Square},
    piece::{PieceError, PieceType},
};

/// Represents errors that can occur when parsing chess move notation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotationError {
    /// Error when the source square coordinates in the notation are invalid.
    #[error("Invalid from square: {0}")]
    InvalidFromSquare(CoordinatesError),

    /// Error when the destination square coordinates in the notation are invalid.
    #[error("Invalid to square: {0}")]
    InvalidToSquare(CoordinatesError),

    /// Error when the promotion piece notation is invalid.
    #[error("Invalid promotion piece: {0}")]
    InvalidPromotion(PieceError),

    /// Error when the overall notation format is incorrect.
    #[error("Invalid notation: {0}")]
    InvalidNotation(String),
}

/// A move as typed by a user: the squares and the optional promotion piece, without any board context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

/// Parses a chess move in coordinate notation.
///
/// Coordinate notation represents moves as the source square followed by the destination square, optionally followed by
/// a promotion piece (e.g., "e2e4", "e7e8q"). Castling is written as the king's move ("e1g1").
///
/// # Errors
/// * `InvalidFromSquare` / `InvalidToSquare` - If a square is not valid
/// * `InvalidPromotion` - If the promotion character is not a knight, bishop, rook or queen
/// * `InvalidNotation` - If the notation does not have 4 or 5 characters
pub fn parse_coordinate_notation(notation: &str) -> Result<CoordinateMove, NotationError> {
    let notation = notation.trim();
    if !notation.is_ascii() || !(4..=5).contains(&notation.len()) {
        return Err(NotationError::InvalidNotation(notation.to_string()));
    }

    let from = Square::try_from(&notation[0..2]).map_err(NotationError::InvalidFromSquare)?;
    let to = Square::try_from(&notation[2..4]).map_err(NotationError::InvalidToSquare)?;

    let promotion = match notation[4..].chars().next() {
        Some(c) => {
            let piece_type = PieceType::try_from(c).map_err(NotationError::InvalidPromotion)?;
            if !PieceType::PROMOTIONS.contains(&piece_type) {
                return Err(NotationError::InvalidPromotion(PieceError::InvalidCharacter(c)));
            }
            Some(piece_type)
        }
        None => None,
    };

    Ok(CoordinateMove { from, to, promotion })
}
