use std::{fmt::Display, ops::Index};

use thiserror::Error;

use crate::{
    bitboard::Bitboard,
    coordinates::{File, Rank, Square},
    history::History,
    move_gen::attacks,
    piece::{Color, Piece, PieceType},
    r#move::{CastlingRight, CastlingSide},
};

mod make_unmake;

/// The standard initial position.
pub const INITIAL_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Reasons a FEN string is refused by `Position::new_from_fen`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FenError {
    #[error("Invalid piece placement")]
    InvalidPiecePlacement,

    #[error("Invalid active color")]
    InvalidActiveColor,

    #[error("Invalid castling availability")]
    InvalidCastlingAvailability,

    #[error("Invalid en passant square")]
    InvalidEnPassantSquare,

    #[error("Invalid halfmove clock")]
    InvalidHalfmoveClock,

    #[error("Invalid fullmove number")]
    InvalidFullmoveNumber,

    #[error("The position must have exactly one {0} king")]
    InvalidKingCount(Color),

    #[error("The {0} king is in check although it is not {0} to move")]
    OpponentInCheck(Color),

    #[error("Missing field")]
    MissingField,
}

//======================================================================================================================
// OccupancyFilter
//======================================================================================================================

/// Selects which bitboard of the piece-set view `Position::occupied` returns. The two-type variant serves slider
/// lookups, where a queen counts as both a rook and a bishop.
pub enum OccupancyFilter {
    All,
    ByColor(Color),
    ByType(PieceType),
    ByPiece(Piece),
    ByColorAndType(Color, PieceType),
    ByColorAndTwoTypes(Color, PieceType, PieceType),
}

impl From<Color> for OccupancyFilter {
    fn from(color: Color) -> Self {
        Self::ByColor(color)
    }
}

impl From<PieceType> for OccupancyFilter {
    fn from(piece_type: PieceType) -> Self {
        Self::ByType(piece_type)
    }
}

impl From<Piece> for OccupancyFilter {
    fn from(piece: Piece) -> Self {
        Self::ByPiece(piece)
    }
}

impl From<(Color, PieceType)> for OccupancyFilter {
    fn from((color, piece_type): (Color, PieceType)) -> Self {
        Self::ByColorAndType(color, piece_type)
    }
}

impl From<(Color, PieceType, PieceType)> for OccupancyFilter {
    fn from((color, type1, type2): (Color, PieceType, PieceType)) -> Self {
        Self::ByColorAndTwoTypes(color, type1, type2)
    }
}

//======================================================================================================================
// Position implementation
//======================================================================================================================

/// A chess position.
///
/// The board is stored twice: a square-indexed array answering "what is on this square" and a set of bitboards
/// answering "where are the pieces of this kind". Every mutation goes through `put_piece`, `remove_piece` or
/// `move_piece`, which keep both views in lockstep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; Square::COUNT],
    bb_piece: [Bitboard; Piece::COUNT],
    bb_color: [Bitboard; Color::COUNT],
    bb_occupied: Bitboard,
    king_squares: [Square; Color::COUNT],
    side_to_move: Color,
    castling_rights: CastlingRight,
    en_passant_square: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    history: History,
}

impl Position {
    fn empty() -> Self {
        Self {
            board: [None; Square::COUNT],
            bb_piece: [Bitboard::EMPTY; Piece::COUNT],
            bb_color: [Bitboard::EMPTY; Color::COUNT],
            bb_occupied: Bitboard::EMPTY,
            king_squares: [Square::E1, Square::E8],
            side_to_move: Color::White,
            castling_rights: CastlingRight::empty(),
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: History::default(),
        }
    }

    fn read_piece_placement(&mut self, piece_placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = piece_placement.split('/').collect();
        if ranks.len() != Rank::COUNT {
            return Err(FenError::InvalidPiecePlacement);
        }

        for (rank, description) in Rank::ALL.iter().rev().zip(ranks) {
            let mut file_index = 0usize;
            for c in description.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip == 0 {
                        return Err(FenError::InvalidPiecePlacement);
                    }
                    file_index += skip as usize;
                } else {
                    let piece = Piece::try_from(c).map_err(|_| FenError::InvalidPiecePlacement)?;
                    if file_index >= File::COUNT {
                        return Err(FenError::InvalidPiecePlacement);
                    }
                    self.put_piece(piece, Square::new(File::ALL[file_index], *rank));
                    file_index += 1;
                }

                if file_index > File::COUNT {
                    return Err(FenError::InvalidPiecePlacement);
                }
            }

            if file_index != File::COUNT {
                return Err(FenError::InvalidPiecePlacement);
            }
        }

        for color in Color::ALL {
            if !self.occupied((color, PieceType::King)).has_one() {
                return Err(FenError::InvalidKingCount(color));
            }
        }

        Ok(())
    }

    fn read_active_color(&mut self, active_color: &str) -> Result<(), FenError> {
        self.side_to_move = match active_color {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenError::InvalidActiveColor),
        };
        Ok(())
    }

    fn read_castling(&mut self, castling_availability: &str) -> Result<(), FenError> {
        if castling_availability == "-" {
            return Ok(());
        }

        for c in castling_availability.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastlingSide::Kingside),
                'Q' => (Color::White, CastlingSide::Queenside),
                'k' => (Color::Black, CastlingSide::Kingside),
                'q' => (Color::Black, CastlingSide::Queenside),
                _ => return Err(FenError::InvalidCastlingAvailability),
            };

            // The king and the rook must still be on their initial squares.
            let rank = Rank::R1.relative_to_color(color);
            let rook_file = match side {
                CastlingSide::Kingside => File::H,
                CastlingSide::Queenside => File::A,
            };
            if self[Square::new(File::E, rank)] != Some(Piece::new(color, PieceType::King))
                || self[Square::new(rook_file, rank)] != Some(Piece::new(color, PieceType::Rook))
            {
                return Err(FenError::InvalidCastlingAvailability);
            }

            self.castling_rights |= CastlingRight::new(color, side);
        }

        Ok(())
    }

    fn read_en_passant_square(&mut self, en_passant_square: &str) -> Result<(), FenError> {
        self.en_passant_square = match en_passant_square {
            "-" => None,
            _ => {
                let square = Square::try_from(en_passant_square).map_err(|_| FenError::InvalidEnPassantSquare)?;
                if square.rank() != Rank::R6.relative_to_color(self.side_to_move) {
                    return Err(FenError::InvalidEnPassantSquare);
                }
                Some(square)
            }
        };
        Ok(())
    }

    /// Builds a position from a FEN string. The history of the new position is empty.
    ///
    /// Piece placement and active color are mandatory. Missing castling, en passant and counter fields read as
    /// "- - 0 1". Beyond the syntax, the reader refuses positions the make/unmake engine can not handle: a side
    /// without exactly one king, a king that could be captured by the side to move, a castling right whose king or
    /// rook has left its home square, and an en passant target that is not on the third rank of the side that just
    /// moved.
    pub fn new_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut position = Position::empty();

        let mut fields = fen.split_whitespace();
        position.read_piece_placement(fields.next().ok_or(FenError::MissingField)?)?;
        position.read_active_color(fields.next().ok_or(FenError::MissingField)?)?;
        position.read_castling(fields.next().unwrap_or("-"))?;
        position.read_en_passant_square(fields.next().unwrap_or("-"))?;

        position.halfmove_clock = fields.next().unwrap_or("0").parse().map_err(|_| FenError::InvalidHalfmoveClock)?;

        position.fullmove_number =
            fields.next().unwrap_or("1").parse().map_err(|_| FenError::InvalidFullmoveNumber)?;
        if position.fullmove_number == 0 {
            return Err(FenError::InvalidFullmoveNumber);
        }

        let them = !position.side_to_move;
        if attacks::is_square_attacked(&position, position.king_square(them), position.side_to_move) {
            return Err(FenError::OpponentInCheck(them));
        }

        Ok(position)
    }

    /// Creates a new chess position with the standard initial board setup.
    pub fn new() -> Self {
        Self::new_from_fen(INITIAL_POSITION_FEN).expect("The initial position FEN is valid")
    }

    fn write_piece_placement(&self) -> String {
        let mut result = String::with_capacity(70);
        for rank in Rank::ALL.iter().rev() {
            let mut empty_count = 0;
            for file in File::ALL {
                if let Some(piece) = self[Square::new(file, *rank)] {
                    if empty_count > 0 {
                        result.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    result.push(piece.into());
                } else {
                    empty_count += 1;
                }
            }
            if empty_count > 0 {
                result.push_str(&empty_count.to_string());
            }
            if *rank != Rank::R1 {
                result.push('/');
            }
        }
        result
    }

    fn write_castling(&self) -> String {
        if self.castling_rights.is_empty() {
            return String::from("-");
        }

        [
            (CastlingRight::WHITE_KINGSIDE, 'K'),
            (CastlingRight::WHITE_QUEENSIDE, 'Q'),
            (CastlingRight::BLACK_KINGSIDE, 'k'),
            (CastlingRight::BLACK_QUEENSIDE, 'q'),
        ]
        .iter()
        .filter(|(right, _)| self.castling_rights.contains(*right))
        .map(|(_, c)| *c)
        .collect()
    }

    /// Writes the position as a FEN string.
    ///
    /// The en passant field holds the en passant target whenever one is set, whether or not a pawn can capture it.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.write_piece_placement(),
            char::from(self.side_to_move),
            self.write_castling(),
            self.en_passant_square.map_or(String::from("-"), |square| square.to_string()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Draws the board, rank 8 first, with '.' for empty squares:
    ///
    /// 8  r n b q k b n r
    /// 7  p p p p p p p p
    /// 6  . . . . . . . .
    /// 5  . . . . . . . .
    /// 4  . . . . . . . .
    /// 3  . . . . . . . .
    /// 2  P P P P P P P P
    /// 1  R N B Q K B N R
    ///    a b c d e f g h
    ///
    pub fn to_compact_string(&self) -> String {
        let mut board = String::with_capacity(171);
        for rank in Rank::ALL.iter().rev() {
            board.push_str(&format!("{}  ", rank));
            for file in File::ALL {
                match self[Square::new(file, *rank)] {
                    Some(piece) => board.push(piece.into()),
                    None => board.push('.'),
                }
                board.push(if file != File::H { ' ' } else { '\n' });
            }
        }
        board.push_str("   a b c d e f g h");

        board
    }

    /// Reads the piece-set view. The filter converts from a `Color`, a `PieceType`, a `Piece` or a `(Color, PieceType)`
    /// tuple, e.g. `position.occupied((Color::Black, PieceType::Rook))`.
    #[inline(always)]
    pub fn occupied<F: Into<OccupancyFilter>>(&self, filter: F) -> Bitboard {
        match filter.into() {
            OccupancyFilter::All => self.bb_occupied,

            OccupancyFilter::ByColor(color) => self.bb_color[usize::from(color)],

            OccupancyFilter::ByType(piece_type) => {
                self.bb_piece[usize::from(Piece::new(Color::White, piece_type))]
                    | self.bb_piece[usize::from(Piece::new(Color::Black, piece_type))]
            }

            OccupancyFilter::ByPiece(piece) => self.bb_piece[usize::from(piece)],

            OccupancyFilter::ByColorAndType(color, piece_type) => {
                self.bb_piece[usize::from(Piece::new(color, piece_type))]
            }

            OccupancyFilter::ByColorAndTwoTypes(color, type1, type2) => {
                self.bb_piece[usize::from(Piece::new(color, type1))]
                    | self.bb_piece[usize::from(Piece::new(color, type2))]
            }
        }
    }

    /// Returns the piece on a square, if any.
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.board[usize::from(square)]
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the castling rights still held by both sides.
    pub fn castling_availability(&self) -> CastlingRight {
        self.castling_rights
    }

    /// Returns the en passant target square of the position.
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    /// Returns the number of plies since the last pawn move or capture.
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Returns the number of moves made on this position that have not been unmade.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Reads the king-square cache.
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[usize::from(color)]
    }

    /// Returns whether the king of the side to move is attacked.
    pub fn is_check(&self) -> bool {
        attacks::is_square_attacked(self, self.king_square(self.side_to_move), !self.side_to_move)
    }

    /// Puts a piece on an empty square in both views.
    fn put_piece(&mut self, piece: Piece, square: Square) {
        debug_assert_eq!(self.board[usize::from(square)], None);

        self.board[usize::from(square)] = Some(piece);
        self.bb_color[usize::from(piece.color())] |= square;
        self.bb_piece[usize::from(piece)] |= square;
        self.bb_occupied |= square;

        if piece.piece_type() == PieceType::King {
            self.king_squares[usize::from(piece.color())] = square;
        }
    }

    /// Removes a piece from a specific square and returns it.
    fn remove_piece(&mut self, square: Square) -> Piece {
        let piece = self.board[usize::from(square)].expect("There is no piece to remove on the square");
        self.board[usize::from(square)] = None;
        self.bb_color[usize::from(piece.color())] ^= square;
        self.bb_piece[usize::from(piece)] ^= square;
        self.bb_occupied ^= square;
        piece
    }

    /// Relocates `piece` from `from` to the empty square `to`. A single xor of both squares updates every bitboard.
    fn move_piece(&mut self, piece: Piece, from: Square, to: Square) {
        debug_assert_eq!(self.board[usize::from(from)], Some(piece));
        debug_assert_eq!(self.board[usize::from(to)], None);

        self.board[usize::from(from)] = None;
        self.board[usize::from(to)] = Some(piece);
        let bb = from | to;
        self.bb_color[usize::from(piece.color())] ^= bb;
        self.bb_piece[usize::from(piece)] ^= bb;
        self.bb_occupied ^= bb;

        if piece.piece_type() == PieceType::King {
            self.king_squares[usize::from(piece.color())] = to;
        }
    }

    /// Checks that the square-indexed view, the piece bitboards, the color bitboards, the union bitboard and the king
    /// cache all describe the same board, with exactly one king per side.
    pub fn is_consistent(&self) -> bool {
        let mut bb_piece = [Bitboard::EMPTY; Piece::COUNT];
        let mut bb_color = [Bitboard::EMPTY; Color::COUNT];

        for square in Square::ALL {
            if let Some(piece) = self[square] {
                bb_piece[usize::from(piece)] |= square;
                bb_color[usize::from(piece.color())] |= square;
            }
        }

        let kings_cached = Color::ALL
            .iter()
            .all(|&color| self.occupied((color, PieceType::King)) == Bitboard::from(self.king_square(color)));

        bb_piece == self.bb_piece
            && bb_color == self.bb_color
            && (self.bb_color[0] & self.bb_color[1]).has_none()
            && self.bb_occupied == self.bb_color[0] | self.bb_color[1]
            && kings_cached
    }
}

impl Default for Position {
    /// The standard initial position.
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Square> for Position {
    type Output = Option<Piece>;
    fn index(&self, index: Square) -> &Self::Output {
        &self.board[usize::from(index)]
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_compact_string())
    }
}
