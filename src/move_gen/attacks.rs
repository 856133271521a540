use once_cell::sync::Lazy;

use crate::{
    bitboard::Bitboard,
    coordinates::{CoordinatesResult, File, Square},
    piece::{Color, PieceType},
    position::{OccupancyFilter, Position},
};

type Step = fn(Square) -> CoordinatesResult<Square>;

/// The eight directions a sliding piece can move in. The first four increase the square index, the last four decrease
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    North,
    NorthEast,
    East,
    NorthWest,
    South,
    SouthWest,
    West,
    SouthEast,
}

impl Direction {
    const COUNT: usize = 8;
    const ALL: [Direction; Direction::COUNT] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::NorthWest,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::SouthEast,
    ];
    const ORTHOGONAL: [Direction; 4] = [Direction::North, Direction::East, Direction::South, Direction::West];
    const DIAGONAL: [Direction; 4] =
        [Direction::NorthEast, Direction::NorthWest, Direction::SouthWest, Direction::SouthEast];

    fn step(self, square: Square) -> CoordinatesResult<Square> {
        match self {
            Direction::North => square.up(1),
            Direction::NorthEast => square.up(1).and_then(|sq| sq.right(1)),
            Direction::East => square.right(1),
            Direction::NorthWest => square.up(1).and_then(|sq| sq.left(1)),
            Direction::South => square.down(1),
            Direction::SouthWest => square.down(1).and_then(|sq| sq.left(1)),
            Direction::West => square.left(1),
            Direction::SouthEast => square.down(1).and_then(|sq| sq.right(1)),
        }
    }

    fn is_increasing(self) -> bool {
        matches!(self, Direction::North | Direction::NorthEast | Direction::East | Direction::NorthWest)
    }
}

/// Squares reached from a square in a direction on an empty board, edge included.
static RAYS: Lazy<[[Bitboard; Square::COUNT]; Direction::COUNT]> = Lazy::new(|| {
    let mut rays = [[Bitboard::EMPTY; Square::COUNT]; Direction::COUNT];
    for (index, direction) in Direction::ALL.iter().enumerate() {
        for square in Square::ALL {
            let mut next = direction.step(square);
            while let Ok(to) = next {
                rays[index][usize::from(square)] |= to;
                next = direction.step(to);
            }
        }
    }
    rays
});

fn leaper_attacks(steps: &[Step]) -> [Bitboard; Square::COUNT] {
    let mut attacks = [Bitboard::EMPTY; Square::COUNT];
    for square in Square::ALL {
        for step in steps {
            if let Ok(to) = step(square) {
                attacks[usize::from(square)] |= to;
            }
        }
    }
    attacks
}

static KNIGHT_ATTACKS: Lazy<[Bitboard; Square::COUNT]> = Lazy::new(|| {
    let steps: [Step; 8] = [
        |sq| sq.up(2).and_then(|sq| sq.left(1)),
        |sq| sq.up(2).and_then(|sq| sq.right(1)),
        |sq| sq.down(2).and_then(|sq| sq.left(1)),
        |sq| sq.down(2).and_then(|sq| sq.right(1)),
        |sq| sq.left(2).and_then(|sq| sq.up(1)),
        |sq| sq.left(2).and_then(|sq| sq.down(1)),
        |sq| sq.right(2).and_then(|sq| sq.up(1)),
        |sq| sq.right(2).and_then(|sq| sq.down(1)),
    ];
    leaper_attacks(&steps)
});

static KING_ATTACKS: Lazy<[Bitboard; Square::COUNT]> = Lazy::new(|| {
    let steps: [Step; 8] = [
        |sq| sq.up(1),
        |sq| sq.down(1),
        |sq| sq.left(1),
        |sq| sq.right(1),
        |sq| sq.up(1).and_then(|sq| sq.left(1)),
        |sq| sq.up(1).and_then(|sq| sq.right(1)),
        |sq| sq.down(1).and_then(|sq| sq.left(1)),
        |sq| sq.down(1).and_then(|sq| sq.right(1)),
    ];
    leaper_attacks(&steps)
});

/// Attacks of a slider along one ray, stopping on (and including) the first occupied square.
fn ray_attacks(direction: Direction, occupied: Bitboard, square: Square) -> Bitboard {
    let rays = &RAYS[direction as usize];
    let ray = rays[usize::from(square)];
    let blockers = ray & occupied;

    let first_blocker = if direction.is_increasing() { blockers.lsb() } else { blockers.msb() };
    match first_blocker {
        Some(blocker) => ray ^ rays[usize::from(blocker)],
        None => ray,
    }
}

/// Returns the squares attacked by a rook on `square`, the occupied squares blocking its rays.
pub fn rook_attacks(occupied: Bitboard, square: Square) -> Bitboard {
    Direction::ORTHOGONAL
        .iter()
        .fold(Bitboard::EMPTY, |attacks, direction| attacks | ray_attacks(*direction, occupied, square))
}

/// Returns the squares attacked by a bishop on `square`, the occupied squares blocking its rays.
pub fn bishop_attacks(occupied: Bitboard, square: Square) -> Bitboard {
    Direction::DIAGONAL
        .iter()
        .fold(Bitboard::EMPTY, |attacks, direction| attacks | ray_attacks(*direction, occupied, square))
}

pub fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[usize::from(square)]
}

pub fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[usize::from(square)]
}

/// Returns the squares a pawn of the given color standing on `square` attacks.
pub fn pawn_attacks(color: Color, square: Square) -> Bitboard {
    let bb = Bitboard::from(square);
    let not_a = bb & !Bitboard::from(File::A);
    let not_h = bb & !Bitboard::from(File::H);
    match color {
        Color::White => (not_a << 7) | (not_h << 9),
        Color::Black => (not_a >> 9) | (not_h >> 7),
    }
}

/// Returns a bitboard with all squares attacked by a non-pawn piece type from a given square.
///
/// For sliding pieces (rook, bishop, queen), the occupied squares block the attack rays.
///
/// # Panics
/// Panics on pawns, whose attacks depend on their color. Use `pawn_attacks` instead.
pub fn attacks_from(piece_type: PieceType, occupied: Bitboard, square: Square) -> Bitboard {
    match piece_type {
        PieceType::Knight => knight_attacks(square),
        PieceType::Bishop => bishop_attacks(occupied, square),
        PieceType::Rook => rook_attacks(occupied, square),
        PieceType::Queen => rook_attacks(occupied, square) | bishop_attacks(occupied, square),
        PieceType::King => king_attacks(square),
        PieceType::Pawn => panic!("Pawn attacks depend on the color, use pawn_attacks"),
    }
}

/// Returns whether a piece of color `by` attacks `square` in the position.
pub fn is_square_attacked(position: &Position, square: Square, by: Color) -> bool {
    let occupied = position.occupied(OccupancyFilter::All);

    // A pawn of `by` attacks the square exactly when a pawn of the other color on the square would attack it back.
    (pawn_attacks(!by, square) & position.occupied((by, PieceType::Pawn))).has_any()
        || (knight_attacks(square) & position.occupied((by, PieceType::Knight))).has_any()
        || (king_attacks(square) & position.occupied((by, PieceType::King))).has_any()
        || (bishop_attacks(occupied, square) & position.occupied((by, PieceType::Bishop, PieceType::Queen))).has_any()
        || (rook_attacks(occupied, square) & position.occupied((by, PieceType::Rook, PieceType::Queen))).has_any()
}
