use crate::{
    bitboard::Bitboard,
    coordinates::{File, Rank, Square},
    piece::{Color, Piece, PieceType},
    position::{OccupancyFilter, Position},
    r#move::{CastlingRight, CastlingSide, Move},
};

use super::{
    attacks::{attacks_from, is_square_attacked, pawn_attacks},
    move_list::MoveList,
};

/// Shifts a bitboard towards the opponent's side of the board.
fn shift_forward(color: Color, bb: Bitboard, shift: u32) -> Bitboard {
    match color {
        Color::White => bb << shift,
        Color::Black => bb >> shift,
    }
}

/// Returns the square a pawn moving forward by `shift` squares started from.
fn shift_back(color: Color, square: Square, shift: u8) -> Square {
    match color {
        Color::White => Square::from(u8::from(square) - shift),
        Color::Black => Square::from(u8::from(square) + shift),
    }
}

fn collect_pawn_moves(bb_to: Bitboard, get_from: impl Fn(Square) -> Square, mut add_moves: impl FnMut(Square, Square)) {
    for to_sq in bb_to {
        let from_sq = get_from(to_sq);
        add_moves(from_sq, to_sq);
    }
}

fn add_promotions(from_sq: Square, to_sq: Square, list: &mut MoveList) {
    for promotion in PieceType::PROMOTIONS {
        list.push(Move::new_promotion(from_sq, to_sq, promotion));
    }
}

fn generate_pawn_moves(position: &Position, color: Color, list: &mut MoveList) {
    let bb_rank_4 = Bitboard::from(Rank::R4.relative_to_color(color));
    let bb_rank_8 = Bitboard::from(Rank::R8.relative_to_color(color));
    let bb_empty = !position.occupied(OccupancyFilter::All);
    let bb_them = position.occupied(!color);
    let bb_from = position.occupied((color, PieceType::Pawn));

    // Single pawn pushes, promotions included
    let bb_single = shift_forward(color, bb_from, 8) & bb_empty;
    collect_pawn_moves(
        bb_single & !bb_rank_8,
        |sq| shift_back(color, sq, 8),
        |from_sq, to_sq| list.push(Move::new(from_sq, to_sq)),
    );
    collect_pawn_moves(bb_single & bb_rank_8, |sq| shift_back(color, sq, 8), |from_sq, to_sq| {
        add_promotions(from_sq, to_sq, list)
    });

    // Double pawn pushes
    let bb_double = shift_forward(color, bb_single, 8) & bb_empty & bb_rank_4;
    collect_pawn_moves(
        bb_double,
        |sq| shift_back(color, sq, 16),
        |from_sq, to_sq| list.push(Move::new_double_pawn_push(from_sq, to_sq)),
    );

    // Captures towards file A, then towards file H
    let (shift_a, shift_h) = match color {
        Color::White => (7, 9),
        Color::Black => (9, 7),
    };
    for (bb_source, shift) in
        [(bb_from & !Bitboard::from(File::A), shift_a), (bb_from & !Bitboard::from(File::H), shift_h)]
    {
        let bb_to = shift_forward(color, bb_source, shift) & bb_them;
        collect_pawn_moves(
            bb_to & !bb_rank_8,
            |sq| shift_back(color, sq, shift as u8),
            |from_sq, to_sq| list.push(Move::new(from_sq, to_sq)),
        );
        collect_pawn_moves(bb_to & bb_rank_8, |sq| shift_back(color, sq, shift as u8), |from_sq, to_sq| {
            add_promotions(from_sq, to_sq, list)
        });
    }

    // En passant. The capturing pawns are the pawns that would attack the en passant square if they were of the
    // opposite color.
    if let Some(ep_sq) = position.en_passant_square() {
        let pushed_pawn = position[shift_back(color, ep_sq, 8)];
        if position[ep_sq].is_none() && pushed_pawn == Some(Piece::new(!color, PieceType::Pawn)) {
            for from_sq in pawn_attacks(!color, ep_sq) & bb_from {
                list.push(Move::new_en_passant(from_sq, ep_sq));
            }
        }
    }
}

fn generate_piece_moves(position: &Position, color: Color, piece_type: PieceType, list: &mut MoveList) {
    let occupied = position.occupied(OccupancyFilter::All);
    let targets = !position.occupied(color);

    for from_sq in position.occupied(Piece::new(color, piece_type)) {
        for to_sq in attacks_from(piece_type, occupied, from_sq) & targets {
            list.push(Move::new(from_sq, to_sq));
        }
    }
}

fn generate_castling(position: &Position, color: Color, side: CastlingSide, list: &mut MoveList) {
    if !position.castling_availability().contains(CastlingRight::new(color, side)) {
        return;
    }

    let rank = Rank::R1.relative_to_color(color);
    let king_sq = Square::new(File::E, rank);
    let (rook_file, king_final_file) = match side {
        CastlingSide::Kingside => (File::H, File::G),
        CastlingSide::Queenside => (File::A, File::C),
    };
    let rook_sq = Square::new(rook_file, rank);
    let king_final_sq = Square::new(king_final_file, rank);

    if position[king_sq] != Some(Piece::new(color, PieceType::King))
        || position[rook_sq] != Some(Piece::new(color, PieceType::Rook))
    {
        return;
    }

    // Every square between the king and the rook must be empty.
    if (Bitboard::between(king_sq, rook_sq) & position.occupied(OccupancyFilter::All)).has_any() {
        return;
    }

    // The king can not castle out of, through or into check.
    for sq in Bitboard::between(king_sq, king_final_sq) | king_sq | king_final_sq {
        if is_square_attacked(position, sq, !color) {
            return;
        }
    }

    list.push(Move::new_castling(king_sq, king_final_sq));
}

/// Generates all pseudo-legal moves of the side to move. Moves that leave the own king in check are included.
pub fn generate_moves(position: &Position, list: &mut MoveList) {
    let color = position.side_to_move();

    generate_pawn_moves(position, color, list);
    for piece_type in [PieceType::Knight, PieceType::Bishop, PieceType::Rook, PieceType::Queen, PieceType::King] {
        generate_piece_moves(position, color, piece_type, list);
    }
    for side in CastlingSide::ALL {
        generate_castling(position, color, side, list);
    }
}
