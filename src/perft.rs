use std::time::Instant;

use thiserror::Error;

use crate::{
    move_gen::{generate_legal_moves, move_list::MoveList},
    position::{FenError, Position},
    r#move::Move,
};

/// Represents errors that can occur during perft (performance test) operations.
#[derive(Error, Debug)]
pub enum PerftError {
    #[error("Invalid FEN ({0}): {1}")]
    InvalidFen(String, FenError),
}

/// Counts the leaf nodes of the legal move tree of the given depth.
///
/// Every interior node is visited with make/unmake, so the position is left exactly as it was. At depth 1 the legal
/// moves are counted without being made a second time.
pub fn perft(position: &mut Position, depth: u16) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::default();
    generate_legal_moves(position, &mut moves);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves.iter().copied() {
        position.make(mv);
        nodes += perft(position, depth - 1);
        position.unmake(mv);
    }
    nodes
}

/// Returns the perft count below each legal move of the position, in generation order.
///
/// At depth 0 no move is played, so the result is empty.
pub fn divide(position: &mut Position, depth: u16) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let mut moves = MoveList::default();
    generate_legal_moves(position, &mut moves);

    moves
        .iter()
        .copied()
        .map(|mv| {
            position.make(mv);
            let nodes = perft(position, depth - 1);
            position.unmake(mv);
            (mv, nodes)
        })
        .collect()
}

/// Runs a divide on a FEN position and prints the count of every root move, the total and the speed.
///
/// Returns the total number of leaf nodes.
pub fn run_perft(fen: &str, depth: u16) -> Result<u64, PerftError> {
    let mut position = Position::new_from_fen(fen).map_err(|e| PerftError::InvalidFen(fen.to_string(), e))?;

    println!("Perft ({}) for position:\n\n{}\n", depth, position.to_compact_string());

    let start = Instant::now();
    let divided = divide(&mut position, depth);
    for (mv, count) in divided.iter() {
        println!("{}\t{}", mv.to_uci_string(), count);
    }
    let nodes: u64 = if divided.is_empty() {
        perft(&mut position, depth)
    } else {
        divided.iter().map(|(_, count)| count).sum()
    };
    let duration = start.elapsed();

    println!("\nNodes: {}", nodes);
    println!("Time: {:.3}", duration.as_secs_f64());
    println!("Nodes per second: {:.0}", nodes as f64 / duration.as_secs_f64().max(f64::EPSILON));

    Ok(nodes)
}
