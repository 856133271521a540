pub mod bitboard;
pub mod config;
pub mod coordinates;
pub mod history;
pub mod legality;
pub mod r#move;
pub mod move_gen;
pub mod notation;
pub mod perft;
pub mod piece;
pub mod position;
