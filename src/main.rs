use clap::Parser;
use kestrel::{
    config::{get_config, initialize},
    legality::MoveSequenceError,
    perft::run_perft,
    position::{FenError, Position},
};
use thiserror::Error;

#[derive(Error, Debug)]
enum KestrelError {
    #[error("Error in the configuration: {0}")]
    ConfigError(#[from] kestrel::config::ConfigError),

    #[error("Error during the perft command: {0}")]
    PerftError(#[from] kestrel::perft::PerftError),

    #[error("Invalid FEN: {0}")]
    FenError(#[from] FenError),

    #[error("{0}")]
    MoveSequenceError(#[from] MoveSequenceError),
}

mod arguments {
    use std::path::PathBuf;

    use clap::{Parser, Subcommand};

    /// A reversible chess position core
    #[derive(Parser)]
    #[command(
        name = "kestrel",
        author = "Mathieu Pagé",
        version = "0.1.0",
        about = "A reversible chess position core"
    )]
    pub struct KestrelArgs {
        /// Path of a configuration file (TOML, JSON or YAML)
        #[arg(short, long, global = true)]
        pub config: Option<PathBuf>,

        #[command(subcommand)]
        pub command: Commands,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Commands {
        /// Calculate the perft of a position
        Perft {
            /// The depth to calculate the perft
            #[arg(short, long)]
            depth: Option<u16>,

            /// FEN string representing the position to calculate the perft
            #[arg(short, long)]
            fen: Option<String>,
        },

        /// Play moves in coordinate notation through the legality filter and show the resulting position
        Play {
            /// FEN string representing the starting position
            #[arg(short, long)]
            fen: Option<String>,

            /// The moves to play, e.g. e2e4 e7e5 g1f3
            moves: Vec<String>,
        },
    }
}

fn play(fen: &str, moves: &[String]) -> Result<(), KestrelError> {
    let mut position = Position::new_from_fen(fen)?;

    position.play_coordinate_moves(moves)?;

    println!("{}\n", position);
    println!("FEN: {}", position.to_fen());
    if position.is_check() {
        println!("Check");
    }

    Ok(())
}

fn run() -> Result<(), KestrelError> {
    // Parse command line arguments
    let args = arguments::KestrelArgs::parse();

    initialize(args.config)?;
    let config = get_config();

    // Run the command
    match args.command {
        arguments::Commands::Perft { depth, fen } => {
            run_perft(fen.as_deref().unwrap_or(&config.start_fen), depth.unwrap_or(config.perft_depth))?;
        }
        arguments::Commands::Play { fen, moves } => {
            play(fen.as_deref().unwrap_or(&config.start_fen), &moves)?;
        }
    }

    Ok(())
}

/// Main entry point for the kestrel command line.
fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
