use kestrel::{perft::perft, position::Position};

fn assert_perft(fen: &str, expected: &[u64]) {
    let original = Position::new_from_fen(fen).unwrap();
    let mut position = original.clone();

    for (depth, nodes) in expected.iter().enumerate() {
        assert_eq!(perft(&mut position, depth as u16 + 1), *nodes, "depth {} of {}", depth + 1, fen);
    }

    assert_eq!(position, original);
}

#[test]
fn test_perft_initial_position() {
    assert_perft("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", &[20, 400, 8902]);
}

#[test]
fn test_perft_kiwipete() {
    assert_perft("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", &[48, 2039, 97862]);
}

#[test]
fn test_perft_rook_endgame() {
    assert_perft("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812]);
}

#[test]
fn test_perft_promotions_and_pins() {
    assert_perft("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", &[6, 264, 9467]);
}

#[test]
fn test_perft_discovered_checks() {
    assert_perft("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8", &[44, 1486, 62379]);
}
