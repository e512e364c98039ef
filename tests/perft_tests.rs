//! Full-depth perft runs with the published node counts and per-move-kind
//! breakdowns. These walk hundreds of millions of nodes; run them with
//! `cargo test --release -- --ignored`.

use mpchess::board::movegen::PerftInfo;
use mpchess::board::Board;

fn perft_full(fen: &str, depth: usize) -> (u64, PerftInfo) {
    let mut board = Board::from_fen(fen).unwrap();
    let mut info = PerftInfo::default();
    let nodes = board.perft_with_info(depth, &mut info);
    (nodes, info)
}

#[test]
#[ignore = "walks 119M nodes"]
fn perft_startpos_depth_6() {
    let (nodes, info) = perft_full("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 6);
    assert_eq!(nodes, 119_060_324);
    assert_eq!(info.captures, 2_812_008);
    assert_eq!(info.enpassants, 5_248);
    assert_eq!(info.castles, 0);
    assert_eq!(info.promotions, 0);
    assert_eq!(info.checks, 809_099);
}

#[test]
#[ignore = "walks 193M nodes"]
fn perft_kiwipete_depth_5() {
    let (nodes, info) = perft_full(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        5,
    );
    assert_eq!(nodes, 193_690_690);
    assert_eq!(info.captures, 35_043_416);
    assert_eq!(info.enpassants, 73_365);
    assert_eq!(info.castles, 4_993_637);
    assert_eq!(info.promotions, 8_392);
    assert_eq!(info.checks, 3_309_887);
}

#[test]
#[ignore = "walks 178M nodes"]
fn perft_position_3_depth_7() {
    let (nodes, _) = perft_full("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 7);
    assert_eq!(nodes, 178_633_661);
}

#[test]
#[ignore = "walks 15M nodes"]
fn perft_position_4_depth_5() {
    let (nodes, _) = perft_full(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        5,
    );
    assert_eq!(nodes, 15_833_292);
}

#[test]
#[ignore = "walks 89M nodes"]
fn perft_position_5_depth_5() {
    let (nodes, _) = perft_full("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8", 5);
    assert_eq!(nodes, 89_941_194);
}

#[test]
#[ignore = "walks 164M nodes"]
fn perft_position_6_depth_5() {
    let (nodes, _) = perft_full(
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        5,
    );
    assert_eq!(nodes, 164_075_551);
}
