//! Perft (move path enumeration) tests for move generation correctness.
//!
//! Depths are kept CI-friendly; the full-depth runs with the published
//! node counts live in `tests/perft_tests.rs`.

use crate::board::movegen::PerftInfo;
use crate::board::Board;

struct TestPosition {
    name: &'static str,
    fen: &'static str,
    depths: &'static [(usize, u64)],
}

const TEST_POSITIONS: &[TestPosition] = &[
    TestPosition {
        name: "Initial Position",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        depths: &[(1, 20), (2, 400), (3, 8902), (4, 197281)],
    },
    TestPosition {
        name: "Kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depths: &[(1, 48), (2, 2039), (3, 97862)],
    },
    TestPosition {
        name: "Position 3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depths: &[(1, 14), (2, 191), (3, 2812), (4, 43238)],
    },
    TestPosition {
        name: "Position 4",
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        depths: &[(1, 6), (2, 264), (3, 9467)],
    },
    TestPosition {
        name: "Position 5",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        depths: &[(1, 44), (2, 1486), (3, 62379)],
    },
    TestPosition {
        name: "Position 6",
        fen: "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        depths: &[(1, 46), (2, 2079), (3, 89890)],
    },
    TestPosition {
        name: "En Passant",
        fen: "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        depths: &[(1, 31), (2, 707), (3, 21637)],
    },
    TestPosition {
        name: "Promotion",
        fen: "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        depths: &[(1, 24), (2, 496), (3, 9483)],
    },
    TestPosition {
        name: "Castling",
        fen: "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
        depths: &[(1, 26), (2, 568), (3, 13744)],
    },
];

#[test]
fn test_perft_positions() {
    for position in TEST_POSITIONS {
        let mut board = Board::from_fen(position.fen).unwrap();
        for &(depth, expected) in position.depths {
            let nodes = board.perft(depth);
            assert_eq!(
                nodes, expected,
                "perft mismatch for '{}' at depth {depth}: expected {expected}, got {nodes}",
                position.name
            );
        }
    }
}

#[test]
fn test_perft_breakdown_startpos() {
    let mut board = Board::new();
    let mut info = PerftInfo::default();
    let nodes = board.perft_with_info(4, &mut info);

    assert_eq!(nodes, 197281);
    assert_eq!(info.captures, 1576);
    assert_eq!(info.enpassants, 0);
    assert_eq!(info.castles, 0);
    assert_eq!(info.promotions, 0);
    assert_eq!(info.checks, 469);
}

#[test]
fn test_perft_breakdown_kiwipete() {
    let mut board = Board::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .unwrap();
    let mut info = PerftInfo::default();
    let nodes = board.perft_with_info(3, &mut info);

    assert_eq!(nodes, 97862);
    assert_eq!(info.captures, 17102);
    assert_eq!(info.enpassants, 45);
    assert_eq!(info.castles, 3162);
    assert_eq!(info.promotions, 0);
    assert_eq!(info.checks, 993);
}

#[test]
fn test_perft_breakdown_position3() {
    let mut board = Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
    let mut info = PerftInfo::default();
    let nodes = board.perft_with_info(4, &mut info);

    assert_eq!(nodes, 43238);
    assert_eq!(info.captures, 3348);
    assert_eq!(info.enpassants, 123);
    assert_eq!(info.castles, 0);
    assert_eq!(info.promotions, 0);
    assert_eq!(info.checks, 1680);
}

#[test]
fn test_perft_board_restored() {
    let mut board = Board::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .unwrap();
    let fen_before = board.to_fen();
    let key_before = board.zobrist_key();
    let _ = board.perft(3);
    assert_eq!(board.to_fen(), fen_before);
    assert_eq!(board.zobrist_key(), key_before);
}
