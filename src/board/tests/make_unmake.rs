//! Make/unmake identity tests over scripted game fragments.

use crate::board::types::Move;
use crate::board::{Board, GenType};
use crate::uci::parse_uci_move;

fn play(board: &mut Board, moves: &[&str]) -> Vec<Move> {
    moves
        .iter()
        .map(|s| {
            let mv = parse_uci_move(board, s).unwrap_or_else(|e| panic!("bad move {s}: {e}"));
            board.make_move(mv);
            mv
        })
        .collect()
}

fn unwind(board: &mut Board, count: usize) {
    for _ in 0..count {
        board.unmake_move();
    }
}

#[test]
fn test_opening_line_roundtrip() {
    let mut board = Board::new();
    let fen = board.to_fen();
    let key = board.zobrist_key();

    let made = play(
        &mut board,
        &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "g8f6", "e1g1"],
    );
    assert_eq!(board.ply_played(), made.len());

    unwind(&mut board, made.len());
    assert_eq!(board.to_fen(), fen);
    assert_eq!(board.zobrist_key(), key);
    assert_eq!(board.ply_played(), 0);
}

#[test]
fn test_replayed_key_matches_direct_hash() {
    let mut board = Board::new();
    play(
        &mut board,
        &["d2d4", "d7d5", "c2c4", "d5c4", "e2e4", "b7b5", "a2a4", "c7c6"],
    );
    // the incrementally maintained key equals hashing the position directly
    assert_eq!(board.zobrist_key(), board.compute_key());

    let roundtrip = Board::from_fen(&board.to_fen()).unwrap();
    assert_eq!(roundtrip.zobrist_key(), board.zobrist_key());
}

#[test]
fn test_castling_both_sides_roundtrip() {
    let mut board = Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
    let fen = board.to_fen();

    let made = play(&mut board, &["e1g1", "e8c8"]);
    assert_eq!(board.castling_rights(), 0);

    unwind(&mut board, made.len());
    assert_eq!(board.to_fen(), fen);
}

#[test]
fn test_en_passant_sequence_roundtrip() {
    let mut board = Board::new();
    let made = play(&mut board, &["e2e4", "g8f6", "e4e5", "d7d5", "e5d6"]);
    assert!(made[4].is_enpassant());

    unwind(&mut board, made.len());
    assert_eq!(board.to_fen(), Board::new().to_fen());
}

#[test]
fn test_promotion_capture_roundtrip() {
    let mut board = Board::from_fen("rn2k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let fen = board.to_fen();

    let mv = parse_uci_move(&mut board, "b7a8q").unwrap();
    assert!(mv.is_promote() && mv.is_capture());
    board.make_move(mv);
    board.unmake_move();

    assert_eq!(board.to_fen(), fen);
    assert_eq!(board.zobrist_key(), board.compute_key());
}

#[test]
fn test_deep_tree_walk_restores_everything() {
    // depth-3 walk over every legal line from a tactical middlegame
    let mut board = Board::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b KQkq - 0 1",
    )
    .unwrap();
    let fen = board.to_fen();
    let key = board.zobrist_key();

    fn walk(board: &mut Board, depth: usize) {
        if depth == 0 {
            return;
        }
        let side = board.side_to_move();
        let mut moves = crate::board::types::MoveList::new();
        board.generate_moves(GenType::Pseudolegal, &mut moves);
        for &mv in &moves {
            let key_before = board.zobrist_key();
            board.make_move(mv);
            if !board.is_check(side) {
                walk(board, depth - 1);
            }
            board.unmake_move();
            assert_eq!(board.zobrist_key(), key_before);
        }
    }

    walk(&mut board, 3);
    assert_eq!(board.to_fen(), fen);
    assert_eq!(board.zobrist_key(), key);
}
