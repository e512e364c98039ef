//! Property-based tests over random game walks.

use proptest::prelude::*;

use crate::board::types::Move;
use crate::board::Board;

fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=30usize
}

fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn random_game(seed: u64, num_moves: usize) -> (Board, Vec<Move>) {
    use rand::prelude::*;

    let mut board = Board::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut made = Vec::new();

    for _ in 0..num_moves {
        let moves = board.generate_legal_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        board.make_move(mv);
        made.push(mv);
    }

    (board, made)
}

proptest! {
    /// make followed by unmake restores the position bitwise, key included
    #[test]
    fn prop_make_unmake_restores_state(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let initial = Board::new();
        let (mut board, made) = random_game(seed, num_moves);

        for _ in 0..made.len() {
            board.unmake_move();
        }

        prop_assert_eq!(board.to_fen(), initial.to_fen());
        prop_assert_eq!(board.zobrist_key(), initial.zobrist_key());
    }

    /// the incremental key always equals direct hashing of the position
    #[test]
    fn prop_incremental_key_matches_direct(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let (board, _) = random_game(seed, num_moves);
        prop_assert_eq!(board.zobrist_key(), board.compute_key());
    }

    /// FEN serialization round-trips, key included
    #[test]
    fn prop_fen_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let (board, _) = random_game(seed, num_moves);

        let fen = board.to_fen();
        let restored = Board::from_fen(&fen).unwrap();

        prop_assert_eq!(restored.to_fen(), fen);
        prop_assert_eq!(restored.zobrist_key(), board.zobrist_key());
        prop_assert_eq!(restored.castling_rights(), board.castling_rights());
        prop_assert_eq!(restored.enpassant_square(), board.enpassant_square());
    }

    /// every generated legal move really leaves the own king safe
    #[test]
    fn prop_legal_moves_are_legal(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let (mut board, _) = random_game(seed, num_moves);

        let side = board.side_to_move();
        let moves = board.generate_legal_moves();
        for &mv in &moves {
            board.make_move(mv);
            prop_assert!(!board.is_check(side), "king left in check by {}", mv);
            board.unmake_move();
        }
    }

    /// UCI notation round-trips for every legal move
    #[test]
    fn prop_uci_move_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let (mut board, _) = random_game(seed, num_moves);

        let moves = board.generate_legal_moves();
        for &mv in &moves {
            let notation = mv.to_string();
            let reparsed = crate::uci::parse_uci_move(&mut board, &notation).unwrap();
            prop_assert_eq!(reparsed.to_string(), notation);
        }
    }
}
