//! Pseudo-legal move generation.
//!
//! Generators are parameterized by side and generation kind and do not
//! filter for legality; callers make the move, test `is_check`, and unmake.

mod kings;
mod pawns;
mod pieces;

use crate::board::types::{Color, MoveList, PieceType};

use super::Board;

/// What kind of moves to generate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenType {
    /// Non-captures only (includes castles, excludes promotion pushes)
    Quiet,
    /// Captures only (includes en passant and promotion captures)
    Capture,
    /// Everything: quiets, captures, and promotion pushes
    Pseudolegal,
}

impl Board {
    /// Generate pseudo-legal moves of the requested kind for `side`
    pub fn generate_moves_for(&self, gen: GenType, side: Color, list: &mut MoveList) {
        self.generate_pawn_moves(gen, side, list);
        self.generate_king_moves(gen, side, list);
        self.generate_piece_moves(gen, side, PieceType::Knight, list);
        self.generate_piece_moves(gen, side, PieceType::Bishop, list);
        self.generate_piece_moves(gen, side, PieceType::Rook, list);
        self.generate_piece_moves(gen, side, PieceType::Queen, list);
    }

    /// Generate pseudo-legal moves of the requested kind for the side to move
    pub fn generate_moves(&self, gen: GenType, list: &mut MoveList) {
        self.generate_moves_for(gen, self.side_to_move(), list);
    }

    /// All legal moves for the side to move, verified by make/check/unmake
    #[must_use]
    pub fn generate_legal_moves(&mut self) -> MoveList {
        let side = self.side_to_move();
        let mut pseudo = MoveList::new();
        self.generate_moves(GenType::Pseudolegal, &mut pseudo);

        let mut legal = MoveList::new();
        for &mv in &pseudo {
            self.make_move(mv);
            if !self.is_check(side) {
                legal.push(mv);
            }
            self.unmake_move();
        }
        legal
    }

    #[must_use]
    pub fn is_checkmate(&mut self) -> bool {
        let side = self.side_to_move();
        self.is_check(side) && self.generate_legal_moves().is_empty()
    }

    #[must_use]
    pub fn is_stalemate(&mut self) -> bool {
        let side = self.side_to_move();
        !self.is_check(side) && self.generate_legal_moves().is_empty()
    }
}

/// Leaf-move breakdown gathered by `perft_with_info`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PerftInfo {
    pub captures: u64,
    pub enpassants: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
}

impl Board {
    /// Count leaf nodes of the legal move tree to `depth`
    #[must_use]
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let side = self.side_to_move();
        let mut moves = MoveList::new();
        self.generate_moves(GenType::Pseudolegal, &mut moves);

        let mut nodes = 0;
        for &mv in &moves {
            self.make_move(mv);
            if !self.is_check(side) {
                nodes += if depth == 1 { 1 } else { self.perft(depth - 1) };
            }
            self.unmake_move();
        }
        nodes
    }

    /// Perft with a per-move-kind breakdown at the leaves
    #[must_use]
    pub fn perft_with_info(&mut self, depth: usize, info: &mut PerftInfo) -> u64 {
        if depth == 0 {
            return 1;
        }

        let side = self.side_to_move();
        let mut moves = MoveList::new();
        self.generate_moves(GenType::Pseudolegal, &mut moves);

        let mut nodes = 0;
        for &mv in &moves {
            self.make_move(mv);
            if !self.is_check(side) {
                if depth == 1 {
                    if mv.is_capture() {
                        info.captures += 1;
                    }
                    if mv.is_enpassant() {
                        info.enpassants += 1;
                    }
                    if mv.is_castle() {
                        info.castles += 1;
                    }
                    if mv.is_promote() {
                        info.promotions += 1;
                    }
                    if self.is_check(self.side_to_move()) {
                        info.checks += 1;
                    }
                    nodes += 1;
                } else {
                    nodes += self.perft_with_info(depth - 1, info);
                }
            }
            self.unmake_move();
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_has_twenty_moves() {
        let mut board = Board::new();
        assert_eq!(board.generate_legal_moves().len(), 20);
    }

    #[test]
    fn test_gen_kinds_partition_pseudolegal() {
        // kiwipete has captures, castles and plenty of quiets
        let board = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();

        let mut all = MoveList::new();
        board.generate_moves(GenType::Pseudolegal, &mut all);
        let mut quiet = MoveList::new();
        board.generate_moves(GenType::Quiet, &mut quiet);
        let mut capture = MoveList::new();
        board.generate_moves(GenType::Capture, &mut capture);

        // quiets and captures are disjoint
        for m in &quiet {
            assert!(!capture.contains(*m));
        }
        // and together with promotion pushes they cover everything
        let promo_pushes = all
            .iter()
            .filter(|m| m.is_promote() && !m.is_capture())
            .count();
        assert_eq!(all.len(), quiet.len() + capture.len() + promo_pushes);
        for m in &quiet {
            assert!(all.contains(*m));
        }
        for m in &capture {
            assert!(all.contains(*m));
        }
    }

    #[test]
    fn test_checkmate_and_stalemate() {
        // fool's mate
        let mut mated =
            Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert!(mated.is_checkmate());
        assert!(!mated.is_stalemate());

        // classic king+queen stalemate
        let mut stale = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stale.is_stalemate());
        assert!(!stale.is_checkmate());
    }

    #[test]
    fn test_legal_moves_never_leave_king_in_check() {
        let mut board = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let side = board.side_to_move();
        let moves = board.generate_legal_moves();
        for &mv in &moves {
            board.make_move(mv);
            assert!(!board.is_check(side), "illegal move generated: {mv}");
            board.unmake_move();
        }
    }
}
