//! Pawn move generation.

use crate::attacks;
use crate::board::types::{
    Bitboard, Color, Move, MoveList, PieceType, Step,
};

use super::{Board, GenType};

const PROMOTION_PIECES: [PieceType; 4] = [
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Rook,
    PieceType::Queen,
];

impl Board {
    pub(super) fn generate_pawn_moves(&self, gen: GenType, side: Color, list: &mut MoveList) {
        let unoccupied = self.unoccupied();
        // the enemy king is never a capture target
        let enemy = self.occupancy(!side) & !self.colored_bb(!side, PieceType::King);

        let (second_rank, seventh_rank, forward) = match side {
            Color::White => (Bitboard::RANK_2, Bitboard::RANK_7, Step::North),
            Color::Black => (Bitboard::RANK_7, Bitboard::RANK_2, Step::South),
        };

        let pawns = self.colored_bb(side, PieceType::Pawn);
        let ep_target = self
            .enpassant_square()
            .map_or(Bitboard::EMPTY, Bitboard::from_square);

        // captures: diagonal captures, en passant, promotion captures
        if gen != GenType::Quiet {
            for from in pawns.iter() {
                let captures = attacks::pawn_attacks_from(side, from) & (enemy | ep_target);
                for to in captures.iter() {
                    if ep_target.contains(to) {
                        list.push(Move::en_passant(from, to));
                    } else if seventh_rank.contains(from) {
                        for promo in PROMOTION_PIECES {
                            list.push(Move::promotion(from, to, promo, true));
                        }
                    } else {
                        list.push(Move::capture(from, to));
                    }
                }
            }
        }

        // quiet pushes (no promotions)
        if gen != GenType::Capture {
            for from in (pawns & !seventh_rank).iter() {
                let Some(front) = from.step(forward) else {
                    continue;
                };
                if unoccupied.contains(front) {
                    list.push(Move::quiet(from, front));

                    if second_rank.contains(from) {
                        let front_front = front.step(forward).expect("double push on board");
                        if unoccupied.contains(front_front) {
                            list.push(Move::double_pawn_push(from, front_front));
                        }
                    }
                }
            }
        }

        // promotion pushes: neither quiet nor capture kind
        if gen == GenType::Pseudolegal {
            for from in (pawns & seventh_rank).iter() {
                let to = from.step(forward).expect("seventh-rank push on board");
                if unoccupied.contains(to) {
                    for promo in PROMOTION_PIECES {
                        list.push(Move::promotion(from, to, promo, false));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::Square;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn gen(fen: &str, gen_type: GenType) -> MoveList {
        let board = Board::from_fen(fen).unwrap();
        let mut list = MoveList::new();
        board.generate_pawn_moves(gen_type, board.side_to_move(), &mut list);
        list
    }

    #[test]
    fn test_startpos_pawn_pushes() {
        let list = gen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            GenType::Pseudolegal,
        );
        // 8 single + 8 double pushes
        assert_eq!(list.len(), 16);
        assert!(list.contains(Move::double_pawn_push(sq("a2"), sq("a4"))));
    }

    #[test]
    fn test_blocked_pawn_cannot_push() {
        let list = gen("4k3/8/8/8/4p3/4P3/8/4K3 w - - 0 1", GenType::Pseudolegal);
        assert!(list.is_empty());
    }

    #[test]
    fn test_pawn_captures() {
        let list = gen("4k3/8/8/3p1p2/4P3/8/8/4K3 w - - 0 1", GenType::Capture);
        assert_eq!(list.len(), 2);
        assert!(list.contains(Move::capture(sq("e4"), sq("d5"))));
        assert!(list.contains(Move::capture(sq("e4"), sq("f5"))));
    }

    #[test]
    fn test_en_passant_generated() {
        let list = gen(
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            GenType::Capture,
        );
        assert!(list.contains(Move::en_passant(sq("e5"), sq("f6"))));
    }

    #[test]
    fn test_promotion_pushes_and_captures() {
        let all = gen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1", GenType::Pseudolegal);
        // 4 push promotions + 4 capture promotions on b8
        assert_eq!(all.len(), 8);
        assert!(all.contains(Move::promotion(sq("a7"), sq("a8"), PieceType::Queen, false)));
        assert!(all.contains(Move::promotion(sq("a7"), sq("b8"), PieceType::Knight, true)));

        // promotion pushes appear in neither the quiet nor the capture kind
        let quiet = gen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1", GenType::Quiet);
        assert!(quiet.is_empty());
        let caps = gen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1", GenType::Capture);
        assert_eq!(caps.len(), 4);
    }

    #[test]
    fn test_pawn_never_captures_king() {
        let list = gen("8/8/8/8/8/5k2/4P3/4K3 w - - 0 1", GenType::Capture);
        // would-be capture of the king on f3 is not generated
        assert!(list.is_empty());
    }

    #[test]
    fn test_black_pawn_direction() {
        let list = gen("4k3/4p3/8/8/8/8/8/4K3 b - - 0 1", GenType::Pseudolegal);
        assert!(list.contains(Move::quiet(sq("e7"), sq("e6"))));
        assert!(list.contains(Move::double_pawn_push(sq("e7"), sq("e5"))));
    }
}
