//! King move generation, including castles.

use crate::attacks;
use crate::board::types::{
    castle_color_mask, castle_king_from_to, castle_rook_from_to, Color, Move, MoveList, PieceType,
    CASTLE_LONG, CASTLE_SHORT,
};

use super::{Board, GenType};

impl Board {
    pub(super) fn generate_king_moves(&self, gen: GenType, side: Color, list: &mut MoveList) {
        let unoccupied = self.unoccupied();
        let occupied = self.occupied();
        let enemy = self.occupancy(!side) & !self.colored_bb(!side, PieceType::King);

        let from = self.king_square(side);
        let king_moves = attacks::king_attacks_from(from);

        if gen != GenType::Quiet {
            for to in (king_moves & enemy).iter() {
                list.push(Move::capture(from, to));
            }
        }

        if gen != GenType::Capture {
            for to in (king_moves & unoccupied).iter() {
                list.push(Move::quiet(from, to));
            }

            // castles: right held, not in check, empty between king and
            // rook, king path unattacked (the destination square is covered
            // by the caller's legality check)
            let rights = self.castling_rights() & castle_color_mask(side);
            if rights != 0 && !self.is_check(side) {
                for castle_type in [CASTLE_SHORT, CASTLE_LONG] {
                    let castle = castle_type & rights;
                    if castle == 0 {
                        continue;
                    }

                    let (king_from, king_to) = castle_king_from_to(castle);
                    let (rook_from, _) = castle_rook_from_to(castle);

                    let king_path = attacks::between(king_from, king_to);
                    let castle_squares = attacks::between(king_from, rook_from);

                    let path_safe = (self.attacks_to(king_path) & enemy).is_empty();
                    let squares_empty = (castle_squares & occupied).is_empty();

                    if path_safe && squares_empty {
                        let mv = if castle_type == CASTLE_SHORT {
                            Move::castle_short(king_from, king_to)
                        } else {
                            Move::castle_long(king_from, king_to)
                        };
                        list.push(mv);
                    }
                }
            }
        }
    }
}
