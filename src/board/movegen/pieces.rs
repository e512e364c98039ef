//! Knight and slider move generation.

use crate::attacks;
use crate::board::types::{Bitboard, Color, Move, MoveList, PieceType, Square};

use super::{Board, GenType};

fn attack_set(piece_type: PieceType, from: Square, occupied: Bitboard) -> Bitboard {
    match piece_type {
        PieceType::Knight => attacks::knight_attacks_from(from),
        PieceType::Bishop => attacks::bishop_attacks(from, occupied),
        PieceType::Rook => attacks::rook_attacks(from, occupied),
        PieceType::Queen => attacks::queen_attacks(from, occupied),
        _ => unreachable!("generate_piece_moves handles knights and sliders only"),
    }
}

impl Board {
    pub(super) fn generate_piece_moves(
        &self,
        gen: GenType,
        side: Color,
        piece_type: PieceType,
        list: &mut MoveList,
    ) {
        let unoccupied = self.unoccupied();
        let occupied = self.occupied();
        let enemy = self.occupancy(!side) & !self.colored_bb(!side, PieceType::King);

        for from in self.colored_bb(side, piece_type).iter() {
            let targets = attack_set(piece_type, from, occupied);

            if gen != GenType::Quiet {
                for to in (targets & enemy).iter() {
                    list.push(Move::capture(from, to));
                }
            }

            if gen != GenType::Capture {
                for to in (targets & unoccupied).iter() {
                    list.push(Move::quiet(from, to));
                }
            }
        }
    }
}
