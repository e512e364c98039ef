//! Making and unmaking moves, with incremental zobrist maintenance.

use crate::board::state::{StateInfo, EMPTY_OCC};
use crate::board::types::{
    castle_color_mask, castle_rook_from_to, Bitboard, Color, Move, Piece, PieceType, Square, Step,
    CASTLE_LONG, CASTLE_NONE, CASTLE_SHORT, NULL_MOVE,
};
use crate::zobrist;

use super::Board;

impl Board {
    pub(crate) fn add_piece(&mut self, sq: Square, piece: Piece) {
        let bb = Bitboard::from_square(sq);
        self.pieces[sq.as_index()] = Some(piece);
        self.piece_bbs[piece.index()] |= bb;
        self.occupancy_bbs[piece.color().index()] |= bb;
        self.occupancy_bbs[EMPTY_OCC] ^= bb;

        self.zobrist_key ^= zobrist::piece_square_key(piece, sq);
    }

    pub(crate) fn remove_piece(&mut self, sq: Square) {
        let piece = self.pieces[sq.as_index()].expect("remove_piece on empty square");
        let bb = Bitboard::from_square(sq);
        self.pieces[sq.as_index()] = None;
        self.piece_bbs[piece.index()] ^= bb;
        self.occupancy_bbs[piece.color().index()] ^= bb;
        self.occupancy_bbs[EMPTY_OCC] |= bb;

        self.zobrist_key ^= zobrist::piece_square_key(piece, sq);
    }

    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        let piece = self.pieces[from.as_index()].expect("move_piece from empty square");
        let from_to = Bitboard::from_square(from) | Bitboard::from_square(to);
        self.pieces[from.as_index()] = None;
        self.pieces[to.as_index()] = Some(piece);
        self.piece_bbs[piece.index()] ^= from_to;
        self.occupancy_bbs[piece.color().index()] ^= from_to;
        self.occupancy_bbs[EMPTY_OCC] ^= from_to;

        self.zobrist_key ^=
            zobrist::piece_square_key(piece, from) ^ zobrist::piece_square_key(piece, to);
    }

    /// Piece standing on the move's from-square
    #[inline]
    #[must_use]
    pub fn moved_piece(&self, mv: Move) -> Option<Piece> {
        self.piece_at(mv.from())
    }

    /// Square a capture removes a piece from: the to-square, except for
    /// en passant where it is one rank behind the to-square.
    #[must_use]
    pub fn captured_square(&self, mv: Move) -> Option<Square> {
        if !mv.is_capture() {
            return None;
        }
        if mv.is_enpassant() {
            let back = match self.side_to_move {
                Color::White => Step::South,
                Color::Black => Step::North,
            };
            mv.to().step(back)
        } else {
            Some(mv.to())
        }
    }

    /// Piece a move captures, before the move is made
    #[must_use]
    pub fn captured_piece(&self, mv: Move) -> Option<Piece> {
        self.captured_square(mv).and_then(|sq| self.piece_at(sq))
    }

    /// Apply a move.
    ///
    /// The previous irreversible state is pushed onto the internal history
    /// stack; `unmake_move` pops it. Legality is not checked here.
    pub fn make_move(&mut self, mv: Move) {
        #[cfg(debug_assertions)]
        self.validate();

        let color_moved = self.side_to_move;
        let piece_moved = self.moved_piece(mv).expect("make_move from empty square");
        let piece_captured = self.captured_piece(mv);

        self.state_history[self.ply_played] = StateInfo {
            zobrist_key: self.zobrist_key,
            ply_clock: self.ply_clock,
            enpassant_square: self.enpassant_square,
            castling_rights: self.castling_rights,
            piece_captured,
        };
        self.move_list.push(mv);

        // castle: shuffle the rook; the king moves below like any piece
        if mv.is_castle() {
            let (rook_from, rook_to) =
                castle_rook_from_to(mv.get_castle() & castle_color_mask(color_moved));
            self.move_piece(rook_from, rook_to);
        }

        if mv.is_capture() {
            let captured_sq = self.captured_square(mv).expect("capture without square");
            self.remove_piece(captured_sq);
        }

        if mv.is_promote() {
            self.remove_piece(mv.from());
            let promote_type = mv.promote_piece_type().expect("promotion without piece");
            self.add_piece(mv.to(), Piece::new(color_moved, promote_type));
        } else {
            self.move_piece(mv.from(), mv.to());
        }

        self.update_enpassant_square(mv);
        self.update_castling_rights(mv);

        self.side_to_move = !self.side_to_move;
        self.zobrist_key ^= zobrist::color_key();

        if mv.is_capture() || piece_moved.piece_type() == PieceType::Pawn {
            self.ply_clock = 0;
        } else {
            self.ply_clock += 1;
        }
        self.ply_played += 1;
        self.ply_move_number += 1;

        #[cfg(debug_assertions)]
        self.validate();
    }

    /// Undo the most recent move, restoring every field bit-for-bit
    pub fn unmake_move(&mut self) {
        #[cfg(debug_assertions)]
        self.validate();

        let mv = self.move_list.last().expect("unmake_move with no history");
        let prev_state = self.state_history[self.ply_played - 1];
        let color_moved = !self.side_to_move;

        if mv.is_castle() {
            let (rook_from, rook_to) =
                castle_rook_from_to(mv.get_castle() & castle_color_mask(color_moved));
            self.move_piece(rook_to, rook_from);
        }

        if mv.is_promote() {
            self.remove_piece(mv.to());
            self.add_piece(mv.from(), Piece::new(color_moved, PieceType::Pawn));
        } else {
            self.move_piece(mv.to(), mv.from());
        }

        if let Some(captured) = prev_state.piece_captured {
            let captured_sq = if mv.is_enpassant() {
                let back = match color_moved {
                    Color::White => Step::South,
                    Color::Black => Step::North,
                };
                mv.to().step(back).expect("en passant capture square")
            } else {
                mv.to()
            };
            self.add_piece(captured_sq, captured);
        }

        self.zobrist_key = prev_state.zobrist_key;
        self.enpassant_square = prev_state.enpassant_square;
        self.castling_rights = prev_state.castling_rights;
        self.ply_clock = prev_state.ply_clock;

        self.ply_played -= 1;
        self.ply_move_number -= 1;
        self.side_to_move = color_moved;
        let len = self.move_list.len();
        self.move_list.shrink(len - 1);

        #[cfg(debug_assertions)]
        self.validate();
    }

    /// Pass the turn without moving; used by null-move pruning.
    ///
    /// Stored in the played list as the null move (data 0).
    pub fn make_null_move(&mut self) {
        self.state_history[self.ply_played] = StateInfo {
            zobrist_key: self.zobrist_key,
            ply_clock: self.ply_clock,
            enpassant_square: self.enpassant_square,
            castling_rights: self.castling_rights,
            piece_captured: None,
        };
        self.move_list.push(NULL_MOVE);

        if let Some(ep) = self.enpassant_square.take() {
            self.zobrist_key ^= zobrist::enpassant_key(ep);
        }
        self.side_to_move = !self.side_to_move;
        self.zobrist_key ^= zobrist::color_key();

        self.ply_clock += 1;
        self.ply_played += 1;
        self.ply_move_number += 1;
    }

    pub fn unmake_null_move(&mut self) {
        let prev_state = self.state_history[self.ply_played - 1];

        self.zobrist_key = prev_state.zobrist_key;
        self.enpassant_square = prev_state.enpassant_square;
        self.ply_clock = prev_state.ply_clock;

        self.ply_played -= 1;
        self.ply_move_number -= 1;
        self.side_to_move = !self.side_to_move;
        let len = self.move_list.len();
        self.move_list.shrink(len - 1);
    }

    /// Clear the en-passant square, then set a fresh one when a double pawn
    /// push lands next to an enemy pawn. Both transitions are hashed.
    fn update_enpassant_square(&mut self, mv: Move) {
        let color_moved = self.side_to_move;

        if let Some(old_ep) = self.enpassant_square.take() {
            self.zobrist_key ^= zobrist::enpassant_key(old_ep);
        }

        if mv.is_double_pawn_push() {
            let to_bb = Bitboard::from_square(mv.to());
            let adjacent = to_bb.step(Step::East) | to_bb.step(Step::West);
            let enemy_pawns = self.colored_bb(!color_moved, PieceType::Pawn);

            if adjacent.intersects(enemy_pawns) {
                let back = match color_moved {
                    Color::White => Step::South,
                    Color::Black => Step::North,
                };
                let ep = mv.to().step(back).expect("double push jumped square");
                self.enpassant_square = Some(ep);
                self.zobrist_key ^= zobrist::enpassant_key(ep);
            }
        }
    }

    /// Strip castle rights invalidated by this move, rehashing the rights.
    ///
    /// Called after the pieces have moved, so the moved piece is read from
    /// the to-square and the captured piece from the freshly pushed state.
    fn update_castling_rights(&mut self, mv: Move) {
        if self.castling_rights == CASTLE_NONE {
            return;
        }

        self.zobrist_key ^= zobrist::castle_key(self.castling_rights);

        let piece_moved = self.pieces[mv.to().as_index()].expect("moved piece on to-square");
        let color_moved = piece_moved.color();
        let color_mask = castle_color_mask(color_moved);

        match piece_moved.piece_type() {
            PieceType::King => {
                self.castling_rights &= !color_mask;
            }
            PieceType::Rook => {
                let back = color_moved.back_rank();
                if mv.from() == Square::new(back, 0) {
                    self.castling_rights &= !(color_mask & CASTLE_LONG);
                } else if mv.from() == Square::new(back, 7) {
                    self.castling_rights &= !(color_mask & CASTLE_SHORT);
                }
            }
            _ => {}
        }

        // rook captured on its home square loses the defender's right; the
        // capture square is always the to-square here because en passant
        // never captures on a back rank
        let piece_captured = self.state_history[self.ply_played].piece_captured;
        if let Some(captured) = piece_captured {
            if captured.piece_type() == PieceType::Rook {
                let enemy_mask = castle_color_mask(captured.color());
                let back = captured.color().back_rank();
                if mv.to() == Square::new(back, 0) {
                    self.castling_rights &= !(enemy_mask & CASTLE_LONG);
                } else if mv.to() == Square::new(back, 7) {
                    self.castling_rights &= !(enemy_mask & CASTLE_SHORT);
                }
            }
        }

        self.zobrist_key ^= zobrist::castle_key(self.castling_rights);
    }
}
