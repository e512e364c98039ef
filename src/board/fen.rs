//! FEN parsing and serialization.

use crate::board::error::FenError;
use crate::board::types::{
    castle_to_string, Color, Piece, Square, CASTLE_B_LONG, CASTLE_B_SHORT, CASTLE_NONE,
    CASTLE_W_LONG, CASTLE_W_SHORT,
};
use crate::zobrist;

use super::Board;

impl Board {
    /// Parse a position from the standard six-field FEN notation.
    ///
    /// Malformed input is a hard error; the board is only produced when
    /// every field parses.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut board = Board::empty();

        // 1. piece placement, rank 8 first
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRankCount { found: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let piece =
                        Piece::from_fen_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::TooManyFiles { rank });
                    }
                    board.add_piece(Square::new(rank, file), piece);
                    file += 1;
                }
            }
            if file > 8 {
                return Err(FenError::TooManyFiles { rank });
            }
        }

        // 2. side to move
        board.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        // 3. castling rights
        board.castling_rights = CASTLE_NONE;
        if parts[2] != "-" {
            for c in parts[2].chars() {
                board.castling_rights |= match c {
                    'K' => CASTLE_W_SHORT,
                    'Q' => CASTLE_W_LONG,
                    'k' => CASTLE_B_SHORT,
                    'q' => CASTLE_B_LONG,
                    _ => return Err(FenError::InvalidCastling { char: c }),
                };
            }
        }

        // 4. en passant square
        board.enpassant_square = if parts[3] == "-" {
            None
        } else {
            Some(
                parts[3]
                    .parse::<Square>()
                    .map_err(|_| FenError::InvalidEnPassant {
                        found: parts[3].to_string(),
                    })?,
            )
        };

        // 5. halfmove clock
        board.ply_clock = parts[4].parse().map_err(|_| FenError::InvalidCounter {
            found: parts[4].to_string(),
        })?;

        // 6. fullmove number
        let full_moves: usize = parts[5].parse().map_err(|_| FenError::InvalidCounter {
            found: parts[5].to_string(),
        })?;
        board.ply_move_number = full_moves.saturating_sub(1) * 2
            + usize::from(board.side_to_move == Color::Black);

        board.ply_played = 0;
        board.move_list.shrink(0);
        board.zobrist_key = board.compute_key();

        Ok(board)
    }

    /// Recompute the zobrist key of the current position from scratch.
    ///
    /// Make/unmake maintain the key incrementally; this is the reference
    /// the incremental key must always agree with.
    #[must_use]
    pub fn compute_key(&self) -> u64 {
        let mut key = 0u64;
        for sq in Square::all() {
            if let Some(piece) = self.piece_at(sq) {
                key ^= zobrist::piece_square_key(piece, sq);
            }
        }
        if let Some(ep) = self.enpassant_square {
            key ^= zobrist::enpassant_key(ep);
        }
        key ^= zobrist::castle_key(self.castling_rights);
        key ^= zobrist::side_key(self.side_to_move);
        key
    }

    /// Serialize the position to FEN
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_at(Square::new(rank, file)) {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let ep = self
            .enpassant_square
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            placement,
            self.side_to_move,
            castle_to_string(self.castling_rights),
            ep,
            self.ply_clock,
            self.full_move_number()
        )
    }
}
