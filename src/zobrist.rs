//! Zobrist hashing streams.
//!
//! A single fixed-seed XorShift64 fills every stream at startup, in a fixed
//! order, so the same position always hashes to the same key. Only the file
//! of the en-passant square is hashed; the castle stream has one key per
//! 4-bit rights value; the color key is XOR'd in when Black is to move.

use once_cell::sync::Lazy;

use crate::board::types::{Castle, Color, Key, Piece, Square};
use crate::rng::XorShift64;

const NUM_PIECE_SQUARE_KEYS: usize = 12 * 64;

struct ZobristStreams {
    piece_square: [Key; NUM_PIECE_SQUARE_KEYS],
    enpassant_file: [Key; 8],
    castle: [Key; 16],
    color: Key,
}

static STREAMS: Lazy<ZobristStreams> = Lazy::new(|| {
    let mut rng = XorShift64::default();
    ZobristStreams {
        piece_square: rng.fill(),
        enpassant_file: rng.fill(),
        castle: rng.fill(),
        color: rng.next(),
    }
});

/// Key for a piece standing on a square
#[inline]
#[must_use]
pub fn piece_square_key(piece: Piece, sq: Square) -> Key {
    STREAMS.piece_square[piece.index() + sq.as_index() * 12]
}

/// Key for an en-passant target square (hashed by file only)
#[inline]
#[must_use]
pub fn enpassant_key(sq: Square) -> Key {
    STREAMS.enpassant_file[sq.file()]
}

/// Key for a castling-rights value
#[inline]
#[must_use]
pub fn castle_key(castle: Castle) -> Key {
    STREAMS.castle[castle as usize]
}

/// Side-to-move key, XOR'd in for Black
#[inline]
#[must_use]
pub fn color_key() -> Key {
    STREAMS.color
}

/// Convenience: color key if `side` is Black, else 0
#[inline]
#[must_use]
pub fn side_key(side: Color) -> Key {
    match side {
        Color::White => 0,
        Color::Black => color_key(),
    }
}
