//! Castling rights bitmask and castle geometry.

use super::piece::Color;
use super::square::Square;

/// 4-bit castling rights mask
pub type Castle = u8;

pub const CASTLE_NONE: Castle = 0b0000;
pub const CASTLE_W_SHORT: Castle = 0b0001;
pub const CASTLE_W_LONG: Castle = 0b0010;
pub const CASTLE_W_BOTH: Castle = 0b0011;
pub const CASTLE_B_SHORT: Castle = 0b0100;
pub const CASTLE_B_LONG: Castle = 0b1000;
pub const CASTLE_B_BOTH: Castle = 0b1100;
pub const CASTLE_SHORT: Castle = CASTLE_W_SHORT | CASTLE_B_SHORT;
pub const CASTLE_LONG: Castle = CASTLE_W_LONG | CASTLE_B_LONG;
pub const CASTLE_ALL: Castle = 0b1111;

/// Castle rights mask for one color
#[inline]
#[must_use]
pub const fn castle_color_mask(color: Color) -> Castle {
    match color {
        Color::White => CASTLE_W_BOTH,
        Color::Black => CASTLE_B_BOTH,
    }
}

/// King from/to squares for a single castle right.
///
/// The mask must hold exactly one right.
#[must_use]
pub fn castle_king_from_to(castle: Castle) -> (Square, Square) {
    match castle {
        CASTLE_W_SHORT => ("e1".parse().unwrap(), "g1".parse().unwrap()),
        CASTLE_W_LONG => ("e1".parse().unwrap(), "c1".parse().unwrap()),
        CASTLE_B_SHORT => ("e8".parse().unwrap(), "g8".parse().unwrap()),
        CASTLE_B_LONG => ("e8".parse().unwrap(), "c8".parse().unwrap()),
        _ => unreachable!("castle_king_from_to on multi-bit mask {castle:#06b}"),
    }
}

/// Rook from/to squares for a single castle right
#[must_use]
pub fn castle_rook_from_to(castle: Castle) -> (Square, Square) {
    match castle {
        CASTLE_W_SHORT => ("h1".parse().unwrap(), "f1".parse().unwrap()),
        CASTLE_W_LONG => ("a1".parse().unwrap(), "d1".parse().unwrap()),
        CASTLE_B_SHORT => ("h8".parse().unwrap(), "f8".parse().unwrap()),
        CASTLE_B_LONG => ("a8".parse().unwrap(), "d8".parse().unwrap()),
        _ => unreachable!("castle_rook_from_to on multi-bit mask {castle:#06b}"),
    }
}

/// FEN castling field for a rights mask ("-" when empty)
#[must_use]
pub fn castle_to_string(castle: Castle) -> String {
    if castle == CASTLE_NONE {
        return "-".to_string();
    }
    let mut s = String::new();
    if castle & CASTLE_W_SHORT != 0 {
        s.push('K');
    }
    if castle & CASTLE_W_LONG != 0 {
        s.push('Q');
    }
    if castle & CASTLE_B_SHORT != 0 {
        s.push('k');
    }
    if castle & CASTLE_B_LONG != 0 {
        s.push('q');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_masks() {
        assert_eq!(castle_color_mask(Color::White), 0b0011);
        assert_eq!(castle_color_mask(Color::Black), 0b1100);
        assert_eq!(CASTLE_W_BOTH | CASTLE_B_BOTH, CASTLE_ALL);
    }

    #[test]
    fn test_king_geometry() {
        let (from, to) = castle_king_from_to(CASTLE_W_SHORT);
        assert_eq!((from.to_string(), to.to_string()), ("e1".into(), "g1".into()));
        let (from, to) = castle_king_from_to(CASTLE_B_LONG);
        assert_eq!((from.to_string(), to.to_string()), ("e8".into(), "c8".into()));
    }

    #[test]
    fn test_rook_geometry() {
        let (from, to) = castle_rook_from_to(CASTLE_W_LONG);
        assert_eq!((from.to_string(), to.to_string()), ("a1".into(), "d1".into()));
        let (from, to) = castle_rook_from_to(CASTLE_B_SHORT);
        assert_eq!((from.to_string(), to.to_string()), ("h8".into(), "f8".into()));
    }

    #[test]
    fn test_to_string() {
        assert_eq!(castle_to_string(CASTLE_ALL), "KQkq");
        assert_eq!(castle_to_string(CASTLE_NONE), "-");
        assert_eq!(castle_to_string(CASTLE_W_SHORT | CASTLE_B_LONG), "Kq");
    }
}
