//! Precomputed attack tables.
//!
//! Leaper attacks (pawn, knight, king) are OR-ed step results; sliding
//! attacks go through magic bitboards built at startup; an in-between table
//! serves castle-path and pin logic. Everything is built once, behind a
//! `Lazy`, and immutable afterwards.

pub mod magics;

use once_cell::sync::Lazy;

use crate::board::types::{Bitboard, Color, PieceType, Square, Step};
use crate::rng::XorShift64;

use magics::MagicEntry;

/// Pawn attacks for every square of a pawn set
#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, pawns: Bitboard) -> Bitboard {
    match color {
        Color::White => pawns.step(Step::NorthEast) | pawns.step(Step::NorthWest),
        Color::Black => pawns.step(Step::SouthEast) | pawns.step(Step::SouthWest),
    }
}

/// Knight attacks for every square of a knight set
#[inline]
#[must_use]
pub fn knight_attacks(knights: Bitboard) -> Bitboard {
    Step::KNIGHT_STEPS
        .iter()
        .fold(Bitboard::EMPTY, |acc, &s| acc | knights.step(s))
}

/// King attacks for every square of a king set
#[inline]
#[must_use]
pub fn king_attacks(kings: Bitboard) -> Bitboard {
    Step::KING_STEPS
        .iter()
        .fold(Bitboard::EMPTY, |acc, &s| acc | kings.step(s))
}

struct AttackTables {
    pawn: [[Bitboard; 64]; 2],
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    bishop_magics: [MagicEntry; 64],
    rook_magics: [MagicEntry; 64],
    bishop_attacks: Vec<Bitboard>,
    rook_attacks: Vec<Bitboard>,
    between: Vec<[Bitboard; 64]>,
}

static TABLES: Lazy<AttackTables> = Lazy::new(|| {
    let mut pawn = [[Bitboard::EMPTY; 64]; 2];
    let mut knight = [Bitboard::EMPTY; 64];
    let mut king = [Bitboard::EMPTY; 64];
    for sq in Square::all() {
        let bb = Bitboard::from_square(sq);
        pawn[Color::White.index()][sq.as_index()] = pawn_attacks(Color::White, bb);
        pawn[Color::Black.index()][sq.as_index()] = pawn_attacks(Color::Black, bb);
        knight[sq.as_index()] = knight_attacks(bb);
        king[sq.as_index()] = king_attacks(bb);
    }

    let mut rng = XorShift64::default();
    let (bishop_magics, bishop_attacks) = magics::build_magic_table(PieceType::Bishop, &mut rng);
    let (rook_magics, rook_attacks) = magics::build_magic_table(PieceType::Rook, &mut rng);

    let mut between = vec![[Bitboard::EMPTY; 64]; 64];
    for a in Square::all() {
        for b in Square::all() {
            let b_bb = Bitboard::from_square(b);
            let diag = if slider_ref(PieceType::Bishop, a, Bitboard::EMPTY).intersects(b_bb) {
                slider_ref(PieceType::Bishop, a, b_bb)
                    & slider_ref(PieceType::Bishop, b, Bitboard::from_square(a))
            } else {
                Bitboard::EMPTY
            };
            let line = if slider_ref(PieceType::Rook, a, Bitboard::EMPTY).intersects(b_bb) {
                slider_ref(PieceType::Rook, a, b_bb)
                    & slider_ref(PieceType::Rook, b, Bitboard::from_square(a))
            } else {
                Bitboard::EMPTY
            };
            between[a.as_index()][b.as_index()] = diag | line;
        }
    }

    AttackTables {
        pawn,
        knight,
        king,
        bishop_magics,
        rook_magics,
        bishop_attacks,
        rook_attacks,
        between,
    }
});

fn slider_ref(slider: PieceType, sq: Square, occupancy: Bitboard) -> Bitboard {
    magics::slider_attacks_ref(slider, sq, occupancy)
}

/// Force table construction; called once at engine startup so the first
/// search does not pay for it.
pub fn init() {
    Lazy::force(&TABLES);
}

/// Pawn attack lookup for one square
#[inline]
#[must_use]
pub fn pawn_attacks_from(color: Color, sq: Square) -> Bitboard {
    TABLES.pawn[color.index()][sq.as_index()]
}

/// Knight attack lookup for one square
#[inline]
#[must_use]
pub fn knight_attacks_from(sq: Square) -> Bitboard {
    TABLES.knight[sq.as_index()]
}

/// King attack lookup for one square
#[inline]
#[must_use]
pub fn king_attacks_from(sq: Square) -> Bitboard {
    TABLES.king[sq.as_index()]
}

/// Bishop attacks from one square against an occupancy
#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    let entry = &TABLES.bishop_magics[sq.as_index()];
    TABLES.bishop_attacks[entry.index(occupancy)]
}

/// Rook attacks from one square against an occupancy
#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    let entry = &TABLES.rook_magics[sq.as_index()];
    TABLES.rook_attacks[entry.index(occupancy)]
}

/// Queen attacks: bishop and rook attacks combined
#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}

/// Slider attacks for every square of a piece set
#[must_use]
pub fn slider_attacks_bb(slider: PieceType, pieces: Bitboard, occupancy: Bitboard) -> Bitboard {
    let lookup: fn(Square, Bitboard) -> Bitboard = match slider {
        PieceType::Bishop => bishop_attacks,
        PieceType::Rook => rook_attacks,
        PieceType::Queen => queen_attacks,
        _ => unreachable!("slider_attacks_bb on non-slider"),
    };
    pieces
        .iter()
        .fold(Bitboard::EMPTY, |acc, sq| acc | lookup(sq, occupancy))
}

/// Squares strictly between two squares on a shared rank, file, or diagonal
/// (empty when they share none).
#[inline]
#[must_use]
pub fn between(a: Square, b: Square) -> Bitboard {
    TABLES.between[a.as_index()][b.as_index()]
}
