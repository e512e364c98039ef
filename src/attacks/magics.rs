//! Magic bitboard construction for sliding attacks.
//!
//! For each square and slider we find a 64-bit multiplier that perfect-hashes
//! every relevant blocker subset into a flat attack table. Candidates are
//! sparse XorShift64 draws; constructive collisions (different blockers, same
//! attack set) are allowed, destructive ones reject the candidate.

use crate::board::types::{Bitboard, PieceType, Square, Step};
use crate::rng::XorShift64;

/// Per-square magic lookup data
#[derive(Clone, Copy, Debug)]
pub struct MagicEntry {
    pub blockers_mask: Bitboard,
    pub magic: u64,
    pub key_shift: u32,
    pub table_offset: usize,
}

impl MagicEntry {
    /// Index into the flat attack table for a board occupancy
    #[inline]
    #[must_use]
    pub fn index(&self, occupancy: Bitboard) -> usize {
        let blockers = (occupancy & self.blockers_mask).0;
        (self.magic.wrapping_mul(blockers) >> self.key_shift) as usize + self.table_offset
    }
}

const BISHOP_RAYS: [Step; 4] = [
    Step::NorthEast,
    Step::SouthEast,
    Step::SouthWest,
    Step::NorthWest,
];

const ROOK_RAYS: [Step; 4] = [Step::North, Step::East, Step::South, Step::West];

/// Attack ray from `sq` in one direction, stopping at (and including) the
/// first blocker.
fn ray_attacks(sq: Square, occupancy: Bitboard, step: Step) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    let mut current = sq;
    while let Some(next) = current.step(step) {
        attacks |= Bitboard::from_square(next);
        if occupancy.contains(next) {
            break;
        }
        current = next;
    }
    attacks
}

/// Reference (slow) slider attack computation by ray casting.
///
/// Used to build the magic tables and the in-between table; the hot path
/// goes through the table lookups instead.
pub(crate) fn slider_attacks_ref(slider: PieceType, sq: Square, occupancy: Bitboard) -> Bitboard {
    let rays: &[Step] = match slider {
        PieceType::Bishop => &BISHOP_RAYS,
        PieceType::Rook => &ROOK_RAYS,
        PieceType::Queen => {
            return slider_attacks_ref(PieceType::Bishop, sq, occupancy)
                | slider_attacks_ref(PieceType::Rook, sq, occupancy)
        }
        _ => unreachable!("slider_attacks_ref on non-slider"),
    };

    rays.iter()
        .fold(Bitboard::EMPTY, |acc, &step| acc | ray_attacks(sq, occupancy, step))
}

/// Squares where a blocker could change the attack set: the empty-board
/// attacks minus board edges (keeping edges of the piece's own rank/file
/// off for rooks).
pub(crate) fn relevant_blocker_mask(slider: PieceType, sq: Square) -> Bitboard {
    let irrelevant_edges = ((Bitboard::RANK_1 | Bitboard::RANK_8)
        & !Bitboard::rank_mask(sq.rank()))
        | ((Bitboard::FILE_A | Bitboard::FILE_H) & !Bitboard::file_mask(sq.file()));

    slider_attacks_ref(slider, sq, Bitboard::EMPTY) & !irrelevant_edges
}

/// Enumerate every subset of `mask` with its attack set, via carry-rippler
/// iteration (`sub = (sub - mask) & mask`, ending when it returns to zero).
fn enumerate_blocker_subsets(
    slider: PieceType,
    sq: Square,
    mask: Bitboard,
) -> (Vec<Bitboard>, Vec<Bitboard>) {
    let count = 1usize << mask.popcount();
    let mut subsets = Vec::with_capacity(count);
    let mut attacks = Vec::with_capacity(count);

    let mut subset = Bitboard::EMPTY;
    loop {
        subset = (subset - mask) & mask;
        subsets.push(subset);
        attacks.push(slider_attacks_ref(slider, sq, subset));
        if subset.is_empty() {
            break;
        }
    }

    (subsets, attacks)
}

const MAX_MAGIC_ATTEMPTS: usize = 100_000_000;

/// Find a collision-free magic for one square and append its attack table
/// slice to `attack_table`.
pub(crate) fn find_magic(
    slider: PieceType,
    sq: Square,
    attack_table: &mut Vec<Bitboard>,
    rng: &mut XorShift64,
) -> MagicEntry {
    let mask = relevant_blocker_mask(slider, sq);
    let bit_count = mask.popcount();
    let key_shift = u64::BITS - bit_count;
    let hash_size = 1usize << bit_count;

    let (subsets, attacks) = enumerate_blocker_subsets(slider, sq, mask);

    // no square/blocker combination has an empty attack set, so EMPTY marks
    // an unmapped slot
    let mut mapped = vec![Bitboard::EMPTY; hash_size];

    for _ in 0..MAX_MAGIC_ATTEMPTS {
        let magic = rng.next_sparse();

        mapped.fill(Bitboard::EMPTY);
        let mut valid = true;

        for (subset, attack) in subsets.iter().zip(&attacks) {
            let key = (magic.wrapping_mul(subset.0) >> key_shift) as usize;
            if mapped[key].is_empty() {
                mapped[key] = *attack;
            } else if mapped[key] != *attack {
                // destructive collision
                valid = false;
                break;
            }
        }

        if valid {
            let table_offset = attack_table.len();
            attack_table.extend_from_slice(&mapped);
            return MagicEntry {
                blockers_mask: mask,
                magic,
                key_shift,
                table_offset,
            };
        }
    }

    unreachable!("no magic found for {slider:?} on {sq} after {MAX_MAGIC_ATTEMPTS} attempts")
}

/// Build the magic entries and flat attack table for one slider type
pub(crate) fn build_magic_table(
    slider: PieceType,
    rng: &mut XorShift64,
) -> ([MagicEntry; 64], Vec<Bitboard>) {
    let mut attack_table = Vec::new();
    let entries: Vec<MagicEntry> = Square::all()
        .map(|sq| find_magic(slider, sq, &mut attack_table, rng))
        .collect();

    (entries.try_into().expect("64 magic entries"), attack_table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_ray_stops_at_blocker() {
        let blocker = Bitboard::from_square(sq("e5"));
        let ray = ray_attacks(sq("e1"), blocker, Step::North);
        // e2, e3, e4, e5 (blocker included, squares past it excluded)
        assert_eq!(ray.popcount(), 4);
        assert!(ray.contains(sq("e5")));
        assert!(!ray.contains(sq("e6")));
    }

    #[test]
    fn test_rook_attacks_empty_board() {
        let attacks = slider_attacks_ref(PieceType::Rook, sq("a1"), Bitboard::EMPTY);
        assert_eq!(attacks.popcount(), 14);
    }

    #[test]
    fn test_queen_is_bishop_or_rook() {
        let occ = Bitboard::from_square(sq("d4")) | Bitboard::from_square(sq("f6"));
        let queen = slider_attacks_ref(PieceType::Queen, sq("d1"), occ);
        let split = slider_attacks_ref(PieceType::Bishop, sq("d1"), occ)
            | slider_attacks_ref(PieceType::Rook, sq("d1"), occ);
        assert_eq!(queen, split);
    }

    #[test]
    fn test_relevant_mask_excludes_edges() {
        // rook on a1: file a minus a8, rank 1 minus h1
        let mask = relevant_blocker_mask(PieceType::Rook, sq("a1"));
        assert_eq!(mask.popcount(), 12);
        assert!(!mask.contains(sq("a8")));
        assert!(!mask.contains(sq("h1")));
        assert!(mask.contains(sq("a7")));

        // rook on d4: no edges at all
        let mask = relevant_blocker_mask(PieceType::Rook, sq("d4"));
        assert_eq!(mask.popcount(), 10);

        // bishop masks never contain edges
        let mask = relevant_blocker_mask(PieceType::Bishop, sq("a1"));
        assert_eq!(mask.popcount(), 6);
        assert!(!mask.contains(sq("h8")));
    }

    #[test]
    fn test_subset_enumeration_is_complete() {
        let mask = relevant_blocker_mask(PieceType::Bishop, sq("b1"));
        let (subsets, _) = enumerate_blocker_subsets(PieceType::Bishop, sq("b1"), mask);
        assert_eq!(subsets.len(), 1 << mask.popcount());
        // all subsets are subsets of the mask, and the empty set is present
        assert!(subsets.iter().all(|s| (*s & !mask).is_empty()));
        assert!(subsets.iter().any(|s| s.is_empty()));
    }

    #[test]
    fn test_found_magic_matches_reference() {
        let mut rng = XorShift64::default();
        let mut table = Vec::new();
        let entry = find_magic(PieceType::Rook, sq("e4"), &mut table, &mut rng);

        let mask = entry.blockers_mask;
        let mut subset = Bitboard::EMPTY;
        loop {
            subset = (subset - mask) & mask;
            let looked_up = table[entry.index(subset)];
            let reference = slider_attacks_ref(PieceType::Rook, sq("e4"), subset);
            assert_eq!(looked_up, reference);
            if subset.is_empty() {
                break;
            }
        }
    }
}
