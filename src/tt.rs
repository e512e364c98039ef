//! Shared transposition table.
//!
//! Fixed-size, key-indexed, always-replace. Every slot is a pair of atomic
//! 64-bit words: the packed entry data and the key XOR'd with it. A reader
//! that races a writer sees a checksum mismatch instead of a torn entry, so
//! no per-cell locking is needed. Loads and stores are relaxed; the search
//! tolerates the occasional stale miss and re-derives its bounds.

use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "logging")]
use log::debug;

use crate::board::types::{Depth, Eval, Key, Move};

/// Default table size in MB
pub const DEFAULT_TABLE_SIZE_MB: usize = 16;

/// How a stored eval bounds the true score
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeType {
    /// Empty slot
    Null = 0,
    /// Exact score
    Pv = 1,
    /// Upper bound (no move raised alpha)
    All = 2,
    /// Lower bound (a move failed high)
    Cut = 3,
}

impl NodeType {
    fn from_bits(bits: u8) -> NodeType {
        match bits & 0b11 {
            1 => NodeType::Pv,
            2 => NodeType::All,
            3 => NodeType::Cut,
            _ => NodeType::Null,
        }
    }
}

/// One table entry, unpacked
#[derive(Clone, Copy, Debug)]
pub struct TTEntry {
    pub key: Key,
    pub mv: Move,
    pub eval: Eval,
    pub depth: Depth,
    pub node: NodeType,
}

impl TTEntry {
    const NULL: TTEntry = TTEntry {
        key: 0,
        mv: Move::null(),
        eval: 0,
        depth: 0,
        node: NodeType::Null,
    };

    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.node == NodeType::Null && self.mv.is_null() && self.key == 0
    }

    // data word layout: move 0..16 | eval 16..32 | depth 32..48 | node 48..56
    fn pack(&self) -> u64 {
        u64::from(self.mv.data())
            | (u64::from(self.eval as u16) << 16)
            | (u64::from(self.depth) << 32)
            | (u64::from(self.node as u8) << 48)
    }

    fn unpack(key: Key, data: u64) -> TTEntry {
        TTEntry {
            key,
            mv: Move::from_data(data as u16),
            eval: (data >> 16) as u16 as i16,
            depth: (data >> 32) as u16,
            node: NodeType::from_bits((data >> 48) as u8),
        }
    }
}

/// An atomic slot: packed entry data plus the key XOR checksum
#[derive(Default)]
struct TTCell {
    key_xor: AtomicU64,
    data: AtomicU64,
}

pub struct TranspositionTable {
    cells: Vec<TTCell>,
}

impl TranspositionTable {
    /// Create a table of approximately `size_mb` megabytes
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let cell_count = (size_mb * 1024 * 1024) / std::mem::size_of::<TTCell>();
        let cell_count = cell_count.max(1);

        #[cfg(feature = "logging")]
        debug!("allocating transposition table: {size_mb} MB, {cell_count} cells");

        let mut cells = Vec::with_capacity(cell_count);
        cells.resize_with(cell_count, TTCell::default);
        TranspositionTable { cells }
    }

    #[inline]
    fn index(&self, key: Key) -> usize {
        (key % self.cells.len() as u64) as usize
    }

    /// Number of cells in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Look up the entry for `key`.
    ///
    /// Returns the null entry on a miss or when a concurrent writer raced
    /// this slot. Callers check `node` and `depth` before trusting the eval.
    #[must_use]
    pub fn probe(&self, key: Key) -> TTEntry {
        let cell = &self.cells[self.index(key)];
        let key_xor = cell.key_xor.load(Ordering::Relaxed);
        let data = cell.data.load(Ordering::Relaxed);

        if key_xor ^ data == key && data != 0 {
            TTEntry::unpack(key, data)
        } else {
            TTEntry::NULL
        }
    }

    /// Store an entry, unconditionally replacing the previous occupant
    pub fn store(&self, key: Key, mv: Move, eval: Eval, depth: Depth, node: NodeType) {
        let entry = TTEntry {
            key,
            mv,
            eval,
            depth,
            node,
        };
        let data = entry.pack();
        let cell = &self.cells[self.index(key)];
        cell.key_xor.store(key ^ data, Ordering::Relaxed);
        cell.data.store(data, Ordering::Relaxed);
    }

    /// Clear every slot
    pub fn reset(&self) {
        for cell in &self.cells {
            cell.key_xor.store(0, Ordering::Relaxed);
            cell.data.store(0, Ordering::Relaxed);
        }
    }

    /// Occupancy per mille of a sampled prefix, for `info hashfull`
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample = self.cells.len().min(1000);
        if sample == 0 {
            return 0;
        }
        let used = self.cells[..sample]
            .iter()
            .filter(|cell| cell.data.load(Ordering::Relaxed) != 0)
            .count();
        (used * 1000 / sample) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::Square;

    fn test_move() -> Move {
        let from: Square = "e2".parse().unwrap();
        let to: Square = "e4".parse().unwrap();
        Move::double_pawn_push(from, to)
    }

    #[test]
    fn test_store_then_probe() {
        let tt = TranspositionTable::new(1);
        let key = 0x0123_4567_89AB_CDEF;

        tt.store(key, test_move(), -250, 7, NodeType::Pv);

        let entry = tt.probe(key);
        assert!(!entry.is_null());
        assert_eq!(entry.key, key);
        assert_eq!(entry.mv, test_move());
        assert_eq!(entry.eval, -250);
        assert_eq!(entry.depth, 7);
        assert_eq!(entry.node, NodeType::Pv);
    }

    #[test]
    fn test_miss_returns_null() {
        let tt = TranspositionTable::new(1);
        assert!(tt.probe(0xDEAD_BEEF).is_null());

        tt.store(42, test_move(), 1, 1, NodeType::Cut);
        // different key hashing to a different cell
        assert!(tt.probe(43).is_null());
    }

    #[test]
    fn test_always_replace() {
        let tt = TranspositionTable::new(1);
        let key = 99;
        tt.store(key, test_move(), 10, 9, NodeType::Pv);
        tt.store(key, Move::null(), -5, 2, NodeType::All);

        let entry = tt.probe(key);
        assert_eq!(entry.eval, -5);
        assert_eq!(entry.depth, 2);
        assert_eq!(entry.node, NodeType::All);
    }

    #[test]
    fn test_colliding_key_rejected() {
        let tt = TranspositionTable::new(1);
        let len = tt.len() as u64;
        // two keys that map to the same cell
        let key_a = 7u64;
        let key_b = 7u64 + len;
        tt.store(key_a, test_move(), 33, 3, NodeType::Cut);
        assert!(tt.probe(key_b).is_null());
        assert!(!tt.probe(key_a).is_null());
    }

    #[test]
    fn test_reset() {
        let tt = TranspositionTable::new(1);
        tt.store(123, test_move(), 5, 4, NodeType::Pv);
        tt.reset();
        assert!(tt.probe(123).is_null());
        assert_eq!(tt.hashfull_per_mille(), 0);
    }

    #[test]
    fn test_negative_eval_roundtrip() {
        let tt = TranspositionTable::new(1);
        tt.store(5, Move::null(), -19993, 1, NodeType::Cut);
        assert_eq!(tt.probe(5).eval, -19993);
    }

    #[test]
    fn test_concurrent_store_probe_never_tears() {
        use std::sync::Arc;

        let tt = Arc::new(TranspositionTable::new(1));
        let len = tt.len() as u64;
        // hammer one cell with two writers storing self-consistent entries
        let writers: Vec<_> = (0..2u64)
            .map(|i| {
                let tt = Arc::clone(&tt);
                std::thread::spawn(move || {
                    let key = 11 + i * len;
                    for d in 0..5000u16 {
                        tt.store(key, test_move(), d as i16, d, NodeType::Cut);
                    }
                })
            })
            .collect();

        for _ in 0..20000 {
            let entry = tt.probe(11);
            if !entry.is_null() {
                // whatever we read must be internally consistent
                assert_eq!(entry.key, 11);
                assert_eq!(entry.eval as u16, entry.depth);
            }
        }
        for w in writers {
            w.join().unwrap();
        }
    }
}
