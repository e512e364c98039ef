//! Engine context: options, search limits, shared tables, and the pool.
//!
//! One `Engine` owns everything the search shares: the transposition table,
//! the killer/history heuristics, the root position, the PV lines, and the
//! worker pool. Workers hold an `Arc<Engine>`; interior mutability is
//! limited to atomics (TT cells, heuristic tables, counters) and locks that
//! are only contended at search boundaries.

pub mod threads;

use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock, RwLockReadGuard};

use crate::attacks;
use crate::board::types::{
    Eval, Move, MoveList, MoveScore, Piece, PvLine, Square, MAX_PLY, NUM_KILLER_MOVES,
};
use crate::board::Board;
use crate::search::picker::HISTORY_SCORE_MAX;
use crate::tt::{TranspositionTable, DEFAULT_TABLE_SIZE_MB};

pub use threads::{PoolStatus, ThreadPool, Worker, WorkerStatus};

/// Progress lines (`info ... currmove ...`) are throttled to this period
pub const UCI_UPDATE_PERIOD: Duration = Duration::from_secs(2);

/// Engine configuration
#[derive(Clone, Copy, Debug)]
pub struct Options {
    pub num_pvs: usize,
    pub num_threads: usize,
    pub hash_mb: usize,
    pub debug: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            num_pvs: 1,
            num_threads: 1,
            hash_mb: DEFAULT_TABLE_SIZE_MB,
            debug: false,
        }
    }
}

/// Limits and bookkeeping for one `go` command.
///
/// Every limit defaults to "unlimited"; the UCI layer fills in whatever the
/// GUI specified.
#[derive(Clone)]
pub struct SearchInfo {
    pub start_time: Instant,
    /// Restrict the root to these moves (`go searchmoves ...`); empty means
    /// every legal root move.
    pub root_moves: MoveList,

    pub ponder: bool,
    pub infinite: bool,

    pub max_nodes: u64,
    pub max_depth: usize,
    pub mate_in_n: usize,
    pub max_time: Duration,

    pub white_time: Option<Duration>,
    pub black_time: Option<Duration>,
    pub white_inc: Option<Duration>,
    pub black_inc: Option<Duration>,
    pub moves_to_go: Option<u64>,
}

impl Default for SearchInfo {
    fn default() -> Self {
        SearchInfo {
            start_time: Instant::now(),
            root_moves: MoveList::new(),
            ponder: false,
            infinite: false,
            max_nodes: u64::MAX,
            max_depth: MAX_PLY,
            mate_in_n: 0,
            max_time: Duration::MAX,
            white_time: None,
            black_time: None,
            white_inc: None,
            black_inc: None,
            moves_to_go: None,
        }
    }
}

/// Killer moves per ply: quiet moves that caused a beta cutoff.
///
/// Shared by all workers without synchronization; a lost update only
/// perturbs move ordering, never correctness, so relaxed atomics suffice.
pub struct KillerTable {
    slots: Vec<[AtomicU16; NUM_KILLER_MOVES]>,
}

impl KillerTable {
    fn new() -> Self {
        let mut slots = Vec::with_capacity(MAX_PLY);
        slots.resize_with(MAX_PLY, Default::default);
        KillerTable { slots }
    }

    /// Prepend a killer at this ply, dropping the oldest of the three
    pub fn insert(&self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        let row = &self.slots[ply];
        let first = row[0].load(Ordering::Relaxed);
        if first == mv.data() {
            return;
        }
        let second = row[1].load(Ordering::Relaxed);
        row[2].store(second, Ordering::Relaxed);
        row[1].store(first, Ordering::Relaxed);
        row[0].store(mv.data(), Ordering::Relaxed);
    }

    #[must_use]
    pub fn contains(&self, ply: usize, mv: Move) -> bool {
        if ply >= MAX_PLY || mv.is_null() {
            return false;
        }
        self.slots[ply]
            .iter()
            .any(|slot| slot.load(Ordering::Relaxed) == mv.data())
    }

    pub fn reset(&self) {
        for row in &self.slots {
            for slot in row {
                slot.store(0, Ordering::Relaxed);
            }
        }
    }
}

/// History heuristic: counters indexed by moved piece and target square,
/// bumped by depth squared on PV improvements. Scores are capped below the
/// killer band so a hot quiet move never outranks a killer.
pub struct HistoryTable {
    counters: Vec<AtomicU32>,
}

impl HistoryTable {
    fn new() -> Self {
        let mut counters = Vec::with_capacity(12 * 64);
        counters.resize_with(12 * 64, || AtomicU32::new(0));
        HistoryTable { counters }
    }

    #[inline]
    fn slot(&self, piece: Piece, to: Square) -> &AtomicU32 {
        &self.counters[piece.index() * 64 + to.as_index()]
    }

    #[must_use]
    pub fn score(&self, piece: Piece, to: Square) -> MoveScore {
        self.slot(piece, to).load(Ordering::Relaxed)
    }

    pub fn bump(&self, piece: Piece, to: Square, depth: u16) {
        let slot = self.slot(piece, to);
        let bonus = u32::from(depth) * u32::from(depth);
        let old = slot.load(Ordering::Relaxed);
        slot.store(old.saturating_add(bonus).min(HISTORY_SCORE_MAX), Ordering::Relaxed);
    }

    pub fn reset(&self) {
        for counter in &self.counters {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Process-wide engine state shared between the UCI thread and the workers
pub struct Engine {
    options: RwLock<Options>,
    search_info: RwLock<SearchInfo>,
    tt: RwLock<Arc<TranspositionTable>>,
    pub killers: KillerTable,
    pub history: HistoryTable,
    root_board: Mutex<Board>,
    pv_lines: Mutex<Vec<PvLine>>,
    pool: ThreadPool,
    prev_uci_update: Mutex<Instant>,
}

impl Engine {
    /// Build the engine context and spawn its workers.
    ///
    /// Also forces attack-table construction so the first search does not
    /// pay for it.
    #[must_use]
    pub fn new(options: Options) -> Arc<Engine> {
        attacks::init();

        let engine = Arc::new(Engine {
            options: RwLock::new(options),
            search_info: RwLock::new(SearchInfo::default()),
            tt: RwLock::new(Arc::new(TranspositionTable::new(options.hash_mb))),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            root_board: Mutex::new(Board::new()),
            pv_lines: Mutex::new(vec![PvLine::new(); options.num_pvs.max(1)]),
            pool: ThreadPool::new(),
            prev_uci_update: Mutex::new(Instant::now()),
        });

        engine.pool.spawn(&engine, options.num_threads);
        engine
    }

    // options

    #[must_use]
    pub fn options(&self) -> Options {
        *self.options.read()
    }

    pub fn set_num_pvs(&self, num_pvs: usize) {
        self.options.write().num_pvs = num_pvs.max(1);
    }

    pub fn set_debug(&self, debug: bool) {
        self.options.write().debug = debug;
    }

    /// Replace the transposition table. Only meaningful while idle.
    pub fn set_hash_size(&self, size_mb: usize) {
        let size_mb = size_mb.max(1);
        self.options.write().hash_mb = size_mb;
        *self.tt.write() = Arc::new(TranspositionTable::new(size_mb));
    }

    // shared tables

    /// Handle to the current transposition table
    #[must_use]
    pub fn tt(&self) -> Arc<TranspositionTable> {
        Arc::clone(&self.tt.read())
    }

    // root position

    pub fn set_position(&self, board: Board) {
        *self.root_board.lock() = board;
    }

    #[must_use]
    pub fn root_board(&self) -> Board {
        self.root_board.lock().clone()
    }

    // search control

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.pool.is_running()
    }

    #[must_use]
    pub fn pool(&self) -> &ThreadPool {
        &self.pool
    }

    /// Publish the search limits, hand every worker a copy of the root
    /// position, and wake the pool. Stops any search already running.
    pub fn start_search(&self, info: SearchInfo) {
        self.stop_search();

        let num_pvs = self.options.read().num_pvs.max(1);
        *self.pv_lines.lock() = vec![PvLine::new(); num_pvs];
        *self.search_info.write() = info;

        let root = self.root_board.lock().clone();
        for worker in self.pool.workers() {
            *worker.board.lock() = root.clone();
            worker.root_moves.lock().shrink(0);
        }

        self.pool.start_all();
    }

    /// Stop the pool and wait until every worker has parked.
    ///
    /// Must be called from the UCI thread, never from inside a worker.
    pub fn stop_search(&self) {
        self.pool.stop_and_wait_all();
    }

    /// Non-blocking stop used from inside the search (limit hits, natural
    /// completion). Workers unwind at their next stop poll.
    pub(crate) fn finish_search(&self) {
        self.pool.signal_stop_all();
    }

    /// Main-thread limit enforcement, polled at every node.
    ///
    /// Returns true when the search must stop because the node or time
    /// budget is exhausted.
    #[must_use]
    pub(crate) fn check_stop(&self) -> bool {
        let total_nodes = self.pool.sum_nodes();
        let info = self.search_info.read();
        if info.infinite {
            return false;
        }

        let hit_max_nodes = total_nodes >= info.max_nodes;
        let hit_max_time = info.start_time.elapsed() >= info.max_time;
        drop(info);

        if hit_max_nodes || hit_max_time {
            self.finish_search();
            return true;
        }
        false
    }

    /// `ucinewgame`: stop, wipe the cache and the heuristics
    pub fn new_game(&self) {
        self.stop_search();
        self.tt().reset();
        self.killers.reset();
        self.history.reset();
        self.set_position(Board::new());
    }

    /// Stop everything and join the worker threads
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }

    // search info

    #[must_use]
    pub fn search_info(&self) -> RwLockReadGuard<'_, SearchInfo> {
        self.search_info.read()
    }

    // PV lines

    pub(crate) fn update_pv_line(&self, index: usize, moves: &MoveList, score: Eval) {
        let mut lines = self.pv_lines.lock();
        if let Some(line) = lines.get_mut(index) {
            line.set_moves(moves);
            line.set_score(score);
        }
    }

    pub(crate) fn pv_line_first(&self, index: usize) -> Option<Move> {
        self.pv_lines.lock().get(index).and_then(PvLine::first)
    }

    /// Sort PV lines best-first (MultiPV output order); lines that never
    /// received a result sort last regardless of their placeholder score
    pub(crate) fn sort_pv_lines(&self) {
        self.pv_lines.lock().sort_by(|a, b| {
            match (a.moves().is_empty(), b.moves().is_empty()) {
                (false, false) => b.cmp(a),
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
            }
        });
    }

    #[must_use]
    pub fn pv_snapshot(&self) -> Vec<PvLine> {
        self.pv_lines.lock().clone()
    }

    /// First move of the best PV; the bestmove answer
    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        self.pv_lines.lock().first().and_then(PvLine::first)
    }

    // UCI progress throttle

    /// True at most once per `UCI_UPDATE_PERIOD`
    #[must_use]
    pub(crate) fn should_report_progress(&self) -> bool {
        let mut prev = self.prev_uci_update.lock();
        if prev.elapsed() >= UCI_UPDATE_PERIOD {
            *prev = Instant::now();
            return true;
        }
        false
    }
}
