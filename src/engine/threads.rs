//! Search worker threads and the pool coordinating them.
//!
//! One persistent OS thread per configured worker; worker 0 is the main
//! thread and the only one that enforces time/node limits and talks UCI.
//! Workers park on a condition variable while idle. The stop signal is a
//! status flip to `Idle`, observed by the search at every node entry.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use once_cell::sync::OnceCell;
use parking_lot::{Condvar, Mutex};

#[cfg(feature = "logging")]
use log::debug;

use crate::board::types::MoveList;
use crate::board::Board;
use crate::search;

use super::Engine;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerStatus {
    Idle = 0,
    Running = 1,
    Exiting = 2,
}

impl WorkerStatus {
    fn from_bits(bits: u8) -> WorkerStatus {
        match bits {
            1 => WorkerStatus::Running,
            2 => WorkerStatus::Exiting,
            _ => WorkerStatus::Idle,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PoolStatus {
    Idle = 0,
    Running = 1,
}

/// One search worker.
///
/// The board and root-move list are private to the worker while it runs;
/// the pool writes them only between searches, when the worker is parked.
pub struct Worker {
    id: usize,
    status: AtomicU8,
    parked: Mutex<bool>,
    cv: Condvar,

    pub(crate) board: Mutex<Board>,
    pub(crate) root_moves: Mutex<MoveList>,
    pub(crate) node_counter: AtomicU64,
}

impl Worker {
    fn new(id: usize) -> Self {
        Worker {
            id,
            status: AtomicU8::new(WorkerStatus::Idle as u8),
            parked: Mutex::new(false),
            cv: Condvar::new(),
            board: Mutex::new(Board::new()),
            root_moves: Mutex::new(MoveList::new()),
            node_counter: AtomicU64::new(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn is_main(&self) -> bool {
        self.id == 0
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> WorkerStatus {
        WorkerStatus::from_bits(self.status.load(Ordering::Relaxed))
    }

    /// The cancel signal: anything but `Running` unwinds the search
    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.status() != WorkerStatus::Running
    }

    fn set_status(&self, status: WorkerStatus) {
        self.status.store(status as u8, Ordering::Relaxed);
    }

    /// Wake the worker into a search
    fn start_search(&self) {
        let _guard = self.parked.lock();
        self.set_status(WorkerStatus::Running);
        self.cv.notify_all();
    }

    /// Ask the worker to stop; it observes the flip at its next node
    fn signal_stop(&self) {
        let _guard = self.parked.lock();
        self.set_status(WorkerStatus::Idle);
        self.cv.notify_all();
    }

    /// Block until the worker has fully unwound and parked
    fn wait_until_parked(&self) {
        let mut parked = self.parked.lock();
        self.cv.wait_while(&mut parked, |parked| !*parked);
    }

    fn exit(&self) {
        let _guard = self.parked.lock();
        self.set_status(WorkerStatus::Exiting);
        self.cv.notify_all();
    }
}

/// Worker thread body: park while idle, search while running, leave on exit
fn worker_loop(engine: Arc<Engine>, worker: Arc<Worker>) {
    loop {
        {
            let mut parked = worker.parked.lock();
            // acknowledge a naturally finished search before parking
            if worker.status() != WorkerStatus::Exiting {
                worker.set_status(WorkerStatus::Idle);
            }
            *parked = true;
            worker.cv.notify_all();
            worker
                .cv
                .wait_while(&mut parked, |_| worker.status() == WorkerStatus::Idle);
            *parked = false;
        }

        if worker.status() == WorkerStatus::Exiting {
            break;
        }

        search::run(&engine, &worker);

        worker.node_counter.store(0, Ordering::Relaxed);
    }

    #[cfg(feature = "logging")]
    debug!("worker {} exiting", worker.id);
}

/// Pool of persistent search workers sharing the engine context
pub struct ThreadPool {
    status: AtomicU8,
    workers: OnceCell<Vec<Arc<Worker>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

/// Deep recursion needs a big stack (the search is recursive to MAX_PLY)
const WORKER_STACK_SIZE: usize = 32 * 1024 * 1024;

impl ThreadPool {
    pub(super) fn new() -> Self {
        ThreadPool {
            status: AtomicU8::new(PoolStatus::Idle as u8),
            workers: OnceCell::new(),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawn `num_threads` workers bound to `engine`. Called exactly once,
    /// right after the engine context is built.
    pub(super) fn spawn(&self, engine: &Arc<Engine>, num_threads: usize) {
        let num_threads = num_threads.max(1);
        let workers: Vec<Arc<Worker>> = (0..num_threads).map(|id| Arc::new(Worker::new(id))).collect();

        let mut handles = self.handles.lock();
        for worker in &workers {
            let engine = Arc::clone(engine);
            let worker = Arc::clone(worker);
            let handle = std::thread::Builder::new()
                .name(format!("search-{}", worker.id))
                .stack_size(WORKER_STACK_SIZE)
                .spawn(move || worker_loop(engine, worker))
                .expect("failed to spawn search worker");
            handles.push(handle);
        }

        self.workers.set(workers).ok().expect("pool spawned twice");
    }

    pub(super) fn workers(&self) -> &[Arc<Worker>] {
        self.workers.get().expect("pool not spawned")
    }

    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status.load(Ordering::Relaxed) == PoolStatus::Running as u8
    }

    pub(super) fn set_status(&self, status: PoolStatus) {
        self.status.store(status as u8, Ordering::Relaxed);
    }

    /// Sum of all workers' node counters for the current search
    #[must_use]
    pub fn sum_nodes(&self) -> u64 {
        self.workers()
            .iter()
            .map(|w| w.node_counter.load(Ordering::Relaxed))
            .sum()
    }

    /// Wake every worker into the published search
    pub(super) fn start_all(&self) {
        for worker in self.workers().iter().rev() {
            worker.start_search();
        }
        self.set_status(PoolStatus::Running);
    }

    /// Flip every worker to idle without waiting.
    ///
    /// Safe to call from inside a worker (the main thread's limit check);
    /// the search unwinds at its next stop poll.
    pub(super) fn signal_stop_all(&self) {
        for worker in self.workers().iter().rev() {
            worker.signal_stop();
        }
        self.set_status(PoolStatus::Idle);
    }

    /// Stop and wait until every worker is parked. Must not be called from
    /// a worker thread.
    pub(super) fn stop_and_wait_all(&self) {
        for worker in self.workers().iter().rev() {
            worker.signal_stop();
            worker.wait_until_parked();
        }
        self.set_status(PoolStatus::Idle);
    }

    /// Shut every worker down and join the threads
    pub(super) fn shutdown(&self) {
        self.stop_and_wait_all();
        for worker in self.workers() {
            worker.exit();
        }
        for handle in self.handles.lock().drain(..) {
            let _ = handle.join();
        }
    }
}
