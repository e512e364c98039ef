//! MPChess: a UCI chess engine.
//!
//! Core pieces:
//! - Bitboard position representation with magic-bitboard move generation
//! - Multi-threaded iterative-deepening alpha-beta search
//! - Shared lock-free transposition table with zobrist hashing
//! - Move ordering via TT move, MVV-LVA, killers, and history
//!
//! # Quick start
//!
//! ```no_run
//! use mpchess::board::Board;
//! use mpchess::engine::{Engine, Options, SearchInfo};
//!
//! let engine = Engine::new(Options::default());
//! engine.set_position(Board::from_fen(
//!     "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
//! ).unwrap());
//!
//! engine.start_search(SearchInfo {
//!     max_depth: 6,
//!     ..SearchInfo::default()
//! });
//! // ... the pool searches; `stop_search` blocks until workers park
//! engine.stop_search();
//! let best = engine.best_move();
//! engine.shutdown();
//! # let _ = best;
//! ```
//!
//! # Features
//!
//! - `serde` - serialization for the small value types (`Square`, `Move`, ...)
//! - `logging` - debug messages via the `log` crate in the pool and TT

// Bitboard hex literals read better without separators
#![allow(clippy::unreadable_literal)]
// Index casts are ubiquitous and bounded in chess code
#![allow(clippy::cast_possible_truncation)]

pub mod attacks;
pub mod board;
pub mod engine;
pub mod evaluation;
pub mod rng;
pub mod search;
pub mod tt;
pub mod uci;
pub mod zobrist;
