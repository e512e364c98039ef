//! Position representation: bitboards, FEN, make/unmake, move generation.

pub mod error;
mod fen;
mod make_unmake;
pub mod movegen;
mod state;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError};
pub use movegen::{GenType, PerftInfo};
pub use state::{Board, StateInfo};
