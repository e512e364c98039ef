//! Universal Chess Interface: stdin command loop and handlers.

pub mod command;
pub mod report;
pub mod time;

use std::fmt;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Instant;

use crate::board::error::{FenError, MoveParseError};
use crate::board::types::{Move, MoveList, MAX_PLY};
use crate::board::{Board, GenType};
use crate::engine::{Engine, SearchInfo};

use command::{parse_go_params, parse_uci_command, GoParams, UciCommand};

pub const ENGINE_NAME: &str = "MPChess";
pub const ENGINE_AUTHOR: &str = "Matthew Pham";

/// Error type for `position` command handling
#[derive(Debug, Clone)]
pub enum UciError {
    InvalidFen(FenError),
    InvalidMove {
        move_str: String,
        error: MoveParseError,
    },
    MissingParts,
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::InvalidFen(e) => write!(f, "Invalid FEN: {e}"),
            UciError::InvalidMove { move_str, error } => {
                write!(f, "Invalid move '{move_str}': {error}")
            }
            UciError::MissingParts => write!(f, "Missing parts in position command"),
        }
    }
}

impl std::error::Error for UciError {}

impl From<FenError> for UciError {
    fn from(e: FenError) -> Self {
        UciError::InvalidFen(e)
    }
}

/// Parse a move in UCI long algebraic notation against the current position.
///
/// The move must be pseudo-legal and leave the own king out of check.
pub fn parse_uci_move(board: &mut Board, notation: &str) -> Result<Move, MoveParseError> {
    if notation.len() < 4 || notation.len() > 5 {
        return Err(MoveParseError::InvalidLength {
            len: notation.len(),
        });
    }

    let mut pseudo = MoveList::new();
    board.generate_moves(GenType::Pseudolegal, &mut pseudo);

    let Some(mv) = pseudo.iter().copied().find(|m| m.to_string() == notation) else {
        return Err(MoveParseError::InvalidSquare {
            notation: notation.to_string(),
        });
    };

    let side = board.side_to_move();
    board.make_move(mv);
    let legal = !board.is_check(side);
    board.unmake_move();

    if legal {
        Ok(mv)
    } else {
        Err(MoveParseError::IllegalMove {
            notation: notation.to_string(),
        })
    }
}

/// Rebuild the engine root from a `position` command.
///
/// An illegal move in the list stops the replay; the board stays at the
/// last legal state. The result is installed through a FEN round-trip so
/// the search root starts at ply zero.
pub fn handle_position(engine: &Engine, parts: &[&str]) -> Result<(), UciError> {
    if parts.len() < 2 {
        return Err(UciError::MissingParts);
    }

    let mut board;
    let mut index = 1;

    if parts[1] == "startpos" {
        board = Board::new();
        index += 1;
    } else if parts[1] == "fen" {
        if parts.len() < index + 7 {
            return Err(UciError::MissingParts);
        }
        let fen = parts[index + 1..index + 7].join(" ");
        board = Board::from_fen(&fen)?;
        index += 7;
    } else {
        return Err(UciError::MissingParts);
    }

    if parts.get(index) == Some(&"moves") {
        for move_str in &parts[index + 1..] {
            match parse_uci_move(&mut board, move_str) {
                Ok(mv) => board.make_move(mv),
                Err(error) => {
                    eprintln!(
                        "{}",
                        UciError::InvalidMove {
                            move_str: (*move_str).to_string(),
                            error,
                        }
                    );
                    break;
                }
            }
        }
    }

    let root = Board::from_fen(&board.to_fen())?;
    engine.set_position(root);
    Ok(())
}

/// Translate a `go` command into `SearchInfo` limits and start the pool
pub fn handle_go(engine: &Engine, parts: &[&str]) {
    let params: GoParams = parse_go_params(parts);
    let mut root = engine.root_board();

    let mut info = SearchInfo {
        start_time: Instant::now(),
        ..SearchInfo::default()
    };

    for move_str in &params.searchmoves {
        match parse_uci_move(&mut root, move_str) {
            Ok(mv) => info.root_moves.push(mv),
            Err(_) => break,
        }
    }

    info.ponder = params.ponder;
    info.infinite = params.infinite;
    if let Some(depth) = params.depth {
        info.max_depth = depth.min(MAX_PLY);
    }
    if let Some(nodes) = params.nodes {
        info.max_nodes = nodes;
    }
    info.mate_in_n = params.mate.unwrap_or(0);
    info.white_time = params.wtime.map(std::time::Duration::from_millis);
    info.black_time = params.btime.map(std::time::Duration::from_millis);
    info.white_inc = params.winc.map(std::time::Duration::from_millis);
    info.black_inc = params.binc.map(std::time::Duration::from_millis);
    info.moves_to_go = params.movestogo;

    if let Some(budget) = time::calculate_search_time(root.side_to_move(), &params) {
        info.max_time = budget;
    }

    engine.start_search(info);
}

fn handle_setoption(engine: &Engine, parts: &[&str]) {
    // setoption name <id> value <x>
    let name_pos = parts.iter().position(|p| *p == "name");
    let value_pos = parts.iter().position(|p| *p == "value");
    let (Some(name_pos), Some(value_pos)) = (name_pos, value_pos) else {
        return;
    };
    let name = parts[name_pos + 1..value_pos].join(" ");
    let value = parts.get(value_pos + 1).copied().unwrap_or("");

    match name.to_ascii_lowercase().as_str() {
        "hash" => {
            if let Ok(mb) = value.parse::<usize>() {
                engine.set_hash_size(mb);
            }
        }
        "multipv" => {
            if let Ok(n) = value.parse::<usize>() {
                engine.set_num_pvs(n);
            }
        }
        "threads" => {
            // worker count is fixed when the pool is spawned
            println!("info string Threads is applied at engine startup");
        }
        _ => {}
    }
}

fn print_id() {
    println!("id name {ENGINE_NAME}");
    println!("id author {ENGINE_AUTHOR}");
    println!("option name Hash type spin default 16 min 1 max 65536");
    println!("option name Threads type spin default 1 min 1 max 256");
    println!("option name MultiPV type spin default 1 min 1 max 64");
    println!("uciok");
}

/// Blocking stdin loop; returns when the GUI quits
pub fn uci_loop(engine: &Arc<Engine>) {
    let stdin = std::io::stdin();

    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        let Some(cmd) = parse_uci_command(&line) else {
            continue;
        };
        let parts: Vec<&str> = line.split_whitespace().collect();

        match cmd {
            UciCommand::Uci => print_id(),
            UciCommand::IsReady => println!("readyok"),
            UciCommand::UciNewGame => engine.new_game(),
            UciCommand::Position(_) => {
                if let Err(e) = handle_position(engine, &parts) {
                    eprintln!("Error: {e}");
                }
            }
            UciCommand::Go(_) => handle_go(engine, &parts),
            UciCommand::SetOption(_) => handle_setoption(engine, &parts),
            UciCommand::Debug(arg) => {
                let on = matches!(arg.as_deref(), Some("on" | "yes" | "y"));
                engine.set_debug(on);
            }
            UciCommand::Print => println!("{}", engine.root_board()),
            UciCommand::Perft(depth) => {
                let mut board = engine.root_board();
                let start = Instant::now();
                let nodes = board.perft(depth);
                println!(
                    "info string perft depth {depth} nodes {nodes} time_ms {}",
                    start.elapsed().as_millis()
                );
            }
            UciCommand::Stop => engine.stop_search(),
            UciCommand::Quit => {
                engine.stop_search();
                break;
            }
            UciCommand::Unknown(_) => {}
        }
    }

    engine.shutdown();
}
