//! UCI output formatting: search info lines and bestmove.

use crate::board::types::{Move, MoveList};
use crate::board::Board;
use crate::engine::Engine;

/// Per-depth report: one `info` line per PV, best line first.
///
/// Mate scores are still reported as `score cp`; they dominate every
/// non-mate eval by construction.
pub(crate) fn print_iteration(engine: &Engine, depth: usize) {
    let elapsed_ms = {
        let info = engine.search_info();
        info.start_time.elapsed().as_millis().max(1) as u64
    };
    let nodes = engine.pool().sum_nodes();
    let nps = nodes.saturating_mul(1000) / elapsed_ms;

    let lines = engine.pv_snapshot();
    let multipv = lines.len() > 1;

    for (index, line) in lines.iter().enumerate() {
        if line.moves().is_empty() {
            continue;
        }

        let mut out = format!("info depth {depth} ");
        if multipv {
            out.push_str(&format!("multipv {} ", index + 1));
        }
        out.push_str(&format!(
            "score cp {} nodes {nodes} nps {nps} pv",
            line.score()
        ));
        for mv in line.moves() {
            out.push_str(&format!(" {mv}"));
        }
        println!("{out}");
    }
}

/// Throttled mid-search progress line with the line currently explored
pub(crate) fn print_progress(board: &Board, root_moves: &MoveList) {
    let played = board.move_list();
    let Some(currmove) = played.first() else {
        return;
    };
    let currmovenumber = root_moves
        .iter()
        .position(|mv| *mv == currmove)
        .map_or(0, |idx| idx + 1);

    let mut out = format!(
        "info depth {} currmove {currmove} currmovenumber {currmovenumber} currline",
        board.ply_played()
    );
    for mv in played {
        out.push_str(&format!(" {mv}"));
    }
    println!("{out}");
}

/// Final answer; an empty PV (immediate mate/stalemate at the root) emits
/// the null move.
pub(crate) fn print_bestmove(best: Option<Move>) {
    println!("bestmove {}", best.unwrap_or(Move::null()));
}
