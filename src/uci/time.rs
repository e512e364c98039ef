//! Time budget for a `go` command.

use std::time::Duration;

use crate::board::types::Color;

use super::command::GoParams;

/// Cap on how many remaining moves the budget is spread over
const REMAINING_MOVES_CAP: u64 = 20;

/// Compute the time budget for this search, `None` when unconstrained.
///
/// `movetime` is used verbatim; otherwise the mover's remaining clock plus
/// increment is spread over `min(20, movestogo)` moves.
#[must_use]
pub fn calculate_search_time(side: Color, params: &GoParams) -> Option<Duration> {
    if let Some(movetime) = params.movetime {
        return Some(Duration::from_millis(movetime));
    }

    let (time, inc) = match side {
        Color::White => (params.wtime, params.winc),
        Color::Black => (params.btime, params.binc),
    };

    let time = time?;
    let remaining = time + inc.unwrap_or(0);
    let moves_estimate = params
        .movestogo
        .map_or(REMAINING_MOVES_CAP, |mtg| mtg.min(REMAINING_MOVES_CAP))
        .max(1);

    Some(Duration::from_millis(remaining / moves_estimate))
}
