//! Iterative-deepening alpha-beta search with quiescence.
//!
//! Every worker runs the same driver on its private copy of the root
//! position; coordination happens through the shared transposition table,
//! the killer/history tables, and the worker status flag polled at every
//! node. Only the main worker reports to UCI and enforces time/node limits.

pub mod picker;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::board::types::{Depth, Eval, MoveList, INF, MATE, MAX_PLY, NULL_MOVE};
use crate::board::{Board, GenType};
use crate::engine::{Engine, Worker};
use crate::evaluation::{evaluate, PAWN_SCORE};
use crate::tt::{NodeType, TranspositionTable};
use crate::uci::report;

use picker::MovePicker;

/// Aspiration half-window
const ASPIRATION_WINDOW: Eval = PAWN_SCORE / 2;

/// Null-move depth reduction
const NULL_MOVE_REDUCTION: Depth = 2;

/// Legal moves searched at full depth before reductions kick in
const LMR_MOVE_THRESHOLD: usize = 4;

/// Minimum depth for null-move pruning
const NULL_MOVE_MIN_DEPTH: Depth = 4;

struct Search<'a> {
    engine: &'a Engine,
    worker: &'a Worker,
    tt: Arc<TranspositionTable>,
    board: &'a mut Board,
    root_moves: &'a mut MoveList,
}

/// Worker entry point: iterative deepening with aspiration and MultiPV
pub(crate) fn run(engine: &Engine, worker: &Worker) {
    let tt = engine.tt();
    let mut board_guard = worker.board.lock();
    let mut root_moves_guard = worker.root_moves.lock();

    let (max_depth, searchmoves) = {
        let info = engine.search_info();
        (info.max_depth, info.root_moves.clone())
    };
    let configured_pvs = engine.options().num_pvs.max(1);

    let mut search = Search {
        engine,
        worker,
        tt,
        board: &mut *board_guard,
        root_moves: &mut *root_moves_guard,
    };

    let mut prev_scores: Vec<Option<Eval>> = vec![None; configured_pvs];

    let mut depth: usize = 1;
    while engine.pool().is_running() && depth < MAX_PLY && depth <= max_depth {
        // rebuild this iteration's root candidates
        search.root_moves.shrink(0);
        if searchmoves.is_empty() {
            search
                .board
                .generate_moves(GenType::Pseudolegal, search.root_moves);
        } else {
            search.root_moves.extend(&searchmoves);
        }

        let num_pvs = configured_pvs.min(search.root_moves.len());
        if num_pvs == 0 {
            break;
        }

        for pv_index in 0..num_pvs {
            let mut pv = MoveList::new();
            let score =
                search.search_with_aspiration(depth as Depth, prev_scores[pv_index], &mut pv);

            // publish only complete results: a stopped search leaves the
            // previous iteration's line in place
            if !engine.pool().is_running() || search.worker.is_stopped() || pv.is_empty() {
                break;
            }
            engine.update_pv_line(pv_index, &pv, score);
            prev_scores[pv_index] = Some(score);

            // exclude this line's head so the next line finds a new move
            if let Some(head) = engine.pv_line_first(pv_index) {
                search.root_moves.remove(head);
            }
        }

        engine.sort_pv_lines();

        if worker.is_main() && engine.pool().is_running() {
            report::print_iteration(engine, depth);
        }

        depth += 1;
    }

    if worker.is_main() {
        report::print_bestmove(engine.best_move());
        engine.finish_search();
    }
}

impl Search<'_> {
    /// One depth iteration: narrow window around the previous score, with a
    /// full-window re-search at the same depth when the result falls outside.
    fn search_with_aspiration(
        &mut self,
        depth: Depth,
        prev_score: Option<Eval>,
        pv: &mut MoveList,
    ) -> Eval {
        if let Some(prev) = prev_score {
            let alpha = prev.saturating_sub(ASPIRATION_WINDOW).max(-INF);
            let beta = prev.saturating_add(ASPIRATION_WINDOW).min(INF);

            pv.shrink(0);
            let score = self.alpha_beta(depth, alpha, beta, true, pv);
            if score > alpha && score < beta {
                return score;
            }
        }

        pv.shrink(0);
        self.alpha_beta(depth, -INF, INF, true, pv)
    }

    /// Is this worker's search cancelled?
    #[inline]
    fn stopped(&self) -> bool {
        self.worker.is_stopped()
    }

    fn alpha_beta(
        &mut self,
        depth: Depth,
        mut alpha: Eval,
        beta: Eval,
        root: bool,
        pv_parent: &mut MoveList,
    ) -> Eval {
        // hard bailouts
        if self.board.ply_played() >= MAX_PLY {
            return evaluate(self.board);
        }
        if self.board.is_repetition() || self.board.ply_clock() > 100 {
            return 0;
        }

        // stop polls: the main worker also enforces time/node limits
        if self.worker.is_main() && self.engine.check_stop() {
            return 0;
        }
        if self.stopped() {
            return 0;
        }

        // transposition table cutoff; cached bounds are valid at equal depth.
        // Skipped at the root, where MultiPV needs a searched line, not a score.
        let tt_entry = self.tt.probe(self.board.zobrist_key());
        if !root && !tt_entry.is_null() && tt_entry.depth >= depth {
            match tt_entry.node {
                NodeType::Pv => return tt_entry.eval,
                NodeType::All if tt_entry.eval <= alpha => return tt_entry.eval,
                NodeType::Cut if tt_entry.eval >= beta => return tt_entry.eval,
                _ => {}
            }
        }

        if depth == 0 {
            return self.quiescence(alpha, beta);
        }

        let us = self.board.side_to_move();
        let in_check = self.board.is_check(us);

        // null-move pruning: hand the opponent a free move; if the reduced
        // search still fails high, the real position surely would
        if !root && depth >= NULL_MOVE_MIN_DEPTH && !in_check {
            let mut null_pv = MoveList::new();
            self.board.make_null_move();
            let score = -self.alpha_beta(
                depth - 1 - NULL_MOVE_REDUCTION,
                -beta,
                -beta + 1,
                false,
                &mut null_pv,
            );
            self.board.unmake_null_move();

            if self.stopped() {
                return 0;
            }
            if score >= beta {
                return beta;
            }
        }

        let mut picker = MovePicker::new(
            self.board,
            GenType::Pseudolegal,
            &self.tt,
            &self.engine.killers,
            &self.engine.history,
        );

        let mut best_move = NULL_MOVE;
        let mut best_score = -INF;
        let mut node_type = NodeType::All;
        let mut legal_count = 0usize;
        let mut pv_child = MoveList::new();

        while let Some(mv) = picker.next_move() {
            if root && !self.root_moves.contains(mv) {
                continue;
            }

            let is_killer = self.engine.killers.contains(self.board.ply_played(), mv);
            let moved_piece = self.board.moved_piece(mv);

            self.board.make_move(mv);
            if self.board.is_check(us) {
                self.board.unmake_move();
                continue;
            }
            legal_count += 1;
            self.worker.node_counter.fetch_add(1, Ordering::Relaxed);

            if self.worker.is_main() && self.engine.should_report_progress() {
                report::print_progress(self.board, self.root_moves);
            }

            let gives_check = self.board.is_check(self.board.side_to_move());

            pv_child.shrink(0);
            let score = if gives_check {
                // check extension: one ply deeper, never reduced
                -self.alpha_beta(depth, -beta, -alpha, false, &mut pv_child)
            } else {
                let reduction = if legal_count > LMR_MOVE_THRESHOLD
                    && mv.is_quiet()
                    && !is_killer
                    && !in_check
                {
                    depth / 3
                } else {
                    0
                };

                let mut score =
                    -self.alpha_beta(depth - 1 - reduction, -beta, -alpha, false, &mut pv_child);
                if reduction > 0 && score > alpha && !self.stopped() {
                    // reduced search beat alpha: confirm at full depth
                    pv_child.shrink(0);
                    score = -self.alpha_beta(depth - 1, -beta, -alpha, false, &mut pv_child);
                }
                score
            };

            self.board.unmake_move();

            if self.stopped() {
                return 0;
            }

            if score >= beta {
                self.tt
                    .store(self.board.zobrist_key(), mv, beta, depth, NodeType::Cut);
                if mv.is_quiet() {
                    self.engine.killers.insert(self.board.ply_played(), mv);
                }
                return beta;
            }

            if score > alpha {
                alpha = score;
                node_type = NodeType::Pv;

                pv_parent.shrink(0);
                pv_parent.push(mv);
                pv_parent.extend(&pv_child);

                if mv.is_quiet() {
                    if let Some(piece) = moved_piece {
                        self.engine.history.bump(piece, mv.to(), depth);
                    }
                }
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
        }

        // no legal moves: mate or stalemate
        if legal_count == 0 {
            return if in_check {
                -MATE + self.board.ply_played() as Eval
            } else {
                0
            };
        }

        self.tt.store(
            self.board.zobrist_key(),
            best_move,
            best_score,
            depth,
            node_type,
        );
        alpha
    }

    /// Captures-only search to settle the horizon before a static eval
    fn quiescence(&mut self, mut alpha: Eval, beta: Eval) -> Eval {
        if self.stopped() {
            return 0;
        }
        if self.board.ply_played() >= MAX_PLY {
            return evaluate(self.board);
        }

        let stand_pat = evaluate(self.board);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut picker = MovePicker::new(
            self.board,
            GenType::Capture,
            &self.tt,
            &self.engine.killers,
            &self.engine.history,
        );

        let us = self.board.side_to_move();
        while let Some(mv) = picker.next_move() {
            self.board.make_move(mv);
            if self.board.is_check(us) {
                self.board.unmake_move();
                continue;
            }
            self.worker.node_counter.fetch_add(1, Ordering::Relaxed);

            let score = -self.quiescence(-beta, -alpha);
            self.board.unmake_move();

            if self.stopped() {
                return 0;
            }

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }
}
