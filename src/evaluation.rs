//! Static evaluation: material plus piece-square weights.
//!
//! Deliberately simple; the search supplies all tactical understanding.
//! Scores are centipawns from the side-to-move's perspective.

use crate::board::types::{Color, Eval, PieceType, Square};
use crate::board::Board;

pub const PAWN_SCORE: Eval = 100;
pub const KNIGHT_SCORE: Eval = 350;
pub const BISHOP_SCORE: Eval = 350;
pub const ROOK_SCORE: Eval = 525;
pub const QUEEN_SCORE: Eval = 1000;
pub const KING_SCORE: Eval = 10000;

pub const PIECE_SCORES: [Eval; 6] = [
    PAWN_SCORE,
    KNIGHT_SCORE,
    BISHOP_SCORE,
    ROOK_SCORE,
    QUEEN_SCORE,
    KING_SCORE,
];

const BISHOP_PAIR_SCORE: i32 = 25;

/// Piece-square tables for pawn through queen, written from White's view
/// with rank 8 on the first row. White indexes through a vertical flip.
#[rustfmt::skip]
const PIECE_SQUARE_TABLE: [[i32; 64]; 5] = [
    // pawn
    [
         0,  0,  0,  0,  0,  0,  0,  0,
        50, 50, 50, 50, 50, 50, 50, 50,
        10, 10, 20, 30, 30, 20, 10, 10,
         5,  5, 10, 25, 25, 10,  5,  5,
         0,  0,  0, 20, 20,  0,  0,  0,
         5, -5,-10,  0,  0,-10, -5,  5,
         5, 10, 10,-20,-20, 10, 10,  5,
         0,  0,  0,  0,  0,  0,  0,  0,
    ],
    // knight
    [
       -50,-40,-30,-30,-30,-30,-40,-50,
       -40,-20,  0,  0,  0,  0,-20,-40,
       -30,  0, 10, 15, 15, 10,  0,-30,
       -30,  5, 15, 20, 20, 15,  5,-30,
       -30,  0, 15, 20, 20, 15,  0,-30,
       -30,  5, 10, 15, 15, 10,  5,-30,
       -40,-20,  0,  5,  5,  0,-20,-40,
       -50,-40,-30,-30,-30,-30,-40,-50,
    ],
    // bishop
    [
       -20,-10,-10,-10,-10,-10,-10,-20,
       -10,  0,  0,  0,  0,  0,  0,-10,
       -10,  0,  5, 10, 10,  5,  0,-10,
       -10,  5,  5, 10, 10,  5,  5,-10,
       -10,  0, 10, 10, 10, 10,  0,-10,
       -10, 10, 10, 10, 10, 10, 10,-10,
       -10,  5,  0,  0,  0,  0,  5,-10,
       -20,-10,-10,-10,-10,-10,-10,-20,
    ],
    // rook
    [
         0,  0,  0,  0,  0,  0,  0,  0,
         5, 10, 10, 10, 10, 10, 10,  5,
        -5,  0,  0,  0,  0,  0,  0, -5,
        -5,  0,  0,  0,  0,  0,  0, -5,
        -5,  0,  0,  0,  0,  0,  0, -5,
        -5,  0,  0,  0,  0,  0,  0, -5,
        -5,  0,  0,  0,  0,  0,  0, -5,
         0,  0,  0,  5,  5,  0,  0,  0,
    ],
    // queen
    [
       -20,-10,-10, -5, -5,-10,-10,-20,
       -10,  0,  0,  0,  0,  0,  0,-10,
       -10,  0,  5,  5,  5,  5,  0,-10,
        -5,  0,  5,  5,  5,  5,  0, -5,
         0,  0,  5,  5,  5,  5,  0, -5,
       -10,  5,  5,  5,  5,  5,  0,-10,
       -10,  0,  5,  0,  0,  0,  0,-10,
       -20,-10,-10, -5, -5,-10,-10,-20,
    ],
];

fn evaluate_material(board: &Board) -> i32 {
    let mut score = 0i32;
    for pt in PieceType::ALL {
        let white = board.colored_bb(Color::White, pt).popcount() as i32;
        let black = board.colored_bb(Color::Black, pt).popcount() as i32;
        score += i32::from(PIECE_SCORES[pt.index()]) * (white - black);
    }

    let white_pair = board.colored_bb(Color::White, PieceType::Bishop).popcount() >= 2;
    let black_pair = board.colored_bb(Color::Black, PieceType::Bishop).popcount() >= 2;
    score += BISHOP_PAIR_SCORE * (i32::from(white_pair) - i32::from(black_pair));

    score
}

fn evaluate_piece_square(board: &Board) -> i32 {
    let mut score = 0i32;
    for sq in Square::all() {
        let Some(piece) = board.piece_at(sq) else {
            continue;
        };
        let pt = piece.piece_type();
        if pt == PieceType::King {
            continue;
        }
        let table = &PIECE_SQUARE_TABLE[pt.index()];
        score += match piece.color() {
            Color::White => table[sq.flip_vertical().as_index()],
            Color::Black => -table[sq.as_index()],
        };
    }
    score
}

/// Evaluate from the side-to-move's perspective
#[must_use]
pub fn evaluate(board: &Board) -> Eval {
    let score = evaluate_material(board) + evaluate_piece_square(board);
    let score = score.clamp(-19000, 19000) as Eval;
    match board.side_to_move() {
        Color::White => score,
        Color::Black => -score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_is_balanced() {
        let board = Board::new();
        assert_eq!(evaluate(&board), 0);
    }

    #[test]
    fn test_eval_is_side_relative() {
        // white up a queen
        let board = Board::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let white_view = evaluate(&board);
        let board = Board::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").unwrap();
        let black_view = evaluate(&board);
        assert!(white_view > 0);
        assert_eq!(white_view, -black_view);
    }

    #[test]
    fn test_material_dominates() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let score = evaluate(&board);
        assert!(score >= ROOK_SCORE - 50 && score <= ROOK_SCORE + 50);
    }

    #[test]
    fn test_centralized_knight_beats_rim_knight() {
        let center = Board::from_fen("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").unwrap();
        let rim = Board::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").unwrap();
        assert!(evaluate(&center) > evaluate(&rim));
    }

    #[test]
    fn test_bishop_pair_bonus() {
        let pair = Board::from_fen("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1").unwrap();
        let knight_bishop = Board::from_fen("4k3/8/8/8/8/8/8/2N1KB2 w - - 0 1").unwrap();
        assert!(evaluate(&pair) > evaluate(&knight_bishop));
    }
}
