//! Board state: piece-centric and bitboard-centric representation.

use std::fmt;

use crate::attacks;
use crate::board::types::{
    Bitboard, Castle, Color, Key, MoveList, Piece, PieceType, Square, MAX_PLY,
};

pub(crate) const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Occupancy index for empty squares (after White=0, Black=1)
pub(crate) const EMPTY_OCC: usize = 2;

/// Per-ply undo record
#[derive(Clone, Copy, Debug, Default)]
pub struct StateInfo {
    pub(crate) zobrist_key: Key,
    pub(crate) ply_clock: u32,
    pub(crate) enpassant_square: Option<Square>,
    pub(crate) castling_rights: Castle,
    pub(crate) piece_captured: Option<Piece>,
}

/// Full game position.
///
/// Bitboards and the square-to-piece mailbox are kept in lockstep; the
/// zobrist key is maintained incrementally by make/unmake. Search workers
/// clone the root position once per search and then traverse exclusively
/// via make/unmake on their own copy.
#[derive(Clone)]
pub struct Board {
    pub(crate) pieces: [Option<Piece>; 64],
    pub(crate) piece_bbs: [Bitboard; 12],
    /// White, Black, and empty-square occupancy
    pub(crate) occupancy_bbs: [Bitboard; 3],

    pub(crate) side_to_move: Color,
    pub(crate) ply_clock: u32,
    pub(crate) ply_played: usize,
    pub(crate) ply_move_number: usize,
    pub(crate) enpassant_square: Option<Square>,
    pub(crate) castling_rights: Castle,
    pub(crate) zobrist_key: Key,

    pub(crate) state_history: [StateInfo; MAX_PLY],
    pub(crate) move_list: MoveList,
}

impl Board {
    /// The standard starting position
    #[must_use]
    pub fn new() -> Self {
        Board::from_fen(STARTING_FEN).expect("starting FEN is valid")
    }

    pub(crate) fn empty() -> Self {
        Board {
            pieces: [None; 64],
            piece_bbs: [Bitboard::EMPTY; 12],
            occupancy_bbs: [Bitboard::EMPTY, Bitboard::EMPTY, Bitboard::ALL],
            side_to_move: Color::White,
            ply_clock: 0,
            ply_played: 0,
            ply_move_number: 0,
            enpassant_square: None,
            castling_rights: 0,
            zobrist_key: 0,
            state_history: [StateInfo::default(); MAX_PLY],
            move_list: MoveList::new(),
        }
    }

    // board getters

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.pieces[sq.as_index()]
    }

    #[inline]
    #[must_use]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy_bbs[color.index()]
    }

    /// Bitboard of empty squares
    #[inline]
    #[must_use]
    pub fn unoccupied(&self) -> Bitboard {
        self.occupancy_bbs[EMPTY_OCC]
    }

    /// Bitboard of all occupied squares
    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        !self.occupancy_bbs[EMPTY_OCC]
    }

    #[inline]
    #[must_use]
    pub fn piece_bb(&self, piece: Piece) -> Bitboard {
        self.piece_bbs[piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn colored_bb(&self, color: Color, piece_type: PieceType) -> Bitboard {
        self.piece_bbs[Piece::new(color, piece_type).index()]
    }

    /// Both colors' pieces of one type
    #[inline]
    #[must_use]
    pub fn piece_type_bb(&self, piece_type: PieceType) -> Bitboard {
        self.colored_bb(Color::White, piece_type) | self.colored_bb(Color::Black, piece_type)
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn enpassant_square(&self) -> Option<Square> {
        self.enpassant_square
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> Castle {
        self.castling_rights
    }

    /// Halfmoves since the last capture or pawn move
    #[inline]
    #[must_use]
    pub fn ply_clock(&self) -> u32 {
        self.ply_clock
    }

    /// Halfmoves played from the root of the current game
    #[inline]
    #[must_use]
    pub fn ply_played(&self) -> usize {
        self.ply_played
    }

    /// Halfmoves since the start of the game (from the FEN move number)
    #[inline]
    #[must_use]
    pub fn ply_move_number(&self) -> usize {
        self.ply_move_number
    }

    /// FEN-style fullmove number
    #[inline]
    #[must_use]
    pub fn full_move_number(&self) -> usize {
        self.ply_move_number / 2 + 1
    }

    #[inline]
    #[must_use]
    pub fn zobrist_key(&self) -> Key {
        self.zobrist_key
    }

    /// Moves played on this board since the root
    #[must_use]
    pub fn move_list(&self) -> &MoveList {
        &self.move_list
    }

    /// King square for a side.
    ///
    /// Every legal position has exactly one king per color.
    #[inline]
    #[must_use]
    pub fn king_square(&self, side: Color) -> Square {
        self.colored_bb(side, PieceType::King).to_square()
    }

    // attacks

    /// All pieces (of either color) attacking any square of `targets`,
    /// taking the current occupancy into account.
    #[must_use]
    pub fn attacks_to(&self, targets: Bitboard) -> Bitboard {
        if targets.is_empty() {
            return Bitboard::EMPTY;
        }

        let occupancy = self.occupied();

        (attacks::pawn_attacks(Color::White, targets) & self.piece_bb(Piece::BPawn))
            | (attacks::pawn_attacks(Color::Black, targets) & self.piece_bb(Piece::WPawn))
            | (attacks::knight_attacks(targets) & self.piece_type_bb(PieceType::Knight))
            | (attacks::king_attacks(targets) & self.piece_type_bb(PieceType::King))
            | (attacks::slider_attacks_bb(PieceType::Bishop, targets, occupancy)
                & (self.piece_type_bb(PieceType::Bishop) | self.piece_type_bb(PieceType::Queen)))
            | (attacks::slider_attacks_bb(PieceType::Rook, targets, occupancy)
                & (self.piece_type_bb(PieceType::Rook) | self.piece_type_bb(PieceType::Queen)))
    }

    /// Is `side`'s king attacked by the other side?
    #[must_use]
    pub fn is_check(&self, side: Color) -> bool {
        let king = Bitboard::from_square(self.king_square(side));
        let checkers = self.attacks_to(king) & self.occupancy(!side);
        checkers.is_not_empty()
    }

    // repetition

    /// True iff any earlier position within the last `ply_clock` halfmoves
    /// had the same zobrist key.
    ///
    /// This is a 2-fold rule: the search treats the first recurrence as a
    /// draw to prune repeated lines early, which is stricter than the
    /// over-the-board 3-fold rule.
    #[must_use]
    pub fn is_repetition(&self) -> bool {
        if self.ply_clock < 4 {
            return false;
        }
        let lookback = (self.ply_clock as usize).min(self.ply_played);
        self.state_history[self.ply_played - lookback..self.ply_played]
            .iter()
            .any(|state| state.zobrist_key == self.zobrist_key)
    }

    // validation

    /// Any square claimed by two piece bitboards (empty when consistent)
    #[must_use]
    pub(crate) fn double_occupation(&self) -> Bitboard {
        let mut occupied = Bitboard::EMPTY;
        for bb in self.piece_bbs {
            if occupied.intersects(bb) {
                return occupied & bb;
            }
            occupied |= bb;
        }
        Bitboard::EMPTY
    }

    /// Squares where piece bitboards and occupancy bitboards disagree
    #[must_use]
    pub(crate) fn occupation_mismatch(&self) -> Bitboard {
        let mut all = Bitboard::EMPTY;
        for color in Color::BOTH {
            let mut color_bb = Bitboard::EMPTY;
            for pt in PieceType::ALL {
                color_bb |= self.colored_bb(color, pt);
            }
            if color_bb != self.occupancy(color) {
                return color_bb ^ self.occupancy(color);
            }
            all |= color_bb;
        }
        if !all != self.unoccupied() {
            return !all ^ self.unoccupied();
        }
        Bitboard::EMPTY
    }

    /// Internal invariant check; violations are fatal.
    ///
    /// Run after every make/unmake in debug builds.
    pub(crate) fn validate(&self) {
        let double = self.double_occupation();
        assert!(
            double.is_empty(),
            "board has double occupation:\n{double}\n{self}"
        );

        let mismatch = self.occupation_mismatch();
        assert!(
            mismatch.is_empty(),
            "board has occupancy mismatch:\n{mismatch}\n{self}"
        );

        for sq in Square::all() {
            let mailbox = self.pieces[sq.as_index()];
            let bb_piece = Piece::ALL
                .iter()
                .find(|p| self.piece_bbs[p.index()].contains(sq))
                .copied();
            assert!(
                mailbox == bb_piece,
                "mailbox/bitboard mismatch on {sq}: {mailbox:?} vs {bb_piece:?}"
            );
        }

        for color in Color::BOTH {
            assert!(
                self.colored_bb(color, PieceType::King).is_single(),
                "{color} must have exactly one king"
            );
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    /// Board dump used by the UCI `d`/`print` command
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Move #{}", self.full_move_number())?;
        writeln!(f, "50-move counter (ply): {}", self.ply_clock)?;
        writeln!(f, "Side to move: {}", self.side_to_move)?;
        writeln!(f, "  {}", "=".repeat(17))?;
        for rank in (0..8).rev() {
            write!(f, "{} |", rank + 1)?;
            for file in 0..8 {
                match self.piece_at(Square::new(rank, file)) {
                    Some(p) => write!(f, " {}", p.to_fen_char())?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f, " |")?;
        }
        writeln!(f, "  {}", "=".repeat(17))?;
        writeln!(f, "    a b c d e f g h")?;
        writeln!(f, "FEN: \"{}\"", self.to_fen())?;
        write!(
            f,
            "En passant: {}",
            self.enpassant_square
                .map_or_else(|| "-".to_string(), |sq| sq.to_string())
        )
    }
}
