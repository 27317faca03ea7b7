//! Grid board representation.
//!
//! `Board` is a plain 8×8 array of optional pieces. Cloning copies 64 small
//! cells, so legality checks build a fresh board per candidate move instead of
//! mutating and restoring a shared one.

use serde::{Deserialize, Serialize};

use crate::engine::types::{ChessError, Color, Move, Piece, PieceType, Position};

/// Back-rank layout from the a-file to the h-file.
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Complete cell → piece assignment. `cells[row - 1][col - 1]`.
///
/// Equality and hashing compare every cell, so two boards are equal iff they
/// hold equal pieces on the same squares.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Board::default()
    }

    /// The standard 32-piece starting layout.
    pub fn starting() -> Self {
        let mut board = Board::empty();
        board.reset_board();
        board
    }

    // -----------------------------------------------------------------------
    // Cell access
    // -----------------------------------------------------------------------

    /// Overwrite a cell. `None` clears it. No chess validation is performed.
    #[inline]
    pub fn add_piece(&mut self, pos: Position, piece: Option<Piece>) {
        let (r, c) = pos.index();
        self.cells[r][c] = piece;
    }

    /// What piece (if any) is on a given cell?
    #[inline]
    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        let (r, c) = pos.index();
        self.cells[r][c]
    }

    /// Whether a cell is empty.
    #[inline]
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get_piece(pos).is_none()
    }

    /// Clear the board and place the standard starting layout.
    pub fn reset_board(&mut self) {
        self.cells = [[None; 8]; 8];
        for (i, &kind) in BACK_RANK.iter().enumerate() {
            let col = i as u8 + 1;
            self.add_piece(Position::new(1, col), Some(Piece::new(Color::White, kind)));
            self.add_piece(Position::new(8, col), Some(Piece::new(Color::Black, kind)));
            self.add_piece(
                Position::new(Color::White.pawn_row(), col),
                Some(Piece::new(Color::White, PieceType::Pawn)),
            );
            self.add_piece(
                Position::new(Color::Black.pawn_row(), col),
                Some(Piece::new(Color::Black, PieceType::Pawn)),
            );
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Every occupied cell, row 1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(|pos| self.get_piece(pos).map(|piece| (pos, piece)))
    }

    /// Occupied cells of one colour.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Where `color`'s king stands, if it is on the board.
    pub fn find_king(&self, color: Color) -> Option<Position> {
        let king = Piece::new(color, PieceType::King);
        self.pieces()
            .find(|&(_, piece)| piece == king)
            .map(|(pos, _)| pos)
    }

    // -----------------------------------------------------------------------
    // Move application
    // -----------------------------------------------------------------------

    /// Return a new board with `mv` applied: the moving piece (or its
    /// promotion) lands on `mv.end`, replacing anything there, and `mv.start`
    /// is vacated. `self` is left untouched.
    ///
    /// Returns `None` if there is no piece on `mv.start`.
    pub fn with_move(&self, mv: Move) -> Option<Board> {
        let moving = self.get_piece(mv.start)?;
        let landing = match mv.promotion {
            Some(kind) => Piece::new(moving.color, kind),
            None => moving,
        };
        let mut next = self.clone();
        next.add_piece(mv.start, None);
        next.add_piece(mv.end, Some(landing));
        Some(next)
    }

    // -----------------------------------------------------------------------
    // FEN placement
    // -----------------------------------------------------------------------

    /// Parse the piece-placement field of a FEN string (e.g.
    /// `"4k3/8/8/8/8/8/8/4K3"`). Any trailing FEN fields are ignored.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let placement = fen
            .split_whitespace()
            .next()
            .ok_or_else(|| ChessError::InvalidFen("empty string".into()))?;

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let row = 8 - rank_idx as u8; // FEN starts from rank 8
            let mut col: u8 = 1;
            for ch in rank_str.chars() {
                if col > 8 {
                    return Err(ChessError::InvalidFen(format!(
                        "too many squares in rank {row}"
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidFen(format!(
                            "invalid empty count '{ch}' in rank {row}"
                        )));
                    }
                    col += digit as u8;
                } else if let Some(piece) = Piece::from_char(ch) {
                    board.add_piece(Position::new(row, col), Some(piece));
                    col += 1;
                } else {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid character '{ch}' in piece placement"
                    )));
                }
            }
            if col != 9 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {row} has {} squares instead of 8",
                    col - 1
                )));
            }
        }

        Ok(board)
    }

    /// Export the piece-placement field of a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(72);
        for row in (1..=8).rev() {
            let mut empty_count = 0u8;
            for col in 1..=8 {
                match self.get_piece(Position::new(row, col)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push((b'0' + empty_count) as char);
            }
            if row > 1 {
                fen.push('/');
            }
        }
        fen
    }

    // -----------------------------------------------------------------------
    // Rendering helpers
    // -----------------------------------------------------------------------

    /// 8×8 letter matrix, row 8 first. Empty cells are `None`.
    pub fn to_rows(&self) -> Vec<Vec<Option<String>>> {
        (1..=8u8)
            .rev()
            .map(|row| {
                (1..=8u8)
                    .map(|col| {
                        self.get_piece(Position::new(row, col))
                            .map(|piece| piece.to_char().to_string())
                    })
                    .collect()
            })
            .collect()
    }

    /// Render the board as an 8-line string (row 8 at top), useful for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for row in (1..=8u8).rev() {
            s.push((b'0' + row) as char);
            s.push(' ');
            for col in 1..=8u8 {
                let ch = match self.get_piece(Position::new(row, col)) {
                    Some(piece) => piece.to_char(),
                    None => '.',
                };
                s.push(ch);
                if col < 8 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
