use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::board::Board;
use crate::engine::movegen;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Both colours, White first.
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    /// Row a pawn of this colour starts on.
    #[inline]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }

    /// Row a pawn of this colour promotes on.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 8,
            Color::Black => 1,
        }
    }

    /// Direction pawns of this colour advance in (+1 up the board, -1 down).
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceType {
    /// All piece types in order.
    pub const ALL: [PieceType; 6] = [
        PieceType::King,
        PieceType::Queen,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Rook,
        PieceType::Pawn,
    ];

    /// Promotion choices, in the order pawn moves emit them.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    /// Single uppercase letter for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parse a promotion choice such as `"queen"` or `"q"` (case-insensitive).
    pub fn from_promotion_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "queen" | "q" => Some(PieceType::Queen),
            "rook" | "r" => Some(PieceType::Rook),
            "bishop" | "b" => Some(PieceType::Bishop),
            "knight" | "n" => Some(PieceType::Knight),
            _ => None,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "pawn"),
            PieceType::Knight => write!(f, "knight"),
            PieceType::Bishop => write!(f, "bishop"),
            PieceType::Rook => write!(f, "rook"),
            PieceType::Queen => write!(f, "queen"),
            PieceType::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A cell on the board, 1-indexed: row 1 is White's back rank, col 1 is the a-file.
///
/// Construction is checked, so every `Position` value lies in [1,8]×[1,8].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

#[derive(Serialize, Deserialize)]
struct RawPosition {
    row: u8,
    col: u8,
}

impl Position {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    /// Build a position from in-range coordinates.
    ///
    /// Panics if either coordinate is outside 1..=8; use [`Position::try_new`]
    /// for untrusted input.
    pub fn new(row: u8, col: u8) -> Self {
        Self::try_new(row, col).unwrap_or_else(|_| panic!("position out of range: ({row}, {col})"))
    }

    /// Checked constructor.
    pub fn try_new(row: u8, col: u8) -> Result<Self, ChessError> {
        if (Self::MIN..=Self::MAX).contains(&row) && (Self::MIN..=Self::MAX).contains(&col) {
            Ok(Position { row, col })
        } else {
            Err(ChessError::InvalidPosition { row, col })
        }
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub fn col(self) -> u8 {
        self.col
    }

    /// Step by a signed delta, returning `None` when the result leaves the board.
    #[inline]
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if (1..=8).contains(&row) && (1..=8).contains(&col) {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// All 64 positions, row 1 first, columns left to right.
    pub fn all() -> impl Iterator<Item = Position> {
        (Self::MIN..=Self::MAX)
            .flat_map(|row| (Self::MIN..=Self::MAX).map(move |col| Position { row, col }))
    }

    /// Parse algebraic notation like "e4".
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let col = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let row = bytes[1].wrapping_sub(b'1');
        if col < 8 && row < 8 {
            Some(Position {
                row: row + 1,
                col: col + 1,
            })
        } else {
            None
        }
    }

    /// Convert to algebraic notation like "e4".
    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.col - 1) as char;
        let rank = (b'0' + self.row) as char;
        format!("{file}{rank}")
    }

    /// Zero-based (row, col) indices into the board grid.
    #[inline]
    pub(crate) fn index(self) -> (usize, usize) {
        (self.row as usize - 1, self.col as usize - 1)
    }
}

impl TryFrom<RawPosition> for Position {
    type Error = ChessError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::try_new(raw.row, raw.col)
    }
}

impl From<Position> for RawPosition {
    fn from(pos: Position) -> Self {
        RawPosition {
            row: pos.row,
            col: pos.col,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A coloured chess piece. Two pieces of the same type and colour are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    #[serde(rename = "type")]
    pub kind: PieceType,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Piece { color, kind }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn to_char(self) -> char {
        self.kind.to_char(self.color)
    }

    /// Parse a FEN letter.
    pub fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        Some(Piece { color, kind })
    }

    /// Every destination this piece can reach from `from` on `board`,
    /// ignoring whose turn it is and whether the own king is left in check.
    pub fn piece_moves(&self, board: &Board, from: Position) -> Vec<Move> {
        movegen::piece_moves(*self, board, from)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A proposed relocation: start, end, and optional promotion choice.
///
/// Equality covers all three fields, so the same squares with a different
/// promotion piece are distinct moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub start: Position,
    pub end: Position,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(start: Position, end: Position) -> Self {
        Move {
            start,
            end,
            promotion: None,
        }
    }

    pub fn with_promotion(start: Position, end: Position, promotion: PieceType) -> Self {
        Move {
            start,
            end,
            promotion: Some(promotion),
        }
    }

    /// Parse coordinate notation such as `e2e4` or `e7e8q`.
    pub fn from_coordinate(s: &str) -> Result<Self, ChessError> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(ChessError::InvalidNotation(s.to_string()));
        }
        let start = Position::from_algebraic(&s[0..2])
            .ok_or_else(|| ChessError::InvalidSquare(s[0..2].to_string()))?;
        let end = Position::from_algebraic(&s[2..4])
            .ok_or_else(|| ChessError::InvalidSquare(s[2..4].to_string()))?;
        let promotion = match s.get(4..) {
            Some("") | None => None,
            Some(p) => Some(
                PieceType::from_promotion_str(p)
                    .ok_or_else(|| ChessError::InvalidPromotion(p.to_string()))?,
            ),
        };
        Ok(Move {
            start,
            end,
            promotion,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.to_char(Color::Black))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MoveRejection
// ---------------------------------------------------------------------------

/// Why `Game::make_move` refused a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveRejection {
    GameOver,
    NotAPossibleMove,
    WrongTurn,
    ExposesOwnKingToCheck,
}

impl MoveRejection {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            MoveRejection::GameOver => "GAME_OVER",
            MoveRejection::NotAPossibleMove => "NOT_A_POSSIBLE_MOVE",
            MoveRejection::WrongTurn => "WRONG_TURN",
            MoveRejection::ExposesOwnKingToCheck => "EXPOSES_OWN_KING_TO_CHECK",
        }
    }
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            MoveRejection::GameOver => "game is already over",
            MoveRejection::NotAPossibleMove => "not a possible move for this piece",
            MoveRejection::WrongTurn => "not this color's turn",
            MoveRejection::ExposesOwnKingToCheck => "move would leave own king in check",
        };
        write!(f, "{msg}")
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the chess engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("invalid move {mv}: {reason}")]
    InvalidMove { mv: Move, reason: MoveRejection },

    #[error("position out of range: row {row}, col {col}")]
    InvalidPosition { row: u8, col: u8 },

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid move notation: {0}")]
    InvalidNotation(String),

    #[error("invalid FEN placement: {0}")]
    InvalidFen(String),

    #[error("invalid promotion piece: {0}")]
    InvalidPromotion(String),
}

impl ChessError {
    /// The rejection reason, if this is an `InvalidMove`.
    pub fn rejection(&self) -> Option<MoveRejection> {
        match self {
            ChessError::InvalidMove { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_toggle() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn color_rows() {
        assert_eq!(Color::White.pawn_row(), 2);
        assert_eq!(Color::Black.pawn_row(), 7);
        assert_eq!(Color::White.promotion_row(), 8);
        assert_eq!(Color::Black.promotion_row(), 1);
    }

    #[test]
    fn position_checked_construction() {
        assert!(Position::try_new(1, 1).is_ok());
        assert!(Position::try_new(8, 8).is_ok());
        assert_eq!(
            Position::try_new(0, 4),
            Err(ChessError::InvalidPosition { row: 0, col: 4 })
        );
        assert!(Position::try_new(4, 9).is_err());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn position_new_panics_off_board() {
        let _ = Position::new(9, 1);
    }

    #[test]
    fn position_algebraic() {
        let e4 = Position::from_algebraic("e4").unwrap();
        assert_eq!((e4.row(), e4.col()), (4, 5));
        assert_eq!(Position::new(1, 1).to_algebraic(), "a1");
        assert_eq!(Position::new(8, 8).to_algebraic(), "h8");
        for pos in Position::all() {
            assert_eq!(Position::from_algebraic(&pos.to_algebraic()), Some(pos));
        }
    }

    #[test]
    fn position_from_algebraic_invalid() {
        assert_eq!(Position::from_algebraic(""), None);
        assert_eq!(Position::from_algebraic("a9"), None);
        assert_eq!(Position::from_algebraic("i1"), None);
        assert_eq!(Position::from_algebraic("a0"), None);
        assert_eq!(Position::from_algebraic("abc"), None);
    }

    #[test]
    fn position_offset_stays_on_board() {
        let a1 = Position::new(1, 1);
        assert_eq!(a1.offset(1, 1), Some(Position::new(2, 2)));
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
        assert_eq!(Position::new(8, 8).offset(1, 0), None);
    }

    #[test]
    fn position_all_has_64_distinct_cells() {
        let all: std::collections::HashSet<Position> = Position::all().collect();
        assert_eq!(all.len(), 64);
    }

    #[test]
    fn position_serde_rejects_out_of_range() {
        let ok: Position = serde_json::from_str(r#"{"row":2,"col":5}"#).unwrap();
        assert_eq!(ok, Position::new(2, 5));
        assert!(serde_json::from_str::<Position>(r#"{"row":0,"col":5}"#).is_err());
        assert!(serde_json::from_str::<Position>(r#"{"row":3,"col":9}"#).is_err());
    }

    #[test]
    fn piece_equality_is_by_type_and_color() {
        let a = Piece::new(Color::White, PieceType::Rook);
        let b = Piece::new(Color::White, PieceType::Rook);
        assert_eq!(a, b);
        assert_ne!(a, Piece::new(Color::Black, PieceType::Rook));
        assert_ne!(a, Piece::new(Color::White, PieceType::Bishop));
    }

    #[test]
    fn piece_char_round_trip() {
        for kind in PieceType::ALL {
            for color in Color::BOTH {
                let piece = Piece::new(color, kind);
                assert_eq!(Piece::from_char(piece.to_char()), Some(piece));
            }
        }
        assert_eq!(Piece::from_char('x'), None);
    }

    #[test]
    fn move_equality_includes_promotion() {
        let from = Position::new(7, 1);
        let to = Position::new(8, 1);
        let queen = Move::with_promotion(from, to, PieceType::Queen);
        let knight = Move::with_promotion(from, to, PieceType::Knight);
        assert_ne!(queen, knight);
        assert_ne!(queen, Move::new(from, to));
        assert_eq!(queen, Move::with_promotion(from, to, PieceType::Queen));
    }

    #[test]
    fn move_coordinate_notation() {
        let mv = Move::from_coordinate("e2e4").unwrap();
        assert_eq!(mv.start, Position::new(2, 5));
        assert_eq!(mv.end, Position::new(4, 5));
        assert_eq!(mv.promotion, None);
        assert_eq!(mv.to_string(), "e2e4");

        let promo = Move::from_coordinate("a7a8n").unwrap();
        assert_eq!(promo.promotion, Some(PieceType::Knight));
        assert_eq!(promo.to_string(), "a7a8n");
    }

    #[test]
    fn move_coordinate_notation_errors() {
        assert!(matches!(
            Move::from_coordinate("e2"),
            Err(ChessError::InvalidNotation(_))
        ));
        assert!(matches!(
            Move::from_coordinate("z2e4"),
            Err(ChessError::InvalidSquare(_))
        ));
        assert!(matches!(
            Move::from_coordinate("e7e8k"),
            Err(ChessError::InvalidPromotion(_))
        ));
    }

    #[test]
    fn rejection_codes() {
        assert_eq!(MoveRejection::WrongTurn.code(), "WRONG_TURN");
        assert_eq!(
            MoveRejection::ExposesOwnKingToCheck.code(),
            "EXPOSES_OWN_KING_TO_CHECK"
        );
        let err = ChessError::InvalidMove {
            mv: Move::from_coordinate("e2e4").unwrap(),
            reason: MoveRejection::NotAPossibleMove,
        };
        assert_eq!(err.rejection(), Some(MoveRejection::NotAPossibleMove));
        assert_eq!(
            err.to_string(),
            "invalid move e2e4: not a possible move for this piece"
        );
    }
}
