//! Game state machine.
//!
//! `Game` owns the authoritative board, the side to move, and the terminal
//! state. Legality is decided by building the successor board as a new value
//! and inspecting it; a rejected move simply drops that value, so the
//! authoritative state can never be left half-updated.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::types::{ChessError, Color, Move, MoveRejection, Position};

// =========================================================================
// StalemateRule
// =========================================================================

/// Which pieces count when deciding that a side has no legal moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalemateRule {
    /// No piece of the side has a legal move (standard chess).
    #[default]
    AnyPiece,
    /// Only the king's own legal moves are inspected.
    KingMobility,
}

impl StalemateRule {
    /// Parse from string (case-insensitive, `-` or `_` separated).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "any-piece" => Some(StalemateRule::AnyPiece),
            "king-mobility" => Some(StalemateRule::KingMobility),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StalemateRule::AnyPiece => "any-piece",
            StalemateRule::KingMobility => "king-mobility",
        }
    }
}

// =========================================================================
// GameState
// =========================================================================

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EndReason {
    Checkmate { winner: Color },
    Stalemate,
    /// Ended from outside the rules, e.g. a resignation.
    Forced,
}

/// Lifecycle of a game. `Over` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    InProgress,
    Over(EndReason),
}

impl GameState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::InProgress => "in_progress",
            GameState::Over(EndReason::Checkmate { .. }) => "checkmate",
            GameState::Over(EndReason::Stalemate) => "stalemate",
            GameState::Over(EndReason::Forced) => "forced",
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self, GameState::Over(_))
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =========================================================================
// Game
// =========================================================================

/// A chess match: board, side to move, and terminal state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Color,
    state: GameState,
    #[serde(default)]
    stalemate_rule: StalemateRule,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Standard starting position, White to move.
    pub fn new() -> Self {
        Self::with_board(Board::starting(), Color::White)
    }

    /// An in-progress game on an arbitrary board. The board is taken as is:
    /// missing kings or unusual material are allowed.
    pub fn with_board(board: Board, turn: Color) -> Self {
        Self {
            board,
            turn,
            state: GameState::InProgress,
            stalemate_rule: StalemateRule::default(),
        }
    }

    /// Builder: choose how stalemate is decided.
    pub fn with_rule(mut self, rule: StalemateRule) -> Self {
        self.stalemate_rule = rule;
        self
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    pub fn team_turn(&self) -> Color {
        self.turn
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn stalemate_rule(&self) -> StalemateRule {
        self.stalemate_rule
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Legal moves for the piece on `pos`, or `None` if the cell is empty.
    ///
    /// Turn order is ignored here so either side's options can be inspected;
    /// only moves that would leave the mover's king in check are removed.
    pub fn valid_moves(&self, pos: Position) -> Option<Vec<Move>> {
        let piece = self.board.get_piece(pos)?;
        Some(
            piece
                .piece_moves(&self.board, pos)
                .into_iter()
                .filter(|&mv| self.resulting_board(mv, piece.color).is_some())
                .collect(),
        )
    }

    /// Is `color`'s king attacked? A side without a king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        king_in_check(&self.board, color)
    }

    /// In check with no way out under the configured stalemate rule.
    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_stalemate(color) && self.is_in_check(color)
    }

    /// Whether `color` has no legal moves, as decided by the stalemate rule.
    /// Note this is also true when `color` is checkmated.
    pub fn is_in_stalemate(&self, color: Color) -> bool {
        let Some(king) = self.board.find_king(color) else {
            return false;
        };
        match self.stalemate_rule {
            StalemateRule::KingMobility => self.valid_moves(king).is_none_or(|m| m.is_empty()),
            StalemateRule::AnyPiece => !self
                .board
                .pieces_of(color)
                .any(|(pos, _)| self.valid_moves(pos).is_some_and(|m| !m.is_empty())),
        }
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    /// The game that results from playing `mv`, leaving `self` untouched.
    ///
    /// Checks, in order: the game is still in progress, `mv` is one of the
    /// piece's candidate moves, the piece belongs to the side to move, and the
    /// move does not leave the mover's king in check. An empty start square
    /// holds no piece of the side to move and is reported as `WrongTurn`.
    pub fn try_move(&self, mv: Move) -> Result<Game, ChessError> {
        self.successor(mv)
            .map_err(|reason| ChessError::InvalidMove { mv, reason })
    }

    /// Play a move, committing it only if it is legal.
    pub fn make_move(&mut self, mv: Move) -> Result<(), ChessError> {
        match self.try_move(mv) {
            Ok(next) => {
                debug!(mv = %mv, color = %self.turn, "move applied");
                *self = next;
                if self.is_over() {
                    debug!(state = %self.state, "game over");
                }
                Ok(())
            }
            Err(err) => {
                debug!(mv = %mv, color = %self.turn, error = %err, "move rejected");
                Err(err)
            }
        }
    }

    /// End the game unconditionally (resignation, forfeit).
    pub fn force_game_over(&mut self) {
        if !self.is_over() {
            debug!("game forced over");
            self.state = GameState::Over(EndReason::Forced);
        }
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn successor(&self, mv: Move) -> Result<Game, MoveRejection> {
        if self.is_over() {
            return Err(MoveRejection::GameOver);
        }

        let piece = self
            .board
            .get_piece(mv.start)
            .ok_or(MoveRejection::WrongTurn)?;

        if !piece.piece_moves(&self.board, mv.start).contains(&mv) {
            return Err(MoveRejection::NotAPossibleMove);
        }

        if piece.color != self.turn {
            return Err(MoveRejection::WrongTurn);
        }

        let board = self
            .resulting_board(mv, piece.color)
            .ok_or(MoveRejection::ExposesOwnKingToCheck)?;

        let mut next = Game {
            board,
            turn: !self.turn,
            state: GameState::InProgress,
            stalemate_rule: self.stalemate_rule,
        };
        next.state = next.evaluate_state();
        Ok(next)
    }

    /// The board after `mv`, or `None` if it leaves `mover`'s king in check.
    /// The start square must hold a piece.
    fn resulting_board(&self, mv: Move, mover: Color) -> Option<Board> {
        self.board
            .with_move(mv)
            .filter(|next| !king_in_check(next, mover))
    }

    /// Terminal check for the side now to move.
    fn evaluate_state(&self) -> GameState {
        let side = self.turn;
        if !self.is_in_stalemate(side) {
            return GameState::InProgress;
        }
        if self.is_in_check(side) {
            GameState::Over(EndReason::Checkmate { winner: !side })
        } else {
            GameState::Over(EndReason::Stalemate)
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate `color`'s king and test whether any opposing piece can reach it.
fn king_in_check(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(king) => movegen::is_attacked(board, king, !color),
        None => false,
    }
}

// =========================================================================
// Tests
// =========================================================================
