use serde::{Deserialize, Serialize};

use crate::engine::types::{Color, Move, PieceType, Position};
use crate::engine::{EndReason, GameState};

use super::errors::ApiError;
use super::state::Match;

// ---------------------------------------------------------------------------
// Request models
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub white_player: Option<String>,
    pub black_player: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    pub promotion: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidMovesQuery {
    pub from: String,
}

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub engine: String,
    pub uptime: u64,
    pub games: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: String,
    pub board: Vec<Vec<Option<String>>>,
    pub fen: String,
    pub turn: Color,
    pub state: String,
    pub over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Color>,
    pub check: CheckFlags,
    pub players: Players,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFlags {
    pub white: bool,
    pub black: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Players {
    pub white: String,
    pub black: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveEntry {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceType>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidMovesResponse {
    pub from: String,
    pub moves: Vec<MoveEntry>,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Parse an algebraic square from a request field.
pub fn parse_square(s: &str) -> Result<Position, ApiError> {
    Position::from_algebraic(s)
        .ok_or_else(|| ApiError::InvalidRequest(format!("invalid square: {s}")))
}

/// Turn a move request into an engine move. Only the notation is checked here;
/// legality is left to the engine so rejections carry their reason.
pub fn parse_move(input: &MoveRequest) -> Result<Move, ApiError> {
    let start = parse_square(&input.from)?;
    let end = parse_square(&input.to)?;
    match input.promotion.as_deref() {
        None => Ok(Move::new(start, end)),
        Some(p) => {
            let kind = PieceType::from_promotion_str(p)
                .ok_or_else(|| ApiError::InvalidRequest(format!("invalid promotion: {p}")))?;
            Ok(Move::with_promotion(start, end, kind))
        }
    }
}

pub fn move_entry(mv: Move) -> MoveEntry {
    MoveEntry {
        from: mv.start.to_algebraic(),
        to: mv.end.to_algebraic(),
        promotion: mv.promotion,
    }
}

/// Snapshot of a match for the API.
pub fn game_to_response(m: &Match) -> GameResponse {
    let game = &m.game;
    let winner = match game.state() {
        GameState::Over(EndReason::Checkmate { winner }) => Some(winner),
        _ => None,
    };

    GameResponse {
        id: m.id.clone(),
        board: game.board().to_rows(),
        fen: game.board().to_fen(),
        turn: game.team_turn(),
        state: game.state().as_str().to_string(),
        over: game.is_over(),
        winner,
        check: CheckFlags {
            white: game.is_in_check(Color::White),
            black: game.is_in_check(Color::Black),
        },
        players: Players {
            white: m.white_player.clone(),
            black: m.black_player.clone(),
        },
        created_at: m.created_at.to_rfc3339(),
    }
}
