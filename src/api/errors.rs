use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::engine::{ChessError, MoveRejection};

/// Structured API error that serializes to JSON.
#[derive(Debug)]
pub enum ApiError {
    GameNotFound(String),
    InvalidMove(ChessError),
    InvalidRequest(String),
    NoPiece(String),
    GameOver(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDetail {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<MoveRejection>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, reason) = match self {
            ApiError::GameNotFound(id) => (
                StatusCode::NOT_FOUND,
                "GAME_NOT_FOUND",
                format!("Game not found: {id}"),
                None,
            ),
            ApiError::InvalidMove(err) => (
                StatusCode::BAD_REQUEST,
                "INVALID_MOVE",
                err.to_string(),
                err.rejection(),
            ),
            ApiError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg, None)
            }
            ApiError::NoPiece(square) => (
                StatusCode::BAD_REQUEST,
                "NO_PIECE",
                format!("No piece on {square}"),
                None,
            ),
            ApiError::GameOver(msg) => (StatusCode::BAD_REQUEST, "GAME_OVER", msg, None),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                reason,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChessError> for ApiError {
    fn from(err: ChessError) -> Self {
        match &err {
            ChessError::InvalidMove { .. } => ApiError::InvalidMove(err),
            ChessError::InvalidPosition { .. }
            | ChessError::InvalidSquare(_)
            | ChessError::InvalidNotation(_)
            | ChessError::InvalidFen(_)
            | ChessError::InvalidPromotion(_) => ApiError::InvalidRequest(err.to_string()),
        }
    }
}
