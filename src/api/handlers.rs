use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::info;

use super::errors::ApiError;
use super::models::*;
use super::state::{Match, SharedState};

// =========================================================================
// Health
// =========================================================================

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: "chess-rules".to_string(),
        uptime,
        games: state.match_count().await,
    })
}

// =========================================================================
// Create Game
// =========================================================================

/// POST /api/games
pub async fn create_game(
    State(state): State<SharedState>,
    Json(input): Json<CreateGameRequest>,
) -> (StatusCode, Json<GameResponse>) {
    let m = Match::new(
        input.white_player.unwrap_or_else(|| "White".into()),
        input.black_player.unwrap_or_else(|| "Black".into()),
        state.config.stalemate_rule,
    );
    let response = game_to_response(&m);
    info!(game_id = %m.id, rule = m.game.stalemate_rule().as_str(), "game created");

    state.insert(m).await;

    (StatusCode::CREATED, Json(response))
}

// =========================================================================
// Get Game
// =========================================================================

/// GET /api/games/:id
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let handle = state.get(&id).await?;
    let m = handle.lock().await;
    Ok(Json(game_to_response(&m)))
}

// =========================================================================
// Delete Game
// =========================================================================

/// DELETE /api/games/:id
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.remove(&id).await?;
    info!(game_id = %id, "game deleted");
    Ok(Json(DeleteResponse {
        success: true,
        message: "Game deleted".to_string(),
    }))
}

// =========================================================================
// Valid Moves
// =========================================================================

/// GET /api/games/:id/valid-moves?from=e2
pub async fn valid_moves(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<ValidMovesQuery>,
) -> Result<Json<ValidMovesResponse>, ApiError> {
    let from = parse_square(&query.from)?;
    let handle = state.get(&id).await?;
    let m = handle.lock().await;

    let moves = m
        .game
        .valid_moves(from)
        .ok_or_else(|| ApiError::NoPiece(from.to_algebraic()))?;

    Ok(Json(ValidMovesResponse {
        from: from.to_algebraic(),
        moves: moves.into_iter().map(move_entry).collect(),
    }))
}

// =========================================================================
// Make Move
// =========================================================================

/// POST /api/games/:id/moves
pub async fn make_move(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(input): Json<MoveRequest>,
) -> Result<Json<GameResponse>, ApiError> {
    let mv = parse_move(&input)?;
    let handle = state.get(&id).await?;
    let mut m = handle.lock().await;

    m.game.make_move(mv)?;
    if m.game.is_over() {
        info!(game_id = %id, state = %m.game.state(), "game finished");
    }

    Ok(Json(game_to_response(&m)))
}

// =========================================================================
// Resign
// =========================================================================

/// POST /api/games/:id/resign
pub async fn resign(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let handle = state.get(&id).await?;
    let mut m = handle.lock().await;

    if m.game.is_over() {
        return Err(ApiError::GameOver(format!(
            "game is already over ({})",
            m.game.state()
        )));
    }
    let resigning = m.game.team_turn();
    m.game.force_game_over();
    info!(game_id = %id, color = %resigning, "game resigned");

    Ok(Json(game_to_response(&m)))
}

// =========================================================================
// Tests
// =========================================================================
