use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::config::AppConfig;
use crate::engine::StalemateRule;
use crate::engine::game::Game;

use super::errors::ApiError;

/// One hosted match: the engine game plus the metadata the adapter owns.
#[derive(Debug, Clone)]
pub struct Match {
    pub id: String,
    pub white_player: String,
    pub black_player: String,
    pub created_at: DateTime<Utc>,
    pub game: Game,
}

impl Match {
    pub fn new(white_player: String, black_player: String, rule: StalemateRule) -> Self {
        Match {
            id: uuid::Uuid::new_v4().to_string(),
            white_player,
            black_player,
            created_at: Utc::now(),
            game: Game::new().with_rule(rule),
        }
    }
}

/// A match behind its own lock; every query or mutation holds it throughout.
pub type MatchHandle = Arc<Mutex<Match>>;

/// Matches stored by UUID.
pub type MatchStore = RwLock<HashMap<String, MatchHandle>>;

/// Shared application state passed to all handlers via Axum's State extractor.
pub struct AppState {
    pub games: MatchStore,
    pub config: AppConfig,
    pub start_time: std::time::Instant,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(AppState {
            games: RwLock::new(HashMap::new()),
            config,
            start_time: std::time::Instant::now(),
        })
    }

    /// Register a match and return its handle.
    pub async fn insert(&self, m: Match) -> MatchHandle {
        let id = m.id.clone();
        let handle = Arc::new(Mutex::new(m));
        self.games.write().await.insert(id.clone(), handle.clone());
        debug!(game_id = %id, "match registered");
        handle
    }

    /// Look up a match. The registry lock is released before returning.
    pub async fn get(&self, id: &str) -> Result<MatchHandle, ApiError> {
        self.games
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::GameNotFound(id.to_string()))
    }

    /// Drop a match from the registry. Handles already cloned stay valid until
    /// their holders release them.
    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        self.games
            .write()
            .await
            .remove(id)
            .ok_or_else(|| ApiError::GameNotFound(id.to_string()))?;
        debug!(game_id = %id, "match removed");
        Ok(())
    }

    pub async fn match_count(&self) -> usize {
        self.games.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_match_uses_rule_and_fresh_id() {
        let a = Match::new("A".into(), "B".into(), StalemateRule::KingMobility);
        let b = Match::new("A".into(), "B".into(), StalemateRule::AnyPiece);
        assert_ne!(a.id, b.id);
        assert_eq!(a.game.stalemate_rule(), StalemateRule::KingMobility);
        assert_eq!(a.game, Game::new().with_rule(StalemateRule::KingMobility));
    }

    #[tokio::test]
    async fn insert_then_get() {
        let state = AppState::new(AppConfig::default());
        let m = Match::new("A".into(), "B".into(), StalemateRule::AnyPiece);
        let id = m.id.clone();
        state.insert(m).await;
        assert_eq!(state.match_count().await, 1);

        let handle = state.get(&id).await.unwrap();
        assert_eq!(handle.lock().await.white_player, "A");
        assert!(matches!(
            state.get("missing").await,
            Err(ApiError::GameNotFound(_))
        ));
    }

    #[tokio::test]
    async fn remove_drops_match() {
        let state = AppState::new(AppConfig::default());
        let m = Match::new("A".into(), "B".into(), StalemateRule::AnyPiece);
        let id = m.id.clone();
        state.insert(m).await;

        state.remove(&id).await.unwrap();
        assert_eq!(state.match_count().await, 0);
        assert!(matches!(
            state.get(&id).await,
            Err(ApiError::GameNotFound(_))
        ));
        assert!(matches!(
            state.remove(&id).await,
            Err(ApiError::GameNotFound(_))
        ));
    }

    #[tokio::test]
    async fn handles_share_one_game() {
        let state = AppState::new(AppConfig::default());
        let m = Match::new("A".into(), "B".into(), StalemateRule::AnyPiece);
        let id = m.id.clone();
        let first = state.insert(m).await;
        first.lock().await.game.force_game_over();

        let second = state.get(&id).await.unwrap();
        assert!(second.lock().await.game.is_over());
    }
}
