//! Integration tests against a live server.
//!
//! Spins up an actual HTTP server on an ephemeral port and drives a full match
//! over the wire: create → query → move → resign.

use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use chess_rules::api::router::create_router;
use chess_rules::api::state::AppState;
use chess_rules::config::AppConfig;

/// Helper: start the server on an OS-assigned port, return its base URL.
async fn start_server() -> String {
    let state = AppState::new(AppConfig::default());
    let app = create_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", addr.port())
}

/// Helper: create a game via REST, return its id.
async fn create_game(client: &reqwest::Client, base: &str) -> String {
    let resp = client
        .post(format!("{base}/api/games"))
        .json(&json!({ "whitePlayer": "Ann", "blackPlayer": "Bob" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn play(
    client: &reqwest::Client,
    base: &str,
    id: &str,
    from: &str,
    to: &str,
) -> (StatusCode, Value) {
    let resp = client
        .post(format!("{base}/api/games/{id}/moves"))
        .json(&json!({ "from": from, "to": to }))
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_over_the_wire() {
    let base = start_server().await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn full_match_lifecycle() {
    let base = start_server().await;
    let client = reqwest::Client::new();
    let id = create_game(&client, &base).await;

    // Query before moving.
    let moves: Value = client
        .get(format!("{base}/api/games/{id}/valid-moves?from=g1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(moves["moves"].as_array().unwrap().len(), 2);

    let (status, body) = play(&client, &base, &id, "g1", "f3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turn"], "black");

    // Out of turn.
    let (status, body) = play(&client, &base, &id, "b1", "c3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["reason"], "WRONG_TURN");

    // Snapshot reflects only the accepted move.
    let snapshot: Value = client
        .get(format!("{base}/api/games/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snapshot["board"][5][5], "N");
    assert_eq!(snapshot["players"]["white"], "Ann");

    // Resign and confirm the match is frozen.
    let resp = client
        .post(format!("{base}/api/games/{id}/resign"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, body) = play(&client, &base, &id, "e7", "e5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["reason"], "GAME_OVER");
}

#[tokio::test]
async fn matches_are_independent() {
    let base = start_server().await;
    let client = reqwest::Client::new();
    let first = create_game(&client, &base).await;
    let second = create_game(&client, &base).await;
    assert_ne!(first, second);

    let (status, _) = play(&client, &base, &first, "e2", "e4").await;
    assert_eq!(status, StatusCode::OK);

    // The second match still has White to move.
    let (status, body) = play(&client, &base, &second, "d2", "d4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["board"][6][4], "P");
}
