//! HTTP adapter tests driving the router directly.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use strictly_arena::{MatchManager, MemoryLedger, router};
use tower::ServiceExt;

fn app() -> Router {
    let ledger = MemoryLedger::with_balances([("alice", 100), ("bob", 100)]);
    router(MatchManager::new(Arc::new(ledger)), 20)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_and_fetch_match() {
    let app = app();
    let (status, body) = send(&app, "POST", "/matches", Some(json!({ "id": "m1", "stake": 10 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["stake"], 10);

    let (status, _) = send(&app, "POST", "/matches", Some(json!({ "id": "m1" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "GET", "/matches/m1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "m1");

    let (status, body) = send(&app, "GET", "/matches/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().expect("message").contains("missing"));
}

#[tokio::test]
async fn test_join_creates_and_activates() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/matches/m1/join",
        Some(json!({ "seat": "red", "player_id": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["stake"], 20);

    let (status, body) = send(
        &app,
        "POST",
        "/matches/m1/join",
        Some(json!({ "seat": "white", "player_id": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["pot"], 40);

    let (status, body) = send(&app, "GET", "/players/alice/balance", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "player_id": "alice", "balance": 80 }));
}

#[tokio::test]
async fn test_moves_and_rejections() {
    let app = app();
    for (seat, player) in [("red", "alice"), ("white", "bob")] {
        let (status, _) = send(
            &app,
            "POST",
            "/matches/m1/join",
            Some(json!({ "seat": seat, "player_id": player })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(
        &app,
        "POST",
        "/matches/m1/moves",
        Some(json!({ "player_id": "bob", "side": "red", "move": { "path": [20, 16] } })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.get("suggestion").is_none());

    let (status, _) = send(
        &app,
        "POST",
        "/matches/m1/moves",
        Some(json!({ "player_id": "alice", "side": "red", "move": { "path": [20, 12] } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/matches/m1/moves",
        Some(json!({ "player_id": "alice", "side": "red", "move": { "path": [20] } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/matches/m1/moves",
        Some(json!({ "player_id": "alice", "side": "red", "move": { "path": [20, 16] } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["end"].is_null());
    assert_eq!(body["state"]["current_player"], "white");
}

#[tokio::test]
async fn test_board_rendering() {
    let app = app();
    let (status, _) = send(&app, "POST", "/matches", Some(json!({ "id": "m1" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/matches/m1/board")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let text = String::from_utf8(bytes.to_vec()).expect("utf8");
    assert!(text.contains("red to move"));
}
