// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, Response},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use weeklist_server::config::Config;
use weeklist_server::db::{FirestoreDb, MemoryDb};
use weeklist_server::middleware::auth::create_jwt;
use weeklist_server::routes::create_router;
use weeklist_server::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection (emulator).
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by in-memory storage.
/// Returns the router, the shared state and the storage handle.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryDb) {
    let db = MemoryDb::new();
    let state = Arc::new(AppState::new(
        Config::test_default(),
        Arc::new(db.clone()),
        Arc::new(db.clone()),
    ));

    (create_router(state.clone()), state, db)
}

/// Create a test app whose storage is an offline Firestore client, so every
/// database call fails.
#[allow(dead_code)]
pub fn create_offline_app() -> axum::Router {
    let db = FirestoreDb::new_mock();
    let state = Arc::new(AppState::new(
        Config::test_default(),
        Arc::new(db.clone()),
        Arc::new(db),
    ));
    create_router(state)
}

/// Create a test JWT token for `email`.
#[allow(dead_code)]
pub fn create_test_jwt(email: &str, signing_key: &[u8]) -> String {
    create_jwt(email, signing_key, 1).expect("Failed to create JWT")
}

/// Send a request with an optional JSON body and bearer token.
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("Response body should be JSON")
}

/// Sign up a user and return their token.
#[allow(dead_code)]
pub async fn signup(app: &axum::Router, email: &str) -> String {
    let response = send(
        app,
        "POST",
        "/signup",
        Some(serde_json::json!({
            "fullname": "Test User",
            "email": email,
            "password": "hunter2",
            "age": 30,
            "gender": "other",
            "mobile": "555-0100"
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), 201);
    json_body(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}
