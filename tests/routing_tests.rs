// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health check and fallback routing.

use axum::http::StatusCode;

mod common;
use common::{create_test_app, json_body, send};

#[tokio::test]
async fn test_health() {
    let (app, _, _) = create_test_app();

    let response = send(&app, "GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("X-Frame-Options").unwrap(), "DENY");
    assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");

    let body = json_body(response).await;
    assert_eq!(body["serverName"], "Week List Server");
    assert_eq!(body["state"], "active");
    assert!(body["currentTime"].as_str().unwrap().ends_with('M'));
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let (app, _, _) = create_test_app();

    let response = send(&app, "GET", "/does/not/exist", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Route not found");
}
