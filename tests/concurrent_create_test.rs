// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent week list creation for a single user.

use axum::http::StatusCode;
use serde_json::json;
use weeklist_server::db::WeekListRepository;

mod common;
use common::{create_test_app, send, signup};

const NUM_CONCURRENT_REQUESTS: usize = 16;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_cannot_bypass_cooldown() {
    // Without per-user serialization every request could read "no lists yet"
    // before any insert lands, creating up to NUM_CONCURRENT_REQUESTS lists.
    let (app, _, db) = create_test_app();
    let token = signup(&app, "race@example.com").await;

    let mut handles = vec![];
    for i in 0..NUM_CONCURRENT_REQUESTS {
        let app = app.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            send(
                &app,
                "POST",
                "/weeklist",
                Some(json!({ "userId": "racer", "weekNumber": i, "tasks": [] })),
                Some(&token),
            )
            .await
            .status()
        }));
    }

    let mut created = 0;
    for handle in handles {
        let status = handle.await.unwrap();
        if status == StatusCode::CREATED {
            created += 1;
        } else {
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    assert_eq!(created, 1);
    assert_eq!(db.count_for_user("racer").await.unwrap(), 1);
}
