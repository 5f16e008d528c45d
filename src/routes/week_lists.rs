// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Week list routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    CreateWeekListRequest, UpdateTaskRequest, UpdateWeekListRequest, WeekList, WeekListSummary,
};
use crate::routes::MessageResponse;
use crate::services::TaskUpdatePolicy;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use std::sync::Arc;

/// Public week list routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/weeklist/{id}",
            get(get_week_list)
                .put(update_week_list)
                .delete(delete_week_list),
        )
        .route("/weeklist/{id}/tasks/{task_id}", post(update_task))
        .route("/weeklists", get(list_week_lists))
        .route("/feed", get(feed))
}

/// Routes mounted behind `require_auth` in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/weeklist", post(create_week_list))
}

/// Create a week list (quota and cooldown enforced).
async fn create_week_list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(request), _): WithRejection<Json<CreateWeekListRequest>, AppError>,
) -> Result<(StatusCode, Json<WeekList>)> {
    let (Some(user_id), Some(week_number)) = (
        request.user_id.filter(|id| !id.trim().is_empty()),
        request.week_number,
    ) else {
        return Err(AppError::Validation(
            "Please provide userId and weekNumber".to_string(),
        ));
    };

    tracing::debug!(
        caller = %user.email,
        user_id = %user_id,
        week_number,
        "Creating week list"
    );

    let week_list = state
        .week_lists
        .create(&user_id, week_number, request.tasks, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(week_list)))
}

/// Save a week list inside its edit window, applying any fields in the body.
async fn update_week_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<MessageResponse>> {
    // The body is optional; an empty one just re-saves the list.
    let changes = if body.iter().all(u8::is_ascii_whitespace) {
        UpdateWeekListRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|_| AppError::Validation("Invalid request body".to_string()))?
    };

    state.week_lists.update(&id, changes, Utc::now()).await?;
    Ok(MessageResponse::new("Week list updated successfully"))
}

async fn delete_week_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.week_lists.delete(&id, Utc::now()).await?;
    Ok(MessageResponse::new("Week list deleted successfully"))
}

/// Complete or reopen a task. Completing one completes and locks the list.
async fn update_task(
    State(state): State<Arc<AppState>>,
    Path((id, task_id)): Path<(String, String)>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateTaskRequest>, AppError>,
) -> Result<Json<MessageResponse>> {
    state
        .week_lists
        .update_task(
            &id,
            &task_id,
            request.is_completed,
            TaskUpdatePolicy::Gated,
            Utc::now(),
        )
        .await?;
    Ok(MessageResponse::new("Task updated successfully"))
}

async fn list_week_lists(State(state): State<Arc<AppState>>) -> Result<Json<Vec<WeekListSummary>>> {
    Ok(Json(state.week_lists.list_all(Utc::now()).await?))
}

async fn get_week_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WeekList>> {
    Ok(Json(state.week_lists.get(&id).await?))
}

async fn feed(State(state): State<Arc<AppState>>) -> Result<Json<Vec<WeekList>>> {
    Ok(Json(state.week_lists.feed().await?))
}
