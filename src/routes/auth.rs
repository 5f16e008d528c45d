// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup, login and the token-gated probe route.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{LoginRequest, SignupRequest, TokenResponse};
use crate::routes::MessageResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Routes mounted behind `require_auth` in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/protected", get(protected))
}

/// Create an account and return a session token.
async fn signup(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<SignupRequest>, AppError>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    let token = state.auth.signup(request).await?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Exchange email and password for a session token.
async fn login(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<TokenResponse>> {
    let token = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(TokenResponse { token }))
}

async fn protected(Extension(user): Extension<AuthUser>) -> Json<MessageResponse> {
    tracing::debug!(email = %user.email, "Protected route accessed");
    MessageResponse::new("This is a protected route")
}
