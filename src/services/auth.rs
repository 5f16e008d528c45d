// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account signup, login and session token issuance.

use crate::config::Config;
use crate::db::UserRepository;
use crate::error::AppError;
use crate::middleware::auth::{create_jwt, decode_jwt, Claims};
use crate::models::{SignupRequest, User};
use crate::services::password::{hash_password, verify_password};
use std::sync::Arc;
use validator::Validate;

/// Authentication service backed by a [`UserRepository`].
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    signing_key: Vec<u8>,
    token_ttl_hours: i64,
    hash_iterations: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: &Config) -> Self {
        Self {
            users,
            signing_key: config.jwt_signing_key.clone(),
            token_ttl_hours: config.token_ttl_hours,
            hash_iterations: config.password_hash_iterations,
        }
    }

    /// Register a new account and return a session token for it.
    pub async fn signup(&self, request: SignupRequest) -> Result<String, AppError> {
        request
            .validate()
            .map_err(|_| AppError::Validation("Please provide all fields".to_string()))?;

        // validate() guarantees every field is present.
        let (
            Some(fullname),
            Some(email),
            Some(password),
            Some(age),
            Some(gender),
            Some(mobile),
        ) = (
            request.fullname,
            request.email,
            request.password,
            request.age,
            request.gender,
            request.mobile,
        )
        else {
            return Err(AppError::Validation("Please provide all fields".to_string()));
        };

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::info!(email = %email, "Signup rejected: email already registered");
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let iterations = self.hash_iterations;
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password(&password, iterations))
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing task failed: {}", e)))??;

        let user = User {
            fullname,
            email,
            password_hash,
            age,
            gender,
            mobile,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        // A concurrent signup for the same email loses here with Conflict.
        self.users.insert(&user).await?;
        tracing::info!(email = %user.email, "User signed up");

        self.issue_token(&user.email)
    }

    /// Check credentials and return a fresh session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::info!(email = %email, "Login failed: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        let password = password.to_string();
        let stored = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Verification task failed: {}", e)))?;

        if !matches {
            tracing::info!(email = %email, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        self.issue_token(&user.email)
    }

    pub fn issue_token(&self, email: &str) -> Result<String, AppError> {
        create_jwt(email, &self.signing_key, self.token_ttl_hours)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))
    }

    /// Stateless signature and expiry check.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode_jwt(token, &self.signing_key).map_err(|_| AppError::InvalidToken)
    }
}
