// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication tests.
//!
//! These tests verify that tokens issued by signup/login can be decoded
//! with the claims layout the auth middleware expects.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use weeklist_server::config::Config;
use weeklist_server::db::MemoryDb;
use weeklist_server::services::AuthService;

/// Claims structure that must match what the middleware expects.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

fn now_secs() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

fn auth_service(config: &Config) -> AuthService {
    AuthService::new(std::sync::Arc::new(MemoryDb::new()), config)
}

#[test]
fn test_issued_token_decodes_with_expected_claims() {
    let config = Config::test_default();
    let token = auth_service(&config).issue_token("ada@example.com").unwrap();

    let key = DecodingKey::from_secret(&config.jwt_signing_key);
    let token_data = decode::<Claims>(&token, &key, &Validation::new(Algorithm::HS256))
        .expect("Failed to decode JWT - check Claims struct compatibility");

    assert_eq!(token_data.claims.sub, "ada@example.com");
    assert!(token_data.claims.exp > token_data.claims.iat);
}

#[test]
fn test_token_lifetime_follows_config() {
    let config = Config {
        token_ttl_hours: 48,
        ..Config::test_default()
    };
    let token = auth_service(&config).issue_token("ada@example.com").unwrap();

    let key = DecodingKey::from_secret(&config.jwt_signing_key);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false; // We'll check manually

    let claims = decode::<Claims>(&token, &key, &validation).unwrap().claims;
    assert_eq!(claims.exp - claims.iat, 48 * 60 * 60);
}

#[test]
fn test_expired_token_is_rejected() {
    let config = Config::test_default();
    let issued = now_secs() - 7200;

    let claims = Claims {
        sub: "ada@example.com".to_string(),
        iat: issued,
        exp: issued + 60,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&config.jwt_signing_key),
    )
    .unwrap();

    assert!(auth_service(&config).verify(&token).is_err());
}

#[test]
fn test_other_algorithm_is_rejected() {
    let config = Config::test_default();
    let now = now_secs();

    let claims = Claims {
        sub: "ada@example.com".to_string(),
        iat: now,
        exp: now + 3600,
    };
    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(&config.jwt_signing_key),
    )
    .unwrap();

    assert!(auth_service(&config).verify(&token).is_err());
}
