//! User model for storage and API.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// User account stored in the `users` collection (keyed by email).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub fullname: String,
    /// Unique login key
    pub email: String,
    /// Salted PBKDF2 hash, never the plaintext
    pub password_hash: String,
    pub age: u32,
    pub gender: String,
    pub mobile: String,
    /// When the account was created (RFC3339)
    pub created_at: String,
}

/// Signup request body. Every field is mandatory.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(required, length(min = 1))]
    pub fullname: Option<String>,
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
    /// Accepts a number or a numeric string; anything else counts as missing.
    #[serde(default, deserialize_with = "lenient_age")]
    #[validate(required, range(min = 1))]
    pub age: Option<u32>,
    #[validate(required, length(min = 1))]
    pub gender: Option<String>,
    #[validate(required, length(min = 1))]
    pub mobile: Option<String>,
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Age {
        Number(u64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Age>::deserialize(deserializer)? {
        Some(Age::Number(n)) => u32::try_from(n).ok(),
        Some(Age::Text(s)) => s.trim().parse().ok(),
        Some(Age::Other(_)) | None => None,
    })
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Signed session token returned by signup and login.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TokenResponse {
    pub token: String,
}
