//! Database layer.
//!
//! Services talk to storage through the repository traits below so the
//! Firestore backend and the in-memory backend are interchangeable.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{User, WeekList, WeekListState};
use async_trait::async_trait;
use ring::rand::{SecureRandom, SystemRandom};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const WEEK_LISTS: &str = "week_lists";
}

/// User accounts, keyed by email.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Create the account. Fails with [`AppError::Conflict`] if the email is taken.
    async fn insert(&self, user: &User) -> Result<(), AppError>;
}

/// Week list documents.
#[async_trait]
pub trait WeekListRepository: Send + Sync {
    /// Number of stored week lists for the user, regardless of state.
    async fn count_for_user(&self, user_id: &str) -> Result<usize, AppError>;

    /// Most recently created week list for the user.
    async fn latest_for_user(&self, user_id: &str) -> Result<Option<WeekList>, AppError>;

    async fn insert(&self, week_list: &WeekList) -> Result<(), AppError>;

    async fn get(&self, id: &str) -> Result<Option<WeekList>, AppError>;

    /// Replace the stored document with `week_list`.
    async fn save(&self, week_list: &WeekList) -> Result<(), AppError>;

    async fn delete(&self, id: &str) -> Result<(), AppError>;

    async fn list_all(&self) -> Result<Vec<WeekList>, AppError>;

    async fn list_by_states(&self, states: &[WeekListState]) -> Result<Vec<WeekList>, AppError>;
}

/// Generate a 24-character hex document id: 4 bytes of big-endian Unix
/// seconds followed by 8 random bytes.
pub fn new_document_id() -> Result<String, AppError> {
    let mut bytes = [0u8; 12];
    let secs = chrono::Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
    bytes[..4].copy_from_slice(&secs.to_be_bytes());
    SystemRandom::new()
        .fill(&mut bytes[4..])
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG unavailable")))?;
    Ok(hex::encode(bytes))
}
