// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (keyed by URL-encoded email)
//! - Week lists (keyed by generated document id)

use crate::db::{collections, UserRepository, WeekListRepository};
use crate::error::AppError;
use crate::models::{User, WeekList, WeekListState};
use async_trait::async_trait;
use firestore::errors::FirestoreError;
use firestore::FirestoreWritePrecondition;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator rejects real credentials, so connect unauthenticated.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Emails may contain `/`, which is not allowed in a document id.
    fn user_doc_id(email: &str) -> String {
        urlencoding::encode(email).into_owned()
    }

    async fn week_lists_for_user(&self, user_id: &str) -> Result<Vec<WeekList>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WEEK_LISTS)
            .filter(move |q| q.for_all([q.field("userId").eq(user_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

// ─── User Operations ─────────────────────────────────────────

#[async_trait]
impl UserRepository for FirestoreDb {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&Self::user_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Firestore `create` fails if the document exists, which makes the
    /// uniqueness check and the write a single atomic step.
    async fn insert(&self, user: &User) -> Result<(), AppError> {
        let _: User = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(Self::user_doc_id(&user.email))
            .object(user)
            .execute()
            .await
            .map_err(|e| match e {
                FirestoreError::DataConflictError(_) => {
                    AppError::Conflict("User already exists".to_string())
                }
                other => AppError::Database(other.to_string()),
            })?;
        Ok(())
    }
}

// ─── Week List Operations ────────────────────────────────────

#[async_trait]
impl WeekListRepository for FirestoreDb {
    async fn count_for_user(&self, user_id: &str) -> Result<usize, AppError> {
        Ok(self.week_lists_for_user(user_id).await?.len())
    }

    async fn latest_for_user(&self, user_id: &str) -> Result<Option<WeekList>, AppError> {
        let user_id = user_id.to_string();
        let latest: Vec<WeekList> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::WEEK_LISTS)
            .filter(move |q| q.for_all([q.field("userId").eq(user_id.clone())]))
            // createdAt is fixed-precision RFC3339, so string order is time order
            .order_by([("createdAt", firestore::FirestoreQueryDirection::Descending)])
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(latest.into_iter().next())
    }

    async fn insert(&self, week_list: &WeekList) -> Result<(), AppError> {
        let _: WeekList = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::WEEK_LISTS)
            .document_id(&week_list.id)
            .object(week_list)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .execute()
            .await
            .map_err(|e| match e {
                FirestoreError::DataNotFoundError(_) => AppError::week_list_not_found(),
                other => AppError::Database(other.to_string()),
            })?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<WeekList>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WEEK_LISTS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn save(&self, week_list: &WeekList) -> Result<(), AppError> {
        let _: WeekList = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::WEEK_LISTS)
            .document_id(&week_list.id)
            .object(week_list)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::WEEK_LISTS)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<WeekList>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WEEK_LISTS)
            .order_by([("createdAt", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list_by_states(&self, states: &[WeekListState]) -> Result<Vec<WeekList>, AppError> {
        if states.is_empty() {
            return Ok(Vec::new());
        }

        let states: Vec<&'static str> = states.iter().map(|s| s.as_str()).collect();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WEEK_LISTS)
            .filter(move |q| q.for_any(states.iter().map(|s| q.field("state").eq(*s))))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
