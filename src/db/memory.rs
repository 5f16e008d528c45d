//! Process-local storage backend.
//!
//! Data lives in concurrent maps and is lost on restart. Used for local
//! development and as the substitutable backend in tests.

use crate::db::{UserRepository, WeekListRepository};
use crate::error::AppError;
use crate::models::{User, WeekList, WeekListState};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;

/// In-memory database; clones share the same maps.
#[derive(Clone, Default)]
pub struct MemoryDb {
    users: Arc<DashMap<String, User>>,
    week_lists: Arc<DashMap<String, WeekList>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryDb {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(email).map(|u| u.value().clone()))
    }

    async fn insert(&self, user: &User) -> Result<(), AppError> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict("User already exists".to_string())),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }
}

#[async_trait]
impl WeekListRepository for MemoryDb {
    async fn count_for_user(&self, user_id: &str) -> Result<usize, AppError> {
        Ok(self
            .week_lists
            .iter()
            .filter(|wl| wl.user_id == user_id)
            .count())
    }

    async fn latest_for_user(&self, user_id: &str) -> Result<Option<WeekList>, AppError> {
        Ok(self
            .week_lists
            .iter()
            .filter(|wl| wl.user_id == user_id)
            .max_by_key(|wl| wl.created_at)
            .map(|wl| wl.value().clone()))
    }

    async fn insert(&self, week_list: &WeekList) -> Result<(), AppError> {
        match self.week_lists.entry(week_list.id.clone()) {
            Entry::Occupied(_) => Err(AppError::Database(format!(
                "Duplicate week list id {}",
                week_list.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(week_list.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<WeekList>, AppError> {
        Ok(self.week_lists.get(id).map(|wl| wl.value().clone()))
    }

    async fn save(&self, week_list: &WeekList) -> Result<(), AppError> {
        let mut stored = self
            .week_lists
            .get_mut(&week_list.id)
            .ok_or_else(AppError::week_list_not_found)?;
        *stored = week_list.clone();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.week_lists.remove(id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<WeekList>, AppError> {
        let mut all: Vec<WeekList> = self.week_lists.iter().map(|wl| wl.value().clone()).collect();
        all.sort_by_key(|wl| wl.created_at);
        Ok(all)
    }

    async fn list_by_states(&self, states: &[WeekListState]) -> Result<Vec<WeekList>, AppError> {
        let mut matching: Vec<WeekList> = self
            .week_lists
            .iter()
            .filter(|wl| states.contains(&wl.state))
            .map(|wl| wl.value().clone())
            .collect();
        matching.sort_by_key(|wl| wl.created_at);
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn user(email: &str) -> User {
        User {
            fullname: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "pbkdf2-sha256$1$c2FsdA$aGFzaA".to_string(),
            age: 30,
            gender: "other".to_string(),
            mobile: "555-0100".to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    fn week_list(id: &str, user_id: &str, age: Duration) -> WeekList {
        WeekList {
            id: id.to_string(),
            user_id: user_id.to_string(),
            week_number: 1,
            tasks: vec![],
            created_at: Utc::now() - age,
            state: WeekListState::Active,
            locked: false,
        }
    }

    #[tokio::test]
    async fn test_user_insert_conflicts_on_same_email() {
        let db = MemoryDb::new();
        UserRepository::insert(&db, &user("a@example.com")).await.unwrap();

        let err = UserRepository::insert(&db, &user("a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let found = db.find_by_email("a@example.com").await.unwrap();
        assert!(found.is_some());
        assert!(db.find_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_count_and_latest_are_per_user() {
        let db = MemoryDb::new();
        WeekListRepository::insert(&db, &week_list("old", "a", Duration::days(10)))
            .await
            .unwrap();
        WeekListRepository::insert(&db, &week_list("new", "a", Duration::hours(1)))
            .await
            .unwrap();
        WeekListRepository::insert(&db, &week_list("other", "b", Duration::minutes(1)))
            .await
            .unwrap();

        assert_eq!(db.count_for_user("a").await.unwrap(), 2);
        assert_eq!(db.count_for_user("c").await.unwrap(), 0);

        let latest = db.latest_for_user("a").await.unwrap().unwrap();
        assert_eq!(latest.id, "new");
        assert!(db.latest_for_user("c").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_delete_and_state_filter() {
        let db = MemoryDb::new();
        let mut wl = week_list("wl", "a", Duration::zero());
        WeekListRepository::insert(&db, &wl).await.unwrap();

        wl.mark_completed();
        db.save(&wl).await.unwrap();

        let completed = db
            .list_by_states(&[WeekListState::Completed])
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert!(db
            .list_by_states(&[WeekListState::Active])
            .await
            .unwrap()
            .is_empty());

        db.delete("wl").await.unwrap();
        assert!(db.get("wl").await.unwrap().is_none());
        assert!(db.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_does_not_resurrect_deleted_list() {
        let db = MemoryDb::new();
        let wl = week_list("gone", "a", Duration::zero());
        WeekListRepository::insert(&db, &wl).await.unwrap();
        db.delete("gone").await.unwrap();

        let err = db.save(&wl).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(db.get("gone").await.unwrap().is_none());
    }
}
