// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Week list lifecycle: creation quota and cooldown, edit window, task
//! completion and the `active -> completed` transition.
//!
//! All windows are evaluated lazily against the `now` passed in by the
//! caller; nothing sweeps expired lists in the background.

use crate::db::{new_document_id, WeekListRepository};
use crate::error::AppError;
use crate::models::{NewTask, Task, UpdateWeekListRequest, WeekList, WeekListState, WeekListSummary};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Stored week lists a user may have before creation is refused.
pub const MAX_WEEK_LISTS_PER_USER: usize = 2;

/// Hours after creation during which a week list may be edited.
pub const EDIT_WINDOW_HOURS: i64 = 24;

/// Days after creation during which a week list is active.
pub const ACTIVE_WINDOW_DAYS: i64 = 7;

pub fn edit_window() -> Duration {
    Duration::hours(EDIT_WINDOW_HOURS)
}

pub fn active_window() -> Duration {
    Duration::days(ACTIVE_WINDOW_DAYS)
}

/// True once strictly more than `window` has elapsed since `created_at`.
pub fn is_expired(now: DateTime<Utc>, created_at: DateTime<Utc>, window: Duration) -> bool {
    now - created_at > window
}

/// Remaining part of `window`, floored at zero.
pub fn time_left(now: DateTime<Utc>, created_at: DateTime<Utc>, window: Duration) -> Duration {
    (window - (now - created_at)).max(Duration::zero())
}

/// Whether a task update must respect the edit window and active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskUpdatePolicy {
    /// Only while the list is active and inside the edit window; completing
    /// a task completes and locks the list.
    Gated,
    /// Legacy behaviour: any time, never touches the list state.
    Ungated,
}

impl TaskUpdatePolicy {
    pub fn requires_active_window(self) -> bool {
        matches!(self, TaskUpdatePolicy::Gated)
    }
}

/// Per-user locks serializing the check-then-create sequence.
pub type CreateLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// One user's entry in [`CreateLocks`], removed from the map when the last
/// handle goes away, including when a waiting request is cancelled.
struct CreateLockHandle<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    user_id: &'a str,
    lock: Arc<Mutex<()>>,
}

impl<'a> CreateLockHandle<'a> {
    fn acquire(locks: &'a DashMap<String, Arc<Mutex<()>>>, user_id: &'a str) -> Self {
        let lock = locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        Self {
            locks,
            user_id,
            lock,
        }
    }
}

impl Drop for CreateLockHandle<'_> {
    fn drop(&mut self) {
        // Only the map and this handle still refer to the lock.
        self.locks
            .remove_if(self.user_id, |_, l| Arc::strong_count(l) == 2);
    }
}

/// Week list operations over a [`WeekListRepository`].
#[derive(Clone)]
pub struct WeekListService {
    repo: Arc<dyn WeekListRepository>,
    create_locks: CreateLocks,
}

impl WeekListService {
    pub fn new(repo: Arc<dyn WeekListRepository>) -> Self {
        Self {
            repo,
            create_locks: Arc::new(DashMap::new()),
        }
    }

    /// Create a week list for `user_id`.
    ///
    /// Refused when the user already has [`MAX_WEEK_LISTS_PER_USER`] stored
    /// lists, or when their latest list is younger than the active window.
    /// Concurrent requests for the same user are serialized within this
    /// process; separate processes sharing a store can still race.
    pub async fn create(
        &self,
        user_id: &str,
        week_number: i64,
        tasks: Vec<NewTask>,
        now: DateTime<Utc>,
    ) -> Result<WeekList, AppError> {
        let handle = CreateLockHandle::acquire(&self.create_locks, user_id);
        let _guard = handle.lock.lock().await;
        self.create_locked(user_id, week_number, tasks, now).await
    }

    async fn create_locked(
        &self,
        user_id: &str,
        week_number: i64,
        tasks: Vec<NewTask>,
        now: DateTime<Utc>,
    ) -> Result<WeekList, AppError> {
        let existing = self.repo.count_for_user(user_id).await?;
        if existing >= MAX_WEEK_LISTS_PER_USER {
            tracing::info!(user_id, existing, "Week list creation refused: quota reached");
            return Err(AppError::QuotaExceeded);
        }

        if let Some(latest) = self.repo.latest_for_user(user_id).await? {
            if now - latest.created_at < active_window() {
                tracing::info!(
                    user_id,
                    latest_id = %latest.id,
                    "Week list creation refused: latest list still active"
                );
                return Err(AppError::Cooldown);
            }
        }

        // Stored timestamps carry millisecond precision.
        let now = now.trunc_subsecs(3);
        let week_list = WeekList {
            id: new_document_id()?,
            user_id: user_id.to_string(),
            week_number,
            tasks: build_tasks(tasks, now)?,
            created_at: now,
            state: WeekListState::Active,
            locked: false,
        };

        self.repo.insert(&week_list).await?;
        tracing::info!(
            user_id,
            week_list_id = %week_list.id,
            week_number,
            tasks = week_list.tasks.len(),
            "Week list created"
        );

        Ok(week_list)
    }

    /// Apply optional field changes and save, inside the edit window only.
    pub async fn update(
        &self,
        id: &str,
        changes: UpdateWeekListRequest,
        now: DateTime<Utc>,
    ) -> Result<WeekList, AppError> {
        let mut week_list = self.get(id).await?;

        if is_expired(now, week_list.created_at, edit_window()) {
            return Err(AppError::EditWindowExpired("update"));
        }

        if let Some(week_number) = changes.week_number {
            week_list.week_number = week_number;
        }
        if let Some(tasks) = changes.tasks {
            if week_list.locked {
                return Err(AppError::InvalidState);
            }
            week_list.tasks = build_tasks(tasks, now.trunc_subsecs(3))?;
        }

        self.repo.save(&week_list).await?;
        tracing::debug!(week_list_id = %id, "Week list updated");

        Ok(week_list)
    }

    /// Permanently remove a week list, inside the edit window only.
    pub async fn delete(&self, id: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        let week_list = self.get(id).await?;

        if is_expired(now, week_list.created_at, edit_window()) {
            return Err(AppError::EditWindowExpired("delete"));
        }

        self.repo.delete(id).await?;
        tracing::info!(week_list_id = %id, user_id = %week_list.user_id, "Week list deleted");

        Ok(())
    }

    /// Mark a task completed or not under the given policy.
    pub async fn update_task(
        &self,
        id: &str,
        task_id: &str,
        is_completed: bool,
        policy: TaskUpdatePolicy,
        now: DateTime<Utc>,
    ) -> Result<WeekList, AppError> {
        let mut week_list = self.get(id).await?;

        if policy.requires_active_window()
            && (is_expired(now, week_list.created_at, edit_window())
                || week_list.state != WeekListState::Active)
        {
            return Err(AppError::InvalidState);
        }

        let now = now.trunc_subsecs(3);
        week_list
            .task_mut(task_id)
            .ok_or_else(AppError::task_not_found)?
            .set_completed(is_completed, now);

        if policy.requires_active_window() && is_completed {
            week_list.mark_completed();
            tracing::info!(week_list_id = %id, task_id, "Week list completed and locked");
        }

        self.repo.save(&week_list).await?;

        Ok(week_list)
    }

    /// Every week list with its remaining active time, without tasks.
    pub async fn list_all(&self, now: DateTime<Utc>) -> Result<Vec<WeekListSummary>, AppError> {
        Ok(self
            .repo
            .list_all()
            .await?
            .into_iter()
            .map(|wl| summarize(&wl, now))
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<WeekList, AppError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(AppError::week_list_not_found)
    }

    /// Week lists shown in the feed. Both states qualify today.
    pub async fn feed(&self) -> Result<Vec<WeekList>, AppError> {
        self.repo
            .list_by_states(&[WeekListState::Active, WeekListState::Completed])
            .await
    }
}

/// Project a week list for `GET /weeklists`.
pub fn summarize(week_list: &WeekList, now: DateTime<Utc>) -> WeekListSummary {
    WeekListSummary {
        id: week_list.id.clone(),
        user_id: week_list.user_id.clone(),
        week_number: week_list.week_number,
        time_left_to_complete: time_left(now, week_list.created_at, active_window())
            .num_milliseconds(),
    }
}

fn build_tasks(tasks: Vec<NewTask>, now: DateTime<Utc>) -> Result<Vec<Task>, AppError> {
    tasks
        .into_iter()
        .map(|t| {
            Ok(Task {
                id: new_document_id()?,
                description: t.description,
                completed: t.completed,
                completed_at: t.completed.then_some(now),
            })
        })
        .collect()
}
