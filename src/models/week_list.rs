//! Week list model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Lifecycle state of a week list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum WeekListState {
    Active,
    Completed,
}

impl WeekListState {
    pub fn as_str(self) -> &'static str {
        match self {
            WeekListState::Active => "active",
            WeekListState::Completed => "completed",
        }
    }
}

/// A task embedded in a week list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, with = "crate::time_utils::rfc3339_millis::option")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Set the completion flag, stamping or clearing `completed_at`.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = completed.then_some(now);
    }
}

/// Stored week list record (collection `week_lists`, document id = `id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WeekList {
    pub id: String,
    /// Owner reference; free-form, not checked against the users collection
    pub user_id: String,
    pub week_number: i64,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(with = "crate::time_utils::rfc3339_millis")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    pub state: WeekListState,
    #[serde(default)]
    pub locked: bool,
}

impl WeekList {
    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    /// Terminal transition: completed and locked together.
    pub fn mark_completed(&mut self) {
        self.state = WeekListState::Completed;
        self.locked = true;
    }
}

/// Task as submitted by clients; ids are assigned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Body of `POST /weeklist`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWeekListRequest {
    pub user_id: Option<String>,
    pub week_number: Option<i64>,
    #[serde(default)]
    pub tasks: Vec<NewTask>,
}

/// Optional body of `PUT /weeklist/:id`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWeekListRequest {
    pub week_number: Option<i64>,
    pub tasks: Option<Vec<NewTask>>,
}

/// Body of `POST /weeklist/:id/tasks/:taskId`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub is_completed: bool,
}

/// `GET /weeklists` projection: no tasks, no raw timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WeekListSummary {
    pub id: String,
    pub user_id: String,
    pub week_number: i64,
    /// Milliseconds until the active window closes, floored at zero
    pub time_left_to_complete: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> WeekList {
        WeekList {
            id: "wl1".to_string(),
            user_id: "user-a".to_string(),
            week_number: 3,
            tasks: vec![Task {
                id: "t1".to_string(),
                description: "Read a book".to_string(),
                completed: false,
                completed_at: None,
            }],
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
            state: WeekListState::Active,
            locked: false,
        }
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["userId"], "user-a");
        assert_eq!(json["weekNumber"], 3);
        assert_eq!(json["createdAt"], "2026-03-01T08:00:00.000Z");
        assert_eq!(json["state"], "active");
        assert_eq!(json["locked"], false);
        assert_eq!(json["tasks"][0]["completedAt"], serde_json::Value::Null);
    }

    #[test]
    fn test_set_completed_stamps_and_clears() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut list = sample();
        let task = list.task_mut("t1").unwrap();

        task.set_completed(true, now);
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(now));

        task.set_completed(false, now);
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_mark_completed_locks() {
        let mut list = sample();
        list.mark_completed();
        assert_eq!(list.state, WeekListState::Completed);
        assert!(list.locked);
    }
}
