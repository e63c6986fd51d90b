use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

use crate::lenient;

/// Categories every fresh server knows about.
pub const DEFAULT_CATEGORIES: [&str; 6] = ["Work", "Personal", "Shopping", "Health", "Learning", "Other"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Declares an enum that travels as `SCREAMING_SNAKE_CASE` text and decodes
/// case-insensitively, with `-` or spaces accepted in place of `_`.
macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal, $label:literal;)+ }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
                match normalized.as_str() {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(ParseEnumError { kind: $kind, value: s.to_string() }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Ordered from least to most pressing, so `Urgent > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

wire_enum!(Priority, "priority", {
    Low => "LOW", "Low";
    Medium => "MEDIUM", "Medium";
    High => "HIGH", "High";
    Urgent => "URGENT", "Urgent";
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

wire_enum!(Status, "status", {
    Todo => "TODO", "To do";
    InProgress => "IN_PROGRESS", "In progress";
    Done => "DONE", "Done";
});

/// A single to-do item.
///
/// `status` is the only completion state kept in memory. On the wire the
/// record also carries the older boolean `completed` flag: it is always
/// written as `status == DONE`, and only consulted on input when `status`
/// is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub uuid: Uuid,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category_name: Option<String>,
    pub status: Status,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
    pub reminder_date_time: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            category_name: None,
            status: Status::default(),
            tags: Vec::new(),
            due_date: None,
            reminder_date_time: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Done
    }

    /// Flips completion: anything unfinished becomes `Done`, `Done` goes back to `Todo`.
    pub fn toggle(&mut self) {
        self.status = if self.is_completed() {
            Status::Todo
        } else {
            Status::Done
        };
    }

    pub fn set_completed(&mut self, completed: bool) {
        if completed {
            self.status = Status::Done;
        } else if self.is_completed() {
            self.status = Status::Todo;
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < today)
    }

    pub fn in_category(&self, name: &str) -> bool {
        self.category_name
            .as_deref()
            .is_some_and(|category| category.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Error)]
#[error("invalid task uuid `{0}`")]
pub struct InvalidUuid(String);

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    category_name: Option<String>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    status: Option<Status>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    reminder_date_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    updated_at: Option<NaiveDateTime>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = InvalidUuid;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let uuid = match record.uuid.as_deref().map(str::trim) {
            None | Some("") => Uuid::new_v4(),
            Some(raw) => Uuid::parse_str(raw).map_err(|_| InvalidUuid(raw.to_string()))?,
        };
        let status = match (record.status, record.completed) {
            (Some(status), _) => status,
            (None, Some(true)) => Status::Done,
            (None, _) => Status::Todo,
        };

        Ok(Task {
            uuid,
            title: record.title,
            description: record.description.unwrap_or_default(),
            priority: record.priority.unwrap_or_default(),
            category_name: record.category_name.filter(|name| !name.trim().is_empty()),
            status,
            tags: record.tags,
            due_date: record.due_date,
            reminder_date_time: record.reminder_date_time,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        TaskRecord {
            uuid: Some(task.uuid.to_string()),
            completed: Some(task.is_completed()),
            title: task.title,
            description: Some(task.description),
            priority: Some(task.priority),
            category_name: task.category_name,
            status: Some(task.status),
            tags: task.tags,
            due_date: task.due_date,
            reminder_date_time: task.reminder_date_time,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_server_record() {
        let task: Task = serde_json::from_value(json!({
            "uuid": "6f1c2f64-3d0e-4ef5-9f5c-8ad4c0a4f0c1",
            "title": "Finish project report",
            "description": "Complete the final report and send it to the manager.",
            "priority": "HIGH",
            "categoryName": "Work",
            "completed": false,
            "status": "IN_PROGRESS",
            "dueDate": "2025-07-28",
            "reminderDateTime": "2025-07-27T10:00:00",
            "createdAt": "2025-07-20T08:15:30.123"
        }))
        .unwrap();

        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.category_name.as_deref(), Some("Work"));
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 7, 28));
        assert!(task.tags.is_empty());
    }

    #[test]
    fn status_wins_over_legacy_flag() {
        let task: Task =
            serde_json::from_value(json!({ "title": "a", "completed": true, "status": "TODO" })).unwrap();
        assert_eq!(task.status, Status::Todo);

        let legacy: Task = serde_json::from_value(json!({ "title": "b", "completed": true })).unwrap();
        assert_eq!(legacy.status, Status::Done);
    }

    #[test]
    fn legacy_local_records_still_load() {
        let task: Task = serde_json::from_value(json!({
            "uuid": "",
            "title": "Buy groceries for the week",
            "priority": "medium",
            "categoryName": "",
            "dueDate": "",
            "createdAt": "2025-01-20T09:30:00Z",
            "tags": ["shopping", "weekly"]
        }))
        .unwrap();

        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category_name, None);
        assert_eq!(task.due_date, None);
        assert!(task.created_at.is_some());
        assert!(!task.uuid.is_nil());
    }

    #[test]
    fn rejects_malformed_uuid() {
        let result: Result<Task, _> = serde_json::from_value(json!({ "uuid": "not-a-uuid", "title": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn writes_both_completion_fields() {
        let mut task = Task::new("Call mom");
        task.status = Status::Done;
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["status"], "DONE");
        assert_eq!(value["completed"], true);
        assert_eq!(value["priority"], "MEDIUM");
        assert_eq!(value["uuid"], task.uuid.to_string());
    }

    #[test]
    fn toggle_moves_in_progress_to_done() {
        let mut task = Task::new("Read");
        task.status = Status::InProgress;
        task.toggle();
        assert_eq!(task.status, Status::Done);
        task.toggle();
        assert_eq!(task.status, Status::Todo);
    }

    #[test]
    fn overdue_ignores_completed_tasks() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 27).unwrap();
        let mut task = Task::new("Gym session");
        task.due_date = NaiveDate::from_ymd_opt(2025, 7, 26);
        assert!(task.is_overdue(today));
        task.set_completed(true);
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn enum_parsing_is_forgiving() {
        assert_eq!("in-progress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("Urgent".parse::<Priority>(), Ok(Priority::Urgent));
        assert!("someday".parse::<Priority>().is_err());
        assert!(Priority::Urgent > Priority::High);
    }
}
