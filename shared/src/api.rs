//! Request and response bodies of the `/api/v1/tasks` endpoints beyond [`Task`] itself.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::task::{Priority, Status, Task};

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
    pub error: String,
    pub status: u16,
}

/// Body of `PUT /tasks`. Absent or `null` fields leave the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub uuid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub reminder_date_time: Option<NaiveDateTime>,
}

impl TaskPatch {
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = &self.category_name {
            task.category_name = Some(category.clone());
        }
        match (self.status, self.completed) {
            (Some(status), _) => task.status = status,
            (None, Some(completed)) => task.set_completed(completed),
            (None, None) => {}
        }
        if let Some(tags) = &self.tags {
            task.tags = tags.clone();
        }
        if let Some(due) = self.due_date {
            task.due_date = Some(due);
        }
        if let Some(at) = self.reminder_date_time {
            task.reminder_date_time = Some(at);
        }
    }
}

impl From<&Task> for TaskPatch {
    fn from(task: &Task) -> Self {
        TaskPatch {
            uuid: task.uuid.to_string(),
            title: Some(task.title.clone()),
            description: Some(task.description.clone()),
            priority: Some(task.priority),
            category_name: task.category_name.clone(),
            completed: Some(task.is_completed()),
            status: Some(task.status),
            tags: Some(task.tags.clone()),
            due_date: task.due_date,
            reminder_date_time: task.reminder_date_time,
        }
    }
}
