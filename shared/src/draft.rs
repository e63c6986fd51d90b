//! The task form's data, before it becomes a [`Task`].

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::task::{Priority, Task};

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;

/// Minutes before the due moment that a reminder may fire.
pub const REMINDER_OFFSETS: [u32; 5] = [5, 15, 30, 60, 1440];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Title,
    Description,
    DueDate,
    DueTime,
}

pub type FieldErrors = BTreeMap<Field, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub tags: Vec<String>,
    /// Offset in minutes, `None` when reminders are off.
    pub reminder: Option<u32>,
    /// The edited task's reminder when it is not one of the offsets before
    /// the due date. Written back unchanged unless `reminder` is set.
    pub kept_reminder: Option<NaiveDateTime>,
}

impl TaskDraft {
    pub fn from_task(task: &Task) -> Self {
        let reminder = task.reminder_date_time.and_then(|at| {
            let due = task.due_date?.and_time(end_of_day());
            let minutes = u32::try_from((due - at).num_minutes()).ok()?;
            REMINDER_OFFSETS.contains(&minutes).then_some(minutes)
        });
        TaskDraft {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            category: task.category_name.clone(),
            due_date: task.due_date,
            due_time: None,
            tags: task.tags.clone(),
            reminder,
            kept_reminder: if reminder.is_some() { None } else { task.reminder_date_time },
        }
    }

    /// Past due dates are only refused for new tasks; editing an overdue
    /// task must still be possible.
    pub fn validate(&self, today: NaiveDate, is_new: bool) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.title.trim().is_empty() {
            errors.insert(Field::Title, "Task title is required".into());
        } else if self.title.chars().count() > TITLE_MAX {
            errors.insert(Field::Title, "Title must be less than 100 characters".into());
        }

        if self.description.chars().count() > DESCRIPTION_MAX {
            errors.insert(Field::Description, "Description must be less than 500 characters".into());
        }

        if is_new && self.due_date.is_some_and(|due| due < today) {
            errors.insert(Field::DueDate, "Due date cannot be in the past".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The moment the reminder fires: the due date at the due time (or at the
    /// end of the day when no time is set), minus the offset.
    pub fn reminder_at(&self) -> Option<NaiveDateTime> {
        let due = self.due_date?;
        let minutes = self.reminder?;
        let at = due.and_time(self.due_time.unwrap_or_else(end_of_day));
        Some(at - Duration::minutes(i64::from(minutes)))
    }

    /// Writes the draft over `base` (the task being edited) or a fresh task.
    pub fn into_task(self, base: Option<&Task>) -> Task {
        let reminder = match self.reminder {
            Some(_) => self.reminder_at(),
            None => self.kept_reminder,
        };
        let mut task = base.cloned().unwrap_or_else(|| Task::new(""));
        task.title = self.title.trim().to_string();
        task.description = self.description.trim().to_string();
        task.priority = self.priority;
        task.category_name = self.category;
        task.due_date = self.due_date;
        task.tags = self.tags;
        task.reminder_date_time = reminder;
        task
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Status;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 23).unwrap()
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            ..TaskDraft::default()
        }
    }

    #[test]
    fn title_is_required() {
        let errors = draft("   ").validate(today(), true).unwrap_err();
        assert_eq!(errors[&Field::Title], "Task title is required");
    }

    #[test]
    fn length_limits() {
        let mut long = draft(&"x".repeat(101));
        long.description = "y".repeat(501);
        let errors = long.validate(today(), true).unwrap_err();
        assert_eq!(errors[&Field::Title], "Title must be less than 100 characters");
        assert_eq!(errors[&Field::Description], "Description must be less than 500 characters");

        let mut exact = draft(&"x".repeat(100));
        exact.description = "y".repeat(500);
        assert!(exact.validate(today(), true).is_ok());
    }

    #[test]
    fn past_due_date_only_blocks_new_tasks() {
        let mut d = draft("Pay rent");
        d.due_date = today().pred_opt();
        assert!(d.validate(today(), true).unwrap_err().contains_key(&Field::DueDate));
        assert!(d.validate(today(), false).is_ok());
    }

    #[test]
    fn reminder_counts_back_from_due_moment() {
        let mut d = draft("Standup");
        d.due_date = Some(today());
        d.reminder = Some(30);
        assert_eq!(d.reminder_at(), today().and_hms_opt(23, 29, 59));

        d.due_time = NaiveTime::from_hms_opt(9, 0, 0);
        d.reminder = Some(1440);
        assert_eq!(d.reminder_at(), today().pred_opt().and_then(|d| d.and_hms_opt(9, 0, 0)));

        d.due_date = None;
        assert_eq!(d.reminder_at(), None);
    }

    #[test]
    fn editing_keeps_identity_and_status() {
        let mut original = Task::new("Old");
        original.status = Status::InProgress;

        let mut d = TaskDraft::from_task(&original);
        d.title = "  New title ".into();
        d.priority = Priority::Urgent;
        let updated = d.into_task(Some(&original));

        assert_eq!(updated.uuid, original.uuid);
        assert_eq!(updated.status, Status::InProgress);
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.priority, Priority::Urgent);
    }

    #[test]
    fn recovers_reminder_offset_from_task() {
        let mut d = draft("Dentist");
        d.due_date = Some(today());
        d.reminder = Some(60);
        let task = d.into_task(None);
        assert_eq!(TaskDraft::from_task(&task).reminder, Some(60));
    }

    #[test]
    fn editing_keeps_reminder_that_is_not_an_offset() {
        let mut task = Task::new("Call bank");
        task.due_date = today().succ_opt();
        task.reminder_date_time = today().succ_opt().and_then(|d| d.and_hms_opt(14, 15, 0));

        let mut d = TaskDraft::from_task(&task);
        assert_eq!(d.reminder, None);
        assert_eq!(d.kept_reminder, task.reminder_date_time);

        d.title = "Call the bank".into();
        let updated = d.into_task(Some(&task));
        assert_eq!(updated.reminder_date_time, task.reminder_date_time);
    }

    #[test]
    fn seeded_reminder_a_day_early_survives_edit() {
        let mut task = Task::new("Team review");
        task.due_date = NaiveDate::from_ymd_opt(2025, 7, 28);
        task.reminder_date_time = NaiveDate::from_ymd_opt(2025, 7, 27).and_then(|d| d.and_hms_opt(10, 0, 0));

        let updated = TaskDraft::from_task(&task).into_task(Some(&task));
        assert_eq!(updated.reminder_date_time, task.reminder_date_time);
    }

    #[test]
    fn choosing_an_offset_replaces_kept_reminder() {
        let mut task = Task::new("Call bank");
        task.due_date = Some(today());
        task.reminder_date_time = today().and_hms_opt(8, 0, 0);

        let mut d = TaskDraft::from_task(&task);
        d.reminder = Some(5);
        let updated = d.into_task(Some(&task));
        assert_eq!(updated.reminder_date_time, today().and_hms_opt(23, 54, 59));
    }
}
