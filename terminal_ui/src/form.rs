//! State behind the create/edit task modal.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use todomaster_shared::{Field, FieldErrors, Priority, Task, TaskDraft, DEFAULT_CATEGORIES, REMINDER_OFFSETS};

use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Priority,
    Category,
    DueDate,
    DueTime,
    Tags,
    Reminder,
}

impl FormField {
    pub const ORDER: [FormField; 8] = [
        FormField::Title,
        FormField::Description,
        FormField::Priority,
        FormField::Category,
        FormField::DueDate,
        FormField::DueTime,
        FormField::Tags,
        FormField::Reminder,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Priority => "Priority",
            FormField::Category => "Category",
            FormField::DueDate => "Due date",
            FormField::DueTime => "Due time",
            FormField::Tags => "Tags",
            FormField::Reminder => "Reminder",
        }
    }

    /// Choice fields change with left/right instead of typing.
    pub fn is_choice(self) -> bool {
        matches!(self, FormField::Priority | FormField::Category | FormField::Reminder)
    }

    fn error_key(self) -> Option<Field> {
        match self {
            FormField::Title => Some(Field::Title),
            FormField::Description => Some(Field::Description),
            FormField::DueDate => Some(Field::DueDate),
            FormField::DueTime => Some(Field::DueTime),
            _ => None,
        }
    }

    fn step(self, forward: bool) -> Self {
        let len = Self::ORDER.len();
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let next = if forward { (index + 1) % len } else { (index + len - 1) % len };
        Self::ORDER[next]
    }
}

/// A preset the form can be filled from.
pub struct Template {
    pub label: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub priority: Priority,
    pub category: &'static str,
    pub reminder: Option<u32>,
    pub tags: &'static [&'static str],
}

pub const TEMPLATES: [Template; 4] = [
    Template {
        label: "Work Meeting",
        title: "Team Meeting",
        description: "Weekly team sync meeting",
        priority: Priority::Medium,
        category: "Work",
        reminder: Some(15),
        tags: &[],
    },
    Template {
        label: "Personal Reminder",
        title: "Personal Reminder",
        description: "Don't forget to...",
        priority: Priority::Low,
        category: "Personal",
        reminder: Some(30),
        tags: &[],
    },
    Template {
        label: "Shopping Item",
        title: "Buy groceries",
        description: "Weekly grocery shopping",
        priority: Priority::Medium,
        category: "Shopping",
        reminder: None,
        tags: &["groceries"],
    },
    Template {
        label: "Deadline Task",
        title: "Important Deadline",
        description: "Complete before due date",
        priority: Priority::High,
        category: "Work",
        reminder: Some(60),
        tags: &[],
    },
];

pub fn reminder_label(minutes: u32) -> String {
    match minutes {
        60 => "1 hour before".to_string(),
        1440 => "1 day before".to_string(),
        n => format!("{n} minutes before"),
    }
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    editing: Option<Task>,
    pub focus: FormField,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Option<String>,
    pub due_date: String,
    pub due_time: String,
    pub tag_input: String,
    pub tags: Vec<String>,
    pub reminder: Option<u32>,
    /// Reminder moment of the edited task that no offset reproduces.
    pub kept_reminder: Option<NaiveDateTime>,
    pub errors: FieldErrors,
}

impl TaskForm {
    /// A blank form seeded from the task defaults in `settings`.
    pub fn create(settings: &Settings, today: NaiveDate) -> Self {
        let defaults = &settings.tasks;
        let due_date = if defaults.default_due_date {
            (today + Duration::days(i64::from(defaults.default_due_days))).to_string()
        } else {
            String::new()
        };
        Self {
            editing: None,
            focus: FormField::Title,
            title: String::new(),
            description: String::new(),
            priority: defaults.default_priority,
            category: settings.default_category(),
            due_date,
            due_time: String::new(),
            tag_input: String::new(),
            tags: Vec::new(),
            reminder: None,
            kept_reminder: None,
            errors: FieldErrors::new(),
        }
    }

    pub fn edit(task: &Task) -> Self {
        let draft = TaskDraft::from_task(task);
        Self {
            editing: Some(task.clone()),
            focus: FormField::Title,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            category: draft.category,
            due_date: draft.due_date.map(|d| d.to_string()).unwrap_or_default(),
            due_time: String::new(),
            tag_input: String::new(),
            tags: draft.tags,
            reminder: draft.reminder,
            kept_reminder: draft.kept_reminder,
            errors: FieldErrors::new(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.editing.is_none()
    }

    pub fn heading(&self) -> &'static str {
        if self.is_new() {
            "Create New Task"
        } else {
            "Edit Task"
        }
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.step(true);
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.step(false);
    }

    pub fn error(&self, field: FormField) -> Option<&str> {
        field.error_key().and_then(|key| self.errors.get(&key)).map(String::as_str)
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::DueTime => Some(&mut self.due_time),
            FormField::Tags => Some(&mut self.tag_input),
            _ => None,
        }
    }

    /// Editing a field clears its error.
    fn touched(&mut self) {
        if let Some(key) = self.focus.error_key() {
            self.errors.remove(&key);
        }
    }

    pub fn input(&mut self, c: char) {
        if let Some(text) = self.text_mut() {
            text.push(c);
            self.touched();
        }
    }

    pub fn backspace(&mut self) {
        let removed_tag = self.focus == FormField::Tags && self.tag_input.is_empty();
        if removed_tag {
            self.tags.pop();
        } else if let Some(text) = self.text_mut() {
            text.pop();
            self.touched();
        }
    }

    /// Steps the focused choice field.
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            FormField::Priority => {
                let all = Priority::ALL;
                let index = all.iter().position(|p| *p == self.priority).unwrap_or(0);
                let next = (if forward { index + 1 } else { index + all.len() - 1 }) % all.len();
                self.priority = all[next];
            }
            FormField::Category => {
                let options: Vec<Option<&str>> =
                    std::iter::once(None).chain(DEFAULT_CATEGORIES.iter().copied().map(Some)).collect();
                let current = self.category.as_deref();
                let index = options
                    .iter()
                    .position(|c| match (c, current) {
                        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                        (None, None) => true,
                        _ => false,
                    })
                    .unwrap_or(0);
                let next = (if forward { index + 1 } else { index + options.len() - 1 }) % options.len();
                self.category = options[next].map(str::to_string);
            }
            FormField::Reminder => {
                let options: Vec<Option<u32>> =
                    std::iter::once(None).chain(REMINDER_OFFSETS.iter().copied().map(Some)).collect();
                let index = options.iter().position(|r| *r == self.reminder).unwrap_or(0);
                let next = (if forward { index + 1 } else { index + options.len() - 1 }) % options.len();
                self.reminder = options[next];
                self.kept_reminder = None;
            }
            _ => {}
        }
    }

    /// Moves the tag input into the tag list; blanks and repeats are ignored.
    pub fn add_tag(&mut self) {
        let tag = self.tag_input.trim().to_string();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self.tag_input.clear();
    }

    /// Templates only fill new tasks.
    pub fn apply_template(&mut self, template: &Template) {
        if !self.is_new() {
            return;
        }
        self.title = template.title.to_string();
        self.description = template.description.to_string();
        self.priority = template.priority;
        self.category = Some(template.category.to_string());
        self.reminder = template.reminder;
        self.tags = template.tags.iter().map(|t| t.to_string()).collect();
        self.errors.clear();
    }

    fn draft(&self) -> Result<TaskDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let due_date = match self.due_date.trim() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.insert(Field::DueDate, "Enter a date as YYYY-MM-DD".into());
                    None
                }
            },
        };
        let due_time = match self.due_time.trim() {
            "" => None,
            raw => match NaiveTime::parse_from_str(raw, "%H:%M") {
                Ok(time) => Some(time),
                Err(_) => {
                    errors.insert(Field::DueTime, "Enter a time as HH:MM".into());
                    None
                }
            },
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        let mut tags = self.tags.clone();
        let pending = self.tag_input.trim();
        if !pending.is_empty() && !tags.iter().any(|t| t == pending) {
            tags.push(pending.to_string());
        }

        Ok(TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            category: self.category.clone(),
            due_date,
            due_time,
            tags,
            reminder: self.reminder,
            kept_reminder: self.kept_reminder,
        })
    }

    /// Validates the form. On success returns the task to save and whether it
    /// is new; on failure the errors are kept on the form for display.
    pub fn submit(&mut self, today: NaiveDate) -> Option<(Task, bool)> {
        let result = self.draft().and_then(|draft| {
            draft.validate(today, self.is_new())?;
            Ok(draft)
        });
        match result {
            Ok(draft) => {
                self.errors.clear();
                Some((draft.into_task(self.editing.as_ref()), self.is_new()))
            }
            Err(errors) => {
                self.errors = errors;
                self.focus = self.first_error_field().unwrap_or(self.focus);
                None
            }
        }
    }

    fn first_error_field(&self) -> Option<FormField> {
        FormField::ORDER
            .iter()
            .copied()
            .find(|field| field.error_key().is_some_and(|key| self.errors.contains_key(&key)))
    }
}
