//! One-line task entry.
//!
//! `Prepare slides !urgent @work #meeting due:2025-01-23` becomes a task titled
//! `Prepare slides` with the given priority, category, tags and due date.

use chrono::NaiveDate;
use thiserror::Error;

use crate::task::{Priority, Task};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuickAddError {
    #[error("Task title is required")]
    EmptyTitle,
}

/// Values used when the input does not carry its own marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickAddDefaults {
    pub priority: Priority,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickAdd {
    pub title: String,
    pub priority: Priority,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
}

impl QuickAdd {
    pub fn into_task(self) -> Task {
        let mut task = Task::new(self.title);
        task.priority = self.priority;
        task.category_name = self.category;
        task.tags = self.tags;
        task.due_date = self.due_date;
        task
    }
}

pub fn parse(input: &str, defaults: &QuickAddDefaults) -> Result<QuickAdd, QuickAddError> {
    let mut priority = None;
    let mut category = None;
    let mut due_date = None;
    let mut tags: Vec<String> = Vec::new();
    let mut words = Vec::new();

    for token in input.split_whitespace() {
        if let Some(rest) = token.strip_prefix('!') {
            if priority.is_none() {
                if let Ok(parsed) = rest.parse::<Priority>() {
                    priority = Some(parsed);
                    continue;
                }
            }
        } else if let Some(rest) = token.strip_prefix('@') {
            if category.is_none() && is_word(rest) {
                category = Some(capitalize(rest));
                continue;
            }
        } else if let Some(rest) = token.strip_prefix('#') {
            if is_word(rest) {
                let tag = rest.to_lowercase();
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
                continue;
            }
        } else if let Some(rest) = strip_prefix_ignore_case(token, "due:") {
            if due_date.is_none() {
                if let Ok(date) = NaiveDate::parse_from_str(rest, "%Y-%m-%d") {
                    due_date = Some(date);
                    continue;
                }
            }
        }
        words.push(token);
    }

    if words.is_empty() {
        return Err(QuickAddError::EmptyTitle);
    }

    Ok(QuickAdd {
        title: words.join(" "),
        priority: priority.unwrap_or(defaults.priority),
        category: category.or_else(|| defaults.category.clone()),
        tags,
        due_date: due_date.or(defaults.due_date),
    })
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn strip_prefix_ignore_case<'a>(token: &'a str, prefix: &str) -> Option<&'a str> {
    let head = token.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &token[prefix.len()..])
}

/// `work` and `WORK` both map onto the server's `Work` label.
fn capitalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
