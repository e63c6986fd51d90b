use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDateTime;
use log::{info, warn};
use todomaster_shared::{Task, TaskPatch, TITLE_MAX};
use uuid::Uuid;

use crate::error::ApiError;

const DESCRIPTION_MAX: usize = 1000;

#[derive(Debug, Default)]
struct Inner {
    tasks: Vec<Task>,
    categories: Vec<String>,
}

/// In-memory tasks and categories, shared by every worker.
#[derive(Debug, Default)]
pub struct TaskStore {
    inner: RwLock<Inner>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `name` unless a category with the same name (ignoring case) exists.
    pub fn ensure_category(&self, name: &str) {
        let mut inner = self.write();
        if !inner.categories.iter().any(|c| c.eq_ignore_ascii_case(name)) {
            inner.categories.push(name.to_string());
        }
    }

    pub fn categories(&self) -> Vec<String> {
        self.read().categories.clone()
    }

    /// Oldest first; tasks created at the same instant keep insertion order.
    pub fn all_ordered(&self) -> Vec<Task> {
        let mut tasks = self.read().tasks.clone();
        tasks.sort_by_key(|task| task.created_at);
        tasks
    }

    pub fn find(&self, raw_uuid: &str) -> Result<Task, ApiError> {
        let uuid = parse_uuid(raw_uuid)?;
        self.read()
            .tasks
            .iter()
            .find(|task| task.uuid == uuid)
            .cloned()
            .ok_or_else(|| {
                warn!("Task not found for uuid {}", raw_uuid);
                ApiError::TaskNotFound(raw_uuid.to_string())
            })
    }

    pub fn find_by_title(&self, title: &str) -> Option<Task> {
        self.read().tasks.iter().find(|task| task.title == title).cloned()
    }

    pub fn search(&self, keyword: &str) -> Vec<Task> {
        let keyword = keyword.to_lowercase();
        self.read()
            .tasks
            .iter()
            .filter(|task| {
                task.title.to_lowercase().contains(&keyword)
                    || task.description.to_lowercase().contains(&keyword)
            })
            .cloned()
            .collect()
    }

    pub fn by_category(&self, name: &str) -> Vec<Task> {
        self.read()
            .tasks
            .iter()
            .filter(|task| task.in_category(name))
            .cloned()
            .collect()
    }

    pub fn create(&self, mut task: Task, now: NaiveDateTime) -> Result<Task, ApiError> {
        let mut inner = self.write();

        task.title = task.title.trim().to_string();
        validate(&task)?;
        task.category_name = resolve_category(&inner.categories, task.category_name.as_deref())?;

        if inner.tasks.iter().any(|t| t.uuid == task.uuid) {
            return Err(ApiError::UuidTaken(task.uuid.to_string()));
        }
        if inner.tasks.iter().any(|t| t.title == task.title) {
            return Err(ApiError::TitleTaken(task.title));
        }

        task.created_at = Some(now);
        task.updated_at = None;
        info!("Creating new task with title: {}", task.title);
        inner.tasks.push(task.clone());
        Ok(task)
    }

    pub fn update(&self, patch: &TaskPatch, now: NaiveDateTime) -> Result<Task, ApiError> {
        let uuid = parse_uuid(&patch.uuid)?;
        let mut inner = self.write();

        let category = match patch.category_name.as_deref() {
            Some(name) => resolve_category(&inner.categories, Some(name))?,
            None => None,
        };
        if let Some(title) = patch.title.as_deref() {
            if inner.tasks.iter().any(|t| t.uuid != uuid && t.title == title.trim()) {
                return Err(ApiError::TitleTaken(title.trim().to_string()));
            }
        }

        let task = inner
            .tasks
            .iter_mut()
            .find(|task| task.uuid == uuid)
            .ok_or_else(|| ApiError::TaskNotFound(patch.uuid.clone()))?;

        let mut updated = task.clone();
        patch.apply(&mut updated);
        updated.title = updated.title.trim().to_string();
        if patch.category_name.is_some() {
            updated.category_name = category;
        }
        validate(&updated)?;
        updated.updated_at = Some(now);

        *task = updated.clone();
        Ok(updated)
    }

    pub fn delete(&self, raw_uuid: &str) -> Result<(), ApiError> {
        let uuid = parse_uuid(raw_uuid)?;
        let mut inner = self.write();
        let before = inner.tasks.len();
        inner.tasks.retain(|task| task.uuid != uuid);
        if inner.tasks.len() == before {
            warn!("Task not found for uuid {}", raw_uuid);
            return Err(ApiError::TaskNotFound(raw_uuid.to_string()));
        }
        Ok(())
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::InvalidUuid(raw.to_string()))
}

fn validate(task: &Task) -> Result<(), ApiError> {
    if task.title.is_empty() {
        return Err(ApiError::InvalidTask("Task title is required".into()));
    }
    if task.title.chars().count() > TITLE_MAX {
        return Err(ApiError::InvalidTask(format!(
            "Title must be at most {TITLE_MAX} characters"
        )));
    }
    if task.description.chars().count() > DESCRIPTION_MAX {
        return Err(ApiError::InvalidTask(format!(
            "Description must be at most {DESCRIPTION_MAX} characters"
        )));
    }
    Ok(())
}

/// Maps a requested category onto its stored spelling.
fn resolve_category(categories: &[String], requested: Option<&str>) -> Result<Option<String>, ApiError> {
    match requested.map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => categories
            .iter()
            .find(|c| c.eq_ignore_ascii_case(name))
            .cloned()
            .map(Some)
            .ok_or_else(|| ApiError::CategoryNotFound(name.to_string())),
    }
}
