//! The task list the dashboard works on.
//!
//! Mutations are optimistic: the local list changes and is written to storage
//! first, then the server is told. A failed request leaves the local change in
//! place and is reported back to the caller.

use chrono::{Local, NaiveDate, NaiveDateTime};
use log::{debug, info, warn};
use thiserror::Error;
use todomaster_shared::{quick_add, QuickAddDefaults, QuickAddError, SortSpec, Status, Task, TaskCounts, TaskFilter};
use uuid::Uuid;

use crate::service::{ServiceError, TaskService};
use crate::storage::{LocalStorage, StorageError, TODOS_KEY};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    QuickAdd(#[from] QuickAddError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Remote(#[from] ServiceError),

    #[error("No task with uuid {0}")]
    NotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

pub struct Dashboard {
    tasks: Vec<Task>,
    pub filter: TaskFilter,
    pub sort: Option<SortSpec>,
    storage: LocalStorage,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl Dashboard {
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            tasks: Vec::new(),
            filter: TaskFilter::default(),
            sort: None,
            storage,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, uuid: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.uuid == uuid)
    }

    fn position(&self, uuid: Uuid) -> Result<usize> {
        self.tasks
            .iter()
            .position(|task| task.uuid == uuid)
            .ok_or(DashboardError::NotFound(uuid))
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(TODOS_KEY, &self.tasks)?;
        Ok(())
    }

    /// Reads the last saved list. A corrupt value is logged and treated as empty.
    pub fn load_local(&mut self) {
        self.tasks = match self.storage.load::<Vec<Task>>(TODOS_KEY) {
            Ok(tasks) => tasks.unwrap_or_default(),
            Err(err) => {
                warn!("Error loading todos from storage: {}", err);
                Vec::new()
            }
        };
        debug!("Loaded {} tasks from local storage", self.tasks.len());
    }

    /// Replaces the local list with the server's.
    pub async fn sync(&mut self, service: &TaskService) -> Result<usize> {
        self.tasks = service.get_all().await?;
        self.persist()?;
        info!("Synced {} tasks from {}", self.tasks.len(), service.base_url());
        Ok(self.tasks.len())
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts::of(&self.tasks)
    }

    /// Filtered, then sorted when a sort is chosen; otherwise list order.
    pub fn visible(&self, today: NaiveDate) -> Vec<&Task> {
        let mut visible = self.filter.apply(&self.tasks, today);
        if let Some(sort) = &self.sort {
            sort.sort(&mut visible);
        }
        visible
    }

    /// Keeps the server's copy of a task once it answers.
    fn replace(&mut self, task: Task) -> Result<()> {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.uuid == task.uuid) {
            *slot = task;
        }
        self.persist()
    }

    pub async fn add(&mut self, mut task: Task, service: &TaskService) -> Result<Uuid> {
        let uuid = task.uuid;
        task.created_at.get_or_insert_with(now);
        self.tasks.insert(0, task.clone());
        self.persist()?;

        let created = service.save_task(&task).await?;
        debug!("Created task {}", created.uuid);
        self.replace(created)?;
        Ok(uuid)
    }

    pub async fn add_quick(
        &mut self,
        input: &str,
        defaults: &QuickAddDefaults,
        service: &TaskService,
    ) -> Result<Uuid> {
        let parsed = quick_add::parse(input, defaults)?;
        self.add(parsed.into_task(), service).await
    }

    async fn push_update(&mut self, index: usize, service: &TaskService) -> Result<()> {
        self.tasks[index].updated_at = Some(now());
        self.persist()?;
        let updated = service.update_task(&self.tasks[index]).await?;
        self.replace(updated)
    }

    pub async fn toggle(&mut self, uuid: Uuid, service: &TaskService) -> Result<()> {
        let index = self.position(uuid)?;
        self.tasks[index].toggle();
        self.push_update(index, service).await
    }

    pub async fn set_status(&mut self, uuid: Uuid, status: Status, service: &TaskService) -> Result<()> {
        let index = self.position(uuid)?;
        self.tasks[index].status = status;
        self.push_update(index, service).await
    }

    /// Saves the result of the task form, creating or editing as asked.
    pub async fn save_from_form(&mut self, task: Task, is_new: bool, service: &TaskService) -> Result<Uuid> {
        if is_new {
            return self.add(task, service).await;
        }
        let uuid = task.uuid;
        let index = self.position(uuid)?;
        self.tasks[index] = task;
        self.push_update(index, service).await?;
        Ok(uuid)
    }

    /// A task the server no longer has counts as deleted.
    pub async fn delete(&mut self, uuid: Uuid, service: &TaskService) -> Result<()> {
        let index = self.position(uuid)?;
        self.tasks.remove(index);
        self.persist()?;
        match service.delete_by_uuid(uuid).await {
            Err(err) if !err.is_not_found() => Err(err.into()),
            _ => Ok(()),
        }
    }

    /// Removes every completed task; returns how many went.
    pub async fn clear_completed(&mut self, service: &TaskService) -> Result<usize> {
        let (done, kept): (Vec<Task>, Vec<Task>) = self.tasks.drain(..).partition(Task::is_completed);
        self.tasks = kept;
        self.persist()?;

        let mut first_error = None;
        for task in &done {
            if let Err(err) = service.delete_by_uuid(task.uuid).await {
                if !err.is_not_found() {
                    warn!("Failed to delete task {}: {}", task.uuid, err);
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(done.len()),
        }
    }

    /// Completes everything, or reopens everything when nothing is active.
    pub async fn toggle_all(&mut self, service: &TaskService) -> Result<()> {
        let complete = self.counts().has_active();
        let stamp = now();
        let changed: Vec<usize> = self
            .tasks
            .iter_mut()
            .enumerate()
            .filter(|(_, task)| task.is_completed() != complete)
            .map(|(index, task)| {
                task.set_completed(complete);
                task.updated_at = Some(stamp);
                index
            })
            .collect();
        self.persist()?;

        let mut first_error = None;
        for index in changed {
            match service.update_task(&self.tasks[index]).await {
                Ok(updated) => self.tasks[index] = updated,
                Err(err) => {
                    warn!("Failed to update task {}: {}", self.tasks[index].uuid, err);
                    first_error.get_or_insert(err);
                }
            }
        }
        self.persist()?;
        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Merges imported tasks by uuid and sends each one to the server.
    pub async fn import(&mut self, tasks: Vec<Task>, service: &TaskService) -> Result<usize> {
        let count = tasks.len();
        let mut pending = Vec::with_capacity(count);
        for task in tasks {
            let exists = match self.tasks.iter_mut().find(|t| t.uuid == task.uuid) {
                Some(slot) => {
                    *slot = task.clone();
                    true
                }
                None => {
                    self.tasks.push(task.clone());
                    false
                }
            };
            pending.push((task, exists));
        }
        self.persist()?;

        let mut first_error = None;
        for (task, exists) in pending {
            let sent = if exists {
                service.update_task(&task).await
            } else {
                service.save_task(&task).await
            };
            if let Err(err) = sent {
                warn!("Failed to upload imported task {}: {}", task.uuid, err);
                first_error.get_or_insert(err);
            }
        }
        info!("Imported {} tasks", count);
        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(count),
        }
    }

    /// Forgets the in-memory list after local storage has been wiped.
    pub fn forget(&mut self) {
        self.tasks.clear();
        self.filter = TaskFilter::default();
        self.sort = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use todomaster_shared::{Priority, SortKey, SortOrder};
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Fixture {
        _dir: tempfile::TempDir,
        storage: LocalStorage,
        service: TaskService,
        dashboard: Dashboard,
    }

    async fn fixture(server: &MockServer) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        let service = TaskService::new(&format!("{}/api/v1", server.uri()), storage.clone()).unwrap();
        let dashboard = Dashboard::new(storage.clone());
        Fixture {
            _dir: dir,
            storage,
            service,
            dashboard,
        }
    }

    fn stored(storage: &LocalStorage) -> Vec<Task> {
        storage.load(TODOS_KEY).unwrap().unwrap_or_default()
    }

    #[tokio::test]
    async fn sync_replaces_local_list() {
        let server = MockServer::start().await;
        let mut f = fixture(&server).await;
        f.storage.save(TODOS_KEY, &vec![Task::new("stale")]).unwrap();
        f.dashboard.load_local();
        assert_eq!(f.dashboard.tasks()[0].title, "stale");

        Mock::given(method("GET"))
            .and(path("/api/v1/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "uuid": Uuid::new_v4().to_string(), "title": "fresh", "priority": "HIGH" }
            ])))
            .mount(&server)
            .await;

        assert_eq!(f.dashboard.sync(&f.service).await.unwrap(), 1);
        assert_eq!(f.dashboard.tasks()[0].title, "fresh");
        assert_eq!(stored(&f.storage)[0].title, "fresh");
    }

    #[tokio::test]
    async fn quick_add_is_kept_when_server_fails() {
        let server = MockServer::start().await;
        let mut f = fixture(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/v1/tasks"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = f
            .dashboard
            .add_quick("Call mom !high @personal", &QuickAddDefaults::default(), &f.service)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Remote(_)));

        let tasks = stored(&f.storage);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Call mom");
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[0].category_name.as_deref(), Some("Personal"));
        assert!(tasks[0].created_at.is_some());
    }

    #[tokio::test]
    async fn blank_quick_add_never_reaches_the_server() {
        let server = MockServer::start().await;
        let mut f = fixture(&server).await;

        let err = f
            .dashboard
            .add_quick("  #tag !low ", &QuickAddDefaults::default(), &f.service)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::QuickAdd(QuickAddError::EmptyTitle)));
        assert!(f.dashboard.tasks().is_empty());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggle_puts_the_new_status() {
        let server = MockServer::start().await;
        let mut f = fixture(&server).await;
        let task = Task::new("Read a book");
        let uuid = task.uuid;
        f.storage.save(TODOS_KEY, &vec![task]).unwrap();
        f.dashboard.load_local();

        Mock::given(method("PUT"))
            .and(path("/api/v1/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uuid": uuid.to_string(), "title": "Read a book", "status": "DONE"
            })))
            .expect(1)
            .mount(&server)
            .await;

        f.dashboard.toggle(uuid, &f.service).await.unwrap();
        assert!(f.dashboard.find(uuid).unwrap().is_completed());
        assert!(stored(&f.storage)[0].is_completed());
    }

    #[tokio::test]
    async fn delete_tolerates_missing_remote_task() {
        let server = MockServer::start().await;
        let mut f = fixture(&server).await;
        let task = Task::new("Old");
        let uuid = task.uuid;
        f.storage.save(TODOS_KEY, &vec![task]).unwrap();
        f.dashboard.load_local();

        Mock::given(method("DELETE"))
            .and(path_regex(r"^/api/v1/tasks/.+$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        f.dashboard.delete(uuid, &f.service).await.unwrap();
        assert!(f.dashboard.tasks().is_empty());
        assert!(matches!(
            f.dashboard.delete(uuid, &f.service).await,
            Err(DashboardError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn clear_completed_deletes_each_done_task() {
        let server = MockServer::start().await;
        let mut f = fixture(&server).await;
        let mut done = Task::new("done");
        done.status = Status::Done;
        let open = Task::new("open");
        f.storage.save(TODOS_KEY, &vec![done, open]).unwrap();
        f.dashboard.load_local();

        Mock::given(method("DELETE"))
            .and(path_regex(r"^/api/v1/tasks/.+$"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(f.dashboard.clear_completed(&f.service).await.unwrap(), 1);
        assert_eq!(f.dashboard.counts().all, 1);
        assert_eq!(f.dashboard.tasks()[0].title, "open");
    }

    #[tokio::test]
    async fn toggle_all_completes_then_reopens() {
        let server = MockServer::start().await;
        let mut f = fixture(&server).await;
        f.storage
            .save(TODOS_KEY, &vec![Task::new("a"), Task::new("b")])
            .unwrap();
        f.dashboard.load_local();

        // Server unreachable: local state still flips.
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(f.dashboard.toggle_all(&f.service).await.is_err());
        assert_eq!(f.dashboard.counts().completed, 2);
        assert!(f.dashboard.toggle_all(&f.service).await.is_err());
        assert_eq!(f.dashboard.counts().active, 2);
    }

    #[tokio::test]
    async fn import_updates_known_tasks_and_creates_new_ones() {
        let server = MockServer::start().await;
        let mut f = fixture(&server).await;
        let existing = Task::new("Old title");
        f.storage.save(TODOS_KEY, &vec![existing.clone()]).unwrap();
        f.dashboard.load_local();

        let mut renamed = existing.clone();
        renamed.title = "New title".into();
        let fresh = Task::new("Imported");

        Mock::given(method("PUT"))
            .and(path("/api/v1/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uuid": existing.uuid.to_string(), "title": "New title"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/tasks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "uuid": fresh.uuid.to_string(), "title": "Imported"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let count = f.dashboard.import(vec![renamed, fresh.clone()], &f.service).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(f.dashboard.tasks().len(), 2);
        assert_eq!(f.dashboard.find(existing.uuid).unwrap().title, "New title");
        assert!(f.dashboard.find(fresh.uuid).is_some());
        assert_eq!(stored(&f.storage).len(), 2);
    }

    #[tokio::test]
    async fn import_keeps_tasks_locally_when_upload_fails() {
        let server = MockServer::start().await;
        let mut f = fixture(&server).await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let result = f
            .dashboard
            .import(vec![Task::new("a"), Task::new("b")], &f.service)
            .await;
        assert!(matches!(result, Err(DashboardError::Remote(_))));
        assert_eq!(stored(&f.storage).len(), 2);
    }

    #[tokio::test]
    async fn visible_applies_filter_then_sort() {
        let server = MockServer::start().await;
        let mut f = fixture(&server).await;
        let mut low = Task::new("low");
        low.priority = Priority::Low;
        let mut urgent = Task::new("urgent");
        urgent.priority = Priority::Urgent;
        let mut finished = Task::new("finished");
        finished.status = Status::Done;
        f.storage.save(TODOS_KEY, &vec![low, urgent, finished]).unwrap();
        f.dashboard.load_local();

        f.dashboard.filter.tab = todomaster_shared::Tab::Active;
        f.dashboard.sort = Some(SortSpec {
            key: SortKey::Priority,
            order: SortOrder::Desc,
        });
        let today = NaiveDate::from_ymd_opt(2025, 7, 23).unwrap();
        let titles: Vec<&str> = f.dashboard.visible(today).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["urgent", "low"]);
    }
}
