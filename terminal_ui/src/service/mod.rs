//! HTTP client for the `/tasks` REST API.

mod error;

pub use error::{Result, ServiceError, FALLBACK_MESSAGE};

use std::time::Duration;

use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use todomaster_shared::{ApiErrorResponse, Task};
use uuid::Uuid;

use crate::storage::{LocalStorage, TOKEN_KEY};

const TASK_PATH: &str = "tasks";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct TaskService {
    http: Client,
    base_url: Url,
    storage: LocalStorage,
}

impl TaskService {
    pub fn new(base_url: &str, storage: LocalStorage) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with a slash.
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        Ok(Self {
            http: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: Url::parse(&base)?,
            storage,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Request hook: every call carries the stored bearer token, if any.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => builder.bearer_auth(token.trim()),
            Ok(_) => builder,
            Err(err) => {
                warn!("Could not read stored token: {}", err);
                builder
            }
        }
    }

    /// Response hook: a 401 drops the stored token, other failures are
    /// turned into `ServiceError::Api` with the server's message.
    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            if let Err(err) = self.storage.remove(TOKEN_KEY) {
                warn!("Could not clear stored token: {}", err);
            }
            return Err(ServiceError::Unauthorized);
        }
        let message = response
            .json::<ApiErrorResponse>()
            .await
            .ok()
            .map(|body| body.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        Err(ServiceError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.check(builder.send().await?).await?;
        Ok(())
    }

    /// GET /tasks
    pub async fn get_all(&self) -> Result<Vec<Task>> {
        let tasks: Vec<Task> = self.send_json(self.request(Method::GET, self.url(TASK_PATH)?)).await?;
        debug!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    /// GET /tasks/{uuid}
    pub async fn get_by_uuid(&self, uuid: Uuid) -> Result<Task> {
        let url = self.url(&format!("{TASK_PATH}/{uuid}"))?;
        self.send_json(self.request(Method::GET, url)).await
    }

    /// GET /tasks/search?keyword={keyword}
    pub async fn search(&self, keyword: &str) -> Result<Vec<Task>> {
        let mut url = self.url(&format!("{TASK_PATH}/search"))?;
        url.query_pairs_mut().append_pair("keyword", keyword);
        self.send_json(self.request(Method::GET, url)).await
    }

    /// GET /tasks/category/{name}
    pub async fn by_category(&self, name: &str) -> Result<Vec<Task>> {
        let mut url = self.url(TASK_PATH)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push("category")
            .push(name);
        self.send_json(self.request(Method::GET, url)).await
    }

    /// POST /tasks
    pub async fn save_task(&self, task: &Task) -> Result<Task> {
        let builder = self.request(Method::POST, self.url(TASK_PATH)?).json(task);
        self.send_json(builder).await
    }

    /// PUT /tasks
    pub async fn update_task(&self, task: &Task) -> Result<Task> {
        let builder = self.request(Method::PUT, self.url(TASK_PATH)?).json(task);
        self.send_json(builder).await
    }

    /// DELETE /tasks/{uuid}
    pub async fn delete_by_uuid(&self, uuid: Uuid) -> Result<()> {
        let url = self.url(&format!("{TASK_PATH}/{uuid}"))?;
        self.send_empty(self.request(Method::DELETE, url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> (tempfile::TempDir, TaskService) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        let service = TaskService::new(&format!("{}/api/v1", server.uri()), storage).unwrap();
        (dir, service)
    }

    fn task_json(uuid: Uuid, title: &str) -> serde_json::Value {
        json!({
            "uuid": uuid.to_string(),
            "title": title,
            "description": "",
            "priority": "LOW",
            "categoryName": "Work",
            "completed": false,
            "status": "TODO",
            "dueDate": "2025-07-28",
            "reminderDateTime": null,
            "createdAt": "2025-07-20T09:00:00"
        })
    }

    #[tokio::test]
    async fn lists_tasks_with_bearer_token() {
        let server = MockServer::start().await;
        let (_dir, service) = service(&server);
        service.storage.set(TOKEN_KEY, "abc123").unwrap();

        Mock::given(method("GET"))
            .and(path("/api/v1/tasks"))
            .and(header("authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                task_json(Uuid::new_v4(), "Finish project report"),
                task_json(Uuid::new_v4(), "Buy groceries"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let tasks = service.get_all().await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].title, "Buy groceries");
    }

    #[tokio::test]
    async fn unauthorized_clears_token() {
        let server = MockServer::start().await;
        let (_dir, service) = service(&server);
        service.storage.set(TOKEN_KEY, "expired").unwrap();

        Mock::given(method("GET"))
            .and(path("/api/v1/tasks"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = service.get_all().await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized));
        assert_eq!(service.storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn api_errors_carry_server_message() {
        let server = MockServer::start().await;
        let (_dir, service) = service(&server);
        let uuid = Uuid::new_v4();

        Mock::given(method("DELETE"))
            .and(path(format!("/api/v1/tasks/{uuid}")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": format!("Task not found with uuid: {uuid}"),
                "error": "TaskNotFound",
                "status": 404
            })))
            .mount(&server)
            .await;

        let err = service.delete_by_uuid(uuid).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!("Task not found with uuid: {uuid}"));
    }

    #[tokio::test]
    async fn unreadable_error_body_falls_back() {
        let server = MockServer::start().await;
        let (_dir, service) = service(&server);

        Mock::given(method("POST"))
            .and(path("/api/v1/tasks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = service.save_task(&Task::new("x")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Api { status: 500, .. }));
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn create_and_update_send_the_task() {
        let server = MockServer::start().await;
        let (_dir, service) = service(&server);
        let task = Task::new("Gym session");

        Mock::given(method("POST"))
            .and(path("/api/v1/tasks"))
            .and(body_partial_json(json!({ "title": "Gym session", "status": "TODO" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(task_json(task.uuid, "Gym session")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/tasks"))
            .and(body_partial_json(json!({ "uuid": task.uuid.to_string() })))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_json(task.uuid, "Gym session")))
            .expect(1)
            .mount(&server)
            .await;

        let created = service.save_task(&task).await.unwrap();
        assert_eq!(created.uuid, task.uuid);
        assert!(created.created_at.is_some());
        service.update_task(&created).await.unwrap();
    }

    #[tokio::test]
    async fn search_and_category_build_urls() {
        let server = MockServer::start().await;
        let (_dir, service) = service(&server);

        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/search"))
            .and(query_param("keyword", "clean code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/tasks/category/Work"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json(Uuid::new_v4(), "a")])))
            .expect(1)
            .mount(&server)
            .await;

        assert!(service.search("clean code").await.unwrap().is_empty());
        assert_eq!(service.by_category("Work").await.unwrap().len(), 1);
    }

    #[test]
    fn base_url_keeps_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        let service = TaskService::new("http://localhost:8080/api/v1", storage).unwrap();
        assert_eq!(
            service.url(TASK_PATH).unwrap().as_str(),
            "http://localhost:8080/api/v1/tasks"
        );
    }
}
