use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use chrono::Local;
use serde::Deserialize;
use todomaster_shared::{Task, TaskPatch};

use crate::error::ApiError;
use crate::store::TaskStore;

pub struct AppState {
    pub store: TaskStore,
    /// When set, every request must carry `Authorization: Bearer <token>`.
    pub api_token: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tasks")
            .route("", web::get().to(get_all_tasks))
            .route("", web::post().to(create_task))
            .route("", web::put().to(update_task))
            .route("/search", web::get().to(search_tasks))
            .route("/category/{name}", web::get().to(tasks_by_category))
            .route("/{uuid}", web::get().to(get_task))
            .route("/{uuid}", web::delete().to(delete_task)),
    );
}

/// JSON extractor config that answers malformed bodies with an `ApiErrorResponse`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::InvalidTask(format!("Malformed task body: {err}")).into())
}

/// Query-string extractor config; a missing or bad `keyword` gets an `ApiErrorResponse`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::InvalidTask(format!("Invalid query: {err}")).into())
}

fn authorize(req: &HttpRequest, state: &AppState) -> Result<(), ApiError> {
    let Some(expected) = state.api_token.as_deref() else {
        return Ok(());
    };
    let provided = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    match provided {
        Some(token) if token == expected => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

/// Passed the bearer check. Listed first in every handler so the check runs
/// before the body or query is extracted.
struct Authorized;

impl FromRequest for Authorized {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<AppState>>() {
            Some(state) => authorize(req, state).map(|()| Authorized),
            None => Ok(Authorized),
        };
        ready(result)
    }
}

async fn get_all_tasks(_auth: Authorized, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.store.all_ordered()))
}

async fn get_task(
    _auth: Authorized,
    state: web::Data<AppState>,
    uuid: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.store.find(&uuid)?))
}

#[derive(Deserialize)]
struct SearchQuery {
    keyword: String,
}

async fn search_tasks(
    _auth: Authorized,
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.store.search(&query.keyword)))
}

async fn tasks_by_category(
    _auth: Authorized,
    state: web::Data<AppState>,
    name: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.store.by_category(&name)))
}

async fn create_task(
    _auth: Authorized,
    state: web::Data<AppState>,
    task: web::Json<Task>,
) -> Result<HttpResponse, ApiError> {
    let created = state.store.create(task.into_inner(), Local::now().naive_local())?;
    Ok(HttpResponse::Created().json(created))
}

async fn update_task(
    _auth: Authorized,
    state: web::Data<AppState>,
    patch: web::Json<TaskPatch>,
) -> Result<HttpResponse, ApiError> {
    let updated = state.store.update(&patch, Local::now().naive_local())?;
    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_task(
    _auth: Authorized,
    state: web::Data<AppState>,
    uuid: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state.store.delete(&uuid)?;
    Ok(HttpResponse::NoContent().finish())
}
