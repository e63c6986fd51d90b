use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use todomaster_shared::ApiErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Task not found with uuid: {0}")]
    TaskNotFound(String),

    #[error("Category not found with name: {0}")]
    CategoryNotFound(String),

    #[error("Invalid UUID format: {0}")]
    InvalidUuid(String),

    #[error("{0}")]
    InvalidTask(String),

    #[error("Task with title '{0}' already exists")]
    TitleTaken(String),

    #[error("Task with uuid {0} already exists")]
    UuidTaken(String),

    #[error("Missing or invalid bearer token")]
    Unauthorized,
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::TaskNotFound(_) => "TaskNotFound",
            ApiError::CategoryNotFound(_) => "CategoryNotFound",
            ApiError::InvalidUuid(_) | ApiError::InvalidTask(_) => "InvalidTask",
            ApiError::TitleTaken(_) | ApiError::UuidTaken(_) => "TaskAlreadyExists",
            ApiError::Unauthorized => "Unauthorized",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::TaskNotFound(_) | ApiError::CategoryNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidUuid(_) | ApiError::InvalidTask(_) => StatusCode::BAD_REQUEST,
            ApiError::TitleTaken(_) | ApiError::UuidTaken(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ApiErrorResponse {
            message: self.to_string(),
            error: self.kind().to_string(),
            status: status.as_u16(),
        })
    }
}
