use thiserror::Error;

/// Shown when the server gives us nothing better to say.
pub const FALLBACK_MESSAGE: &str = "Server error. Please try again later.";

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Transport failure or an undecodable body.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The API rejected our token; it has been removed from local storage.
    #[error("Session expired, please log in again")]
    Unauthorized,

    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Api { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
