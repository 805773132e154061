//! Error types for the reservation client

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-2xx answer from a backend. The body is kept verbatim.
    #[error("Error in request {request}: ({status}){status_text} {body}")]
    Http {
        request: String,
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Transport error in request {request}: {message}")]
    Transport { request: String, message: String },

    #[error("Error parsing JSON response in request {request}: {message}")]
    Decode { request: String, message: String },

    #[error("Request {0} was cancelled")]
    Cancelled(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status carried by the error, if it came from a backend answer
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend refused the bearer token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Transport {
            request: e.url().map(|url| url.path().to_string()).unwrap_or_default(),
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", e))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
