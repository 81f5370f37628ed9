//! Error taxonomy
//!
//! Every failure a handler can hit is one of three kinds: the request was
//! malformed (`Validation`), the generation provider failed (`Generation`), or
//! the database failed (`Store`). All of them render as `{"detail": "..."}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Failure of the external generation call
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("response decode error: {0}")]
    Decode(String),

    #[error("provider returned no choices")]
    EmptyResponse,
}

/// Failure of the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("database connection poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Generation(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Server-side failures stay generic.
    fn detail(&self) -> String {
        match self {
            AppError::Validation { field, message } => format!("{}: {}", field, message),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Generation(_) => "Failed to generate an answer".to_string(),
            AppError::Store(_) => "Database error".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Generation(e) => tracing::error!("Generation failed: {}", e),
            AppError::Store(e) => tracing::error!("Store failed: {}", e),
            other => tracing::debug!("Rejected request: {}", other),
        }

        let body = ErrorBody {
            detail: self.detail(),
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}
