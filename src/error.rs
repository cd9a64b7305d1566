//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` for everything the comment API and store can fail with
//! and implements Axum's `IntoResponse` so handlers can return it directly.
//! The changelog pipeline itself never produces one: upstream and per-commit
//! store failures degrade to a shorter or unannotated feed instead.
//!
//! Error mappings:
//! - `InvalidInput` → 400
//! - `Unauthorized` → 401
//! - `CommentNotFound` → 404
//! - `AlreadyVoted` → 409
//! - `Store`, `Serialization`, `Internal` → 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    #[error("Already voted: {0}")]
    AlreadyVoted(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::CommentNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyVoted(_) => StatusCode::CONFLICT,
            AppError::Store(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
