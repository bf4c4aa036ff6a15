use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

/// AppError
///
/// Every failure a handler or guard can produce. Guards short-circuit the request by
/// returning one of these; `IntoResponse` renders it as the uniform error payload.
#[derive(Debug, Error)]
pub enum AppError {
    /// Body-shape or business rule violation (400).
    #[error("{0}")]
    BadRequest(String),

    /// Missing, malformed or expired credentials (401).
    #[error("authentication required")]
    Unauthorized,

    /// Authenticated, but the role or ownership check failed (403).
    #[error("{0}")]
    Forbidden(String),

    /// Existence gate failed (404).
    #[error("{0}")]
    NotFound(String),

    /// Anything the database driver reports (500).
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// ErrorResponse
///
/// Wire shape for every non-2xx response.
#[derive(Debug, Clone, Serialize, serde::Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let Self::Database(e) = &self {
            tracing::error!(error = ?e, "database error");
        }
        let body = ErrorResponse {
            status: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
