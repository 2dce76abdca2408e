//! API errors mapped to HTTP status codes.
//!
//! Bodies are `{"error": kind, "message": text}` where `kind` is the library
//! error name (`InvalidQuery`, `UnknownModel`, ...) or `Internal`.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use routedb_core::error::Error;

/// - `InvalidQuery` → 400
/// - `NotFound` → 404
/// - `EmptyCorpus` → 422
/// - `UnknownModel` → 503
/// - anything else → 500
#[derive(Debug)]
pub enum ApiError {
    Core(Error),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self { ApiError::Core(err) }
}

/// Malformed query strings (`top_k=-1`, `limit=abc`) are invalid queries, not extractor errors.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self { ApiError::Core(Error::InvalidQuery(rejection.body_text())) }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self { ApiError::Core(Error::InvalidQuery(rejection.body_text())) }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<Error>() {
            Ok(core) => ApiError::Core(core),
            Err(other) => ApiError::Internal(format!("{other:#}")),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(Error::InvalidQuery(_)) => StatusCode::BAD_REQUEST,
            ApiError::Core(Error::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Core(Error::EmptyCorpus) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Core(Error::UnknownModel(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Core(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Core(e) => e.kind(),
            ApiError::Internal(_) => "Internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = match self {
            ApiError::Core(e) => e.to_string(),
            ApiError::Internal(msg) => msg,
        };
        if status.is_server_error() {
            tracing::error!(kind, %message, "request failed");
        } else {
            tracing::debug!(kind, %message, "request rejected");
        }
        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}
