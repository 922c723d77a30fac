use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Error taxonomy for the waiting room endpoints. Read endpoints degrade to
/// empty payloads instead of erroring; the write endpoint surfaces these as
/// structured `{"error": code}` bodies.
#[derive(Debug)]
pub enum ServiceError {
    Unauthorized,
    Forbidden,
    NotFound,
    Internal(String),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Unauthorized => "UNAUTHORIZED",
            ServiceError::Forbidden => "FORBIDDEN",
            ServiceError::NotFound => "NOT_FOUND",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Internal(msg) => write!(f, "{}: {}", self.code(), msg),
            _ => write!(f, "{}", self.code()),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<String> for ServiceError {
    fn from(msg: String) -> Self {
        ServiceError::Internal(msg)
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.code() });
        (self.status_code(), Json(body)).into_response()
    }
}
