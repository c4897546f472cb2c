//! HTTP error responses.
//!
//! `ApiError` answers the JSON API with `{"error": ...}`; `AdminError` answers the
//! admin surface with short plain-text bodies.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    domain::{RepositoryError, ValueObjectError},
    infrastructure::dto::http::ErrorResponse,
    usecase::UseCaseError,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("room {0} not found")]
    RoomNotFound(i64),

    #[error("storage call timed out")]
    Timeout,

    #[error("{0}")]
    Storage(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RoomNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Timeout | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UseCaseError> for ApiError {
    fn from(err: UseCaseError) -> Self {
        match err {
            UseCaseError::Timeout(_) => ApiError::Timeout,
            UseCaseError::Repository(RepositoryError::RoomNotFound(id)) => {
                ApiError::RoomNotFound(id)
            }
            UseCaseError::Repository(e @ RepositoryError::Unavailable(_)) => {
                ApiError::Storage(e.to_string())
            }
        }
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(err: ValueObjectError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Admin surface errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AdminError {
    /// Missing or malformed bearer credential
    #[error("unauthorized")]
    Unauthorized,

    /// Well-formed credential that does not match
    #[error("forbidden")]
    Forbidden,

    #[error("method not allowed")]
    MethodNotAllowed,
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let body = format!("{}\n", self);
        match self {
            AdminError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                body,
            )
                .into_response(),
            AdminError::Forbidden => (StatusCode::FORBIDDEN, body).into_response(),
            AdminError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, body).into_response()
            }
        }
    }
}
