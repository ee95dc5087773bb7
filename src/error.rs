use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{ai::AiError, store::StoreError};

/// Application-level error taxonomy. Every handler returns `Result<T, ApiError>`
/// and the `IntoResponse` impl maps each variant to a status code and a short
/// `{"error": "..."}` body. Internal detail is logged, never sent to clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing access token")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("{0}")]
    NotFound(String),

    #[error("Career analysis service unavailable")]
    Upstream(String),

    #[error("Career analysis service returned an invalid response")]
    MalformedAiResponse(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => ApiError::DuplicateEmail,
            StoreError::Database(e) => ApiError::Internal(e.into()),
        }
    }
}

impl From<AiError> for ApiError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::Upstream(msg) => ApiError::Upstream(msg),
            AiError::Malformed(msg) => ApiError::MalformedAiResponse(msg),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::DuplicateEmail => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::MalformedAiResponse(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Upstream(detail) => {
                tracing::error!(%detail, "upstream model call failed");
            }
            ApiError::MalformedAiResponse(detail) => {
                tracing::error!(%detail, "model returned malformed payload");
            }
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "internal error");
            }
            _ => {}
        }
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
