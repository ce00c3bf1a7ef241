//! Unified API error type.
//!
//! Every handler returns `Result<T, ApiError>`, which implements
//! [`axum::response::IntoResponse`] so errors become the JSON envelope
//! `{ "success": false, "error": "..." }` with a matching status code.
//!
//! Internal errors (repository, unexpected) are logged with full
//! detail; the client only sees a generic message.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use banter::DomainError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

/// All errors that can occur while serving a request
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unprocessable(String),

    /// The completion API or an OAuth provider failed
    #[error("{0}")]
    BadGateway(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Upstream failure with a client-facing summary; the cause is logged
    pub fn upstream(summary: &str, cause: DomainError) -> Self {
        match cause {
            DomainError::ExternalService(detail) => {
                error!(error = %detail, "{summary}");
                ApiError::BadGateway(summary.to_string())
            }
            other => other.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { entity_type, .. } => {
                ApiError::NotFound(format!("{entity_type} not found"))
            }
            DomainError::Validation(m) => ApiError::BadRequest(m),
            DomainError::Conflict(m) => ApiError::Conflict(m),
            DomainError::Unauthorized(m) => ApiError::Unauthorized(m),
            DomainError::Forbidden(m) => ApiError::Forbidden(m),
            DomainError::Unprocessable(m) => ApiError::Unprocessable(m),
            DomainError::ExternalService(m) => {
                error!(error = %m, "external service error");
                ApiError::BadGateway("Upstream service error".to_string())
            }
            DomainError::Repository(m) => ApiError::Internal(m),
        }
    }
}

// Extractor rejections: handlers take `WithRejection<_, ApiError>` so a
// malformed request still gets the JSON envelope.

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        error!(error = ?e, "converting anyhow error to ApiError::Internal");
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let client_message = match &self {
            ApiError::Internal(m) => {
                error!(message = %m, "internal server error");
                "Internal server error".to_owned()
            }
            other => other.to_string(),
        };
        (
            status,
            Json(json!({ "success": false, "error": client_message })),
        )
            .into_response()
    }
}
