// API error taxonomy
//
// Authentication and ownership failures are never distinguished for the
// client beyond these categories: no hint whether an email exists, no hint
// whether a row is absent or owned by someone else. Internal failures are
// logged server-side and rendered as a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::common::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No or invalid credential presented (401).
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// Missing or malformed input (400).
    #[error("{0}")]
    InvalidInput(&'static str),

    /// Duplicate registration (400, matching the original contract).
    #[error("{0}")]
    Conflict(&'static str),

    /// Resource absent, or owned by another account (404). Indistinguishable.
    #[error("not found")]
    NotFound,

    /// Storage or other unexpected failure (500).
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(source) = &self {
            tracing::error!("internal error: {:#}", source);
        }

        let status = self.status();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Unauthenticated("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::InvalidInput("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("db broke")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused to db at 10.0.0.3"));
        assert_eq!(err.to_string(), "internal server error");
    }
}
