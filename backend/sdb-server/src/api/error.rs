//! REST API error types
//!
//! Every rejection is rendered as `{"error": {"code", "message"}}` with the
//! status that matches the failure.

use sdb_auth::AuthError;

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g. "INVALID_CREDENTIALS")
    pub code: String,
    /// Human-readable message. Never contains credentials or claims.
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be authenticated (401, 403 or 500)
    #[error("Authentication failed: {source}")]
    Auth {
        #[source]
        source: AuthError,
    },

    /// Internal server error (500)
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Auth { source } => source.status(),
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Auth { source } => source.error_code(),
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }

        let body = ApiErrorBody {
            code: self.error_code().to_string(),
            message: match &self {
                Self::Auth { source } => source.public_message().to_string(),
                Self::Internal { .. } => "Internal server error".to_string(),
            },
        };

        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(source: AuthError) -> Self {
        Self::Auth { source }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
