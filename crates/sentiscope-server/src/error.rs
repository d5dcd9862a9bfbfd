//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sentiscope_core::ErrorBody;
use tracing::error;

/// Errors returned by handlers, rendered as `{"error": message}`
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed input; rejected before any model runs
    #[error("{0}")]
    InvalidRequest(String),

    /// Processing failure inside the service
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sentiscope_core::Error> for AppError {
    fn from(err: sentiscope_core::Error) -> Self {
        if err.is_client_error() {
            AppError::InvalidRequest(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("analysis task failed: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = match &self {
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Internal(_) => "internal",
        };
        metrics::counter!("sentiscope_errors_total", "kind" => kind).increment(1);

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
