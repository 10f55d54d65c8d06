//! Error types and error handling for the application
//!
//! This module defines the error taxonomy of the reporting API. Every variant
//! converts into the same JSON envelope the success path uses, so no failure
//! leaves a handler without a `{code, data, msg}` body.

use crate::api::response::ApiResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// A request parameter is missing or malformed; detected before any query runs
    #[error("{0}")]
    Validation(String),

    /// No connection to the backing store could be obtained
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// A statement failed while executing against the store
    #[error("Query failed: {0}")]
    Query(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Status code carried both in the envelope and on the HTTP response
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Connection(_) | AppError::Query(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => AppError::Connection(err.to_string()),
            other => AppError::Query(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), error = %message, "Request rejected");
        } else {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        }

        ApiResponse::failure(status, message).into_response()
    }
}
