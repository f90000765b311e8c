//! # Dispatcher Errors
//!
//! Client errors (400) are detected before any store access. Store failures
//! (500) abort the current request only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::notes::ValidationError;
use crate::store::StoreError;

use super::envelope::Envelope;

/// Result type for dispatched actions
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum DispatchError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Malformed, missing or oversized input
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unrecognised `action` value
    #[error("Unknown action")]
    UnknownAction(String),

    /// No route for the request path
    #[error("Not found")]
    NotFound,

    /// Query string or body the extractors could not read
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Connection or statement failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Runtime failure outside the store, such as a handler panic
    #[error("{0}")]
    Internal(String),
}

impl DispatchError {
    /// Wrap an extractor rejection, keeping its status and message
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        DispatchError::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::Validation(_) => StatusCode::BAD_REQUEST,
            DispatchError::UnknownAction(_) => StatusCode::BAD_REQUEST,
            DispatchError::NotFound => StatusCode::NOT_FOUND,
            DispatchError::Rejected { status, .. } => *status,
            DispatchError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DispatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            DispatchError::Store(err) => tracing::error!(error = %err, "store failure"),
            DispatchError::Internal(message) => tracing::error!(%message, "internal failure"),
            DispatchError::UnknownAction(action) => tracing::debug!(%action, "unknown action"),
            other => tracing::debug!(error = %other, "request rejected"),
        }
        (status, Envelope::error(self.to_string())).into_response()
    }
}
