//! # Store Errors
//!
//! Error types for the persistence adapter. Every variant is a server-side
//! failure: the dispatcher reports them as HTTP 500 with the message passed
//! through unchanged.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence adapter errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The pool could not establish its initial connection
    #[error("Connection failed: {0}")]
    Connect(#[source] sqlx::Error),

    /// A statement failed during preparation or execution
    #[error("{0}")]
    Query(#[from] sqlx::Error),

    /// A row came back with a column the adapter could not interpret
    #[error("Failed to decode column '{column}': {message}")]
    Decode { column: String, message: String },

    /// The follow-up select after an insert found no row
    #[error("Inserted note {0} could not be read back")]
    InsertNotFound(i64),

    /// The driver did not report a generated identifier for an insert
    #[error("Store did not report a generated id for the inserted note")]
    MissingInsertId,
}

impl StoreError {
    pub(crate) fn decode(column: &str, message: impl Into<String>) -> Self {
        StoreError::Decode {
            column: column.to_string(),
            message: message.into(),
        }
    }
}
