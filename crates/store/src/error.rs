//! Store operation errors.
//!
//! These are **infrastructure errors** (missing records, stale revisions,
//! malformed payloads) as opposed to domain errors (validation, invariants).

use thiserror::Error;

use bloomframe_core::Revision;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("no record matched filter: {0}")]
    NoMatch(String),

    /// Optimistic revision guard failed: someone else updated the record
    /// after the caller loaded its snapshot.
    #[error("stale revision on {collection}/{id}: expected {expected}, actual {actual}")]
    StaleRevision {
        collection: String,
        id: String,
        expected: Revision,
        actual: Revision,
    },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("record shape mismatch in {collection}: {message}")]
    Shape { collection: String, message: String },

    /// Network/backend failure from a remote store implementation.
    #[error("backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn shape(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Shape {
            collection: collection.into(),
            message: message.into(),
        }
    }
}
