//! # Store Errors
//!
//! Failures reported by an [`EntityStore`](super::EntityStore) implementation.
//! The customer service propagates these unmodified, except on delete.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level faults
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record addressed by id does not exist
    #[error("{table} '{id}' not found")]
    NotFound { table: &'static str, id: String },

    /// Database answered with a non-success status
    #[error("database returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Request never completed (connect, timeout, TLS)
    #[error("database request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Entity could not be encoded or a response could not be decoded
    #[error("invalid document: {0}")]
    Codec(#[from] serde_json::Error),

    /// Base URL cannot address the data endpoints
    #[error("invalid database url: {0}")]
    InvalidUrl(String),

    /// Handle was used after shutdown
    #[error("database client is closed")]
    Closed,

    /// In-process store lock was poisoned by a panicking writer
    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn not_found(table: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            table,
            id: id.into(),
        }
    }

    /// True when the database reported the record as absent
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Status { status, .. } => *status == 404,
            _ => false,
        }
    }
}
