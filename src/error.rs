//! Error types shared by the list components.
//!
//! Operations that reference a record no longer present in a list are never
//! errors; they are silent no-ops so that late store notifications cannot
//! break the list.

use thiserror::Error;

/// Failures reported by a [`StoreClient`](crate::store::StoreClient).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested document does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The store refused or failed the operation.
    #[error("store rejected the operation: {0}")]
    Rejected(String),

    /// A stored document could not be decoded.
    #[error("store document could not be decoded: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised to callers of list operations.
#[derive(Debug, Error)]
pub enum ListError {
    /// The list mode is unset or not one of `history`, `saved`, `project`.
    #[error("invalid list mode {0:?}: expected one of history, saved, project")]
    InvalidMode(String),

    /// A store call failed. The failure was reported to telemetry first.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The operation was called in a state where it cannot run.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),
}

/// Result alias for list operations.
pub type Result<T> = std::result::Result<T, ListError>;
