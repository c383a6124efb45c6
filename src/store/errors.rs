//! Store gateway error types

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the store gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Session missing or target collection absent on the remote side.
    #[error("store not ready: {0}")]
    NotReady(String),

    /// The request never completed (connection refused, DNS, broken pipe).
    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store rejected request with status {status}")]
    Rejected { status: u16 },

    /// The store's response body did not match the expected shape.
    #[error("failed to decode store response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The caller's deadline expired mid-call.
    #[error("store call cancelled by deadline")]
    Cancelled,
}
