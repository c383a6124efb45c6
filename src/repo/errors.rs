//! Repository error taxonomy
//!
//! Every repository operation returns one of these; the HTTP boundary
//! maps them to status codes and never sees raw transport errors.

use thiserror::Error;

use crate::model::ValidationError;
use crate::query::QueryBuildError;
use crate::store::StoreError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Errors surfaced by record access operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The record fails a field invariant; nothing reached the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store connection or collection missing. Never retried internally.
    #[error("store not ready: {0}")]
    NotReady(String),

    /// Zero hits on a by-id lookup.
    #[error("no record matches id {0}")]
    NotFound(String),

    /// Query serialization failed; indicates a programming defect.
    #[error(transparent)]
    QueryBuild(#[from] QueryBuildError),

    /// The store failed or rejected a read.
    #[error("store read failed: {0}")]
    Read(#[source] StoreError),

    /// The store failed or rejected a write.
    #[error("store write failed: {0}")]
    Write(#[source] StoreError),

    /// The caller's deadline expired before the operation finished.
    #[error("operation cancelled before completion")]
    Cancelled,
}

impl RepoError {
    /// Classifies a store error raised on a read path.
    pub(crate) fn read(err: StoreError) -> Self {
        match err {
            StoreError::Cancelled => RepoError::Cancelled,
            StoreError::NotReady(reason) => RepoError::NotReady(reason),
            other => RepoError::Read(other),
        }
    }

    /// Classifies a store error raised on a write path.
    pub(crate) fn write(err: StoreError) -> Self {
        match err {
            StoreError::Cancelled => RepoError::Cancelled,
            StoreError::NotReady(reason) => RepoError::NotReady(reason),
            other => RepoError::Write(other),
        }
    }
}
