//! Record access: the CRUD operations over user records
//!
//! `UserRepo` is the seam between the HTTP boundary and the datastore.
//! `SearchUserRepo` is the production implementation against the search
//! store; `MemoryUserRepo` backs boundary tests.

mod errors;
mod memory;
mod search;

pub use errors::{RepoError, RepoResult};
pub use memory::MemoryUserRepo;
pub use search::SearchUserRepo;

use async_trait::async_trait;

use crate::context::OpContext;
use crate::model::User;

/// Abstracts record access so the HTTP boundary can be exercised against
/// an in-memory implementation.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Whether the datastore behind this repository can serve requests.
    /// Backs the health endpoint.
    async fn is_ready(&self, _ctx: &OpContext) -> bool {
        true
    }

    /// Validates the record, assigns a fresh id, and writes it.
    /// Returns the assigned id.
    async fn create(&self, ctx: &OpContext, user: User) -> RepoResult<String>;

    /// Creates every record concurrently, one task per record.
    ///
    /// Partial failures do not roll back; the outcome carries one result
    /// per submitted record in submission order. The call itself only
    /// fails if the initial readiness gate fails or the context is
    /// already cancelled.
    async fn batch_create(&self, ctx: &OpContext, users: Vec<User>) -> RepoResult<BatchOutcome>;

    /// Looks up a record by its id field. Zero hits is `NotFound`.
    async fn get_by_id(&self, ctx: &OpContext, id: &str) -> RepoResult<User>;

    /// Returns up to `limit` records starting at `offset`, in store order.
    async fn get_all(&self, ctx: &OpContext, limit: usize, offset: usize)
        -> RepoResult<Vec<User>>;

    /// Full-document overwrite keyed by the record's existing id.
    async fn update(&self, ctx: &OpContext, user: User) -> RepoResult<()>;

    /// Partial patch of the record's name field.
    async fn update_name(&self, ctx: &OpContext, id: &str, name: &str) -> RepoResult<()>;

    /// Removes the record; the deletion is visible to the next read.
    async fn delete(&self, ctx: &OpContext, id: &str) -> RepoResult<()>;
}

/// Per-record results of a batch create, in submission order.
#[derive(Debug)]
pub struct BatchOutcome {
    results: Vec<RepoResult<String>>,
}

impl BatchOutcome {
    pub(crate) fn new(results: Vec<RepoResult<String>>) -> Self {
        Self { results }
    }

    /// One entry per submitted record, in submission order.
    pub fn results(&self) -> &[RepoResult<String>] {
        &self.results
    }

    /// Ids of the records that were created.
    pub fn created_ids(&self) -> impl Iterator<Item = &str> {
        self.results.iter().filter_map(|r| r.as_deref().ok())
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_outcome_counts_partial_failure() {
        let outcome = BatchOutcome::new(vec![
            Ok("1".to_string()),
            Err(RepoError::Cancelled),
            Ok("3".to_string()),
        ]);
        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(outcome.failed(), 1);
        assert!(!outcome.is_complete_success());
        let ids: Vec<&str> = outcome.created_ids().collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
