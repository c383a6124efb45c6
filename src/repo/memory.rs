//! In-memory repository for exercising the HTTP boundary in tests
//!
//! Mirrors the production semantics closely enough for boundary tests:
//! same validation, same id assignment seam, same error taxonomy. Listing
//! returns records in id order so tests are deterministic where the real
//! store would return its own ordering.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::context::OpContext;
use crate::ident::{IdGen, SequenceCounter};
use crate::model::{User, ValidationError};

use super::errors::{RepoError, RepoResult};
use super::{BatchOutcome, UserRepo};

/// Map-backed `UserRepo` used in place of a live search store.
pub struct MemoryUserRepo {
    records: RwLock<HashMap<String, User>>,
    ids: Arc<dyn IdGen>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            ids: Arc::new(SequenceCounter::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, User>> {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, User>> {
        self.records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn insert_new(&self, mut user: User) -> RepoResult<String> {
        user.validate_new()?;
        user.id = self.ids.next_id();
        let id = user.id.clone();
        self.write().insert(id.clone(), user);
        Ok(id)
    }
}

impl Default for MemoryUserRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create(&self, ctx: &OpContext, user: User) -> RepoResult<String> {
        ctx.check().map_err(|_| RepoError::Cancelled)?;
        self.insert_new(user)
    }

    async fn batch_create(&self, ctx: &OpContext, users: Vec<User>) -> RepoResult<BatchOutcome> {
        ctx.check().map_err(|_| RepoError::Cancelled)?;
        let results = users
            .into_iter()
            .map(|user| self.insert_new(user))
            .collect();
        Ok(BatchOutcome::new(results))
    }

    async fn get_by_id(&self, ctx: &OpContext, id: &str) -> RepoResult<User> {
        ctx.check().map_err(|_| RepoError::Cancelled)?;
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    async fn get_all(
        &self,
        ctx: &OpContext,
        limit: usize,
        offset: usize,
    ) -> RepoResult<Vec<User>> {
        ctx.check().map_err(|_| RepoError::Cancelled)?;
        let mut users: Vec<User> = self.read().values().cloned().collect();
        users.sort_by(|a, b| {
            let a_num = a.id.parse::<u64>();
            let b_num = b.id.parse::<u64>();
            match (a_num, b_num) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.id.cmp(&b.id),
            }
        });
        Ok(users.into_iter().skip(offset).take(limit).collect())
    }

    async fn update(&self, ctx: &OpContext, user: User) -> RepoResult<()> {
        ctx.check().map_err(|_| RepoError::Cancelled)?;
        user.validate_update()?;
        // Upsert semantics, matching a full-document index write.
        self.write().insert(user.id.clone(), user);
        Ok(())
    }

    async fn update_name(&self, ctx: &OpContext, id: &str, name: &str) -> RepoResult<()> {
        ctx.check().map_err(|_| RepoError::Cancelled)?;
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let mut records = self.write();
        match records.get_mut(id) {
            Some(user) => {
                user.name = name.to_string();
                Ok(())
            }
            None => Err(RepoError::NotFound(id.to_string())),
        }
    }

    async fn delete(&self, ctx: &OpContext, id: &str) -> RepoResult<()> {
        ctx.check().map_err(|_| RepoError::Cancelled)?;
        // Delete of an absent record is success, matching the gateway.
        self.write().remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::*;

    fn sample_user() -> User {
        let now = Utc::now().timestamp();
        User {
            id: String::new(),
            name: "metchee".to_string(),
            dob: now - 60,
            address: "Kent Ridge".to_string(),
            description: "default user info".to_string(),
            ctime: now - 1,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trip() {
        let repo = MemoryUserRepo::new();
        let ctx = OpContext::background();

        let id = repo.create(&ctx, sample_user()).await.expect("create");
        assert!(!id.is_empty());

        let fetched = repo.get_by_id(&ctx, &id).await.expect("get");
        assert_eq!(fetched.name, "metchee");
        assert_eq!(fetched.address, "Kent Ridge");
        assert_eq!(fetched.description, "default user info");
        assert_eq!(fetched.id, id);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let repo = MemoryUserRepo::new();
        let ctx = OpContext::background();

        let err = repo
            .get_by_id(&ctx, "nonexistent-id")
            .await
            .expect_err("should not find");
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let repo = MemoryUserRepo::new();
        let ctx = OpContext::background();

        let id = repo.create(&ctx, sample_user()).await.expect("create");
        repo.delete(&ctx, &id).await.expect("delete");

        let err = repo.get_by_id(&ctx, &id).await.expect_err("deleted");
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_changes_description_keeps_name() {
        let repo = MemoryUserRepo::new();
        let ctx = OpContext::background();

        let id = repo.create(&ctx, sample_user()).await.expect("create");
        let mut updated = repo.get_by_id(&ctx, &id).await.expect("get");
        updated.description = "edited".to_string();
        repo.update(&ctx, updated).await.expect("update");

        let fetched = repo.get_by_id(&ctx, &id).await.expect("get again");
        assert_eq!(fetched.description, "edited");
        assert_eq!(fetched.name, "metchee");
    }

    #[tokio::test]
    async fn update_name_patches_single_field() {
        let repo = MemoryUserRepo::new();
        let ctx = OpContext::background();

        let id = repo.create(&ctx, sample_user()).await.expect("create");
        repo.update_name(&ctx, &id, "renamed").await.expect("patch");

        let fetched = repo.get_by_id(&ctx, &id).await.expect("get");
        assert_eq!(fetched.name, "renamed");
        assert_eq!(fetched.description, "default user info");
    }

    #[tokio::test]
    async fn batch_create_reports_per_record_results() {
        let repo = MemoryUserRepo::new();
        let ctx = OpContext::background();

        let mut invalid = sample_user();
        invalid.name.clear();

        let outcome = repo
            .batch_create(&ctx, vec![sample_user(), invalid, sample_user()])
            .await
            .expect("batch");
        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(outcome.failed(), 1);
        assert!(matches!(
            outcome.results()[1],
            Err(RepoError::Validation(ValidationError::EmptyName))
        ));

        let all = repo.get_all(&ctx, 10, 0).await.expect("list");
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn get_all_honors_limit_and_offset() {
        let repo = MemoryUserRepo::new();
        let ctx = OpContext::background();

        for _ in 0..5 {
            repo.create(&ctx, sample_user()).await.expect("create");
        }

        let page = repo.get_all(&ctx, 2, 0).await.expect("list");
        assert_eq!(page.len(), 2);

        let rest = repo.get_all(&ctx, 10, 3).await.expect("list offset");
        assert_eq!(rest.len(), 2);

        let empty = repo.get_all(&ctx, 10, 100).await.expect("list past end");
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn expired_context_cancels_before_touching_state() {
        let repo = MemoryUserRepo::new();
        let ctx = OpContext::with_timeout(Duration::ZERO);

        let err = repo
            .create(&ctx, sample_user())
            .await
            .expect_err("cancelled");
        assert!(matches!(err, RepoError::Cancelled));
        assert!(repo.is_empty());
    }
}
