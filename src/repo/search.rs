//! Record access against the search store
//!
//! Each operation follows the same gated sequence: readiness probe first,
//! then query/write, then typed decode. Nothing is retried here; a
//! `NotReady` store aborts the operation and the caller decides whether
//! to retry with backoff.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::task::JoinSet;

use crate::context::OpContext;
use crate::ident::IdGen;
use crate::model::{User, ValidationError};
use crate::query::{Query, SearchBody};
use crate::store::StoreGateway;

use super::errors::{RepoError, RepoResult};
use super::{BatchOutcome, UserRepo};

/// Field queried for by-id lookups. The same value is the document key.
const ID_FIELD: &str = "id";

/// Production repository over the search-store gateway.
///
/// Cheap to clone: batch tasks each take a clone sharing the gateway
/// session and the id generator.
#[derive(Clone)]
pub struct SearchUserRepo {
    gateway: Arc<StoreGateway>,
    ids: Arc<dyn IdGen>,
}

impl SearchUserRepo {
    pub fn new(gateway: Arc<StoreGateway>, ids: Arc<dyn IdGen>) -> Self {
        Self { gateway, ids }
    }

    /// Readiness gate shared by every operation.
    async fn gate(&self, ctx: &OpContext) -> RepoResult<()> {
        self.gateway
            .ensure_ready(ctx)
            .await
            .map_err(RepoError::write)
    }

    /// Assigns a fresh id and writes the document under it.
    ///
    /// The caller has already validated the record and passed the gate.
    async fn mint_and_put(&self, ctx: &OpContext, mut user: User) -> RepoResult<String> {
        user.id = self.ids.next_id();
        self.gateway
            .put_doc(ctx, &user.id, &user)
            .await
            .map_err(RepoError::write)?;
        tracing::debug!(
            target: "rosterdb::repo",
            request_id = %ctx.request_id(),
            user_id = %user.id,
            "indexed new user record"
        );
        Ok(user.id)
    }
}

#[async_trait]
impl UserRepo for SearchUserRepo {
    async fn is_ready(&self, ctx: &OpContext) -> bool {
        self.gateway.is_ready(ctx).await
    }

    async fn create(&self, ctx: &OpContext, user: User) -> RepoResult<String> {
        user.validate_new()?;
        self.gate(ctx).await?;
        self.mint_and_put(ctx, user).await
    }

    async fn batch_create(&self, ctx: &OpContext, users: Vec<User>) -> RepoResult<BatchOutcome> {
        ctx.check().map_err(|_| RepoError::Cancelled)?;
        self.gate(ctx).await?;

        let total = users.len();
        let mut tasks = JoinSet::new();
        for (index, user) in users.into_iter().enumerate() {
            let repo = self.clone();
            let task_ctx = ctx.clone();
            tasks.spawn(async move {
                let result = async {
                    user.validate_new()?;
                    repo.mint_and_put(&task_ctx, user).await
                }
                .await;
                if let Err(err) = &result {
                    tracing::warn!(
                        target: "rosterdb::repo",
                        request_id = %task_ctx.request_id(),
                        index,
                        error = %err,
                        "batch create entry failed"
                    );
                }
                (index, result)
            });
        }

        // Entries never joined (deadline hit, task panicked) stay Cancelled.
        let mut results: Vec<RepoResult<String>> =
            (0..total).map(|_| Err(RepoError::Cancelled)).collect();
        loop {
            let joined = match ctx.remaining() {
                Some(budget) => match tokio::time::timeout(budget, tasks.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        tracing::warn!(
                            target: "rosterdb::repo",
                            request_id = %ctx.request_id(),
                            pending = tasks.len(),
                            "batch create deadline hit, abandoning unfinished tasks"
                        );
                        break;
                    }
                },
                None => tasks.join_next().await,
            };
            match joined {
                Some(Ok((index, result))) => results[index] = result,
                Some(Err(join_err)) => {
                    tracing::error!(
                        target: "rosterdb::repo",
                        request_id = %ctx.request_id(),
                        error = %join_err,
                        "batch create task aborted"
                    );
                }
                None => break,
            }
        }

        Ok(BatchOutcome::new(results))
    }

    async fn get_by_id(&self, ctx: &OpContext, id: &str) -> RepoResult<User> {
        self.gate(ctx).await?;
        let query = Query::term(ID_FIELD, id)?;
        let body = SearchBody::new(query, 0, 1).to_value();
        let response = self
            .gateway
            .search(ctx, &body)
            .await
            .map_err(RepoError::read)?;
        // First match wins; the id field is unique by construction.
        response
            .decode_each::<User>()
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    async fn get_all(
        &self,
        ctx: &OpContext,
        limit: usize,
        offset: usize,
    ) -> RepoResult<Vec<User>> {
        self.gate(ctx).await?;
        let query = Query::bool_must([Query::exists(ID_FIELD)]);
        let body = SearchBody::new(query, offset, limit).to_value();
        let response = self
            .gateway
            .search(ctx, &body)
            .await
            .map_err(RepoError::read)?;
        Ok(response.decode_each())
    }

    async fn update(&self, ctx: &OpContext, user: User) -> RepoResult<()> {
        user.validate_update()?;
        self.gate(ctx).await?;
        self.gateway
            .put_doc(ctx, &user.id, &user)
            .await
            .map_err(RepoError::write)
    }

    async fn update_name(&self, ctx: &OpContext, id: &str, name: &str) -> RepoResult<()> {
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        self.gate(ctx).await?;
        self.gateway
            .patch_doc(ctx, id, &json!({ "name": name }))
            .await
            .map_err(|err| match err {
                crate::store::StoreError::Rejected { status: 404 } => {
                    RepoError::NotFound(id.to_string())
                }
                other => RepoError::write(other),
            })
    }

    async fn delete(&self, ctx: &OpContext, id: &str) -> RepoResult<()> {
        self.gate(ctx).await?;
        self.gateway
            .delete_doc(ctx, id)
            .await
            .map_err(RepoError::write)
    }
}
