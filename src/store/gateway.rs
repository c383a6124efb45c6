//! HTTP gateway to the document-search store
//!
//! One gateway instance owns the client session for the process; it is
//! shared behind an `Arc` and safe for concurrent use. Every public
//! operation is deadline-aware: the remaining budget from the caller's
//! `OpContext` bounds the HTTP round trip, and expiry maps to
//! `StoreError::Cancelled`.

use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};

use crate::context::OpContext;

use super::errors::{StoreError, StoreResult};
use super::response::SearchResponse;

/// Gateway to one collection of one search store.
#[derive(Debug)]
pub struct StoreGateway {
    http: reqwest::Client,
    endpoint: String,
    collection: String,
}

impl StoreGateway {
    /// Builds a gateway without probing the store.
    ///
    /// Every operation still passes the readiness gate, so an unreachable
    /// store surfaces as `NotReady` at call time rather than at
    /// construction.
    pub fn open(endpoint: &str, collection: &str) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
        })
    }

    /// Establishes a session and fails fast if the store is unreachable.
    ///
    /// Connection success does not imply the collection exists; that is
    /// re-checked by `ensure_ready` before every operation.
    pub async fn connect(endpoint: &str, collection: &str) -> StoreResult<Self> {
        let gateway = Self::open(endpoint, collection)?;
        gateway.ping(&OpContext::background()).await?;
        tracing::info!(
            target: "rosterdb::store",
            endpoint = %gateway.endpoint,
            collection = %gateway.collection,
            "connected to search store"
        );
        Ok(gateway)
    }

    /// Liveness probe against the store root.
    pub async fn ping(&self, ctx: &OpContext) -> StoreResult<()> {
        let response = self.run(ctx, self.http.get(&self.endpoint)).await?;
        accept(response).await?;
        Ok(())
    }

    /// Readiness gate: session alive and target collection present.
    ///
    /// Called before every read and write; the extra round trip per
    /// operation is the accepted price for fail-fast behavior. Failures
    /// are logged here and surfaced as `NotReady`, never retried.
    pub async fn ensure_ready(&self, ctx: &OpContext) -> StoreResult<()> {
        let result = self
            .run(ctx, self.http.head(self.collection_url()))
            .await;
        let response = match result {
            Ok(response) => response,
            Err(StoreError::Cancelled) => return Err(StoreError::Cancelled),
            Err(err) => {
                tracing::warn!(
                    target: "rosterdb::store",
                    request_id = %ctx.request_id(),
                    error = %err,
                    "store readiness probe failed"
                );
                return Err(StoreError::NotReady(err.to_string()));
            }
        };
        if response.status().is_success() {
            Ok(())
        } else {
            tracing::warn!(
                target: "rosterdb::store",
                request_id = %ctx.request_id(),
                collection = %self.collection,
                status = response.status().as_u16(),
                "collection missing on remote side"
            );
            Err(StoreError::NotReady(format!(
                "collection {} does not exist",
                self.collection
            )))
        }
    }

    /// Convenience readiness check that swallows the failure reason.
    pub async fn is_ready(&self, ctx: &OpContext) -> bool {
        self.ensure_ready(ctx).await.is_ok()
    }

    /// Executes a search request and decodes the response envelope.
    pub async fn search(&self, ctx: &OpContext, body: &Value) -> StoreResult<SearchResponse> {
        let url = format!("{}/_search", self.collection_url());
        let response = self.run(ctx, self.http.post(url).json(body)).await?;
        let response = accept(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(StoreError::Decode)
    }

    /// Writes a full document under the given key, visible to the next
    /// read (refresh directive). Overwrites any existing document.
    pub async fn put_doc<T: Serialize>(
        &self,
        ctx: &OpContext,
        id: &str,
        doc: &T,
    ) -> StoreResult<()> {
        let url = format!("{}/_doc/{}?refresh=true", self.collection_url(), id);
        let response = self.run(ctx, self.http.put(url).json(doc)).await?;
        accept(response).await?;
        Ok(())
    }

    /// Applies a partial-document patch to an existing document.
    pub async fn patch_doc(&self, ctx: &OpContext, id: &str, patch: &Value) -> StoreResult<()> {
        let url = format!("{}/_update/{}?refresh=true", self.collection_url(), id);
        let body = json!({ "doc": patch });
        let response = self.run(ctx, self.http.post(url).json(&body)).await?;
        accept(response).await?;
        Ok(())
    }

    /// Deletes a document with an immediate-refresh directive so the
    /// deletion is visible to the next read. Deleting a document that
    /// does not exist is treated as success.
    pub async fn delete_doc(&self, ctx: &OpContext, id: &str) -> StoreResult<()> {
        let url = format!("{}/_doc/{}?refresh=true", self.collection_url(), id);
        let response = self.run(ctx, self.http.delete(url)).await?;
        if response.status().as_u16() == 404 {
            tracing::debug!(
                target: "rosterdb::store",
                request_id = %ctx.request_id(),
                doc_id = %id,
                "delete of absent document"
            );
            return Ok(());
        }
        accept(response).await?;
        Ok(())
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.endpoint, self.collection)
    }

    /// Sends a request within the context's remaining deadline budget.
    async fn run(
        &self,
        ctx: &OpContext,
        request: reqwest::RequestBuilder,
    ) -> StoreResult<reqwest::Response> {
        ctx.check().map_err(|_| StoreError::Cancelled)?;
        let send = request.send();
        let response = match ctx.remaining() {
            Some(budget) => tokio::time::timeout(budget, send)
                .await
                .map_err(|_| StoreError::Cancelled)??,
            None => send.await?,
        };
        Ok(response)
    }
}

/// Classifies a response, logging the store's error body on rejection.
/// The body is never propagated past this point.
async fn accept(response: reqwest::Response) -> StoreResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::error!(
        target: "rosterdb::store",
        status = status.as_u16(),
        body = %body,
        "store rejected request"
    );
    Err(StoreError::Rejected {
        status: status.as_u16(),
    })
}
