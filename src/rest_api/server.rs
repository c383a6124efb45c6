//! Axum HTTP server for the user CRUD endpoints
//!
//! Routes:
//! - GET    /health            readiness probe
//! - GET    /users             list (limit/offset query params)
//! - POST   /users             create one record
//! - POST   /users/batch       create many records concurrently
//! - GET    /users/{id}        fetch by id
//! - PUT    /users/{id}        full-record replace
//! - PATCH  /users/{id}        rename (body: {"name": ...})
//! - DELETE /users/{id}        remove

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::OpContext;
use crate::model::User;
use crate::repo::UserRepo;

use super::errors::{RestError, RestResult};
use super::response::{
    BatchResponse, CreateResponse, DeleteResponse, ListResponse, SingleResponse,
};

/// Fallback page size when the caller passes none (or a non-positive one).
const DEFAULT_LIST_LIMIT: usize = 10;

/// REST API server state
pub struct RestServer<R: UserRepo> {
    repo: Arc<R>,
    request_timeout: Duration,
}

impl<R: UserRepo + 'static> RestServer<R> {
    pub fn new(repo: R, request_timeout: Duration) -> Self {
        Self {
            repo: Arc::new(repo),
            request_timeout,
        }
    }

    /// Build the axum router
    pub fn router(self) -> Router {
        let state = Arc::new(self);

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/health", get(health_handler))
            .route("/users", get(list_handler).post(create_handler))
            .route("/users/batch", post(batch_handler))
            .route(
                "/users/{id}",
                get(get_handler)
                    .put(update_handler)
                    .patch(rename_handler)
                    .delete(delete_handler),
            )
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(state)
    }

    /// Bind and serve until the process exits.
    pub async fn serve(self, addr: SocketAddr) -> std::io::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(target: "rosterdb::rest", %addr, "listening");
        axum::serve(listener, router).await
    }

    /// Fresh per-request context carrying the server's deadline budget.
    fn op_context(&self) -> OpContext {
        OpContext::with_timeout(self.request_timeout)
    }
}

/// Shared state type
type ServerState<R> = Arc<RestServer<R>>;

/// List window query parameters
#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<i64>,
    offset: Option<i64>,
}

impl ListParams {
    /// Non-positive limits fall back to the default; negative offsets to 0.
    fn window(&self) -> (usize, usize) {
        let limit = match self.limit {
            Some(limit) if limit > 0 => limit as usize,
            _ => DEFAULT_LIST_LIMIT,
        };
        let offset = match self.offset {
            Some(offset) if offset > 0 => offset as usize,
            _ => 0,
        };
        (limit, offset)
    }
}

/// Rename request body
#[derive(Debug, Deserialize)]
struct RenameRequest {
    name: String,
}

/// Readiness handler
async fn health_handler<R: UserRepo + 'static>(
    State(server): State<ServerState<R>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let ctx = server.op_context();
    if server.repo.is_ready(&ctx).await {
        (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"status": "not_ready"})),
        )
    }
}

/// List records handler
async fn list_handler<R: UserRepo + 'static>(
    State(server): State<ServerState<R>>,
    Query(params): Query<ListParams>,
) -> RestResult<Json<ListResponse<User>>> {
    let ctx = server.op_context();
    let (limit, offset) = params.window();

    let users = server.repo.get_all(&ctx, limit, offset).await?;
    Ok(Json(ListResponse::new(users, limit, offset)))
}

/// Get single record handler
async fn get_handler<R: UserRepo + 'static>(
    State(server): State<ServerState<R>>,
    Path(id): Path<String>,
) -> RestResult<Json<SingleResponse<User>>> {
    let ctx = server.op_context();

    let user = server.repo.get_by_id(&ctx, &id).await?;
    Ok(Json(SingleResponse::new(user)))
}

/// Create record handler
async fn create_handler<R: UserRepo + 'static>(
    State(server): State<ServerState<R>>,
    Json(user): Json<User>,
) -> RestResult<(StatusCode, Json<CreateResponse>)> {
    let ctx = server.op_context();

    let id = server.repo.create(&ctx, user).await?;
    Ok((StatusCode::CREATED, Json(CreateResponse::new(id))))
}

/// Batch create handler
async fn batch_handler<R: UserRepo + 'static>(
    State(server): State<ServerState<R>>,
    Json(users): Json<Vec<User>>,
) -> RestResult<Json<BatchResponse>> {
    let ctx = server.op_context();

    let outcome = server.repo.batch_create(&ctx, users).await?;
    Ok(Json(BatchResponse::from(&outcome)))
}

/// Full update handler
async fn update_handler<R: UserRepo + 'static>(
    State(server): State<ServerState<R>>,
    Path(id): Path<String>,
    Json(mut user): Json<User>,
) -> RestResult<StatusCode> {
    let ctx = server.op_context();

    // The path is authoritative for which record is replaced.
    if user.id.is_empty() {
        user.id = id.clone();
    } else if user.id != id {
        return Err(RestError::InvalidBody(
            "body id does not match path id".to_string(),
        ));
    }

    server.repo.update(&ctx, user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Rename handler (partial field patch)
async fn rename_handler<R: UserRepo + 'static>(
    State(server): State<ServerState<R>>,
    Path(id): Path<String>,
    Json(body): Json<RenameRequest>,
) -> RestResult<StatusCode> {
    let ctx = server.op_context();

    server.repo.update_name(&ctx, &id, &body.name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete record handler
async fn delete_handler<R: UserRepo + 'static>(
    State(server): State<ServerState<R>>,
    Path(id): Path<String>,
) -> RestResult<Json<DeleteResponse>> {
    let ctx = server.op_context();

    server.repo.delete(&ctx, &id).await?;
    Ok(Json(DeleteResponse::success()))
}
