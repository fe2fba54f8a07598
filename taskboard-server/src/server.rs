//! HTTP routes and request handlers.
//!
//! Routes:
//! - `GET /tasks` lists every task (an absent store lists as empty).
//! - `GET /tasks/{id}` returns one task.
//! - `PUT /tasks/{id}` merges the body onto the task and persists the
//!   collection.
//!
//! Each request does its own load/modify/save cycle against the
//! [`TaskStore`]; nothing is cached between requests.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde_json::Value;
use taskboard_proto::api::{UPDATE_SUCCESS_MESSAGE, UpdateResponse};
use taskboard_proto::task::TaskRecord;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::merge::{TaskPatch, merge_task};
use crate::store::{StoreError, TaskStore};

/// Shared state handed to every handler.
pub struct AppState<S> {
    /// Backing store for the task collection.
    pub store: S,
}

impl<S: TaskStore> AppState<S> {
    /// Wraps a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }
}

/// Builds the router for the task endpoints.
pub fn router<S: TaskStore + 'static>(state: Arc<AppState<S>>) -> axum::Router {
    axum::Router::new()
        .route("/tasks", axum::routing::get(list_tasks::<S>))
        .route(
            "/tasks/{id}",
            axum::routing::get(get_task::<S>).put(update_task::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the server on the given address and returns the bound address
/// and a join handle.
///
/// This is the entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server<S: TaskStore + 'static>(
    addr: &str,
    state: Arc<AppState<S>>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task server error");
        }
    });

    Ok((bound_addr, handle))
}

/// `GET /tasks`
async fn list_tasks<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<TaskRecord>>, ApiError> {
    match state.store.load().await {
        Ok(board) => Ok(Json(board.tasks)),
        Err(StoreError::Missing(_)) => Ok(Json(Vec::new())),
        Err(e) => Err(persistence_failure(None, e)),
    }
}

/// `GET /tasks/{id}`
async fn get_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<TaskRecord>, ApiError> {
    let board = match state.store.load().await {
        Ok(board) => board,
        Err(StoreError::Missing(_)) => return Err(ApiError::TaskNotFound),
        Err(e) => return Err(persistence_failure(Some(&id), e)),
    };
    board.find(&id).cloned().map(Json).ok_or(ApiError::TaskNotFound)
}

/// `PUT /tasks/{id}`
///
/// The store and the record are looked up before the body is examined, so
/// an unknown id is reported as not found whatever the body contains.
async fn update_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let mut board = match state.store.load().await {
        Ok(board) => board,
        Err(StoreError::Missing(_)) => {
            tracing::warn!(task_id = %id, "update requested but task store is missing");
            return Err(ApiError::NoTasks);
        }
        Err(e) => return Err(persistence_failure(Some(&id), e)),
    };

    let Some(index) = board.position(&id) else {
        tracing::warn!(task_id = %id, "update requested for unknown task");
        return Err(ApiError::TaskNotFound);
    };

    let Json(body) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let patch = TaskPatch::from_body(body)?;
    let touched = patch.touched_fields();
    let merged = merge_task(&board.tasks[index], patch).inspect_err(|e| {
        tracing::info!(task_id = %id, error = %e, "update rejected");
    })?;
    board.tasks[index] = merged.clone();

    if let Err(e) = state.store.save(&board).await {
        return Err(persistence_failure(Some(&id), e));
    }

    tracing::info!(task_id = %id, fields = ?touched, "task updated");
    Ok(Json(UpdateResponse {
        message: UPDATE_SUCCESS_MESSAGE.to_string(),
        task: merged,
    }))
}

/// Logs a store failure and wraps it for the response.
fn persistence_failure(task_id: Option<&str>, e: StoreError) -> ApiError {
    tracing::error!(task_id = task_id.unwrap_or("-"), error = %e, "task store failure");
    ApiError::Store(e)
}
