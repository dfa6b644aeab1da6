//! HTTP server implementation.
//!
//! This module provides the axum-based server that serves the client
//! page and exposes the JSON REST endpoints for tasks, users, and tags.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::templates;
use crate::db::Database;
use crate::error::ApiError;
use crate::types::{CreateTaskInput, UpdateTaskInput};

/// Server state shared across handlers.
#[derive(Clone)]
pub struct AppServer {
    /// Reference to the task database.
    db: Arc<Database>,
}

impl AppServer {
    /// Create a new server instance.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get the database reference.
    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Root endpoint - serves the client page.
async fn root() -> Html<&'static str> {
    Html(templates::INDEX_TEMPLATE)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /tasks` - the full task list.
async fn list_tasks(State(state): State<AppServer>) -> Response {
    match state.db().list_tasks() {
        Ok(tasks) => Json(tasks).into_response(),
        Err(e) => {
            error!(operation = "list_tasks", error = %e, "Failed to list tasks");
            ApiError::from(e).into_response()
        }
    }
}

/// `POST /tasks` - create a task.
async fn create_task(
    State(state): State<AppServer>,
    Json(input): Json<CreateTaskInput>,
) -> Response {
    match state.db().create_task(input) {
        Ok(task) => (StatusCode::CREATED, Json(task)).into_response(),
        Err(e) => {
            error!(operation = "create_task", error = %e, "Failed to create task");
            ApiError::from(e).into_response()
        }
    }
}

/// `GET /tasks/{id}` - a single task.
async fn get_task(State(state): State<AppServer>, Path(task_id): Path<String>) -> Response {
    match state.db().get_task(&task_id) {
        Ok(Some(task)) => Json(task).into_response(),
        Ok(None) => ApiError::task_not_found(&task_id).into_response(),
        Err(e) => {
            error!(operation = "get_task", task_id = %task_id, error = %e, "Failed to get task");
            ApiError::from(e).into_response()
        }
    }
}

/// `PATCH /tasks/{id}` - partial update.
async fn update_task(
    State(state): State<AppServer>,
    Path(task_id): Path<String>,
    Json(input): Json<UpdateTaskInput>,
) -> Response {
    match state.db().update_task(&task_id, input) {
        Ok(task) => Json(task).into_response(),
        Err(e) => {
            error!(operation = "update_task", task_id = %task_id, error = %e, "Failed to update task");
            ApiError::from(e).into_response()
        }
    }
}

/// `DELETE /tasks/{id}` - delete a task.
async fn delete_task(State(state): State<AppServer>, Path(task_id): Path<String>) -> Response {
    match state.db().delete_task(&task_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!(operation = "delete_task", task_id = %task_id, error = %e, "Failed to delete task");
            ApiError::from(e).into_response()
        }
    }
}

/// `GET /users` - all users (password hashes are never serialized).
async fn list_users(State(state): State<AppServer>) -> Response {
    match state.db().list_users() {
        Ok(users) => Json(users).into_response(),
        Err(e) => {
            error!(operation = "list_users", error = %e, "Failed to list users");
            ApiError::from(e).into_response()
        }
    }
}

/// `GET /tags` - all tags.
async fn list_tags(State(state): State<AppServer>) -> Response {
    match state.db().list_tags() {
        Ok(tags) => Json(tags).into_response(),
        Err(e) => {
            error!(operation = "list_tags", error = %e, "Failed to list tags");
            ApiError::from(e).into_response()
        }
    }
}

/// Build the router with all routes.
pub fn build_router(state: AppServer) -> Router {
    // Configure CORS for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Client page
        .route("/", get(root))
        // Task resource
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{task_id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        // Read-only pickers for the client form
        .route("/users", get(list_users))
        .route("/tags", get(list_tags))
        // API routes
        .route("/api/health", get(health))
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until a shutdown signal arrives.
pub async fn serve(db: Arc<Database>, bind: &str, port: u16) -> anyhow::Result<()> {
    let state = AppServer::new(db);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("Taskboard listening on http://{}", bound_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
