//! One HTTP handler per task operation. Each handler extracts and coerces
//! parameters, runs validation, invokes the store, and maps the outcome onto
//! a JSON response; failures go through [`ApiError`].

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use taskd_core::{validate, TaskFilter};
use taskd_store::StoreError;

use crate::error::ApiError;
use crate::server::AppState;

/// Service + endpoint description.
pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Task Management API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /api/tasks": "Get all tasks",
            "GET /api/tasks/:id": "Get a specific task",
            "POST /api/tasks": "Create a new task",
            "PUT /api/tasks/:id": "Update a task",
            "DELETE /api/tasks/:id": "Delete a task"
        }
    }))
}

/// Liveness + store connectivity probe.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let connected = state.store.ping().is_ok();
    let status = if connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if connected { "healthy" } else { "unhealthy" },
            "timestamp": Utc::now().to_rfc3339(),
            "database": if connected { "connected" } else { "disconnected" },
            "uptime": state.started_at.elapsed().as_secs_f64(),
        })),
    )
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    completed: Option<String>,
    search: Option<String>,
}

impl ListParams {
    /// Query values arrive as strings; for `completed` only the literal
    /// "true" means true, any other present value means false.
    fn into_filter(self) -> TaskFilter {
        TaskFilter {
            completed: self.completed.map(|v| v == "true"),
            search: self.search,
        }
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state
        .store
        .list(&params.into_filter())
        .map_err(|e| store_err(&state, e))?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validate::parse_id(&id)?;
    let task = state.store.get(id).map_err(|e| store_err(&state, e))?;
    Ok(Json(task))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = validate::validate_create(&body)?;
    let task = state
        .store
        .create(draft)
        .map_err(|e| store_err(&state, e))?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validate::parse_id(&id)?;
    let patch = validate::validate_update(&body)?;
    let task = state
        .store
        .update(id, patch)
        .map_err(|e| store_err(&state, e))?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validate::parse_id(&id)?;
    let task = state
        .store
        .delete(id)
        .map_err(|e| store_err(&state, e))?;
    Ok(Json(json!({
        "message": "Task deleted successfully",
        "task": task,
    })))
}

/// Catch-all for unmatched paths.
pub async fn route_not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "path": uri.path(),
        })),
    )
}

fn store_err(state: &AppState, err: StoreError) -> ApiError {
    ApiError::from_store(err, state.expose_errors)
}
