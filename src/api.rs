//! REST server over the local ledger.

use crate::error::ServiceError;
use crate::ledger::{InitialStatus, Ledger, StatusPolicy};
use crate::models::*;
use crate::store::StoreError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

// ── Shared state ───────────────────────────────────────────────

pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub policy: StatusPolicy,
}

pub type SharedState = Arc<AppState>;

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Conflict(String),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Store(e) => e.into(),
            e @ (ServiceError::IllegalTransition { .. } | ServiceError::Rejected { .. }) => {
                ApiError::Conflict(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ── Router ─────────────────────────────────────────────────────

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/employees", get(list_employees))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id", put(update_task).delete(delete_task))
        .route("/tasks/:id/status", patch(set_task_status))
        .route("/leaves", get(list_leaves).post(apply_leave))
        .route("/leaves/:id/status", patch(set_leave_status))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

// ── Handlers ───────────────────────────────────────────────────

// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

// GET /employees
async fn list_employees(State(state): State<SharedState>) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(state.ledger.employees()?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskQuery {
    user_id: Option<String>,
}

// GET /tasks?userId=
async fn list_tasks(
    State(state): State<SharedState>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.ledger.tasks(query.user_id.as_deref())?))
}

// POST /tasks
async fn create_task(
    State(state): State<SharedState>,
    Json(draft): Json<TaskDraft>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state.ledger.create_task(draft, InitialStatus::FromDraft)?;
    tracing::info!(task_id = task.id, assignee = %task.assigned_to_id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

// PUT /tasks/:id
async fn update_task(
    State(state): State<SharedState>,
    Path(id): Path<TaskId>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Json<Task>> {
    state
        .ledger
        .merge_task(id, patch)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

// PATCH /tasks/:id/status
async fn set_task_status(
    State(state): State<SharedState>,
    Path(id): Path<TaskId>,
    Json(body): Json<StatusBody<TaskStatus>>,
) -> ApiResult<Json<Task>> {
    state
        .ledger
        .set_task_status(id, body.status, state.policy)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

// DELETE /tasks/:id
async fn delete_task(State(state): State<SharedState>, Path(id): Path<TaskId>) -> ApiResult<StatusCode> {
    state.ledger.delete_task(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaveQuery {
    employee_id: Option<String>,
}

// GET /leaves?employeeId=
async fn list_leaves(
    State(state): State<SharedState>,
    Query(query): Query<LeaveQuery>,
) -> ApiResult<Json<Vec<Leave>>> {
    Ok(Json(state.ledger.leaves(query.employee_id.as_deref())?))
}

// POST /leaves
async fn apply_leave(
    State(state): State<SharedState>,
    Json(draft): Json<LeaveDraft>,
) -> ApiResult<(StatusCode, Json<Leave>)> {
    let leave = state.ledger.apply_leave(draft)?;
    Ok((StatusCode::CREATED, Json(leave)))
}

// PATCH /leaves/:id/status
async fn set_leave_status(
    State(state): State<SharedState>,
    Path(id): Path<LeaveId>,
    Json(body): Json<StatusBody<LeaveStatus>>,
) -> ApiResult<Json<Leave>> {
    state
        .ledger
        .set_leave_status(id, body.status)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

// ── Tests ──────────────────────────────────────────────────────
