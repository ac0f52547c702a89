// Task CRUD HTTP routes
//
// Every handler takes `CurrentAccount` and passes its id into the
// ownership-scoped storage calls; there is no code path that reads or writes
// a task without it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::ListResponse;
use super::error::ApiError;
use crate::auth::CurrentAccount;
use crate::storage::{CreateTask, TaskPriority, TaskRow, UpdateTask};
use crate::AppState;

/// Request to create a new task
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    /// Short description of what to do.
    #[schema(example = "Read chapter 4")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    /// Free-form subject label, e.g. a course name.
    #[serde(default)]
    pub subject: String,
    pub due_date: Option<DateTime<Utc>>,
}

/// Request to update a task. Only provided fields will be updated.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub subject: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            priority: req.priority,
            subject: req.subject,
            completed: req.completed,
            due_date: req.due_date,
        }
    }
}

/// Create task routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tasks", post(create_task).get(list_tasks))
        .route(
            "/v1/tasks/:task_id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

/// POST /v1/tasks - Create a new task
#[utoipa::path(
    post,
    path = "/v1/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created successfully", body = TaskRow),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Not authenticated")
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    account: CurrentAccount,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskRow>), ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::InvalidInput("title is required"));
    }

    let task = state
        .db
        .create_owned::<TaskRow>(
            account.id,
            CreateTask {
                title: req.title,
                description: req.description,
                priority: req.priority,
                subject: req.subject,
                due_date: req.due_date,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /v1/tasks - List the account's tasks, newest first
#[utoipa::path(
    get,
    path = "/v1/tasks",
    responses(
        (status = 200, description = "List of tasks", body = ListResponse<TaskRow>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "tasks"
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    account: CurrentAccount,
) -> Result<Json<ListResponse<TaskRow>>, ApiError> {
    let tasks = state.db.list_owned::<TaskRow>(account.id).await?;
    Ok(Json(ListResponse::new(tasks)))
}

/// GET /v1/tasks/{task_id} - Get one task
#[utoipa::path(
    get,
    path = "/v1/tasks/{task_id}",
    params(("task_id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = TaskRow),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn get_task(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskRow>, ApiError> {
    let task = state
        .db
        .get_owned::<TaskRow>(account.id, task_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(task))
}

/// PUT /v1/tasks/{task_id} - Update a task
#[utoipa::path(
    put,
    path = "/v1/tasks/{task_id}",
    params(("task_id" = Uuid, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskRow),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn update_task(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<TaskRow>, ApiError> {
    let task = state
        .db
        .update_owned::<TaskRow>(account.id, task_id, req.into())
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(task))
}

/// DELETE /v1/tasks/{task_id} - Delete a task
#[utoipa::path(
    delete,
    path = "/v1/tasks/{task_id}",
    params(("task_id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(task_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.db.delete_owned::<TaskRow>(account.id, task_id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
