// Assignment CRUD HTTP routes

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
use crate::storage::{AssignmentRow, AssignmentStatus, CreateAssignment, UpdateAssignment};
use crate::AppState;

/// Request to create a new assignment
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAssignmentRequest {
    #[schema(example = "Essay on the French Revolution")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Course the assignment belongs to.
    #[schema(example = "History")]
    pub subject: String,
    #[serde(default)]
    pub status: AssignmentStatus,
    pub due_date: Option<DateTime<Utc>>,
}

/// Request to update an assignment. Only provided fields will be updated.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub status: Option<AssignmentStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

impl From<UpdateAssignmentRequest> for UpdateAssignment {
    fn from(req: UpdateAssignmentRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            subject: req.subject,
            status: req.status,
            due_date: req.due_date,
        }
    }
}

/// Create assignment routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/assignments", post(create_assignment).get(list_assignments))
        .route(
            "/v1/assignments/:assignment_id",
            get(get_assignment)
                .put(update_assignment)
                .delete(delete_assignment),
        )
}

/// POST /v1/assignments - Create a new assignment
#[utoipa::path(
    post,
    path = "/v1/assignments",
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Assignment created successfully", body = AssignmentRow),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Not authenticated")
    ),
    tag = "assignments"
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    account: CurrentAccount,
    Json(req): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<AssignmentRow>), ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::InvalidInput("title is required"));
    }
    if req.subject.trim().is_empty() {
        return Err(ApiError::InvalidInput("subject is required"));
    }

    let assignment = state
        .db
        .create_owned::<AssignmentRow>(
            account.id,
            CreateAssignment {
                title: req.title,
                description: req.description,
                subject: req.subject,
                status: req.status,
                due_date: req.due_date,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// GET /v1/assignments - List the account's assignments, newest first
#[utoipa::path(
    get,
    path = "/v1/assignments",
    responses(
        (status = 200, description = "List of assignments", body = ListResponse<AssignmentRow>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "assignments"
)]
pub async fn list_assignments(
    State(state): State<AppState>,
    account: CurrentAccount,
) -> Result<Json<ListResponse<AssignmentRow>>, ApiError> {
    let assignments = state.db.list_owned::<AssignmentRow>(account.id).await?;
    Ok(Json(ListResponse::new(assignments)))
}

/// GET /v1/assignments/{assignment_id} - Get one assignment
#[utoipa::path(
    get,
    path = "/v1/assignments/{assignment_id}",
    params(("assignment_id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment found", body = AssignmentRow),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "assignments"
)]
pub async fn get_assignment(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(assignment_id): Path<Uuid>,
) -> Result<Json<AssignmentRow>, ApiError> {
    let assignment = state
        .db
        .get_owned::<AssignmentRow>(account.id, assignment_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(assignment))
}

/// PUT /v1/assignments/{assignment_id} - Update an assignment
#[utoipa::path(
    put,
    path = "/v1/assignments/{assignment_id}",
    params(("assignment_id" = Uuid, Path, description = "Assignment ID")),
    request_body = UpdateAssignmentRequest,
    responses(
        (status = 200, description = "Assignment updated", body = AssignmentRow),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "assignments"
)]
pub async fn update_assignment(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(assignment_id): Path<Uuid>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> Result<Json<AssignmentRow>, ApiError> {
    let assignment = state
        .db
        .update_owned::<AssignmentRow>(account.id, assignment_id, req.into())
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(assignment))
}

/// DELETE /v1/assignments/{assignment_id} - Delete an assignment
#[utoipa::path(
    delete,
    path = "/v1/assignments/{assignment_id}",
    params(("assignment_id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 204, description = "Assignment deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Assignment not found")
    ),
    tag = "assignments"
)]
pub async fn delete_assignment(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(assignment_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .db
        .delete_owned::<AssignmentRow>(account.id, assignment_id)
        .await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
