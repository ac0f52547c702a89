// Subject CRUD HTTP routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::ListResponse;
use super::error::ApiError;
use crate::auth::CurrentAccount;
use crate::storage::{CreateSubject, SubjectRow, UpdateSubject};
use crate::AppState;

/// Request to create a new subject
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSubjectRequest {
    #[schema(example = "Linear Algebra")]
    pub name: String,
    /// Who teaches the course.
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub credits: i32,
}

/// Request to update a subject. Only provided fields will be updated.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub teacher: Option<String>,
    pub credits: Option<i32>,
}

impl From<UpdateSubjectRequest> for UpdateSubject {
    fn from(req: UpdateSubjectRequest) -> Self {
        Self {
            name: req.name,
            teacher: req.teacher,
            credits: req.credits,
        }
    }
}

/// Create subject routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/subjects", post(create_subject).get(list_subjects))
        .route(
            "/v1/subjects/:subject_id",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
}

/// POST /v1/subjects - Create a new subject
#[utoipa::path(
    post,
    path = "/v1/subjects",
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, description = "Subject created successfully", body = SubjectRow),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Not authenticated")
    ),
    tag = "subjects"
)]
pub async fn create_subject(
    State(state): State<AppState>,
    account: CurrentAccount,
    Json(req): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<SubjectRow>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::InvalidInput("name is required"));
    }

    let subject = state
        .db
        .create_owned::<SubjectRow>(
            account.id,
            CreateSubject {
                name: req.name,
                teacher: req.teacher,
                credits: req.credits,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(subject)))
}

/// GET /v1/subjects - List the account's subjects, newest first
#[utoipa::path(
    get,
    path = "/v1/subjects",
    responses(
        (status = 200, description = "List of subjects", body = ListResponse<SubjectRow>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "subjects"
)]
pub async fn list_subjects(
    State(state): State<AppState>,
    account: CurrentAccount,
) -> Result<Json<ListResponse<SubjectRow>>, ApiError> {
    let subjects = state.db.list_owned::<SubjectRow>(account.id).await?;
    Ok(Json(ListResponse::new(subjects)))
}

/// GET /v1/subjects/{subject_id} - Get one subject
#[utoipa::path(
    get,
    path = "/v1/subjects/{subject_id}",
    params(("subject_id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject found", body = SubjectRow),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Subject not found")
    ),
    tag = "subjects"
)]
pub async fn get_subject(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(subject_id): Path<Uuid>,
) -> Result<Json<SubjectRow>, ApiError> {
    let subject = state
        .db
        .get_owned::<SubjectRow>(account.id, subject_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(subject))
}

/// PUT /v1/subjects/{subject_id} - Update a subject
#[utoipa::path(
    put,
    path = "/v1/subjects/{subject_id}",
    params(("subject_id" = Uuid, Path, description = "Subject ID")),
    request_body = UpdateSubjectRequest,
    responses(
        (status = 200, description = "Subject updated", body = SubjectRow),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Subject not found")
    ),
    tag = "subjects"
)]
pub async fn update_subject(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(subject_id): Path<Uuid>,
    Json(req): Json<UpdateSubjectRequest>,
) -> Result<Json<SubjectRow>, ApiError> {
    let subject = state
        .db
        .update_owned::<SubjectRow>(account.id, subject_id, req.into())
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(subject))
}

/// DELETE /v1/subjects/{subject_id} - Delete a subject
#[utoipa::path(
    delete,
    path = "/v1/subjects/{subject_id}",
    params(("subject_id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 204, description = "Subject deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Subject not found")
    ),
    tag = "subjects"
)]
pub async fn delete_subject(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(subject_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .db
        .delete_owned::<SubjectRow>(account.id, subject_id)
        .await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
