// Note CRUD HTTP routes

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
use crate::storage::{CreateNote, NoteRow, UpdateNote};
use crate::AppState;

/// Request to create a new note
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    #[schema(example = "Lecture 12 summary")]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Request to update a note. Only provided fields will be updated.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<UpdateNoteRequest> for UpdateNote {
    fn from(req: UpdateNoteRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
        }
    }
}

/// Create note routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/notes", post(create_note).get(list_notes))
        .route(
            "/v1/notes/:note_id",
            get(get_note).put(update_note).delete(delete_note),
        )
}

/// POST /v1/notes - Create a new note
#[utoipa::path(
    post,
    path = "/v1/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteRow),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Not authenticated")
    ),
    tag = "notes"
)]
pub async fn create_note(
    State(state): State<AppState>,
    account: CurrentAccount,
    Json(req): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<NoteRow>), ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::InvalidInput("title is required"));
    }

    let note = state
        .db
        .create_owned::<NoteRow>(
            account.id,
            CreateNote {
                title: req.title,
                content: req.content,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /v1/notes - List the account's notes, newest first
#[utoipa::path(
    get,
    path = "/v1/notes",
    responses(
        (status = 200, description = "List of notes", body = ListResponse<NoteRow>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "notes"
)]
pub async fn list_notes(
    State(state): State<AppState>,
    account: CurrentAccount,
) -> Result<Json<ListResponse<NoteRow>>, ApiError> {
    let notes = state.db.list_owned::<NoteRow>(account.id).await?;
    Ok(Json(ListResponse::new(notes)))
}

/// GET /v1/notes/{note_id} - Get one note
#[utoipa::path(
    get,
    path = "/v1/notes/{note_id}",
    params(("note_id" = Uuid, Path, description = "Note ID")),
    responses(
        (status = 200, description = "Note found", body = NoteRow),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Note not found")
    ),
    tag = "notes"
)]
pub async fn get_note(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(note_id): Path<Uuid>,
) -> Result<Json<NoteRow>, ApiError> {
    let note = state
        .db
        .get_owned::<NoteRow>(account.id, note_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(note))
}

/// PUT /v1/notes/{note_id} - Update a note
#[utoipa::path(
    put,
    path = "/v1/notes/{note_id}",
    params(("note_id" = Uuid, Path, description = "Note ID")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated", body = NoteRow),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Note not found")
    ),
    tag = "notes"
)]
pub async fn update_note(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(note_id): Path<Uuid>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<Json<NoteRow>, ApiError> {
    let note = state
        .db
        .update_owned::<NoteRow>(account.id, note_id, req.into())
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(note))
}

/// DELETE /v1/notes/{note_id} - Delete a note
#[utoipa::path(
    delete,
    path = "/v1/notes/{note_id}",
    params(("note_id" = Uuid, Path, description = "Note ID")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Note not found")
    ),
    tag = "notes"
)]
pub async fn delete_note(
    State(state): State<AppState>,
    account: CurrentAccount,
    Path(note_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state.db.delete_owned::<NoteRow>(account.id, note_id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
