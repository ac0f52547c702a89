// Studyhub server library
// Decision: Shared library for the server binary and the integration tests

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    middleware,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Authentication module
pub mod auth;

// Storage layer
pub mod storage;

use api::ListResponse;
use auth::AuthState;
use storage::{
    AssignmentRow, AssignmentStatus, NoteRow, StorageBackend, SubjectRow, TaskPriority, TaskRow,
};

/// App state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<StorageBackend>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(db: Arc<StorageBackend>, config: auth::AuthConfig) -> Self {
        Self {
            db,
            auth: AuthState::new(config),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: if state.db.is_dev_mode() {
            "in-memory"
        } else {
            "postgres"
        },
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::signup,
        auth::routes::login,
        auth::routes::logout,
        auth::routes::me,
        api::tasks::create_task,
        api::tasks::list_tasks,
        api::tasks::get_task,
        api::tasks::update_task,
        api::tasks::delete_task,
        api::assignments::create_assignment,
        api::assignments::list_assignments,
        api::assignments::get_assignment,
        api::assignments::update_assignment,
        api::assignments::delete_assignment,
        api::subjects::create_subject,
        api::subjects::list_subjects,
        api::subjects::get_subject,
        api::subjects::update_subject,
        api::subjects::delete_subject,
        api::notes::create_note,
        api::notes::list_notes,
        api::notes::get_note,
        api::notes::update_note,
        api::notes::delete_note,
    ),
    components(
        schemas(
            auth::routes::LoginRequest,
            auth::routes::SignupRequest,
            auth::routes::SessionResponse,
            auth::routes::AccountInfo,
            TaskRow, TaskPriority,
            AssignmentRow, AssignmentStatus,
            SubjectRow,
            NoteRow,
            api::tasks::CreateTaskRequest, api::tasks::UpdateTaskRequest,
            api::assignments::CreateAssignmentRequest, api::assignments::UpdateAssignmentRequest,
            api::subjects::CreateSubjectRequest, api::subjects::UpdateSubjectRequest,
            api::notes::CreateNoteRequest, api::notes::UpdateNoteRequest,
            ListResponse<TaskRow>,
            ListResponse<AssignmentRow>,
            ListResponse<SubjectRow>,
            ListResponse<NoteRow>,
            api::common::ErrorResponse,
        )
    ),
    tags(
        (name = "auth", description = "Account registration and session endpoints"),
        (name = "tasks", description = "Task management endpoints"),
        (name = "assignments", description = "Assignment management endpoints"),
        (name = "subjects", description = "Subject management endpoints"),
        (name = "notes", description = "Note management endpoints")
    ),
    info(
        title = "Studyhub API",
        version = "0.1.0",
        description = "API for tracking tasks, assignments, subjects, and notes",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

/// Build the full application router.
///
/// The page guard wraps everything, but it only acts on the handful of
/// navigation paths; API routes pass straight through to the extractor-based
/// authentication.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(api::tasks::routes())
        .merge(api::assignments::routes())
        .merge(api::subjects::routes())
        .merge(api::notes::routes())
        .merge(auth::routes::routes());

    // The guard layer goes on last so it also wraps the fallback; the
    // navigation paths it redirects are not registered routes.
    Router::new()
        .route("/health", get(health))
        .merge(api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(auth::guard::page_guard))
}
