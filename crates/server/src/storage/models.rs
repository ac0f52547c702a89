// Database row types and write inputs
// Decision: Rows double as API response bodies (single-crate server, no
// separate contracts layer). Owner stamping happens in the storage layer,
// so none of the Create/Patch inputs carry an owner field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================
// Accounts
// ============================================

/// A registered account. `password_hash` never leaves the storage layer.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAccountRow {
    /// Already normalized (trimmed, lower-cased) by the caller.
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

// ============================================
// Tasks
// ============================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct TaskRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub subject: String,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub subject: String,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub subject: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
}

// ============================================
// Assignments
// ============================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "assignment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Submitted,
    Graded,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct AssignmentRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub status: AssignmentStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAssignment {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub status: AssignmentStatus,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAssignment {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub status: Option<AssignmentStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

// ============================================
// Subjects
// ============================================

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct SubjectRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub teacher: String,
    pub credits: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateSubject {
    pub name: String,
    pub teacher: String,
    pub credits: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSubject {
    pub name: Option<String>,
    pub teacher: Option<String>,
    pub credits: Option<i32>,
}

// ============================================
// Notes
// ============================================

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct NoteRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateNote {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
}
