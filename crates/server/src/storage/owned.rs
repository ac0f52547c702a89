// Ownership-scoped repository contract
// Decision: One generic contract instead of per-resource copies of the
// ownership guard. Every lookup fuses `(id AND owner_id)` into the single
// store operation, so a row owned by someone else is indistinguishable from
// a row that does not exist, and there is no check-then-act window.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::models::*;

/// A record that belongs to exactly one account.
///
/// `build` stamps `owner_id` from the authenticated identity; client input
/// types (`Create`, `Patch`) have no owner field at all.
pub trait OwnedRecord: Clone + Send + Sync + 'static {
    type Create: Send + 'static;
    type Patch: Send + 'static;

    fn build(id: Uuid, owner_id: Uuid, now: DateTime<Utc>, input: Self::Create) -> Self;

    /// Apply a partial update in place. `None` fields are left untouched.
    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    fn id(&self) -> Uuid;
    fn owner_id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
}

/// Persistence operations for one owned resource kind.
///
/// Implemented by both storage backends. `update` and `remove` return
/// `None`/`false` for wrong-owner exactly as for absent.
#[async_trait]
pub trait OwnedStore<T: OwnedRecord> {
    async fn insert(&self, owner_id: Uuid, input: T::Create) -> Result<T>;

    /// All records owned by `owner_id`, newest-first by creation time.
    async fn list(&self, owner_id: Uuid) -> Result<Vec<T>>;

    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<T>>;

    async fn update(&self, owner_id: Uuid, id: Uuid, patch: T::Patch) -> Result<Option<T>>;

    async fn remove(&self, owner_id: Uuid, id: Uuid) -> Result<bool>;
}

fn patch_field<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl OwnedRecord for TaskRow {
    type Create = CreateTask;
    type Patch = UpdateTask;

    fn build(id: Uuid, owner_id: Uuid, now: DateTime<Utc>, input: CreateTask) -> Self {
        Self {
            id,
            owner_id,
            title: input.title,
            description: input.description,
            priority: input.priority,
            subject: input.subject,
            completed: false,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateTask, now: DateTime<Utc>) {
        patch_field(&mut self.title, patch.title);
        patch_field(&mut self.description, patch.description);
        patch_field(&mut self.priority, patch.priority);
        patch_field(&mut self.subject, patch.subject);
        patch_field(&mut self.completed, patch.completed);
        if patch.due_date.is_some() {
            self.due_date = patch.due_date;
        }
        self.updated_at = now;
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl OwnedRecord for AssignmentRow {
    type Create = CreateAssignment;
    type Patch = UpdateAssignment;

    fn build(id: Uuid, owner_id: Uuid, now: DateTime<Utc>, input: CreateAssignment) -> Self {
        Self {
            id,
            owner_id,
            title: input.title,
            description: input.description,
            subject: input.subject,
            status: input.status,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateAssignment, now: DateTime<Utc>) {
        patch_field(&mut self.title, patch.title);
        patch_field(&mut self.description, patch.description);
        patch_field(&mut self.subject, patch.subject);
        patch_field(&mut self.status, patch.status);
        if patch.due_date.is_some() {
            self.due_date = patch.due_date;
        }
        self.updated_at = now;
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl OwnedRecord for SubjectRow {
    type Create = CreateSubject;
    type Patch = UpdateSubject;

    fn build(id: Uuid, owner_id: Uuid, now: DateTime<Utc>, input: CreateSubject) -> Self {
        Self {
            id,
            owner_id,
            name: input.name,
            teacher: input.teacher,
            credits: input.credits,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateSubject, now: DateTime<Utc>) {
        patch_field(&mut self.name, patch.name);
        patch_field(&mut self.teacher, patch.teacher);
        patch_field(&mut self.credits, patch.credits);
        self.updated_at = now;
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl OwnedRecord for NoteRow {
    type Create = CreateNote;
    type Patch = UpdateNote;

    fn build(id: Uuid, owner_id: Uuid, now: DateTime<Utc>, input: CreateNote) -> Self {
        Self {
            id,
            owner_id,
            title: input.title,
            content: input.content,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateNote, now: DateTime<Utc>) {
        patch_field(&mut self.title, patch.title);
        patch_field(&mut self.content, patch.content);
        self.updated_at = now;
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
