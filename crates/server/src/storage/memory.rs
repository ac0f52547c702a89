// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// Provides a PostgreSQL-compatible API backed by in-memory maps, allowing the
// server to run without a database for development and router tests. Each
// owned-resource operation holds one lock for its whole find-and-mutate, which
// gives the same per-record atomicity the SQL statements provide.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::models::*;
use super::owned::{OwnedRecord, OwnedStore};

/// One owned-resource collection. The ownership predicate lives here, once,
/// for every resource kind.
pub struct OwnedCollection<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

// Manual impl: the row types themselves are not `Default`.
impl<T> Default for OwnedCollection<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: OwnedRecord> OwnedCollection<T> {
    fn insert(&self, owner_id: Uuid, input: T::Create) -> T {
        let row = T::build(Uuid::now_v7(), owner_id, Utc::now(), input);
        self.rows.write().insert(row.id(), row.clone());
        row
    }

    fn list(&self, owner_id: Uuid) -> Vec<T> {
        let rows = self.rows.read();
        let mut result: Vec<T> = rows
            .values()
            .filter(|r| r.owner_id() == owner_id)
            .cloned()
            .collect();
        // Newest-first; id (uuid v7, time-ordered) breaks created_at ties.
        result.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then(b.id().cmp(&a.id()))
        });
        result
    }

    fn find(&self, owner_id: Uuid, id: Uuid) -> Option<T> {
        self.rows
            .read()
            .get(&id)
            .filter(|r| r.owner_id() == owner_id)
            .cloned()
    }

    fn update(&self, owner_id: Uuid, id: Uuid, patch: T::Patch) -> Option<T> {
        let mut rows = self.rows.write();
        match rows.get_mut(&id) {
            Some(row) if row.owner_id() == owner_id => {
                row.apply(patch, Utc::now());
                Some(row.clone())
            }
            _ => None,
        }
    }

    fn remove(&self, owner_id: Uuid, id: Uuid) -> bool {
        let mut rows = self.rows.write();
        match rows.get(&id) {
            Some(row) if row.owner_id() == owner_id => {
                rows.remove(&id);
                true
            }
            _ => false,
        }
    }
}

/// In-memory database for dev mode. All data is lost on restart.
#[derive(Default)]
pub struct InMemoryDatabase {
    accounts: RwLock<HashMap<Uuid, AccountRow>>,
    tasks: OwnedCollection<TaskRow>,
    assignments: OwnedCollection<AssignmentRow>,
    subjects: OwnedCollection<SubjectRow>,
    notes: OwnedCollection<NoteRow>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================
    // Accounts
    // ============================================

    /// `None` when the email is already taken. The uniqueness check and the
    /// insert happen under one write lock.
    pub async fn create_account(&self, input: CreateAccountRow) -> Result<Option<AccountRow>> {
        let mut accounts = self.accounts.write();
        if accounts.values().any(|a| a.email == input.email) {
            return Ok(None);
        }

        let now = Utc::now();
        let row = AccountRow {
            id: Uuid::now_v7(),
            email: input.email,
            name: input.name,
            password_hash: input.password_hash,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(row.id, row.clone());
        Ok(Some(row))
    }

    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<AccountRow>> {
        Ok(self
            .accounts
            .read()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    pub async fn get_account(&self, id: Uuid) -> Result<Option<AccountRow>> {
        Ok(self.accounts.read().get(&id).cloned())
    }
}

/// Maps a record type to its collection, so `OwnedStore` is implemented once
/// for every resource kind rather than four times.
pub trait HasCollection<T> {
    fn collection(&self) -> &OwnedCollection<T>;
}

impl HasCollection<TaskRow> for InMemoryDatabase {
    fn collection(&self) -> &OwnedCollection<TaskRow> {
        &self.tasks
    }
}

impl HasCollection<AssignmentRow> for InMemoryDatabase {
    fn collection(&self) -> &OwnedCollection<AssignmentRow> {
        &self.assignments
    }
}

impl HasCollection<SubjectRow> for InMemoryDatabase {
    fn collection(&self) -> &OwnedCollection<SubjectRow> {
        &self.subjects
    }
}

impl HasCollection<NoteRow> for InMemoryDatabase {
    fn collection(&self) -> &OwnedCollection<NoteRow> {
        &self.notes
    }
}

#[async_trait]
impl<T: OwnedRecord> OwnedStore<T> for InMemoryDatabase
where
    InMemoryDatabase: HasCollection<T>,
{
    async fn insert(&self, owner_id: Uuid, input: T::Create) -> Result<T> {
        Ok(self.collection().insert(owner_id, input))
    }

    async fn list(&self, owner_id: Uuid) -> Result<Vec<T>> {
        Ok(self.collection().list(owner_id))
    }

    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<T>> {
        Ok(self.collection().find(owner_id, id))
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, patch: T::Patch) -> Result<Option<T>> {
        Ok(self.collection().update(owner_id, id, patch))
    }

    async fn remove(&self, owner_id: Uuid, id: Uuid) -> Result<bool> {
        Ok(self.collection().remove(owner_id, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_input(title: &str) -> CreateTask {
        CreateTask {
            title: title.to_string(),
            description: String::new(),
            priority: TaskPriority::default(),
            subject: String::new(),
            due_date: None,
        }
    }

    #[tokio::test]
    async fn fresh_database_starts_empty() {
        let db = InMemoryDatabase::default();
        let owner = Uuid::now_v7();

        let tasks: Vec<TaskRow> = db.list(owner).await.unwrap();
        let assignments: Vec<AssignmentRow> = db.list(owner).await.unwrap();
        let subjects: Vec<SubjectRow> = db.list(owner).await.unwrap();
        let notes: Vec<NoteRow> = db.list(owner).await.unwrap();
        assert!(tasks.is_empty());
        assert!(assignments.is_empty());
        assert!(subjects.is_empty());
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn create_stamps_owner() {
        let db = InMemoryDatabase::new();
        let owner = Uuid::now_v7();

        let task: TaskRow = db.insert(owner, task_input("Read")).await.unwrap();
        assert_eq!(task.owner_id, owner);
        assert!(!task.completed);
        assert_eq!(task.priority, TaskPriority::Medium);
    }

    #[tokio::test]
    async fn list_is_scoped_and_newest_first() {
        let db = InMemoryDatabase::new();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();

        let first: TaskRow = db.insert(alice, task_input("first")).await.unwrap();
        let second: TaskRow = db.insert(alice, task_input("second")).await.unwrap();
        let _other: TaskRow = db.insert(bob, task_input("not visible")).await.unwrap();

        let listed: Vec<TaskRow> = db.list(alice).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        // Idempotent read
        let again: Vec<TaskRow> = db.list(alice).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|t| t.id).collect();
        let again_ids: Vec<Uuid> = again.iter().map(|t| t.id).collect();
        assert_eq!(ids, again_ids);
    }

    #[tokio::test]
    async fn cross_owner_update_and_delete_look_like_not_found() {
        let db = InMemoryDatabase::new();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();

        let task: TaskRow = db.insert(alice, task_input("mine")).await.unwrap();

        let patch = UpdateTask {
            title: Some("stolen".to_string()),
            ..Default::default()
        };
        let updated: Option<TaskRow> = db.update(bob, task.id, patch).await.unwrap();
        assert!(updated.is_none());

        let removed = OwnedStore::<TaskRow>::remove(&db, bob, task.id).await.unwrap();
        assert!(!removed);

        // The record is unchanged and still visible to its owner.
        let found: Option<TaskRow> = db.find(alice, task.id).await.unwrap();
        assert_eq!(found.unwrap().title, "mine");
    }

    #[tokio::test]
    async fn owner_update_applies_patch() {
        let db = InMemoryDatabase::new();
        let owner = Uuid::now_v7();

        let task: TaskRow = db.insert(owner, task_input("draft")).await.unwrap();
        let patch = UpdateTask {
            completed: Some(true),
            priority: Some(TaskPriority::High),
            ..Default::default()
        };
        let updated: TaskRow = db.update(owner, task.id, patch).await.unwrap().unwrap();
        assert!(updated.completed);
        assert_eq!(updated.priority, TaskPriority::High);
        assert_eq!(updated.title, "draft");
    }

    fn account_input(email: &str) -> CreateAccountRow {
        CreateAccountRow {
            email: email.to_string(),
            name: "A".to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn account_lookup_by_email() {
        let db = InMemoryDatabase::new();
        let created = db
            .create_account(account_input("a@x.com"))
            .await
            .unwrap()
            .unwrap();

        let found = db.get_account_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(db.get_account_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_account_email_is_refused() {
        let db = InMemoryDatabase::new();

        let first = db.create_account(account_input("a@x.com")).await.unwrap();
        assert!(first.is_some());

        let second = db.create_account(account_input("a@x.com")).await.unwrap();
        assert!(second.is_none());

        // The original account is untouched.
        let found = db.get_account_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, first.unwrap().id);
    }
}
