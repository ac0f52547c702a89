// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// The owned-resource methods are generic over the record type; both backends
// implement `OwnedStore<T>` for every resource kind, so a handler cannot reach
// the data without going through the ownership-scoped contract.

use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::memory::InMemoryDatabase;
use super::models::{AccountRow, CreateAccountRow};
use super::owned::{OwnedRecord, OwnedStore};
use super::repositories::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a PostgreSQL storage backend from a database URL
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    /// Get the PostgreSQL pool if using PostgreSQL backend
    pub fn pool(&self) -> Option<&PgPool> {
        match self {
            Self::Postgres(db) => Some(db.pool()),
            Self::InMemory(_) => None,
        }
    }

    // ============================================
    // Accounts
    // ============================================

    /// `None` when the email is already registered.
    pub async fn create_account(&self, input: CreateAccountRow) -> Result<Option<AccountRow>> {
        match self {
            Self::Postgres(db) => db.create_account(input).await,
            Self::InMemory(db) => db.create_account(input).await,
        }
    }

    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<AccountRow>> {
        match self {
            Self::Postgres(db) => db.get_account_by_email(email).await,
            Self::InMemory(db) => db.get_account_by_email(email).await,
        }
    }

    pub async fn get_account(&self, id: Uuid) -> Result<Option<AccountRow>> {
        match self {
            Self::Postgres(db) => db.get_account(id).await,
            Self::InMemory(db) => db.get_account(id).await,
        }
    }

    // ============================================
    // Owned resources (tasks, assignments, subjects, notes)
    // ============================================

    pub async fn create_owned<T>(&self, owner_id: Uuid, input: T::Create) -> Result<T>
    where
        T: OwnedRecord,
        Database: OwnedStore<T>,
        InMemoryDatabase: OwnedStore<T>,
    {
        match self {
            Self::Postgres(db) => db.insert(owner_id, input).await,
            Self::InMemory(db) => db.insert(owner_id, input).await,
        }
    }

    pub async fn list_owned<T>(&self, owner_id: Uuid) -> Result<Vec<T>>
    where
        T: OwnedRecord,
        Database: OwnedStore<T>,
        InMemoryDatabase: OwnedStore<T>,
    {
        match self {
            Self::Postgres(db) => db.list(owner_id).await,
            Self::InMemory(db) => db.list(owner_id).await,
        }
    }

    pub async fn get_owned<T>(&self, owner_id: Uuid, id: Uuid) -> Result<Option<T>>
    where
        T: OwnedRecord,
        Database: OwnedStore<T>,
        InMemoryDatabase: OwnedStore<T>,
    {
        match self {
            Self::Postgres(db) => db.find(owner_id, id).await,
            Self::InMemory(db) => db.find(owner_id, id).await,
        }
    }

    pub async fn update_owned<T>(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: T::Patch,
    ) -> Result<Option<T>>
    where
        T: OwnedRecord,
        Database: OwnedStore<T>,
        InMemoryDatabase: OwnedStore<T>,
    {
        match self {
            Self::Postgres(db) => db.update(owner_id, id, patch).await,
            Self::InMemory(db) => db.update(owner_id, id, patch).await,
        }
    }

    pub async fn delete_owned<T>(&self, owner_id: Uuid, id: Uuid) -> Result<bool>
    where
        T: OwnedRecord,
        Database: OwnedStore<T>,
        InMemoryDatabase: OwnedStore<T>,
    {
        match self {
            Self::Postgres(db) => OwnedStore::<T>::remove(db, owner_id, id).await,
            Self::InMemory(db) => OwnedStore::<T>::remove(db.as_ref(), owner_id, id).await,
        }
    }
}
