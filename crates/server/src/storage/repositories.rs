// PostgreSQL repository layer
//
// Every owned-resource statement carries `owner_id = $n` in its WHERE clause,
// so the ownership check and the mutation are one atomic statement. A row
// owned by another account yields zero rows, the same as a missing id.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::*;
use super::owned::OwnedStore;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date.
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ============================================
    // Accounts
    // ============================================

    /// `None` when the email is already taken. ON CONFLICT makes the
    /// uniqueness check part of the insert, so a signup race never errors.
    pub async fn create_account(&self, input: CreateAccountRow) -> Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (id, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, name, password_hash, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.email)
        .bind(&input.name)
        .bind(&input.password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_account(&self, id: Uuid) -> Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

// ============================================
// Tasks
// ============================================

#[async_trait]
impl OwnedStore<TaskRow> for Database {
    async fn insert(&self, owner_id: Uuid, input: CreateTask) -> Result<TaskRow> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            INSERT INTO tasks (id, owner_id, title, description, priority, subject, completed, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
            RETURNING id, owner_id, title, description, priority, subject, completed, due_date, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(owner_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.priority)
        .bind(&input.subject)
        .bind(input.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self, owner_id: Uuid) -> Result<Vec<TaskRow>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, owner_id, title, description, priority, subject, completed, due_date, created_at, updated_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<TaskRow>> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, owner_id, title, description, priority, subject, completed, due_date, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, patch: UpdateTask) -> Result<Option<TaskRow>> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks
            SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                priority = COALESCE($5, priority),
                subject = COALESCE($6, subject),
                completed = COALESCE($7, completed),
                due_date = COALESCE($8, due_date),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, title, description, priority, subject, completed, due_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.priority)
        .bind(patch.subject)
        .bind(patch.completed)
        .bind(patch.due_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn remove(&self, owner_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================
// Assignments
// ============================================

#[async_trait]
impl OwnedStore<AssignmentRow> for Database {
    async fn insert(&self, owner_id: Uuid, input: CreateAssignment) -> Result<AssignmentRow> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            r#"
            INSERT INTO assignments (id, owner_id, title, description, subject, status, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, owner_id, title, description, subject, status, due_date, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(owner_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.subject)
        .bind(input.status)
        .bind(input.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self, owner_id: Uuid) -> Result<Vec<AssignmentRow>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT id, owner_id, title, description, subject, status, due_date, created_at, updated_at
            FROM assignments
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<AssignmentRow>> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT id, owner_id, title, description, subject, status, due_date, created_at, updated_at
            FROM assignments
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: UpdateAssignment,
    ) -> Result<Option<AssignmentRow>> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            r#"
            UPDATE assignments
            SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                subject = COALESCE($5, subject),
                status = COALESCE($6, status),
                due_date = COALESCE($7, due_date),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, title, description, subject, status, due_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.subject)
        .bind(patch.status)
        .bind(patch.due_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn remove(&self, owner_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM assignments
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================
// Subjects
// ============================================

#[async_trait]
impl OwnedStore<SubjectRow> for Database {
    async fn insert(&self, owner_id: Uuid, input: CreateSubject) -> Result<SubjectRow> {
        let row = sqlx::query_as::<_, SubjectRow>(
            r#"
            INSERT INTO subjects (id, owner_id, name, teacher, credits)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_id, name, teacher, credits, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(owner_id)
        .bind(&input.name)
        .bind(&input.teacher)
        .bind(input.credits)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self, owner_id: Uuid) -> Result<Vec<SubjectRow>> {
        let rows = sqlx::query_as::<_, SubjectRow>(
            r#"
            SELECT id, owner_id, name, teacher, credits, created_at, updated_at
            FROM subjects
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<SubjectRow>> {
        let row = sqlx::query_as::<_, SubjectRow>(
            r#"
            SELECT id, owner_id, name, teacher, credits, created_at, updated_at
            FROM subjects
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: UpdateSubject,
    ) -> Result<Option<SubjectRow>> {
        let row = sqlx::query_as::<_, SubjectRow>(
            r#"
            UPDATE subjects
            SET
                name = COALESCE($3, name),
                teacher = COALESCE($4, teacher),
                credits = COALESCE($5, credits),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, name, teacher, credits, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(patch.name)
        .bind(patch.teacher)
        .bind(patch.credits)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn remove(&self, owner_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM subjects
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================
// Notes
// ============================================

#[async_trait]
impl OwnedStore<NoteRow> for Database {
    async fn insert(&self, owner_id: Uuid, input: CreateNote) -> Result<NoteRow> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            INSERT INTO notes (id, owner_id, title, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_id, title, content, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(owner_id)
        .bind(&input.title)
        .bind(&input.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self, owner_id: Uuid) -> Result<Vec<NoteRow>> {
        let rows = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, owner_id, title, content, created_at, updated_at
            FROM notes
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<NoteRow>> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, owner_id, title, content, created_at, updated_at
            FROM notes
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, patch: UpdateNote) -> Result<Option<NoteRow>> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            UPDATE notes
            SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, title, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(patch.title)
        .bind(patch.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn remove(&self, owner_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM notes
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
