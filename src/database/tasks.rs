use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::pagination::Page;

use super::manager::StoreError;
use super::models::{Priority, Task};

/// Insert payload; the owner comes from the resolved identity, never from
/// client input
#[derive(Debug)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

/// Field set a task owner may change after creation. The owner reference is
/// not representable here.
#[derive(Debug, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Task persistence. Every read, update, and delete carries the owner id as
/// a conjunctive predicate, so a task that exists but belongs to someone
/// else is indistinguishable from one that does not exist.
pub struct TaskStore {
    pool: PgPool,
}

impl TaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, owner_id: Uuid, task: NewTask) -> Result<Task, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, priority, due_date, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(task.title)
        .bind(task.description)
        .bind(task.priority)
        .bind(task.due_date)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    /// Newest-first page of the owner's tasks plus their total count
    pub async fn list_for_owner(
        &self,
        owner_id: Uuid,
        page: Page,
    ) -> Result<(Vec<Task>, i64), StoreError> {
        let rows = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE owner_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(owner_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool);

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool);

        let (rows, total) = tokio::try_join!(rows, total)?;
        Ok((rows, total))
    }

    pub async fn find_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Task>, StoreError> {
        let task =
            sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1 AND owner_id = $2")
                .bind(id)
                .bind(owner_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(task)
    }

    pub async fn update_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                completed = COALESCE($5, completed),
                priority = COALESCE($6, priority),
                due_date = COALESCE($7, due_date),
                updated_at = now()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.completed)
        .bind(changes.priority)
        .bind(changes.due_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Returns false when the task is absent or owned by someone else
    pub async fn delete_for_owner(&self, id: Uuid, owner_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
