/// Task model and owner-scoped operations
///
/// Tasks are the user-owned work items of TaskPoints. Every task belongs
/// to exactly one owner, and every query in this module that reads or
/// mutates an existing row is constrained by `user_id` as well as `id`:
/// a caller holding someone else's task id gets zero rows back, which the
/// API reports as not-found. Ownership mismatch and absence are therefore
/// indistinguishable from the outside.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     due_date DATE NOT NULL,
///     points INTEGER NOT NULL,
///     status TEXT NOT NULL DEFAULT 'pending'
///         CHECK (status IN ('pending', 'completed')),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskpoints_shared::models::task::{CreateTask, Task, TaskStatus};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, owner_id: i64) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     user_id: owner_id,
///     title: "Write report".to_string(),
///     description: "Quarterly summary".to_string(),
///     due_date: chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
///     points: 20,
/// }).await?;
///
/// Task::set_status(&pool, task.id, owner_id, TaskStatus::Completed).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Error for an unrecognized status string coming out of storage
#[derive(Debug, thiserror::Error)]
#[error("Unknown task status: {0}")]
pub struct TaskStatusParseError(String);

/// Task completion status
///
/// Stored as an enumerated string, never a boolean, so writer and reader
/// agree on the representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task has not been completed yet
    Pending,

    /// Task has been completed
    Completed,
}

impl TaskStatus {
    /// Status as the string stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }

    /// The other status, for toggling
    pub fn toggled(&self) -> TaskStatus {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = TaskStatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(TaskStatusParseError(other.to_string())),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task id
    pub id: i64,

    /// Owning user id; stamped from the verified identity, never from
    /// client input
    pub user_id: i64,

    /// Task title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Due date
    pub due_date: NaiveDate,

    /// Point value (bounded at the API boundary)
    pub points: i32,

    /// Completion status
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owner id from the verified identity
    pub user_id: i64,

    /// Task title
    pub title: String,

    /// Description
    pub description: String,

    /// Due date
    pub due_date: NaiveDate,

    /// Point value
    pub points: i32,
}

/// Replacement fields for updating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: String,

    /// New description
    pub description: String,

    /// New due date
    pub due_date: NaiveDate,

    /// New point value
    pub points: i32,

    /// New status
    pub status: TaskStatus,
}

impl Task {
    /// Creates a new task in pending status
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, due_date, points)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, due_date, points, status, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .bind(data.points)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks owned by a user, newest first
    ///
    /// The `user_id` filter is the ownership scope: no task outside it is
    /// ever returned.
    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, due_date, points, status, created_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Replaces a task's mutable fields, scoped to its owner
    ///
    /// # Returns
    ///
    /// The updated task, or `None` when no row matches both id and owner
    pub async fn update(
        pool: &PgPool,
        id: i64,
        user_id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3,
                description = $4,
                due_date = $5,
                points = $6,
                status = $7
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, due_date, points, status, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .bind(data.points)
        .bind(data.status.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Sets a task's status, scoped to its owner
    pub async fn set_status(
        pool: &PgPool,
        id: i64,
        user_id: i64,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, due_date, points, status, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(status.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task, scoped to its owner
    ///
    /// # Returns
    ///
    /// True if a row was deleted; false covers both a nonexistent id and
    /// an id owned by someone else
    pub async fn delete(pool: &PgPool, id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_task_status_try_from() {
        assert_eq!(
            TaskStatus::try_from("pending".to_string()).unwrap(),
            TaskStatus::Pending
        );
        assert_eq!(
            TaskStatus::try_from("completed".to_string()).unwrap(),
            TaskStatus::Completed
        );
        assert!(TaskStatus::try_from("done".to_string()).is_err());
        assert!(TaskStatus::try_from("".to_string()).is_err());
    }

    #[test]
    fn test_task_status_toggled() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Pending);
    }

    #[test]
    fn test_task_status_serde_roundtrip() {
        let json = serde_json::to_string(&TaskStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");

        let status: TaskStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, TaskStatus::Pending);
    }
}
