/// Task endpoints (all behind the auth gate)
///
/// - `POST   /api/tasks` - create a task
/// - `GET    /api/tasks` - list own tasks
/// - `PUT    /api/tasks/:id` - update a task
/// - `PATCH  /api/tasks/:id/status` - set completion status
/// - `DELETE /api/tasks/:id` - delete a task
///
/// Every handler here is the resource owner guard in action: the owner id
/// comes exclusively from the [`AuthContext`] the gate injected, and every
/// model call is scoped to it. A task that exists under another owner is
/// reported as not-found, identically to one that does not exist at all.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::auth::{validation_errors, MessageResponse},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use taskpoints_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task, TaskStatus, UpdateTask},
};
use validator::Validate;

/// Create task request
///
/// No owner field: the owner is always the verified identity.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    /// Description
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Due date (YYYY-MM-DD)
    pub due_date: NaiveDate,

    /// Point value
    #[validate(range(min = 0, max = 100, message = "Points must be between 0 and 100"))]
    pub points: i32,
}

/// Update task request (full replacement of mutable fields)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    /// New description
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// New due date
    pub due_date: NaiveDate,

    /// New point value
    #[validate(range(min = 0, max = 100, message = "Points must be between 0 and 100"))]
    pub points: i32,

    /// New status
    pub status: TaskStatus,
}

/// Status change request
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    /// Target status ("pending" or "completed")
    pub status: TaskStatus,
}

/// Response carrying a message and the affected task
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// Human-readable outcome
    pub message: String,

    /// The task after the operation
    pub task: Task,
}

/// Creates a task owned by the authenticated user
///
/// # Errors
///
/// - `422 Unprocessable Entity`: missing or out-of-range fields
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    req.validate().map_err(validation_errors)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: auth.user_id,
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            points: req.points,
        },
    )
    .await?;

    tracing::debug!(user_id = auth.user_id, task_id = task.id, "task created");

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created successfully.".to_string(),
            task,
        }),
    ))
}

/// Lists the authenticated user's tasks, newest first
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_user(&state.db, auth.user_id).await?;

    Ok(Json(tasks))
}

/// Updates a task owned by the authenticated user
///
/// # Errors
///
/// - `404 Not Found`: no task with that id under this owner (absence and
///   foreign ownership are indistinguishable by policy)
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    req.validate().map_err(validation_errors)?;

    let task = Task::update(
        &state.db,
        id,
        auth.user_id,
        UpdateTask {
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            points: req.points,
            status: req.status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskResponse {
        message: "Task updated successfully.".to_string(),
        task,
    }))
}

/// Sets a task's completion status
///
/// # Errors
///
/// - `404 Not Found`: no task with that id under this owner
pub async fn set_task_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<SetStatusRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task = Task::set_status(&state.db, id, auth.user_id, req.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskResponse {
        message: "Task status updated successfully.".to_string(),
        task,
    }))
}

/// Deletes a task owned by the authenticated user
///
/// # Errors
///
/// - `404 Not Found`: no task with that id under this owner
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Task::delete(&state.db, id, auth.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::debug!(user_id = auth.user_id, task_id = id, "task deleted");

    Ok(Json(MessageResponse {
        message: "Task deleted successfully.".to_string(),
    }))
}
