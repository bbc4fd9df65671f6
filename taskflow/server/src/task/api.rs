use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskflow_core::{NewTask, Priority};
use utoipa::ToSchema;

use crate::task::{TaskJson, TasksResponse};
use crate::web::api::{ApiError, ApiState, ErrorResponse};

/// Request body for creating a task.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    /// Task text, must not be blank
    #[serde(default)]
    pub text: Option<String>,
    /// `low`, `medium` or `high`; defaults to `medium`
    #[serde(default)]
    pub priority: Option<String>,
}

/// Handler for POST /tasks - Inserts a task on behalf of an automation.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskJson),
        (status = 400, description = "Invalid body or failed validation", body = ErrorResponse),
        (status = 401, description = "Missing or wrong bearer token", body = ErrorResponse),
        (status = 500, description = "Task could not be stored", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskJson>), ApiError> {
    let Json(request) = payload.inspect_err(|e| tracing::warn!("Rejected task body: {}", e))?;

    let priority = request
        .priority
        .as_deref()
        .filter(|priority| !priority.trim().is_empty())
        .map(str::parse::<Priority>)
        .transpose()?;
    let new_task = NewTask::new(request.text.as_deref().unwrap_or_default(), priority)?;

    let task = state
        .store
        .insert_task(new_task)
        .await
        .map_err(ApiError::store("Failed to create task"))?;
    tracing::info!("Created task {} via API", task.id);

    Ok((StatusCode::CREATED, Json(TaskJson::from(task))))
}

/// Handler for GET /tasks - Returns every task with its notes.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks",
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = TasksResponse),
        (status = 401, description = "Missing or wrong bearer token", body = ErrorResponse),
        (status = 500, description = "Tasks could not be loaded", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Tasks"
)]
pub async fn list_tasks_handler(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<TasksResponse>, ApiError> {
    let tasks = state
        .store
        .list_tasks()
        .await
        .map_err(ApiError::store("Failed to retrieve tasks"))?;

    let tasks: Vec<TaskJson> = tasks.into_iter().map(TaskJson::from).collect();
    let count = tasks.len();
    Ok(Json(TasksResponse { tasks, count }))
}

/// Creates and returns the tasks API router.
pub fn create_api_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/tasks", post(create_task_handler).get(list_tasks_handler))
        .with_state(state)
}
