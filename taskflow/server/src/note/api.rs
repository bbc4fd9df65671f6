use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskflow_core::NewNote;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::note::NoteJson;
use crate::web::api::{ApiError, ApiState, ErrorResponse};

/// Request body for attaching a note to a task.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// ID of an existing task
    #[serde(default)]
    pub task_id: Option<String>,
    /// Note text, must not be blank
    #[serde(default)]
    pub content: Option<String>,
}

/// Handler for POST /notes - Inserts a note on behalf of an automation.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = NoteJson),
        (status = 400, description = "Invalid body or failed validation", body = ErrorResponse),
        (status = 401, description = "Missing or wrong bearer token", body = ErrorResponse),
        (status = 500, description = "Note could not be stored, e.g. unknown task", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Notes"
)]
pub async fn create_note_handler(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteJson>), ApiError> {
    let Json(request) = payload.inspect_err(|e| tracing::warn!("Rejected note body: {}", e))?;

    let (Some(task_id), Some(content)) = (
        request.task_id.filter(|id| !id.trim().is_empty()),
        request.content.filter(|content| !content.trim().is_empty()),
    ) else {
        return Err(ApiError::Validation(
            "task_id and content are required".to_string(),
        ));
    };
    let task_id = Uuid::parse_str(task_id.trim())
        .map_err(|_| ApiError::Validation(format!("task_id '{}' is not a valid UUID", task_id)))?;
    let new_note = NewNote::new(task_id, &content)?;

    let note = state
        .store
        .insert_note(new_note)
        .await
        .map_err(ApiError::store("Failed to create note"))?;
    tracing::info!("Created note {} on task {} via API", note.id, note.task_id);

    Ok((StatusCode::CREATED, Json(NoteJson::from(note))))
}

/// Creates and returns the notes API router.
pub fn create_api_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/notes", post(create_note_handler))
        .with_state(state)
}
