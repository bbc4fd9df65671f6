use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskflow_core::TaskError;
use utoipa::{
    Modify, OpenApi, ToSchema,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::auth::{self, AuthState};
use crate::store::{StoreError, TaskStore};

/// State shared by the JSON API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn TaskStore>,
}

/// JSON body of every API error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Short description of what went wrong
    pub error: String,
    /// Underlying cause, when there is one worth reporting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Error type for JSON API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    /// The body was not JSON, had the wrong shape or the wrong content type.
    #[error("Invalid request body")]
    InvalidBody(#[from] JsonRejection),
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| {
            tracing::error!("{}: {}", message, source);
            Self::Store { message, source }
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, ErrorResponse::new("Unauthorized")),
            ApiError::InvalidBody(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details("Invalid request body", rejection.body_text()),
            ),
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, ErrorResponse::new(message)),
            ApiError::Store { message, source } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details(message, source.to_string()),
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::task::api::create_task_handler,
        crate::task::api::list_tasks_handler,
        crate::note::api::create_note_handler,
    ),
    components(schemas(
        ErrorResponse,
        crate::task::TaskJson,
        crate::task::TasksResponse,
        crate::task::api::CreateTaskRequest,
        crate::note::NoteJson,
        crate::note::api::CreateNoteRequest,
    )),
    modifiers(&BearerSecurity),
    security(("bearer" = [])),
    tags(
        (name = "Tasks", description = "Task creation and listing"),
        (name = "Notes", description = "Notes attached to tasks")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// Creates the bearer-protected JSON API routes.
pub fn create_api_router(auth_state: Arc<AuthState>, api_state: Arc<ApiState>) -> Router {
    crate::task::api::create_api_router(api_state.clone())
        .merge(crate::note::api::create_api_router(api_state))
        .route_layer(from_fn_with_state(auth_state, auth::require_bearer_token))
}
