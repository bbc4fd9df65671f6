use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::config::Config;
use crate::web::api::ApiError;

/// Shared secret checked by [`require_bearer_token`].
#[derive(Clone, Debug)]
pub struct AuthState {
    api_token: String,
}

impl AuthState {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_token.clone())
    }

    /// True when the `Authorization` header is exactly `Bearer <api_token>`.
    pub fn is_authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| token == self.api_token)
    }
}

/// Middleware that rejects requests without the configured bearer token.
/// Runs before any body extraction, so unauthorized requests are answered
/// with 401 whatever their payload.
pub async fn require_bearer_token(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    if !state.is_authorized(&headers) {
        tracing::warn!(
            "Rejected {} {}: missing or invalid bearer token",
            request.method(),
            request.uri().path()
        );
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderValue, StatusCode};
    use axum::middleware::from_fn_with_state;
    use axum::{Router, routing::get};
    use tower::ServiceExt;

    fn headers_with(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(authorization).unwrap());
        headers
    }

    #[test]
    fn can_accept_exact_bearer_token() {
        let state = AuthState::new("s3cret");

        assert!(state.is_authorized(&headers_with("Bearer s3cret")));
    }

    #[test]
    fn can_reject_wrong_or_malformed_tokens() {
        let state = AuthState::new("s3cret");

        assert!(!state.is_authorized(&HeaderMap::new()));
        assert!(!state.is_authorized(&headers_with("Bearer wrong")));
        assert!(!state.is_authorized(&headers_with("bearer s3cret")));
        assert!(!state.is_authorized(&headers_with("s3cret")));
        assert!(!state.is_authorized(&headers_with("Bearer s3cret ")));
    }

    async fn call(authorization: Option<&str>) -> Response {
        let state = Arc::new(AuthState::new("s3cret"));
        let app = Router::new()
            .route("/protected", get(|| async { "inside" }))
            .route_layer(from_fn_with_state(state, require_bearer_token));

        let mut request = axum::http::Request::builder().uri("/protected");
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }
        app.oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn can_pass_authorized_request_through() {
        let response = call(Some("Bearer s3cret")).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn can_answer_unauthorized_with_json_error() {
        let response = call(None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Unauthorized" }));
    }
}
