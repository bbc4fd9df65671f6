#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use taskflow_server::config::Config;
use taskflow_server::store::DatabaseTaskStore;
use taskflow_server::web::build_app;
use tower::ServiceExt;

pub const API_TOKEN: &str = "test-token";

/// Opens a fresh in-memory SQLite database with migrations applied.
///
/// The pool is pinned to one connection, since every SQLite memory
/// connection is a separate database.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn test_config() -> Config {
    Config {
        db_url: "sqlite::memory:".to_string(),
        port: 0,
        api_token: API_TOKEN.to_string(),
        enhancement_url: None,
        enhancement_timeout_secs: 1,
    }
}

/// Test context for endpoint and store tests.
pub struct TestContext {
    pub db: DatabaseConnection,
    pub store: Arc<DatabaseTaskStore>,
    pub app: Router,
}

pub async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let db = setup_db().await?;
    let store = Arc::new(DatabaseTaskStore::new(db.clone()));
    let app = build_app(&test_config(), store.clone());
    Ok(TestContext { db, store, app })
}

/// Sends a request through `app` and returns the status and raw body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<&str>,
) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        request = request.header(header::AUTHORIZATION, value);
    }
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

/// Like [`send`], parsing the body as JSON.
pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = send(app, method, uri, authorization, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub fn bearer() -> String {
    format!("Bearer {}", API_TOKEN)
}
