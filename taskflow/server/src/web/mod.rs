use axum::Router;
use axum::http::header::AUTHORIZATION;
use migration::MigratorTrait;
use sea_orm::Database;
use std::iter::once;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::AuthState;
use crate::config::{self, Config};
use crate::store::{DatabaseTaskStore, TaskStore};

pub mod api;

use api::{ApiDoc, ApiState};

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: config::Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let store: Arc<dyn TaskStore> = Arc::new(DatabaseTaskStore::new(db));
    let app = build_app(&config, store);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Assembles the full application router on top of a task store.
pub fn build_app(config: &Config, store: Arc<dyn TaskStore>) -> Router {
    let auth_state = Arc::new(AuthState::from_config(config));
    let api_state = Arc::new(ApiState { store });

    let public_routes = Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    Router::new()
        .merge(api::create_api_router(auth_state, api_state))
        .merge(public_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetSensitiveRequestHeadersLayer::new(once(AUTHORIZATION)))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new()),
        )
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}
