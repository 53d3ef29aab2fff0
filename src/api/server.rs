//! Axum server assembly.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::api::handlers;
use crate::app::Engine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

/// Build the application router.
///
/// The capture source is a browser extension making cross-origin requests,
/// so CORS is fully permissive, like the backend the extension ships
/// against.
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/memorize", post(handlers::memorize))
        .route("/pages", get(handlers::list_pages))
        .route(
            "/pages/{id}",
            get(handlers::get_page).delete(handlers::delete_page),
        )
        .route(
            "/api-configs",
            get(handlers::list_api_configs).post(handlers::upsert_api_config),
        )
        .route(
            "/settings",
            get(handlers::get_settings).post(handlers::update_settings),
        )
        .layer(CorsLayer::permissive())
        .with_state(AppState { engine })
}

/// Serve the HTTP boundary until the process is stopped.
pub async fn serve(engine: Arc<Engine>) -> Result<()> {
    let addr = format!(
        "{}:{}",
        engine.config().server.host,
        engine.config().server.port
    );

    let app = router(engine);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {addr}"))?;

    info!("retrace listening on {addr}");

    axum::serve(listener, app).await.context("Server error")
}
