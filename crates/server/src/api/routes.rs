use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::middleware::metrics_middleware;
use super::{handlers, stremio};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Stremio addon protocol
        .route("/manifest.json", get(stremio::manifest))
        .route("/stream/{media_type}/{id}", get(stremio::streams))
        // Operations
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        // Stremio clients call addons cross-origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
