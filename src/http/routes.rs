use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/sessions", get(handlers::list_sessions))
        .route("/sessions/start", post(handlers::start_session))
        .route("/sessions/:session_id/stop", post(handlers::stop_session))
        .route(
            "/sessions/:session_id/analyze",
            post(handlers::analyze_session),
        )
        // Session queries
        .route("/sessions/:session_id", get(handlers::get_session))
        .route(
            "/sessions/:session_id/results",
            get(handlers::session_results),
        )
        // Request logging + permissive CORS for the dashboard frontend
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
