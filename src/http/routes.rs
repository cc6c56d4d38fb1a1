use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Dictation control
        .route("/dictation/toggle", post(handlers::toggle_dictation))
        .route("/dictation/start", post(handlers::start_dictation))
        .route("/dictation/stop", post(handlers::stop_dictation))
        .route("/dictation/clear", post(handlers::clear_transcript))
        // Dictation queries
        .route("/dictation", get(handlers::get_status))
        .route("/dictation/transcript", get(handlers::get_transcript))
        // The UI may be served from another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
