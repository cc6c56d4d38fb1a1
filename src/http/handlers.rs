use super::state::AppState;
use crate::session::SessionSnapshot;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::error;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub transcript: String,
    pub is_recording: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn respond(result: anyhow::Result<SessionSnapshot>, action: &str) -> Response {
    match result {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => {
            error!("Failed to {}: {:#}", action, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to {}: {}", action, e),
                }),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /dictation/toggle
/// Stop listening if a session is live, start one otherwise
pub async fn toggle_dictation(State(state): State<AppState>) -> impl IntoResponse {
    respond(state.dictation.toggle().await, "toggle dictation")
}

/// POST /dictation/start
pub async fn start_dictation(State(state): State<AppState>) -> impl IntoResponse {
    respond(state.dictation.start().await, "start dictation")
}

/// POST /dictation/stop
pub async fn stop_dictation(State(state): State<AppState>) -> impl IntoResponse {
    respond(state.dictation.stop().await, "stop dictation")
}

/// POST /dictation/clear
/// Discard the transcript accumulated so far
pub async fn clear_transcript(State(state): State<AppState>) -> impl IntoResponse {
    respond(state.dictation.clear().await, "clear transcript")
}

/// GET /dictation
/// Recording flag, transcript and current error
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    respond(state.dictation.snapshot().await, "get dictation status")
}

/// GET /dictation/transcript
pub async fn get_transcript(State(state): State<AppState>) -> impl IntoResponse {
    match state.dictation.snapshot().await {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(TranscriptResponse {
                transcript: snapshot.transcript,
                is_recording: snapshot.is_recording,
            }),
        )
            .into_response(),
        Err(e) => respond(Err(e), "get transcript"),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
