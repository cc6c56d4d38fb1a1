//! HTTP API server for the dictation UI
//!
//! This module exposes the dictation toggle and the current transcript:
//! - POST /dictation/toggle - Start or stop listening
//! - POST /dictation/start - Start listening
//! - POST /dictation/stop - Stop listening
//! - POST /dictation/clear - Discard the transcript
//! - GET /dictation - Recording flag, transcript and error
//! - GET /dictation/transcript - Transcript only
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
