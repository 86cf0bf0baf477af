//! HTTP API for session control (drone dashboard frontend)
//!
//! This module provides a REST API driving the capture lifecycle:
//! - POST /sessions/start - Create a session and start recording
//! - POST /sessions/:id/stop - Stop recording and upload to object storage
//! - POST /sessions/:id/analyze - Dispatch the recording for analysis
//! - GET /sessions/:id - Query a session record
//! - GET /sessions/:id/results - Session record with signed artifact URLs
//! - GET /sessions - List all sessions
//! - GET /health - Health check

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
