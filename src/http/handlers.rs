use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use super::error::ApiError;
use super::state::AppState;
use crate::error::SessionError;

fn api_error(state: &AppState, err: SessionError) -> ApiError {
    if !err.is_client_error() {
        error!("Request failed: {}", err);
    }
    ApiError::from_session_error(err, state.expose_internal_errors)
}

/// POST /sessions/start
/// Create a session and start recording the configured input source
pub async fn start_session(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .orchestrator
        .start_session()
        .await
        .map_err(|e| api_error(&state, e))?;

    info!("Session {} started", session.session_id);

    Ok(Json(session))
}

/// POST /sessions/:session_id/stop
/// Stop recording and upload the artifact
pub async fn stop_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .orchestrator
        .stop_session(&session_id)
        .await
        .map_err(|e| api_error(&state, e))?;

    info!("Session {} stopped and uploaded", session_id);

    Ok(Json(session))
}

/// GET /sessions/:session_id
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .orchestrator
        .get_session(&session_id)
        .await
        .map_err(|e| api_error(&state, e))?;

    Ok(Json(session))
}

/// GET /sessions/:session_id/results
/// Session record plus signed URLs for the raw video and analysis artifacts
pub async fn session_results(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let results = state
        .orchestrator
        .session_results(&session_id)
        .await
        .map_err(|e| api_error(&state, e))?;

    Ok(Json(results))
}

/// POST /sessions/:session_id/analyze
/// Dispatch the uploaded recording to the analysis service
pub async fn analyze_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .orchestrator
        .analyze_session(&session_id)
        .await
        .map_err(|e| api_error(&state, e))?;

    info!("Session {} analysis complete", session_id);

    Ok(Json(session))
}

/// GET /sessions
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.orchestrator.list_sessions().await)
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
