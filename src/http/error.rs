use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::error::SessionError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// HTTP-facing wrapper around `SessionError` with the stable status mapping:
/// not-found → 404, precondition-not-met → 400, analysis timeout → 408,
/// analysis quota → 429, everything else → 500.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn from_session_error(err: SessionError, expose_internal: bool) -> Self {
        let status = match &err {
            SessionError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            SessionError::DuplicateSession(_)
            | SessionError::DuplicateRecording(_)
            | SessionError::RecordingNotActive(_)
            | SessionError::RawArtifactMissing(_) => StatusCode::BAD_REQUEST,
            SessionError::AnalysisTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            SessionError::AnalysisQuota(_) => StatusCode::TOO_MANY_REQUESTS,
            SessionError::ProcessSpawn { .. }
            | SessionError::Upload { .. }
            | SessionError::Analysis { .. }
            | SessionError::RecordUpdateLost { .. }
            | SessionError::SignedUrl { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if err.is_client_error() || expose_internal {
            err.to_string()
        } else {
            "Internal server error".to_string()
        };

        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
