use thiserror::Error;

/// Failures that can occur anywhere in the capture pipeline.
///
/// Component operations return these directly; the orchestrator passes them
/// through annotated with the session id rather than masking them, and the
/// HTTP layer maps each variant to a stable status code.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session {0} not found")]
    SessionNotFound(String),

    #[error("Session {0} already exists")]
    DuplicateSession(String),

    #[error("Session {0} already has an active recording")]
    DuplicateRecording(String),

    #[error("Session {0} is not recording")]
    RecordingNotActive(String),

    #[error("Failed to spawn encoder process for session {session_id}: {source}")]
    ProcessSpawn {
        session_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload of {key} failed: {reason}")]
    Upload { key: String, reason: String },

    #[error("Session {0} has no uploaded recording yet")]
    RawArtifactMissing(String),

    #[error("Analysis service error for session {session_id}: {reason}")]
    Analysis { session_id: String, reason: String },

    #[error("Analysis request for session {0} timed out")]
    AnalysisTimeout(String),

    #[error("Analysis service quota exceeded for session {0}")]
    AnalysisQuota(String),

    /// The recording was uploaded but the session record could not be
    /// updated afterwards. The artifact is safe under `key`; callers may
    /// retry the record update (via analyze/stop retry) without re-uploading.
    #[error("Uploaded {key} but failed to update session {session_id}")]
    RecordUpdateLost { session_id: String, key: String },

    #[error("Failed to sign URL for {key}: {reason}")]
    SignedUrl { key: String, reason: String },
}

impl SessionError {
    /// Whether the variant is a client-side precondition failure whose
    /// message is always safe to return verbatim.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SessionError::SessionNotFound(_)
                | SessionError::DuplicateSession(_)
                | SessionError::DuplicateRecording(_)
                | SessionError::RecordingNotActive(_)
                | SessionError::RawArtifactMissing(_)
                | SessionError::AnalysisTimeout(_)
                | SessionError::AnalysisQuota(_)
        )
    }
}
