use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle states of a capture session.
///
/// Sessions only move forward along `RECORDING → UPLOADED → ANALYZING → DONE`.
/// `ERROR` is reachable from any non-terminal state; an explicit analyze retry
/// may leave it again once the raw recording has been uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Recording,
    Uploaded,
    Analyzing,
    Done,
    Error,
}

impl SessionStatus {
    /// Position along the happy path, used to reject backward transitions.
    pub fn phase(self) -> u8 {
        match self {
            SessionStatus::Recording => 0,
            SessionStatus::Uploaded => 1,
            SessionStatus::Analyzing => 2,
            SessionStatus::Done => 3,
            SessionStatus::Error => 3,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Done | SessionStatus::Error)
    }
}

/// One tracked capture: recording, upload, and analysis of a single video.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,

    pub status: SessionStatus,

    /// Object-store key of the uploaded recording (`raw/<sessionId>.mp4`).
    /// Set exactly once, immediately before the transition to `UPLOADED`.
    pub raw_video_key: Option<String>,

    /// Verbatim response from the analysis service. Set exactly once,
    /// immediately before the transition to `DONE`.
    pub analysis: Option<Value>,

    pub created_at: DateTime<Utc>,

    /// Set exactly once, when recording stops.
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a fresh session in the `RECORDING` state.
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            status: SessionStatus::Recording,
            raw_video_key: None,
            analysis: None,
            created_at: Utc::now(),
            ended_at: None,
        }
    }
}

/// Shallow-merge patch applied by `SessionRepository::update`.
///
/// The repository applies whatever fields are present; ordering rules (never
/// regressing `status`) are the orchestrator's responsibility.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub status: Option<SessionStatus>,
    pub raw_video_key: Option<String>,
    pub analysis: Option<Value>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl SessionPatch {
    pub fn status(status: SessionStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_as_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Recording).unwrap(),
            "\"RECORDING\""
        );
        assert_eq!(
            serde_json::to_string(&SessionStatus::Uploaded).unwrap(),
            "\"UPLOADED\""
        );
        assert_eq!(
            serde_json::to_string(&SessionStatus::Done).unwrap(),
            "\"DONE\""
        );
    }

    #[test]
    fn test_status_phases_are_monotonic_on_happy_path() {
        assert!(SessionStatus::Recording.phase() < SessionStatus::Uploaded.phase());
        assert!(SessionStatus::Uploaded.phase() < SessionStatus::Analyzing.phase());
        assert!(SessionStatus::Analyzing.phase() < SessionStatus::Done.phase());
    }

    #[test]
    fn test_terminal_states() {
        assert!(SessionStatus::Done.is_terminal());
        assert!(SessionStatus::Error.is_terminal());
        assert!(!SessionStatus::Recording.is_terminal());
        assert!(!SessionStatus::Analyzing.is_terminal());
    }

    #[test]
    fn test_new_session_starts_recording_with_empty_fields() {
        let session = Session::new("abc".to_string());

        assert_eq!(session.session_id, "abc");
        assert_eq!(session.status, SessionStatus::Recording);
        assert!(session.raw_video_key.is_none());
        assert!(session.analysis.is_none());
        assert!(session.ended_at.is_none());
    }

    #[test]
    fn test_session_serializes_camel_case() {
        let session = Session::new("abc".to_string());
        let json = serde_json::to_value(&session).unwrap();

        assert_eq!(json["sessionId"], "abc");
        assert_eq!(json["status"], "RECORDING");
        assert!(json["rawVideoKey"].is_null());
        assert!(json["analysis"].is_null());
        assert!(json.get("createdAt").is_some());
    }
}
