//! Top-level session state machine
//!
//! Owns the repository and drives each session along
//! `RECORDING → UPLOADED → ANALYZING → DONE`, delegating the actual work to
//! the encoder supervisor, object-store publisher, and analysis dispatcher.
//! Collaborators are injected at construction so tests can swap in stubs.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::AnalysisDispatcher;
use crate::encoder::EncoderSupervisor;
use crate::error::SessionError;
use crate::session::{Session, SessionPatch, SessionRepository, SessionStatus};
use crate::storage::ObjectStorePublisher;

pub struct SessionOrchestrator {
    repository: SessionRepository,
    supervisor: EncoderSupervisor,
    publisher: Arc<dyn ObjectStorePublisher>,
    dispatcher: Arc<dyn AnalysisDispatcher>,
    /// Encoder input source, fixed server-side (device URL or sample file).
    stream_input: String,
    /// Bucket name forwarded to the analysis service alongside the key.
    bucket: String,
    signed_url_ttl: Duration,
}

impl SessionOrchestrator {
    pub fn new(
        supervisor: EncoderSupervisor,
        publisher: Arc<dyn ObjectStorePublisher>,
        dispatcher: Arc<dyn AnalysisDispatcher>,
        stream_input: String,
        bucket: String,
        signed_url_ttl: Duration,
    ) -> Self {
        Self {
            repository: SessionRepository::new(),
            supervisor,
            publisher,
            dispatcher,
            stream_input,
            bucket,
            signed_url_ttl,
        }
    }

    /// Storage key for a session's raw recording, derivable from the id alone.
    pub fn raw_video_key(session_id: &str) -> String {
        format!("raw/{}.mp4", session_id)
    }

    /// Create a session and start recording the configured input source.
    pub async fn start_session(&self) -> Result<Session, SessionError> {
        let session_id = Uuid::new_v4().to_string();

        info!("Starting capture session {}", session_id);

        self.supervisor.start(&session_id, &self.stream_input).await?;

        // A v4 id colliding with an existing session would mean the RNG is
        // broken; still, don't leave an orphaned encoder behind if it does.
        match self.repository.create(Session::new(session_id.clone())).await {
            Ok(session) => Ok(session),
            Err(e) => {
                error!("Could not register session {}: {}", session_id, e);
                if let Err(stop_err) = self.supervisor.stop(&session_id).await {
                    warn!("Could not stop orphaned encoder: {}", stop_err);
                }
                Err(e)
            }
        }
    }

    /// Stop recording, upload the artifact, and advance to `UPLOADED`.
    pub async fn stop_session(&self, session_id: &str) -> Result<Session, SessionError> {
        let session = self
            .repository
            .get(session_id)
            .await
            .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))?;

        if session.status != SessionStatus::Recording {
            return Err(SessionError::RecordingNotActive(session_id.to_string()));
        }

        // Taking the encoder handle is the serialization point: of two
        // concurrent stops, exactly one gets past this line.
        let local_path = self.supervisor.stop(session_id).await?;

        let key = Self::raw_video_key(session_id);
        if let Err(e) = self.publisher.upload(&local_path, &key, "video/mp4").await {
            error!("Upload failed for session {}: {}", session_id, e);
            if self
                .repository
                .update(session_id, SessionPatch::status(SessionStatus::Error))
                .await
                .is_none()
            {
                warn!("Session {} vanished while recording upload failure", session_id);
            }
            return Err(e);
        }

        let patch = SessionPatch {
            status: Some(SessionStatus::Uploaded),
            raw_video_key: Some(key.clone()),
            ended_at: Some(Utc::now()),
            ..Default::default()
        };

        // The artifact is already durable at this point. Losing the record
        // update must not look like a clean success, so it gets its own
        // error carrying the uploaded key.
        self.repository
            .update(session_id, patch)
            .await
            .ok_or(SessionError::RecordUpdateLost {
                session_id: session_id.to_string(),
                key,
            })
    }

    /// Dispatch the uploaded artifact for analysis and advance to `DONE`.
    ///
    /// Idempotency policy: a session already `DONE` (or with a dispatch in
    /// flight, `ANALYZING`) is returned as-is without re-dispatching. A
    /// session in `ERROR` with an uploaded artifact may be retried.
    pub async fn analyze_session(&self, session_id: &str) -> Result<Session, SessionError> {
        let session = self
            .repository
            .get(session_id)
            .await
            .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))?;

        let key = session
            .raw_video_key
            .clone()
            .ok_or_else(|| SessionError::RawArtifactMissing(session_id.to_string()))?;

        if matches!(session.status, SessionStatus::Done | SessionStatus::Analyzing) {
            return Ok(session);
        }

        // Atomically claim the ANALYZING phase; a concurrent analyze that
        // loses this race just observes the current record.
        let claimed = self
            .repository
            .update_if(
                session_id,
                |s| matches!(s.status, SessionStatus::Uploaded | SessionStatus::Error),
                SessionPatch::status(SessionStatus::Analyzing),
            )
            .await;
        if claimed.is_none() {
            return self
                .repository
                .get(session_id)
                .await
                .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()));
        }

        match self.dispatcher.dispatch(session_id, &self.bucket, &key).await {
            Ok(result) => {
                let patch = SessionPatch {
                    status: Some(SessionStatus::Done),
                    analysis: Some(result),
                    ..Default::default()
                };
                self.repository
                    .update(session_id, patch)
                    .await
                    .ok_or(SessionError::RecordUpdateLost {
                        session_id: session_id.to_string(),
                        key,
                    })
            }
            Err(e) => {
                error!("Analysis failed for session {}: {}", session_id, e);
                if self
                    .repository
                    .update(session_id, SessionPatch::status(SessionStatus::Error))
                    .await
                    .is_none()
                {
                    warn!("Session {} vanished while recording analysis failure", session_id);
                }
                Err(e)
            }
        }
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Session, SessionError> {
        self.repository
            .get(session_id)
            .await
            .ok_or_else(|| SessionError::SessionNotFound(session_id.to_string()))
    }

    pub async fn list_sessions(&self) -> Vec<Session> {
        self.repository.list().await
    }

    /// The session record augmented with signed URLs: one for the raw
    /// recording, plus one for every `...Key` string the analysis result
    /// references (`overlayKey` → `overlayUrl`, and so on).
    pub async fn session_results(&self, session_id: &str) -> Result<Value, SessionError> {
        let session = self.get_session(session_id).await?;

        let mut result = serde_json::to_value(&session).map_err(|e| SessionError::SignedUrl {
            key: session_id.to_string(),
            reason: e.to_string(),
        })?;

        if let Some(key) = &session.raw_video_key {
            let url = self.publisher.signed_url(key, self.signed_url_ttl).await?;
            result["rawVideoUrl"] = Value::String(url);
        }

        if let Some(Value::Object(analysis)) = &session.analysis {
            for (field, value) in analysis {
                let (Some(prefix), Value::String(key)) = (field.strip_suffix("Key"), value)
                else {
                    continue;
                };
                let url = self.publisher.signed_url(key, self.signed_url_ttl).await?;
                result[format!("{}Url", prefix)] = Value::String(url);
            }
        }

        Ok(result)
    }

    /// Whether the encoder is live for this session. Exposed for diagnostics
    /// and tests; the state machine itself goes through stop/start.
    pub async fn is_recording(&self, session_id: &str) -> bool {
        self.supervisor.is_active(session_id).await
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}
