use std::collections::HashMap;

use tokio::sync::RwLock;

use super::model::{Session, SessionPatch};
use crate::error::SessionError;

/// In-memory keyed store of session records.
///
/// State is intentionally volatile: sessions live only as long as the
/// process, and records are never removed once created. No I/O happens here;
/// the repository is a plain map behind a lock.
pub struct SessionRepository {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a new session. Fails if the id is already present.
    pub async fn create(&self, session: Session) -> Result<Session, SessionError> {
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&session.session_id) {
            return Err(SessionError::DuplicateSession(session.session_id.clone()));
        }

        sessions.insert(session.session_id.clone(), session.clone());
        Ok(session)
    }

    pub async fn get(&self, session_id: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Shallow-merge `patch` into the stored record. Returns `None` if the id
    /// is unknown; callers must check. Status ordering is not enforced here.
    pub async fn update(&self, session_id: &str, patch: SessionPatch) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(session_id)?;

        apply_patch(session, patch);
        Some(session.clone())
    }

    /// Merge `patch` only if `predicate` holds for the current record, in one
    /// atomic step. Returns `None` if the id is unknown or the predicate
    /// rejects the record. This is how the orchestrator serializes competing
    /// status transitions for the same session.
    pub async fn update_if(
        &self,
        session_id: &str,
        predicate: impl FnOnce(&Session) -> bool,
        patch: SessionPatch,
    ) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(session_id)?;

        if !predicate(session) {
            return None;
        }

        apply_patch(session, patch);
        Some(session.clone())
    }

    pub async fn list(&self) -> Vec<Session> {
        let sessions = self.sessions.read().await;
        sessions.values().cloned().collect()
    }
}

impl Default for SessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_patch(session: &mut Session, patch: SessionPatch) {
    if let Some(status) = patch.status {
        session.status = status;
    }
    if let Some(key) = patch.raw_video_key {
        session.raw_video_key = Some(key);
    }
    if let Some(analysis) = patch.analysis {
        session.analysis = Some(analysis);
    }
    if let Some(ended_at) = patch.ended_at {
        session.ended_at = Some(ended_at);
    }
}
