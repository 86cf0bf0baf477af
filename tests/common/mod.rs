#![allow(dead_code)] // Each test binary uses a different subset of the stubs.

// Shared stubs for orchestrator and HTTP API tests.
//
// The publisher and dispatcher stand in for S3 and the analysis service so
// the full lifecycle runs without network access. The encoder program is
// `cat`: it spawns like ffmpeg, reads stdin, and exits when stopped.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use drone_capture::{
    AnalysisDispatcher, EncoderSupervisor, ObjectStorePublisher, SessionError,
    SessionOrchestrator,
};

pub const TEST_BUCKET: &str = "test-crops";

pub struct StubPublisher {
    pub uploads: Mutex<Vec<(PathBuf, String)>>,
    pub fail_uploads: bool,
}

impl StubPublisher {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            fail_uploads: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            fail_uploads: true,
        }
    }
}

#[async_trait]
impl ObjectStorePublisher for StubPublisher {
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        _content_type: &str,
    ) -> Result<String, SessionError> {
        if self.fail_uploads {
            return Err(SessionError::Upload {
                key: key.to_string(),
                reason: "stub transport failure".to_string(),
            });
        }

        let mut uploads = self.uploads.lock().await;
        uploads.push((local_path.to_path_buf(), key.to_string()));
        Ok(key.to_string())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, SessionError> {
        // Mirrors the real publisher: no existence check, any key signs.
        Ok(format!(
            "https://signed.test/{}/{}?expires={}",
            TEST_BUCKET,
            key,
            ttl.as_secs()
        ))
    }
}

pub enum DispatchOutcome {
    Succeed(Value),
    Fail,
    Timeout,
    Quota,
}

pub struct StubDispatcher {
    pub outcome: DispatchOutcome,
    pub calls: AtomicUsize,
}

impl StubDispatcher {
    pub fn succeeding(result: Value) -> Self {
        Self {
            outcome: DispatchOutcome::Succeed(result),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_outcome(outcome: DispatchOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisDispatcher for StubDispatcher {
    async fn dispatch(
        &self,
        session_id: &str,
        _bucket: &str,
        _raw_video_key: &str,
    ) -> Result<Value, SessionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.outcome {
            DispatchOutcome::Succeed(result) => Ok(result.clone()),
            DispatchOutcome::Fail => Err(SessionError::Analysis {
                session_id: session_id.to_string(),
                reason: "stub service failure".to_string(),
            }),
            DispatchOutcome::Timeout => Err(SessionError::AnalysisTimeout(session_id.to_string())),
            DispatchOutcome::Quota => Err(SessionError::AnalysisQuota(session_id.to_string())),
        }
    }
}

/// Orchestrator wired to stub collaborators and a `cat` encoder writing under
/// a temp dir. Returns the tempdir so it outlives the test.
pub fn test_orchestrator(
    publisher: Arc<StubPublisher>,
    dispatcher: Arc<StubDispatcher>,
) -> (SessionOrchestrator, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let supervisor = EncoderSupervisor::new(dir.path().join("recordings"), "cat");

    let orchestrator = SessionOrchestrator::new(
        supervisor,
        publisher,
        dispatcher,
        "file:///sample.mp4".to_string(),
        TEST_BUCKET.to_string(),
        Duration::from_secs(3600),
    );

    (orchestrator, dir)
}

pub fn default_analysis() -> Value {
    json!({ "disease": "none" })
}
