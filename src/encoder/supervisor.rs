use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::SessionError;

/// Internal record binding a session to its live encoder process.
///
/// The child itself is owned by the exit-watcher task; the handle keeps the
/// stdin pipe used to request a graceful shutdown, plus the output path.
struct EncodingHandle {
    stdin: Option<ChildStdin>,
    local_path: PathBuf,
    started_at: DateTime<Utc>,
}

/// Supervises one external ffmpeg process per active session.
///
/// Recording output goes to `<recordings_path>/<sessionId>.mp4`, encoded with
/// `+faststart` so the finalized file is seekable. Termination is always
/// graceful (`q` on the encoder's stdin): a hard kill would skip the trailer
/// write and leave an unplayable file.
pub struct EncoderSupervisor {
    recordings_path: PathBuf,
    ffmpeg_path: String,
    handles: Mutex<HashMap<String, EncodingHandle>>,
}

impl EncoderSupervisor {
    pub fn new(recordings_path: impl Into<PathBuf>, ffmpeg_path: impl Into<String>) -> Self {
        Self {
            recordings_path: recordings_path.into(),
            ffmpeg_path: ffmpeg_path.into(),
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Deterministic output path for a session, derivable without a lookup.
    pub fn output_path(&self, session_id: &str) -> PathBuf {
        self.recordings_path.join(format!("{}.mp4", session_id))
    }

    /// Launch an encoder reading `input` in real time and start recording.
    ///
    /// Returns the local output path the encoder writes to. Fails with
    /// `DuplicateRecording` if a recording is already active for this id.
    pub async fn start(&self, session_id: &str, input: &str) -> Result<PathBuf, SessionError> {
        tokio::fs::create_dir_all(&self.recordings_path)
            .await
            .map_err(|e| SessionError::ProcessSpawn {
                session_id: session_id.to_string(),
                source: e,
            })?;

        let local_path = self.output_path(session_id);

        // The map lock is held across the (synchronous) spawn so two
        // concurrent starts for the same id cannot both succeed.
        let mut handles = self.handles.lock().await;
        if handles.contains_key(session_id) {
            return Err(SessionError::DuplicateRecording(session_id.to_string()));
        }

        // -re paces a file input at its native frame rate, matching a live
        // stream; +faststart relocates the moov atom on finalize.
        let mut child = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-re")
            .arg("-i")
            .arg(input)
            .args(["-c:v", "libx264", "-preset", "veryfast", "-crf", "28"])
            .args(["-movflags", "+faststart"])
            .arg(&local_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SessionError::ProcessSpawn {
                session_id: session_id.to_string(),
                source: e,
            })?;

        let stdin = child.stdin.take();

        // Exit is observed off the request path; a non-zero code is logged
        // for operators but never fails a session that already moved on.
        let watcher_id = session_id.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => {
                    info!("Encoder for session {} exited with {}", watcher_id, status)
                }
                Err(e) => error!("Failed to wait on encoder for session {}: {}", watcher_id, e),
            }
        });

        handles.insert(
            session_id.to_string(),
            EncodingHandle {
                stdin,
                local_path: local_path.clone(),
                started_at: Utc::now(),
            },
        );

        info!(
            "Recording started for session {}: {}",
            session_id,
            local_path.display()
        );

        Ok(local_path)
    }

    /// Ask the encoder to finish and remove the handle.
    ///
    /// Writes `q` to the encoder's stdin so the muxer finalizes the container
    /// before exiting, then returns the output path immediately without
    /// awaiting process exit. Fails with `RecordingNotActive` if no recording
    /// is active for this id; taking the handle out of the map is what makes
    /// a second concurrent stop lose.
    pub async fn stop(&self, session_id: &str) -> Result<PathBuf, SessionError> {
        let mut handle = {
            let mut handles = self.handles.lock().await;
            handles
                .remove(session_id)
                .ok_or_else(|| SessionError::RecordingNotActive(session_id.to_string()))?
        };

        if let Some(mut stdin) = handle.stdin.take() {
            // If the process already died the pipe write fails; the recording
            // is over either way, so log and move on.
            if let Err(e) = stdin.write_all(b"q\n").await {
                warn!(
                    "Could not signal encoder for session {} (already exited?): {}",
                    session_id, e
                );
            }
            // Dropping stdin closes the pipe, a second quit signal for
            // encoders that only notice EOF.
        }

        let duration = Utc::now().signed_duration_since(handle.started_at);
        info!(
            "Recording stopped for session {} after {:.1}s: {}",
            session_id,
            duration.num_milliseconds() as f64 / 1000.0,
            handle.local_path.display()
        );

        Ok(handle.local_path)
    }

    /// Whether a recording is currently active for this session.
    pub async fn is_active(&self, session_id: &str) -> bool {
        let handles = self.handles.lock().await;
        handles.contains_key(session_id)
    }

    pub fn recordings_path(&self) -> &Path {
        &self.recordings_path
    }
}
