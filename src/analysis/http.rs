use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::AnalysisDispatcher;
use crate::error::SessionError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    session_id: &'a str,
    bucket: &'a str,
    raw_video_key: &'a str,
}

/// Dispatches artifacts to the external analysis service over HTTP.
///
/// One POST per dispatch, bounded by the configured timeout; the response
/// body is returned verbatim. No retries happen here — failures go back to
/// the caller for an explicit retry decision.
pub struct HttpAnalysisDispatcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnalysisDispatcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl AnalysisDispatcher for HttpAnalysisDispatcher {
    async fn dispatch(
        &self,
        session_id: &str,
        bucket: &str,
        raw_video_key: &str,
    ) -> Result<Value, SessionError> {
        let url = format!("{}/analyze", self.base_url);

        info!(
            "Dispatching session {} ({}/{}) for analysis",
            session_id, bucket, raw_video_key
        );

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest {
                session_id,
                bucket,
                raw_video_key,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SessionError::AnalysisTimeout(session_id.to_string())
                } else {
                    SessionError::Analysis {
                        session_id: session_id.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SessionError::AnalysisQuota(session_id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::Analysis {
                session_id: session_id.to_string(),
                reason: format!("service returned {}: {}", status, body),
            });
        }

        response.json::<Value>().await.map_err(|e| SessionError::Analysis {
            session_id: session_id.to_string(),
            reason: format!("invalid response body: {}", e),
        })
    }
}
