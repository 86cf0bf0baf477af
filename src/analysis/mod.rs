//! External analysis service client
//!
//! The orchestrator hands a finished artifact's location to the analysis
//! service and stores whatever comes back, verbatim. Behind a trait so tests
//! can stub the service out.

mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SessionError;

pub use http::HttpAnalysisDispatcher;

/// Sends one artifact location to the analysis service, returning its
/// structured result uninterpreted.
#[async_trait]
pub trait AnalysisDispatcher: Send + Sync {
    async fn dispatch(
        &self,
        session_id: &str,
        bucket: &str,
        raw_video_key: &str,
    ) -> Result<Value, SessionError>;
}
