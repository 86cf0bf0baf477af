//! Durable object storage for finished recordings
//!
//! The orchestrator talks to storage through the `ObjectStorePublisher`
//! trait; production uses `S3Publisher`, tests inject stubs.

mod s3;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SessionError;

pub use s3::S3Publisher;

/// Uploads local artifacts and mints time-limited read URLs.
#[async_trait]
pub trait ObjectStorePublisher: Send + Sync {
    /// Stream the file at `local_path` to the store under `key`. The local
    /// file is left in place on success and failure alike; cleanup is the
    /// caller's decision.
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<String, SessionError>;

    /// Time-limited, read-only URL for `key`. Issued without checking that
    /// the object exists.
    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, SessionError>;
}
