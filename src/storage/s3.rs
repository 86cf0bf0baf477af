use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use super::ObjectStorePublisher;
use crate::config::StorageConfig;
use crate::error::SessionError;

/// Publishes recordings to an S3 bucket and mints presigned GET URLs.
pub struct S3Publisher {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Publisher {
    /// Build a client from the ambient AWS environment (credentials, region)
    /// plus any overrides from the service config.
    pub async fn from_config(cfg: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &cfg.region {
            loader = loader.region(aws_sdk_s3::config::Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &cfg.endpoint {
            // Path-style addressing for MinIO and friends.
            builder = builder.endpoint_url(endpoint.clone()).force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: cfg.bucket.clone(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStorePublisher for S3Publisher {
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<String, SessionError> {
        // Stream straight from disk; recordings can be far larger than we
        // want resident in memory.
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| SessionError::Upload {
                key: key.to_string(),
                reason: format!("could not read {}: {}", local_path.display(), e),
            })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| SessionError::Upload {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        info!("Uploaded {} to s3://{}/{}", local_path.display(), self.bucket, key);

        Ok(key.to_string())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, SessionError> {
        // No existence pre-check: signing is stateless and a URL for a
        // missing object simply 404s when fetched.
        let presigning =
            PresigningConfig::expires_in(ttl).map_err(|e| SessionError::SignedUrl {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| SessionError::SignedUrl {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        Ok(presigned.uri().to_string())
    }
}
