//! S3 blob store implementation.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// Upload capability used by the run orchestrator.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `bucket/key`.
    ///
    /// Returns the object's path within the bucket (`"/" + key`).
    async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> StorageResult<String>;
}

/// Configuration for an S3-compatible store.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// S3 API endpoint URL
    pub endpoint_url: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Signing region (gateways like Storj accept any value)
    pub region: String,
}

impl S3Config {
    pub fn new(
        endpoint_url: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: "us-east-1".to_string(),
        }
    }
}

/// Blob store backed by S3 PutObject.
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
}

impl S3BlobStore {
    /// Create a new store client from configuration.
    pub fn new(config: S3Config) -> StorageResult<Self> {
        if config.endpoint_url.is_empty() {
            return Err(StorageError::config_error("endpoint URL is empty"));
        }
        if config.region.is_empty() {
            return Err(StorageError::config_error("region is empty"));
        }

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "static",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled())
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(sdk_config),
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> StorageResult<String> {
        if bucket.is_empty() {
            return Err(StorageError::invalid_key("bucket name is empty"));
        }
        if key.is_empty() {
            return Err(StorageError::invalid_key("object key is empty"));
        }

        debug!("Uploading {} bytes to {}/{}", bytes.len(), bucket, key);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(DisplayErrorContext(&e).to_string()))?;

        info!(
            bucket = %bucket,
            key = %key,
            "Successfully created {} and uploaded it to {}/{}", key, bucket, key
        );

        Ok(format!("/{}", key))
    }
}
