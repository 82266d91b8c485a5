//! Object storage locations.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors raised while building a [`StorageLocation`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("Invalid endpoint URL {0}: {1}")]
    InvalidEndpoint(String, String),

    #[error("Bucket name must not be empty")]
    EmptyBucket,
}

/// Kind of object store a location points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// S3-compatible object store
    #[default]
    S3,
}

/// Access key pair for an S3-compatible store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl S3Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }
}

// Keeps the secret out of logs.
impl fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// A place bytes live, or will live, on an object store.
///
/// Serialized in the shape the transcode service expects:
/// `{ "type": "s3", "endpoint", "credentials", "bucket", "path"? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageLocation {
    #[serde(rename = "type")]
    pub kind: StorageKind,
    pub endpoint: String,
    pub credentials: S3Credentials,
    pub bucket: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl StorageLocation {
    /// Build an S3 location rooted at a bucket, with no object path.
    pub fn s3(
        endpoint: &str,
        credentials: S3Credentials,
        bucket: impl Into<String>,
    ) -> Result<Self, LocationError> {
        Url::parse(endpoint)
            .map_err(|e| LocationError::InvalidEndpoint(endpoint.to_string(), e.to_string()))?;

        let bucket = bucket.into();
        if bucket.is_empty() {
            return Err(LocationError::EmptyBucket);
        }

        Ok(Self {
            kind: StorageKind::S3,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credentials,
            bucket,
            path: None,
        })
    }

    /// Same store and bucket, pointing at a specific object path.
    pub fn with_path(self, path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..self
        }
    }
}
