//! Run configuration.
//!
//! Everything the run needs is gathered here once, at process start, and
//! handed to the orchestrator by value. Nothing below `main` reads the
//! environment.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tcode_client::TranscodeClientConfig;
use tcode_models::S3Credentials;
use tcode_storage::S3Config;
use url::Url;

use crate::error::{RunError, RunResult};

/// Default S3 gateway endpoint.
pub const DEFAULT_S3_ENDPOINT: &str = "https://gateway.storjshare.io";

/// Default transcode service endpoint.
pub const DEFAULT_TRANSCODE_API_URL: &str = tcode_client::client::DEFAULT_BASE_URL;

/// Poll loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between consecutive status checks
    pub interval: Duration,
    /// Status checks before giving up
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 100, // ~16.7 minutes at the default interval
        }
    }
}

/// Configuration for a single upload-and-transcode run.
#[derive(Clone)]
pub struct RunConfig {
    /// Bucket the source is uploaded to and renditions are written to
    pub bucket: String,
    /// Local media file to upload
    pub filename: PathBuf,
    /// HLS output path within the bucket
    pub output_path: String,
    /// Transcode service API key
    pub api_key: String,
    /// S3 access key ID
    pub access_key_id: String,
    /// S3 secret access key
    pub secret_access_key: String,
    /// S3 API endpoint
    pub s3_endpoint: String,
    /// S3 signing region
    pub s3_region: String,
    /// Transcode service base URL
    pub transcode_api_url: String,
    /// Per-request timeout for transcode service calls
    pub http_timeout: Option<Duration>,
    /// Poll loop timing
    pub poll: PollConfig,
}

impl RunConfig {
    /// Create config from environment variables.
    pub fn from_env() -> RunResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> RunResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> RunResult<String> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| RunError::config(format!("{} not set", key)))
        };

        let parsed = |key: &str| -> RunResult<Option<u64>> {
            match lookup(key) {
                Some(v) => v.parse().map(Some).map_err(|_| {
                    RunError::config(format!("{} must be a whole number, got {:?}", key, v))
                }),
                None => Ok(None),
            }
        };

        let defaults = PollConfig::default();
        let poll = PollConfig {
            interval: parsed("POLL_INTERVAL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.interval),
            max_attempts: match parsed("POLL_MAX_ATTEMPTS")? {
                Some(n) => u32::try_from(n)
                    .map_err(|_| RunError::config("POLL_MAX_ATTEMPTS is too large"))?,
                None => defaults.max_attempts,
            },
        };

        let config = Self {
            bucket: required("BUCKET")?,
            filename: PathBuf::from(required("FILENAME")?),
            output_path: required("OUTPUT_PATH")?,
            api_key: required("API_KEY")?,
            access_key_id: required("AWS_ACCESS_KEY_ID")?,
            secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
            s3_endpoint: lookup("S3_ENDPOINT").unwrap_or_else(|| DEFAULT_S3_ENDPOINT.to_string()),
            s3_region: lookup("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            transcode_api_url: lookup("TRANSCODE_API_URL")
                .unwrap_or_else(|| DEFAULT_TRANSCODE_API_URL.to_string()),
            http_timeout: parsed("TRANSCODE_HTTP_TIMEOUT_SECS")?.map(Duration::from_secs),
            poll,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check values that parse fine but cannot work.
    pub fn validate(&self) -> RunResult<()> {
        for (key, value) in [
            ("S3_ENDPOINT", &self.s3_endpoint),
            ("TRANSCODE_API_URL", &self.transcode_api_url),
        ] {
            Url::parse(value)
                .map_err(|e| RunError::config(format!("{} is not a valid URL: {}", key, e)))?;
        }

        if self.poll.max_attempts == 0 {
            return Err(RunError::config("POLL_MAX_ATTEMPTS must be at least 1"));
        }

        Ok(())
    }

    /// Store credentials, shared by the upload and the transcode request.
    pub fn credentials(&self) -> S3Credentials {
        S3Credentials::new(&self.access_key_id, &self.secret_access_key)
    }

    pub fn s3_config(&self) -> S3Config {
        S3Config {
            region: self.s3_region.clone(),
            ..S3Config::new(
                &self.s3_endpoint,
                &self.access_key_id,
                &self.secret_access_key,
            )
        }
    }

    pub fn client_config(&self) -> TranscodeClientConfig {
        TranscodeClientConfig {
            timeout: self.http_timeout,
            ..TranscodeClientConfig::new(&self.api_key).with_base_url(&self.transcode_api_url)
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("bucket", &self.bucket)
            .field("filename", &self.filename)
            .field("output_path", &self.output_path)
            .field("api_key", &"<redacted>")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("s3_endpoint", &self.s3_endpoint)
            .field("s3_region", &self.s3_region)
            .field("transcode_api_url", &self.transcode_api_url)
            .field("http_timeout", &self.http_timeout)
            .field("poll", &self.poll)
            .finish()
    }
}
