//! Transcode service HTTP client.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use tcode_models::{JobId, JobStatus, TranscodeRequest};

use crate::error::{TranscodeError, TranscodeResult};
use crate::types::{SubmitResponse, TaskResponse};

/// Default transcode service endpoint.
pub const DEFAULT_BASE_URL: &str = "https://livepeer.studio";

/// The two operations the poll loop needs from the transcode service.
#[async_trait]
pub trait TranscodeApi: Send + Sync {
    /// Submit a transcode task and return its identifier.
    async fn submit(&self, request: &TranscodeRequest) -> TranscodeResult<JobId>;

    /// Fetch the current status of a task.
    async fn fetch_status(&self, id: &JobId) -> TranscodeResult<JobStatus>;
}

/// Configuration for the transcode client.
#[derive(Clone)]
pub struct TranscodeClientConfig {
    /// Base URL of the transcode service
    pub base_url: String,
    /// Bearer API key
    pub api_key: String,
    /// Per-request timeout; `None` waits on the transport indefinitely
    pub timeout: Option<Duration>,
}

impl TranscodeClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for TranscodeClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscodeClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Client for the transcode service.
pub struct TranscodeClient {
    http: Client,
    base_url: String,
}

impl TranscodeClient {
    /// Create a new transcode client.
    pub fn new(config: TranscodeClientConfig) -> TranscodeResult<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| TranscodeError::Config("API key is not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(TranscodeError::Network)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Check the status code, then decode the JSON body.
    async fn decode<T: DeserializeOwned>(response: Response) -> TranscodeResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TranscodeError::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| TranscodeError::invalid_response(format!("{}: {}", e, body)))
    }
}

#[async_trait]
impl TranscodeApi for TranscodeClient {
    async fn submit(&self, request: &TranscodeRequest) -> TranscodeResult<JobId> {
        let url = format!("{}/api/transcode", self.base_url);
        debug!("Submitting transcode task to {}", url);

        let response = self.http.post(&url).json(request).send().await?;
        let submitted: SubmitResponse = Self::decode(response).await?;

        if submitted.id.is_empty() {
            return Err(TranscodeError::invalid_response("empty task id"));
        }

        Ok(JobId::from_string(submitted.id))
    }

    async fn fetch_status(&self, id: &JobId) -> TranscodeResult<JobStatus> {
        let url = format!("{}/api/task/{}", self.base_url, id);
        debug!("Fetching task status from {}", url);

        let response = self.http.get(&url).send().await?;
        let task: TaskResponse = Self::decode(response).await?;

        Ok(task.status)
    }
}
