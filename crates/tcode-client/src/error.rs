//! Transcode client error types.

use thiserror::Error;

pub type TranscodeResult<T> = Result<T, TranscodeError>;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("Transcode service returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl TranscodeError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// HTTP status of a rejected call, if the service answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            TranscodeError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
