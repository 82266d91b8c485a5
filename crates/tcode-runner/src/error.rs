//! Run error types and process exit codes.

use std::path::PathBuf;

use thiserror::Error;

use tcode_client::TranscodeError;
use tcode_models::{JobId, PollOutcome};
use tcode_storage::StorageError;

pub type RunResult<T> = Result<T, RunError>;

/// Exit code when the provider reports the task as failed.
pub const EXIT_JOB_FAILED: u8 = 7;

/// Exit code when the poll budget runs out.
pub const EXIT_GAVE_UP: u8 = 8;

/// Fatal errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Transcode submission failed: {0}")]
    Submission(#[source] TranscodeError),

    #[error("Status fetch for task {job_id} failed: {source}")]
    StatusFetch {
        job_id: JobId,
        #[source]
        source: TranscodeError,
    },
}

impl RunError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Config(_) => 2,
            RunError::Read { .. } => 3,
            RunError::Storage(_) => 4,
            RunError::Submission(_) => 5,
            RunError::StatusFetch { .. } => 6,
        }
    }
}

/// Process exit code for a finished poll loop.
pub fn outcome_exit_code(outcome: &PollOutcome) -> u8 {
    match outcome {
        PollOutcome::Completed { .. } => 0,
        PollOutcome::Failed { .. } => EXIT_JOB_FAILED,
        PollOutcome::GaveUp { .. } => EXIT_GAVE_UP,
    }
}
