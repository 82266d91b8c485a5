//! Remote transcode task identifiers and status snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier the transcode service assigns to a submitted task.
///
/// Opaque to us; uniqueness is the service's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle phase reported by the transcode service.
///
/// Values the provider adds later decode into [`TaskPhase::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum TaskPhase {
    /// Task is waiting for a transcoder
    #[default]
    Queued,
    /// Task is actively transcoding
    Processing,
    /// Provider spelling of an active task
    Running,
    /// Renditions are written
    Completed,
    /// Task failed on the provider side
    Failed,
    /// Task was cancelled before finishing
    Cancelled,
    /// Any other provider-defined phase
    Other(String),
}

impl TaskPhase {
    pub fn as_str(&self) -> &str {
        match self {
            TaskPhase::Queued => "queued",
            TaskPhase::Processing => "processing",
            TaskPhase::Running => "running",
            TaskPhase::Completed => "completed",
            TaskPhase::Failed => "failed",
            TaskPhase::Cancelled => "cancelled",
            TaskPhase::Other(s) => s,
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskPhase::Completed | TaskPhase::Failed | TaskPhase::Cancelled
        )
    }
}

impl From<String> for TaskPhase {
    fn from(s: String) -> Self {
        match s.as_str() {
            "queued" => TaskPhase::Queued,
            "processing" => TaskPhase::Processing,
            "running" => TaskPhase::Running,
            "completed" => TaskPhase::Completed,
            "failed" => TaskPhase::Failed,
            "cancelled" => TaskPhase::Cancelled,
            _ => TaskPhase::Other(s),
        }
    }
}

impl From<TaskPhase> for String {
    fn from(phase: TaskPhase) -> Self {
        phase.as_str().to_string()
    }
}

impl fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of a task's status, fetched fresh on every poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub phase: TaskPhase,
    /// Fraction complete in [0, 1], when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Provider error text for failed tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl JobStatus {
    pub fn new(phase: TaskPhase) -> Self {
        Self {
            phase,
            ..Default::default()
        }
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Progress for reporting; absent progress counts as zero.
    pub fn progress_or_zero(&self) -> f64 {
        self.progress.unwrap_or(0.0)
    }
}
