//! Structured task logging utilities.
//!
//! Provides consistent, structured logging for a transcode task's lifecycle,
//! with the task id and operation attached to every event.

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tcode_models::{JobId, TaskPhase};

/// Install the global tracing subscriber.
///
/// `json` selects JSON lines; otherwise human-readable ANSI output.
pub fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,aws_config=warn,aws_smithy_runtime=warn"));

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

/// Task logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct JobLogger {
    task_id: String,
    operation: String,
}

impl JobLogger {
    /// Create a new logger for a submitted task.
    pub fn new(task_id: &JobId, operation: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            task_id = %self.task_id,
            operation = %self.operation,
            "Task started: {}", message
        );
    }

    /// Log one non-terminal status check.
    pub fn log_progress(&self, attempt: u32, phase: &TaskPhase, progress: f64) {
        info!(
            task_id = %self.task_id,
            operation = %self.operation,
            attempt,
            phase = %phase,
            progress,
            "Transcode is in progress: {}", progress
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            task_id = %self.task_id,
            operation = %self.operation,
            "Task warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            task_id = %self.task_id,
            operation = %self.operation,
            "Task error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            task_id = %self.task_id,
            operation = %self.operation,
            "Task completed: {}", message
        );
    }
}
