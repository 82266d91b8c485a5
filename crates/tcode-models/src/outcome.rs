//! Terminal result of polling a transcode task.

use std::fmt;

/// How a poll loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Task completed; renditions are at `location` (`bucket/path`)
    Completed { location: String },
    /// Provider reported the task as failed
    Failed { reason: String },
    /// Attempt budget ran out before a terminal phase was seen
    GaveUp { attempts: u32 },
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PollOutcome::Completed { .. })
    }
}

impl fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollOutcome::Completed { location } => write!(f, "completed at {}", location),
            PollOutcome::Failed { reason } => write!(f, "failed: {}", reason),
            PollOutcome::GaveUp { attempts } => write!(f, "gave up after {} polls", attempts),
        }
    }
}
