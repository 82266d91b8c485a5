//! Upload a media file, submit it for transcoding and poll the task to a
//! terminal state.
//!
//! This crate handles:
//! - Run configuration gathered once at process start
//! - The fixed-interval poll loop over a submitted task
//! - The run orchestrator tying upload, submit and poll together
//! - Structured task logging and process exit codes

pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod poller;

#[cfg(test)]
mod test_support;

pub use config::{PollConfig, RunConfig};
pub use error::{outcome_exit_code, RunError, RunResult};
pub use logging::{init_tracing, JobLogger};
pub use orchestrator::RunOrchestrator;
pub use poller::poll_until_terminal;
