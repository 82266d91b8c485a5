//! Client for the remote transcode service.
//!
//! The service exposes two JSON endpoints: one to submit a transcode task
//! and one to read a task's status. Both take a bearer API key.

pub mod client;
pub mod error;
pub mod types;

pub use client::{TranscodeApi, TranscodeClient, TranscodeClientConfig};
pub use error::{TranscodeError, TranscodeResult};
pub use types::{SubmitResponse, TaskResponse};
