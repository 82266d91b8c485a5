//! Shared data models for the tcode pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Object storage locations and their credentials
//! - Transcode job descriptions sent to the remote service
//! - Task identifiers, phases and status snapshots
//! - The terminal outcome of a poll loop

pub mod job;
pub mod location;
pub mod outcome;
pub mod request;

// Re-export common types
pub use job::{JobId, JobStatus, TaskPhase};
pub use location::{LocationError, S3Credentials, StorageKind, StorageLocation};
pub use outcome::PollOutcome;
pub use request::{OutputTarget, TranscodeRequest, HLS_OUTPUT};
