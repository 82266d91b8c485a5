//! S3-compatible blob store client.
//!
//! This crate provides:
//! - The [`BlobStore`] capability the run orchestrator uploads through
//! - [`S3BlobStore`], a PutObject implementation over the AWS SDK

pub mod client;
pub mod error;

pub use client::{BlobStore, S3BlobStore, S3Config};
pub use error::{StorageError, StorageResult};
