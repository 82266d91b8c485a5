//! Transcode service response types.

use serde::{Deserialize, Serialize};
use tcode_models::JobStatus;

/// Response to `POST /api/transcode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub id: String,
}

/// Response to `GET /api/task/{id}`.
///
/// The task object carries more fields; only the status is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub status: JobStatus,
}
