//! Transcode job description.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::location::StorageLocation;

/// Name of the HLS rendition in [`TranscodeRequest::outputs`].
pub const HLS_OUTPUT: &str = "hls";

/// Where a single rendition is written, relative to the storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTarget {
    pub path: String,
}

/// Body of a transcode submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeRequest {
    /// Uploaded source object (path set)
    pub input: StorageLocation,
    /// Destination store and bucket for renditions
    pub storage: StorageLocation,
    /// Output name to target path
    pub outputs: BTreeMap<String, OutputTarget>,
}

impl TranscodeRequest {
    /// Request a single HLS rendition written to `output_path`.
    pub fn hls(
        input: StorageLocation,
        storage: StorageLocation,
        output_path: impl Into<String>,
    ) -> Self {
        let mut outputs = BTreeMap::new();
        outputs.insert(
            HLS_OUTPUT.to_string(),
            OutputTarget {
                path: output_path.into(),
            },
        );

        Self {
            input,
            storage,
            outputs,
        }
    }

    /// Location of the HLS rendition as `bucket/path`.
    ///
    /// Returns `None` when the request carries no HLS output.
    pub fn output_location(&self) -> Option<String> {
        let target = self.outputs.get(HLS_OUTPUT)?;
        let path = target.path.as_str();

        if path.starts_with('/') {
            Some(format!("{}{}", self.storage.bucket, path))
        } else {
            Some(format!("{}/{}", self.storage.bucket, path))
        }
    }
}
