//! Run orchestrator: upload, submit, poll.

use std::path::Path;

use tracing::debug;

use tcode_client::TranscodeApi;
use tcode_models::{PollOutcome, StorageLocation, TranscodeRequest};
use tcode_storage::BlobStore;

use crate::config::RunConfig;
use crate::error::{RunError, RunResult};
use crate::logging::JobLogger;
use crate::poller::poll_until_terminal;

/// Drives one upload-and-transcode run against a blob store and a
/// transcode service.
pub struct RunOrchestrator<S, A> {
    store: S,
    api: A,
}

impl<S, A> RunOrchestrator<S, A>
where
    S: BlobStore,
    A: TranscodeApi,
{
    pub fn new(store: S, api: A) -> Self {
        Self { store, api }
    }

    /// Execute a run.
    ///
    /// Fatal failures come back as [`RunError`]; a task that fails remotely
    /// or never finishes is reported through the returned [`PollOutcome`].
    pub async fn run(&self, config: RunConfig) -> RunResult<PollOutcome> {
        let key = upload_key(&config.filename)?;
        let storage = StorageLocation::s3(&config.s3_endpoint, config.credentials(), &config.bucket)
            .map_err(|e| RunError::config(e.to_string()))?;

        let bytes = tokio::fs::read(&config.filename)
            .await
            .map_err(|source| RunError::Read {
                path: config.filename.clone(),
                source,
            })?;

        let input_path = self.store.upload(&config.bucket, &key, bytes).await?;

        let request = TranscodeRequest::hls(
            storage.clone().with_path(input_path),
            storage,
            &config.output_path,
        );
        let location = request
            .output_location()
            .unwrap_or_else(|| request.storage.bucket.clone());

        let job_id = self
            .api
            .submit(&request)
            .await
            .map_err(RunError::Submission)?;

        let logger = JobLogger::new(&job_id, "transcode");
        logger.log_start(&format!("Created transcode task {}", job_id));

        let outcome = poll_until_terminal(&self.api, &job_id, &location, &config.poll).await?;

        debug!(task_id = %job_id, "Run finished: {}", outcome);
        Ok(outcome)
    }
}

/// Object key for the uploaded source: `FILENAME` as given, minus any
/// leading `/`.
fn upload_key(filename: &Path) -> RunResult<String> {
    let key = filename
        .to_str()
        .map(|name| name.trim_start_matches('/'))
        .unwrap_or_default();

    if key.is_empty() {
        return Err(RunError::config(format!(
            "FILENAME {} cannot be used as an object key",
            filename.display()
        )));
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PollConfig;
    use crate::test_support::{MockApi, MockStore};
    use mockall::Sequence;
    use std::path::PathBuf;
    use std::time::Duration;
    use tcode_client::TranscodeError;
    use tcode_models::{JobId, JobStatus, TaskPhase};
    use tcode_storage::StorageError;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    struct Fixture {
        _dir: TempDir,
        path: PathBuf,
    }

    fn media_file() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"fake mp4 bytes").unwrap();
        Fixture { _dir: dir, path }
    }

    fn config(filename: PathBuf) -> RunConfig {
        RunConfig {
            bucket: "media".to_string(),
            filename,
            output_path: "/hls/clip.m3u8".to_string(),
            api_key: "key".to_string(),
            access_key_id: "AKID".to_string(),
            secret_access_key: "secret".to_string(),
            s3_endpoint: "https://gateway.storjshare.io".to_string(),
            s3_region: "us-east-1".to_string(),
            transcode_api_url: "https://livepeer.studio".to_string(),
            http_timeout: None,
            poll: PollConfig {
                interval: Duration::from_secs(10),
                max_attempts: 100,
            },
        }
    }

    #[test]
    fn test_upload_key_keeps_filename_as_given() {
        assert_eq!(
            upload_key(Path::new("videos/2024/clip.mp4")).unwrap(),
            "videos/2024/clip.mp4"
        );
        assert_eq!(upload_key(Path::new("clip.mp4")).unwrap(), "clip.mp4");
        assert_eq!(
            upload_key(Path::new("/srv/media/clip.mp4")).unwrap(),
            "srv/media/clip.mp4"
        );
        assert_err!(upload_key(Path::new("/")));
        assert_err!(upload_key(Path::new("")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_nested_filename_keeps_directories_in_key() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("videos")).unwrap();
        std::fs::write(dir.path().join("videos/clip.mp4"), b"nested").unwrap();

        let relative = PathBuf::from("videos/clip.mp4");
        let absolute = dir.path().join(&relative);
        let expected_key = upload_key(&absolute).unwrap();
        assert!(expected_key.ends_with("videos/clip.mp4"));
        assert_eq!(upload_key(&relative).unwrap(), "videos/clip.mp4");

        let mut store = MockStore::new();
        let key_for_store = expected_key.clone();
        store
            .expect_upload()
            .withf(move |bucket, key, _| {
                bucket.to_string() == "media" && key.to_string() == key_for_store
            })
            .times(1)
            .returning(|_, key, _| Ok(format!("/{}", key)));

        let input_path = format!("/{}", expected_key);
        let mut api = MockApi::new();
        api.expect_submit()
            .withf(move |request| request.input.path.as_deref() == Some(input_path.as_str()))
            .times(1)
            .returning(|_| Ok(JobId::from_string("job-1")));
        api.expect_fetch_status()
            .times(1)
            .returning(|_| Ok(JobStatus::new(TaskPhase::Completed)));

        let outcome = assert_ok!(
            RunOrchestrator::new(store, api)
                .run(config(absolute))
                .await
        );
        assert!(outcome.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_progress_then_completed() {
        let file = media_file();
        let expected_key = upload_key(&file.path).unwrap();
        let input_path = format!("/{}", expected_key);
        let mut seq = Sequence::new();

        let mut store = MockStore::new();
        store
            .expect_upload()
            .withf(move |bucket, key, bytes| {
                bucket.to_string() == "media"
                    && key.to_string() == expected_key
                    && bytes.as_slice() == b"fake mp4 bytes"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, key, _| Ok(format!("/{}", key)));

        let mut api = MockApi::new();
        api.expect_submit()
            .withf(move |request| {
                request.input.path.as_deref() == Some(input_path.as_str())
                    && request.input.bucket == "media"
                    && request.storage.path.is_none()
                    && request.storage.credentials == request.input.credentials
                    && request.outputs["hls"].path == "/hls/clip.m3u8"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(JobId::from_string("job-1")));
        api.expect_fetch_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(JobStatus::new(TaskPhase::Processing).with_progress(0.4)));
        api.expect_fetch_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(JobStatus::new(TaskPhase::Completed)));

        let outcome = RunOrchestrator::new(store, api)
            .run(config(file.path.clone()))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PollOutcome::Completed {
                location: "media/hls/clip.m3u8".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_file_fails_before_network() {
        let mut store = MockStore::new();
        store.expect_upload().never();
        let mut api = MockApi::new();
        api.expect_submit().never();
        api.expect_fetch_status().never();

        let dir = tempfile::tempdir().unwrap();
        let err = assert_err!(
            RunOrchestrator::new(store, api)
                .run(config(dir.path().join("missing.mp4")))
                .await
        );

        assert!(matches!(err, RunError::Read { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_upload_failure_skips_submit() {
        let file = media_file();
        let mut store = MockStore::new();
        store
            .expect_upload()
            .times(1)
            .returning(|_, _, _| Err(StorageError::upload_failed("AccessDenied")));
        let mut api = MockApi::new();
        api.expect_submit().never();
        api.expect_fetch_status().never();

        let err = assert_err!(
            RunOrchestrator::new(store, api)
                .run(config(file.path.clone()))
                .await
        );

        assert!(matches!(err, RunError::Storage(_)));
    }

    #[tokio::test]
    async fn test_submission_failure_skips_polling() {
        let file = media_file();
        let mut store = MockStore::new();
        store
            .expect_upload()
            .times(1)
            .returning(|_, key, _| Ok(format!("/{}", key)));
        let mut api = MockApi::new();
        api.expect_submit().times(1).returning(|_| {
            Err(TranscodeError::Http {
                status: 401,
                body: "unauthorized".to_string(),
            })
        });
        api.expect_fetch_status().never();

        let err = assert_err!(
            RunOrchestrator::new(store, api)
                .run(config(file.path.clone()))
                .await
        );

        assert!(matches!(err, RunError::Submission(_)));
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gave_up_is_not_an_error() {
        let file = media_file();
        let mut store = MockStore::new();
        store
            .expect_upload()
            .times(1)
            .returning(|_, key, _| Ok(format!("/{}", key)));
        let mut api = MockApi::new();
        api.expect_submit()
            .times(1)
            .returning(|_| Ok(JobId::from_string("job-1")));
        api.expect_fetch_status()
            .times(100)
            .returning(|_| Ok(JobStatus::new(TaskPhase::Queued)));

        let outcome = RunOrchestrator::new(store, api)
            .run(config(file.path.clone()))
            .await
            .unwrap();

        assert_eq!(outcome, PollOutcome::GaveUp { attempts: 100 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_runs_are_independent() {
        let file = media_file();
        let mut store = MockStore::new();
        store
            .expect_upload()
            .times(2)
            .returning(|_, key, _| Ok(format!("/{}", key)));

        let mut api = MockApi::new();
        let mut seq = Sequence::new();
        api.expect_submit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(JobId::from_string("job-1")));
        api.expect_fetch_status()
            .withf(|id| id.as_str() == "job-1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(JobStatus::new(TaskPhase::Completed)));
        api.expect_submit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(JobId::from_string("job-2")));
        api.expect_fetch_status()
            .withf(|id| id.as_str() == "job-2")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(JobStatus::new(TaskPhase::Completed)));

        let orchestrator = RunOrchestrator::new(store, api);
        let first = orchestrator.run(config(file.path.clone())).await.unwrap();
        let second = orchestrator.run(config(file.path.clone())).await.unwrap();

        assert!(first.is_success());
        assert!(second.is_success());
    }

    #[tokio::test]
    async fn test_unreadable_directory_input() {
        // A directory path has a file name but cannot be read as a file.
        let dir = tempfile::tempdir().unwrap();
        let mut store = MockStore::new();
        store.expect_upload().never();
        let api = MockApi::new();

        let err = assert_err!(
            RunOrchestrator::new(store, api)
                .run(config(dir.path().to_path_buf()))
                .await
        );
        assert!(matches!(err, RunError::Read { .. }));
    }
}
