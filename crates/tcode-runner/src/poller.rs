//! Fixed-interval poll loop over a single transcode task.

use tcode_client::TranscodeApi;
use tcode_models::{JobId, PollOutcome, TaskPhase};

use crate::config::PollConfig;
use crate::error::{RunError, RunResult};
use crate::logging::JobLogger;

/// Poll `job_id` until it reaches a terminal phase or the budget runs out.
///
/// Makes at most `config.max_attempts` status calls, sleeping
/// `config.interval` between consecutive calls. Running out of attempts is
/// an outcome, not an error; a failed status call aborts the loop.
pub async fn poll_until_terminal<A>(
    api: &A,
    job_id: &JobId,
    location: &str,
    config: &PollConfig,
) -> RunResult<PollOutcome>
where
    A: TranscodeApi + ?Sized,
{
    let logger = JobLogger::new(job_id, "transcode");

    for attempt in 1..=config.max_attempts {
        let status = api
            .fetch_status(job_id)
            .await
            .map_err(|source| RunError::StatusFetch {
                job_id: job_id.clone(),
                source,
            })?;

        match status.phase {
            TaskPhase::Completed => {
                logger.log_completion(&format!(
                    "Transcode completed and results available at {}",
                    location
                ));
                return Ok(PollOutcome::Completed {
                    location: location.to_string(),
                });
            }
            TaskPhase::Failed => {
                let reason = status
                    .error_message
                    .unwrap_or_else(|| "no error message from provider".to_string());
                logger.log_error(&format!("Transcode failed: {}", reason));
                return Ok(PollOutcome::Failed { reason });
            }
            TaskPhase::Cancelled => {
                let reason = status
                    .error_message
                    .unwrap_or_else(|| "task was cancelled".to_string());
                logger.log_error(&format!("Transcode cancelled: {}", reason));
                return Ok(PollOutcome::Failed { reason });
            }
            ref phase => logger.log_progress(attempt, phase, status.progress_or_zero()),
        }

        if attempt < config.max_attempts {
            tokio::time::sleep(config.interval).await;
        }
    }

    logger.log_warning("Transcode took too long, giving up");
    Ok(PollOutcome::GaveUp {
        attempts: config.max_attempts,
    })
}
