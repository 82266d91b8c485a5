//! Upload-and-transcode binary.

use std::process::ExitCode;

use tracing::{error, info};

use tcode_client::TranscodeClient;
use tcode_models::PollOutcome;
use tcode_runner::{init_tracing, outcome_exit_code, RunConfig, RunError, RunOrchestrator};
use tcode_storage::S3BlobStore;

#[tokio::main]
async fn main() -> ExitCode {
    // Install rustls crypto provider (required for TLS/HTTPS)
    let _ = rustls::crypto::ring::default_provider().install_default();

    dotenvy::dotenv().ok();

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);
    init_tracing(use_json);

    match run().await {
        // The poll loop has already logged how the task ended.
        Ok(outcome) => ExitCode::from(outcome_exit_code(&outcome)),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<PollOutcome, RunError> {
    let config = RunConfig::from_env()?;
    info!("Run config: {:?}", config);

    let store =
        S3BlobStore::new(config.s3_config()).map_err(|e| RunError::config(e.to_string()))?;
    let api = TranscodeClient::new(config.client_config())
        .map_err(|e| RunError::config(format!("Failed to create transcode client: {}", e)))?;

    RunOrchestrator::new(store, api).run(config).await
}
