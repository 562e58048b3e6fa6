//! Local variant: mirror catalog images into `static/images/`.
//!
//! Exits with status 0 once the catalog has been retrieved and status 1 when every
//! attempt failed.

use catalog_sync::{CatalogSync, Config, logging};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = Config::local_from_env();
    if let catalog_sync::Deployment::Local { environment, .. } = &config.deployment {
        info!(?environment, endpoint = %config.api_endpoint, "resolved environment");
    }

    let sync = match CatalogSync::new(config).await {
        Ok(sync) => sync,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match sync.run().await {
        Ok(report) => {
            info!(
                stored = report.stored(),
                skipped = report.skipped(),
                failed = report.failed(),
                "image download complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "failed to download images after multiple attempts");
            ExitCode::FAILURE
        }
    }
}
