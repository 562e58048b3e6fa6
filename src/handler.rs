//! Serverless invocation handler
//!
//! The invocation event carries no parameters; everything comes from [`Config`]. The
//! outcome is reported in the returned payload, never as an error.

use crate::config::Config;
use crate::sink::{self, ImageSink};
use crate::sync::CatalogSync;
use crate::types::HandlerResponse;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Message returned when the catalog was retrieved
pub const SUCCESS_MESSAGE: &str = "Images successfully processed!";
/// Message returned when the run failed
pub const FAILURE_MESSAGE: &str = "Error processing images";

impl HandlerResponse {
    /// 200 response with the success message
    pub fn success() -> Self {
        Self::with_message(200, SUCCESS_MESSAGE)
    }

    /// 500 response with the failure message
    pub fn failure() -> Self {
        Self::with_message(500, FAILURE_MESSAGE)
    }

    fn with_message(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            // A JSON string literal, e.g. "\"Error processing images\""
            body: Value::String(message.to_string()).to_string(),
        }
    }
}

/// Handle one invocation, writing into the bucket named by `config`
pub async fn handle(config: Config, event: &Value) -> HandlerResponse {
    let sink = sink::from_config(&config).await;
    handle_with_sink(config, sink, event).await
}

/// Handle one invocation against an explicit sink
pub async fn handle_with_sink(
    config: Config,
    sink: Arc<dyn ImageSink>,
    event: &Value,
) -> HandlerResponse {
    info!(?event, "starting image downloader invocation");
    match CatalogSync::with_sink(config, sink) {
        Ok(sync) => respond(sync).await,
        Err(e) => {
            error!(error = %e, "cannot start catalog sync");
            HandlerResponse::failure()
        }
    }
}

async fn respond(sync: CatalogSync) -> HandlerResponse {
    match sync.run().await {
        Ok(_) => HandlerResponse::success(),
        Err(e) => {
            error!(error = %e, "failed to download and process images");
            HandlerResponse::failure()
        }
    }
}
