//! Serverless variant: read an invocation event from stdin, mirror the catalog into the
//! bucket named by `S3_BUCKET`, and print the response payload on stdout.

use catalog_sync::{Config, HandlerResponse, handler, logging};
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::error;

#[tokio::main]
async fn main() -> catalog_sync::Result<()> {
    logging::init();

    let mut raw = String::new();
    tokio::io::stdin().read_to_string(&mut raw).await?;
    let event: Value = if raw.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&raw)?
    };

    let response = match Config::serverless_from_env() {
        Ok(config) => handler::handle(config, &event).await,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            HandlerResponse::failure()
        }
    };

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
