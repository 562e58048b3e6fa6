//! Image destinations
//!
//! The materializer only sees the [`ImageSink`] capability, so the same flow writes to a
//! local directory or an object-storage bucket.

mod bucket;
mod filesystem;

pub use bucket::{BucketSink, LANDING_PAGE_HTML};
pub use filesystem::FilesystemSink;

use crate::config::{Config, Deployment};
use crate::error::SinkError;
use async_trait::async_trait;
use std::sync::Arc;

/// A write-only destination for images
///
/// Writes are independent and order-insensitive; writing the same key twice keeps the
/// second payload.
#[async_trait]
pub trait ImageSink: Send + Sync {
    /// Get the destination ready for a batch of writes.
    ///
    /// Called once per run, after the catalog has been retrieved and before the first
    /// item is written.
    async fn prepare(&self) -> std::result::Result<(), SinkError>;

    /// Store `bytes` under `key`
    async fn write(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<(), SinkError>;

    /// Human-readable destination, for logs
    fn describe(&self) -> String;
}

/// Build the sink selected by the deployment variant
///
/// The bucket client picks up credentials, region and endpoint from the standard AWS
/// configuration sources.
pub async fn from_config(config: &Config) -> Arc<dyn ImageSink> {
    match &config.deployment {
        Deployment::Local { image_dir, .. } => Arc::new(FilesystemSink::new(image_dir.clone())),
        Deployment::Serverless { bucket } => Arc::new(BucketSink::from_env(bucket).await),
    }
}
