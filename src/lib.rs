//! # catalog-sync
//!
//! Mirrors the images of a product catalog into a local directory or an
//! object-storage bucket.
//!
//! A run fetches the catalog from an HTTP API, retrying a fixed number of times with a
//! fixed delay, then downloads every product image one after another and writes it to
//! the configured [`ImageSink`]. A run succeeds as soon as the catalog is retrieved;
//! individual images that cannot be fetched or written are logged and reported but
//! never fail the run.
//!
//! ## Quick Start
//!
//! ```no_run
//! use catalog_sync::{CatalogSync, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads DOCKER_ENVIRONMENT to pick the API host
//!     let config = Config::local_from_env();
//!
//!     let report = CatalogSync::new(config).await?.run().await?;
//!     println!("stored {} images", report.stored());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Catalog fetching
pub mod catalog;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Serverless invocation handler
pub mod handler;
/// Tracing subscriber setup
pub mod logging;
/// Per-item image materialization
pub mod materializer;
/// Fixed-delay retry logic
pub mod retry;
/// Image destinations
pub mod sink;
/// Run orchestration
pub mod sync;
/// Core types
pub mod types;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod test_helpers;

// Re-export commonly used types
pub use config::{Config, Deployment, Environment, HttpConfig, RetryConfig};
pub use error::{CatalogError, Error, Result, SinkError};
pub use sink::{BucketSink, FilesystemSink, ImageSink};
pub use sync::CatalogSync;
pub use types::{
    CatalogResponse, HandlerResponse, ItemFailure, ItemOutcome, Product, RawProduct, SkipReason,
    SyncReport,
};
