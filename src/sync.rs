//! Catalog sync orchestration
//!
//! A run moves through `Idle → Attempting → {Succeeded, Exhausted}`. Each attempt
//! fetches the catalog; the first attempt that yields a usable product list prepares
//! the sink, materializes every entry in order, and ends the run successfully no
//! matter how the individual items fared.

use crate::catalog::CatalogFetcher;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::materializer::Materializer;
use crate::retry::{RetryError, retry_with_fixed_delay};
use crate::sink::{self, ImageSink};
use crate::types::SyncReport;
use std::sync::Arc;
use tracing::{error, info};

/// Drives one catalog sync run against a sink
pub struct CatalogSync {
    config: Config,
    fetcher: CatalogFetcher,
    materializer: Materializer,
    sink: Arc<dyn ImageSink>,
}

impl CatalogSync {
    /// Create a run writing into the sink selected by `config.deployment`
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client cannot be built
    pub async fn new(config: Config) -> Result<Self> {
        let sink = sink::from_config(&config).await;
        Self::with_sink(config, sink)
    }

    /// Create a run writing into an explicit sink
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client cannot be built
    pub fn with_sink(config: Config, sink: Arc<dyn ImageSink>) -> Result<Self> {
        config.validate()?;
        let client = config.http.build_client()?;
        let fetcher = CatalogFetcher::new(client.clone());
        let materializer = Materializer::new(
            client,
            config.host_rewrite(),
            config.image_content_type.clone(),
        );

        Ok(Self {
            config,
            fetcher,
            materializer,
            sink,
        })
    }

    /// The configuration driving this run
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run until the catalog is retrieved or the attempts are exhausted
    ///
    /// # Errors
    /// Returns [`Error::RetriesExhausted`] when no attempt produced a usable catalog.
    /// Item-level failures never surface here; they are listed in the report.
    pub async fn run(&self) -> Result<SyncReport> {
        info!(
            endpoint = %self.config.api_endpoint,
            destination = %self.sink.describe(),
            max_attempts = self.config.retry.max_attempts,
            "starting catalog sync"
        );

        match retry_with_fixed_delay(&self.config.retry, |attempt| self.attempt(attempt)).await {
            Ok(report) => {
                info!(
                    attempts = report.attempts,
                    stored = report.stored(),
                    skipped = report.skipped(),
                    failed = report.failed(),
                    "catalog sync complete"
                );
                Ok(report)
            }
            Err(RetryError::Exhausted { attempts, last }) => {
                error!(attempts, error = %last, "failed to sync catalog after multiple attempts");
                Err(Error::RetriesExhausted {
                    attempts,
                    last: Box::new(last),
                })
            }
            Err(RetryError::Permanent { error, .. }) => Err(error),
        }
    }

    async fn attempt(&self, attempt: u32) -> Result<SyncReport> {
        info!(
            endpoint = %self.config.api_endpoint,
            attempt,
            max_attempts = self.config.retry.max_attempts,
            "fetching catalog"
        );
        let catalog = self.fetcher.fetch(&self.config.api_endpoint).await?;
        info!(products = catalog.products.len(), "found products to download");

        self.sink.prepare().await?;

        let mut outcomes = Vec::with_capacity(catalog.products.len());
        for entry in &catalog.products {
            outcomes.push(self.materializer.materialize(entry, self.sink.as_ref()).await);
        }

        Ok(SyncReport { attempts: attempt, outcomes })
    }
}
