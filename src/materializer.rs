//! Per-item image materialization
//!
//! Each catalog entry is validated, fetched and written on its own. Nothing here
//! returns an error: every problem becomes an [`ItemOutcome`], so one bad entry never
//! stops the rest of the batch.

use crate::config::HostRewrite;
use crate::sink::ImageSink;
use crate::types::{ItemFailure, ItemOutcome, Product, RawProduct};
use reqwest::StatusCode;
use tracing::{info, warn};

/// Fetches product images and hands them to a sink
#[derive(Clone, Debug)]
pub struct Materializer {
    client: reqwest::Client,
    host_rewrite: Option<HostRewrite>,
    content_type: String,
}

impl Materializer {
    /// Create a materializer
    ///
    /// # Arguments
    /// * `client` - HTTP client shared with the catalog fetcher
    /// * `host_rewrite` - host substitution applied to image URLs before fetching
    /// * `content_type` - content type attached to every stored image
    pub fn new(
        client: reqwest::Client,
        host_rewrite: Option<HostRewrite>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            client,
            host_rewrite,
            content_type: content_type.into(),
        }
    }

    /// URL actually requested for `product`
    pub fn resolve_url(&self, product: &Product) -> String {
        match &self.host_rewrite {
            Some(rewrite) => rewrite.apply(&product.url),
            None => product.url.clone(),
        }
    }

    /// Fetch one entry's image and write it to `sink` under the product name.
    ///
    /// No retries happen at this level.
    pub async fn materialize(&self, entry: &RawProduct, sink: &dyn ImageSink) -> ItemOutcome {
        let product = match Product::try_from(entry) {
            Ok(product) => product,
            Err(reason) => {
                warn!(?entry, %reason, "skipping catalog entry");
                return ItemOutcome::Skipped { reason };
            }
        };

        let url = self.resolve_url(&product);
        info!(name = %product.name, %url, "downloading image");

        let bytes = match self.fetch(&url).await {
            Ok(bytes) => bytes,
            Err(reason) => {
                warn!(name = %product.name, %reason, "failed to download image");
                return ItemOutcome::Failed {
                    name: product.name,
                    reason,
                };
            }
        };

        let len = bytes.len();
        match sink.write(&product.name, bytes, &self.content_type).await {
            Ok(()) => {
                info!(
                    name = %product.name,
                    bytes = len,
                    destination = %sink.describe(),
                    "stored image"
                );
                ItemOutcome::Success {
                    key: product.name,
                    bytes: len,
                }
            }
            Err(e) => {
                warn!(name = %product.name, error = %e, "failed to store image");
                ItemOutcome::Failed {
                    name: product.name,
                    reason: ItemFailure::Write(e.to_string()),
                }
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ItemFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ItemFailure::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ItemFailure::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ItemFailure::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
