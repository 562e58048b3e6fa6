//! Catalog fetching
//!
//! One call to [`CatalogFetcher::fetch`] is one attempt: a single GET against the API,
//! classified into a usable [`CatalogResponse`] or a retryable [`CatalogError`].

use crate::error::{CatalogError, snippet};
use crate::types::CatalogResponse;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

/// Fetches and validates the product catalog
#[derive(Clone, Debug)]
pub struct CatalogFetcher {
    client: reqwest::Client,
}

impl CatalogFetcher {
    /// Fetcher sharing the run's HTTP client (and therefore its timeout)
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Perform one catalog request.
    ///
    /// Succeeds only for HTTP 200 with a JSON body whose `products` list is non-empty.
    pub async fn fetch(&self, endpoint: &str) -> Result<CatalogResponse, CatalogError> {
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(|source| CatalogError::Network {
                url: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        info!(status = status.as_u16(), "API responded");
        if status != StatusCode::OK {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| CatalogError::Network {
                url: endpoint.to_string(),
                source,
            })?;

        match CatalogResponse::from_body(&body) {
            Ok(catalog) => {
                debug!(products = catalog.products.len(), "parsed catalog");
                Ok(catalog)
            }
            Err(err) => {
                warn!(body = %snippet(&body), "API response content");
                Err(err)
            }
        }
    }
}
