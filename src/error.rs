//! Error types for catalog-sync
//!
//! Only two things can make a run fail: an invalid configuration, or running out of
//! catalog attempts. Everything below the catalog level (skipped entries, failed image
//! fetches, rejected writes) is reported as an [`ItemOutcome`](crate::types::ItemOutcome)
//! rather than an error.

use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::put_object::PutObjectError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for catalog-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Number of characters of a response body kept in diagnostics
pub const SNIPPET_LEN: usize = 200;

/// Main error type for catalog-sync
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "S3_BUCKET")
        key: Option<String>,
    },

    /// A catalog attempt failed
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The destination could not be prepared or written
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// Every catalog attempt failed
    #[error("failed to fetch catalog after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// The failure of the final attempt
        #[source]
        last: Box<Error>,
    },

    /// HTTP client construction or transport error outside of an attempt
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a configuration error tied to a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// Reasons a single catalog attempt did not yield a usable product list.
///
/// Every variant is retryable at the orchestrator level.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The API answered with something other than HTTP 200
    #[error("API returned HTTP {status}")]
    Status {
        /// HTTP status code returned by the API
        status: u16,
    },

    /// The body is not JSON
    #[error("API response is not valid JSON: {snippet}...")]
    MalformedBody {
        /// Leading part of the response body
        snippet: String,
    },

    /// `products` is missing, not a list, or empty
    #[error("no products found in API response: {snippet}...")]
    EmptyCatalog {
        /// Leading part of the response body
        snippet: String,
    },

    /// Transport-level failure (timeout, refused connection, DNS)
    #[error("request to {url} failed: {source}")]
    Network {
        /// The URL being fetched
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },
}

/// Errors raised by an [`ImageSink`](crate::sink::ImageSink)
#[derive(Debug, Error)]
pub enum SinkError {
    /// The key cannot be mapped to a destination safely
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected key
        key: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Filesystem operation failed
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being created or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Bucket upload failed
    #[error("failed to store {key}: {}", DisplayErrorContext(.source))]
    Upload {
        /// Object key being written
        key: String,
        /// Underlying S3 client error
        #[source]
        source: Box<SdkError<PutObjectError>>,
    },
}

/// First [`SNIPPET_LEN`] characters of a body, cut on a character boundary
pub(crate) fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_LEN).collect()
}
