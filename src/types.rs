//! Core types: catalog entries, per-item outcomes and run reports

use crate::error::{CatalogError, snippet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A catalog entry exactly as the API sent it
///
/// Both fields are optional here; [`Product::try_from`] decides whether the entry is
/// usable. Entries that are not JSON objects, or whose fields are not strings, end up
/// with `None` fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProduct {
    /// Image file name
    #[serde(default)]
    pub name: Option<String>,

    /// Image URL
    #[serde(default)]
    pub url: Option<String>,
}

impl RawProduct {
    /// Read an entry leniently from an arbitrary JSON value
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_owned);
        Self {
            name: field("name"),
            url: field("url"),
        }
    }
}

/// A validated catalog entry: both fields are present and non-empty
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Image file name, used as the destination key
    pub name: String,
    /// Image URL
    pub url: String,
}

/// Why a catalog entry was not processed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// `name` is absent, not a string, or empty
    MissingName,
    /// `url` is absent, not a string, or empty
    MissingUrl,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingName => write!(f, "missing name"),
            SkipReason::MissingUrl => write!(f, "missing URL"),
        }
    }
}

impl TryFrom<&RawProduct> for Product {
    type Error = SkipReason;

    fn try_from(raw: &RawProduct) -> Result<Self, Self::Error> {
        let name = raw
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(SkipReason::MissingName)?;
        let url = raw
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(SkipReason::MissingUrl)?;
        Ok(Product {
            name: name.to_string(),
            url: url.to_string(),
        })
    }
}

/// Parsed API payload with a guaranteed non-empty product list
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogResponse {
    /// Catalog entries in API order, not yet validated
    pub products: Vec<RawProduct>,
}

impl CatalogResponse {
    /// Parse a response body.
    ///
    /// Any shape other than `{"products": [...]}` with at least one entry is rejected
    /// with a retryable [`CatalogError`].
    pub fn from_body(body: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(body).map_err(|_| CatalogError::MalformedBody {
            snippet: snippet(body),
        })?;

        let products: Vec<RawProduct> = value
            .get("products")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(RawProduct::from_value).collect())
            .unwrap_or_default();

        if products.is_empty() {
            return Err(CatalogError::EmptyCatalog {
                snippet: snippet(body),
            });
        }

        Ok(Self { products })
    }
}

/// Why an item could not be stored
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum ItemFailure {
    /// The image URL answered with something other than HTTP 200
    Status(u16),
    /// Transport failure while fetching the image
    Network(String),
    /// The sink rejected or failed the write
    Write(String),
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemFailure::Status(code) => write!(f, "HTTP {}", code),
            ItemFailure::Network(msg) => write!(f, "network error: {}", msg),
            ItemFailure::Write(msg) => write!(f, "write error: {}", msg),
        }
    }
}

/// Result of materializing one catalog entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ItemOutcome {
    /// Image fetched and written
    Success {
        /// Destination key
        key: String,
        /// Number of bytes written
        bytes: usize,
    },
    /// Entry was malformed and never fetched
    Skipped {
        /// What was wrong with the entry
        reason: SkipReason,
    },
    /// Fetch or write failed
    Failed {
        /// Product name
        name: String,
        /// What went wrong
        reason: ItemFailure,
    },
}

/// Summary of a successful run
///
/// A run succeeds as soon as the catalog is retrieved; the item counters are
/// informational and never turn a success into a failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Catalog attempts made, including the successful one
    pub attempts: u32,
    /// Per-item outcomes in catalog order
    pub outcomes: Vec<ItemOutcome>,
}

impl SyncReport {
    /// Number of images written
    pub fn stored(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Success { .. }))
    }

    /// Number of malformed entries
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped { .. }))
    }

    /// Number of failed images
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Response payload returned by the serverless handler
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    /// 200 on success, 500 on failure
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON-encoded message string
    pub body: String,
}
