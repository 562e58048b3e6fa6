//! Configuration types for catalog-sync
//!
//! A [`Config`] is resolved once at startup (from the environment or from a serialized
//! file) and passed down explicitly. Nothing below this module reads environment
//! variables.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Environment variable whose non-empty presence selects [`Environment::Containerized`]
pub const CONTAINER_FLAG_VAR: &str = "DOCKER_ENVIRONMENT";
/// Environment variable holding the catalog endpoint for the serverless variant
pub const API_ENDPOINT_VAR: &str = "API_ENDPOINT";
/// Environment variable holding the destination bucket for the serverless variant
pub const BUCKET_VAR: &str = "S3_BUCKET";

/// Public host the catalog API advertises in image URLs
pub const PUBLIC_API_HOST: &str = "localhost";
/// Host the catalog API is reachable at from inside the container network
pub const INTERNAL_API_HOST: &str = "api";
/// Port the catalog API listens on
pub const API_PORT: u16 = 3000;

/// Where the local variant is running, which decides how the API host is spelled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Running directly on a developer machine (default)
    #[default]
    Local,
    /// Running next to the API inside a container network
    Containerized,
}

impl Environment {
    /// Interpret the container flag the way a shell would: set and non-empty means on
    pub fn from_flag(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Environment::Containerized,
            _ => Environment::Local,
        }
    }

    /// Hostname the catalog API is reached at
    pub fn api_host(&self) -> &'static str {
        match self {
            Environment::Local => PUBLIC_API_HOST,
            Environment::Containerized => INTERNAL_API_HOST,
        }
    }

    /// Catalog endpoint URL for this environment
    pub fn api_endpoint(&self) -> String {
        format!("http://{}:{}", self.api_host(), API_PORT)
    }
}

/// Deployment variant, which selects the sink and the retry budget
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum Deployment {
    /// Write images into a local directory tree
    Local {
        /// Host resolution mode
        #[serde(default)]
        environment: Environment,
        /// Directory images are written into (default: "static/images")
        #[serde(default = "default_image_dir")]
        image_dir: PathBuf,
    },
    /// Write a landing page and images into an object-storage bucket
    Serverless {
        /// Bucket name
        bucket: String,
    },
}

impl Default for Deployment {
    fn default() -> Self {
        Deployment::Local {
            environment: Environment::Local,
            image_dir: default_image_dir(),
        }
    }
}

/// Catalog retry configuration
///
/// The delay is fixed; there is no backoff growth and no jitter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total number of catalog attempts, including the first (default: 10)
    #[serde(default = "default_local_max_attempts")]
    pub max_attempts: u32,

    /// Pause between attempts (default: 3 seconds)
    #[serde(default = "default_retry_delay", with = "duration_serde")]
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_local_max_attempts(),
            delay: default_retry_delay(),
        }
    }
}

impl RetryConfig {
    /// Retry budget used by the serverless variant (5 attempts, 3 seconds apart)
    pub fn serverless() -> Self {
        Self {
            max_attempts: 5,
            delay: default_retry_delay(),
        }
    }
}

/// HTTP client configuration shared by catalog and image requests
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout (default: 10 seconds)
    #[serde(default = "default_http_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    /// Build the client used for every request of a run
    pub fn build_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(Error::from)
    }
}

/// Host substitution applied to image URLs before they are fetched
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostRewrite {
    /// Host to replace
    pub from: String,
    /// Replacement host
    pub to: String,
}

impl HostRewrite {
    /// Rewrite the host component of `url` if it matches `from`.
    ///
    /// URLs that do not parse, or whose host differs, are returned unchanged.
    pub fn apply(&self, url: &str) -> String {
        let Ok(mut parsed) = url::Url::parse(url) else {
            return url.to_string();
        };
        if parsed.host_str() != Some(self.from.as_str()) {
            return url.to_string();
        }
        match parsed.set_host(Some(&self.to)) {
            Ok(()) => parsed.to_string(),
            Err(_) => url.to_string(),
        }
    }
}

/// Main configuration for a catalog sync run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog API endpoint (default: "http://localhost:3000")
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Deployment variant
    #[serde(default)]
    pub deployment: Deployment,

    /// Catalog retry settings
    #[serde(default)]
    pub retry: RetryConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Content type attached to stored images (default: "image/png")
    #[serde(default = "default_image_content_type")]
    pub image_content_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::local(Environment::Local)
    }
}

impl Config {
    /// Local variant for the given environment
    pub fn local(environment: Environment) -> Self {
        Self {
            api_endpoint: environment.api_endpoint(),
            deployment: Deployment::Local {
                environment,
                image_dir: default_image_dir(),
            },
            retry: RetryConfig::default(),
            http: HttpConfig::default(),
            image_content_type: default_image_content_type(),
        }
    }

    /// Serverless variant writing into `bucket`
    pub fn serverless(api_endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            api_endpoint: api_endpoint.into(),
            deployment: Deployment::Serverless {
                bucket: bucket.into(),
            },
            retry: RetryConfig::serverless(),
            http: HttpConfig::default(),
            image_content_type: default_image_content_type(),
        }
    }

    /// Resolve the local variant from the process environment
    pub fn local_from_env() -> Self {
        Self::local_from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the local variant through an arbitrary variable lookup
    pub fn local_from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = lookup(CONTAINER_FLAG_VAR);
        Self::local(Environment::from_flag(flag.as_deref()))
    }

    /// Resolve the serverless variant from the process environment
    pub fn serverless_from_env() -> Result<Self> {
        Self::serverless_from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the serverless variant through an arbitrary variable lookup
    pub fn serverless_from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(API_ENDPOINT_VAR)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config("API endpoint is not set", API_ENDPOINT_VAR))?;
        let bucket = lookup(BUCKET_VAR)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config("bucket name is not set", BUCKET_VAR))?;
        let config = Self::serverless(endpoint, bucket);
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can drive a run
    pub fn validate(&self) -> Result<()> {
        if self.api_endpoint.is_empty() {
            return Err(Error::config("API endpoint must not be empty", "api_endpoint"));
        }
        if let Err(e) = url::Url::parse(&self.api_endpoint) {
            return Err(Error::config(
                format!("API endpoint {:?} is not a valid URL: {}", self.api_endpoint, e),
                "api_endpoint",
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::config(
                "at least one catalog attempt is required",
                "retry.max_attempts",
            ));
        }
        if self.http.timeout.is_zero() {
            return Err(Error::config("HTTP timeout must be positive", "http.timeout"));
        }
        match &self.deployment {
            Deployment::Local { image_dir, .. } if image_dir.as_os_str().is_empty() => Err(
                Error::config("image directory must not be empty", "deployment.image_dir"),
            ),
            Deployment::Serverless { bucket } if bucket.is_empty() => Err(Error::config(
                "bucket name must not be empty",
                "deployment.bucket",
            )),
            _ => Ok(()),
        }
    }

    /// Host substitution for image URLs, if this deployment needs one
    ///
    /// Only the containerized local variant rewrites: image URLs name the public host,
    /// which does not resolve from inside the container network.
    pub fn host_rewrite(&self) -> Option<HostRewrite> {
        match self.deployment {
            Deployment::Local {
                environment: Environment::Containerized,
                ..
            } => Some(HostRewrite {
                from: PUBLIC_API_HOST.to_string(),
                to: INTERNAL_API_HOST.to_string(),
            }),
            _ => None,
        }
    }
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("static/images")
}

fn default_api_endpoint() -> String {
    Environment::Local.api_endpoint()
}

fn default_local_max_attempts() -> u32 {
    10
}

fn default_retry_delay() -> Duration {
    Duration::from_secs(3)
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    format!("catalog-sync/{}", env!("CARGO_PKG_VERSION"))
}

fn default_image_content_type() -> String {
    "image/png".to_string()
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
