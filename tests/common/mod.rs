//! Common test utilities for catalog-sync E2E tests

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use catalog_sync::{BucketSink, Config, Deployment, Environment, RetryConfig};
use std::path::Path;
use std::time::Duration;
use wiremock::{MockServer, Request};

/// Path the mock API serves the catalog on
pub const CATALOG_PATH: &str = "/products";

/// Bucket the serverless configs and test sinks write into
pub const BUCKET: &str = "test-bucket";

/// Local-variant configuration pointed at `server`, writing into `image_dir`
///
/// The retry delay is shortened so tests run quickly.
pub fn local_config(server: &MockServer, image_dir: &Path, max_attempts: u32) -> Config {
    let mut config = Config::local(Environment::Local);
    config.api_endpoint = format!("{}{}", server.uri(), CATALOG_PATH);
    config.deployment = Deployment::Local {
        environment: Environment::Local,
        image_dir: image_dir.to_path_buf(),
    };
    config.retry = RetryConfig {
        max_attempts,
        delay: Duration::from_millis(50),
    };
    config
}

/// Serverless-variant configuration pointed at `server`
pub fn serverless_config(server: &MockServer, max_attempts: u32) -> Config {
    let mut config = Config::serverless(format!("{}{}", server.uri(), CATALOG_PATH), BUCKET);
    config.retry = RetryConfig {
        max_attempts,
        delay: Duration::from_millis(50),
    };
    config
}

/// Bucket sink whose S3 client talks to `server` with static test credentials
pub fn s3_sink(server: &MockServer) -> BucketSink {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .endpoint_url(server.uri())
        .force_path_style(true)
        .build();
    BucketSink::new(aws_sdk_s3::Client::from_conf(config), BUCKET)
}

/// PUT requests the mock S3 endpoint received, in arrival order
pub async fn received_puts(server: &MockServer) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == "PUT")
        .collect()
}

/// Value of `name` on a recorded request
pub fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

/// Whether `name` is listed in the SigV4 `SignedHeaders` of the request
pub fn is_signed(request: &Request, name: &str) -> bool {
    header(request, "authorization")
        .and_then(|auth| auth.split("SignedHeaders=").nth(1))
        .and_then(|rest| rest.split(',').next())
        .is_some_and(|list| list.split(';').any(|h| h == name))
}
