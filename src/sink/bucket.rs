//! Object-storage sink used by the serverless variant

use super::ImageSink;
use crate::error::SinkError;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use tracing::info;

/// Landing page written at the bucket root.
///
/// It redirects to `index.html`, i.e. to itself. Kept as-is until the intended target
/// page is known.
pub const LANDING_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Website Platform</title>
    <meta http-equiv="refresh" content="0; url=index.html">
  </head>
  <body>
    <p>Redirecting to <a href="index.html">home page</a>...</p>
  </body>
</html>
"#;

const LANDING_PAGE_KEY: &str = "index.html";
/// Prefix images are stored under; also written as a zero-byte placeholder object
const IMAGE_PREFIX: &str = "images/";

/// Writes the landing page and images into an S3 bucket
///
/// Every put carries the `public-read` canned ACL. Images land under `images/<key>`
/// with the requested content type.
#[derive(Clone, Debug)]
pub struct BucketSink {
    client: Client,
    bucket: String,
}

impl BucketSink {
    /// Write into `bucket` through an already configured client
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Client configured from the standard AWS sources (`AWS_*` variables, shared
    /// profile, instance role)
    pub async fn from_env(bucket: &str) -> Self {
        let shared = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&shared), bucket)
    }

    /// Key of an image inside the bucket
    pub fn image_key(key: &str) -> String {
        format!("{IMAGE_PREFIX}{key}")
    }

    async fn put(
        &self,
        key: &str,
        body: ByteStream,
        content_type: Option<&str>,
    ) -> Result<(), SinkError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .acl(ObjectCannedAcl::PublicRead)
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .map_err(|e| SinkError::Upload {
                key: key.to_string(),
                source: Box::new(e),
            })?;
        Ok(())
    }
}

#[async_trait]
impl ImageSink for BucketSink {
    async fn prepare(&self) -> Result<(), SinkError> {
        self.put(
            LANDING_PAGE_KEY,
            ByteStream::from_static(LANDING_PAGE_HTML.as_bytes()),
            Some("text/html"),
        )
        .await?;
        info!(bucket = %self.bucket, key = LANDING_PAGE_KEY, "created landing page");

        self.put(IMAGE_PREFIX, ByteStream::from_static(&[]), None)
            .await?;
        info!(bucket = %self.bucket, key = IMAGE_PREFIX, "created image directory");
        Ok(())
    }

    async fn write(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), SinkError> {
        if key.is_empty() {
            return Err(SinkError::InvalidKey {
                key: String::new(),
                reason: "empty object name",
            });
        }
        self.put(
            &Self::image_key(key),
            ByteStream::from(bytes),
            Some(content_type),
        )
        .await
    }

    fn describe(&self) -> String {
        format!("bucket {}", self.bucket)
    }
}
