//! Local directory sink

use super::ImageSink;
use crate::error::SinkError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes each image as a file directly under one directory
///
/// The content type is ignored; the file name is the key. Existing files are
/// overwritten.
#[derive(Clone, Debug)]
pub struct FilesystemSink {
    dir: PathBuf,
}

impl FilesystemSink {
    /// Sink rooted at `dir`. Nothing is touched on disk until [`ImageSink::prepare`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory images are written into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve `key` to a path inside the sink directory
    ///
    /// Keys must name a single file: no separators, no `.`/`..`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, SinkError> {
        let reason = if key.is_empty() {
            Some("empty file name")
        } else if key == "." || key == ".." {
            Some("relative path component")
        } else if key.contains(['/', '\\', '\0']) {
            Some("contains a path separator")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(SinkError::InvalidKey {
                key: key.to_string(),
                reason,
            }),
            None => Ok(self.dir.join(key)),
        }
    }
}

#[async_trait]
impl ImageSink for FilesystemSink {
    async fn prepare(&self) -> Result<(), SinkError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SinkError::Io {
                path: self.dir.clone(),
                source,
            })?;
        debug!(dir = %self.dir.display(), "image directory ready");
        Ok(())
    }

    async fn write(&self, key: &str, bytes: Vec<u8>, _content_type: &str) -> Result<(), SinkError> {
        let path = self.path_for(key)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| SinkError::Io { path, source })
    }

    fn describe(&self) -> String {
        format!("directory {}", self.dir.display())
    }
}
