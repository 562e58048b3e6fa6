//! Shared test helpers: an in-memory sink that records every call.

use crate::error::SinkError;
use crate::sink::ImageSink;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// One recorded `write` call
#[derive(Clone, Debug)]
pub(crate) struct RecordedWrite {
    pub key: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Sink that keeps writes in memory and can be told to fail `prepare`
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    writes: Mutex<Vec<RecordedWrite>>,
    prepares: AtomicU32,
    failing_prepares: AtomicUsize,
}

impl RecordingSink {
    /// Sink whose first `n` prepare calls fail
    pub(crate) fn failing_prepare(n: usize) -> Self {
        let sink = Self::default();
        sink.failing_prepares.store(n, Ordering::SeqCst);
        sink
    }

    pub(crate) fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().unwrap().clone()
    }

    pub(crate) fn prepare_calls(&self) -> u32 {
        self.prepares.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSink for RecordingSink {
    async fn prepare(&self) -> Result<(), SinkError> {
        self.prepares.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failing_prepares.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_prepares.store(remaining - 1, Ordering::SeqCst);
            return Err(SinkError::Io {
                path: "recording".into(),
                source: std::io::Error::other("prepare refused"),
            });
        }
        Ok(())
    }

    async fn write(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), SinkError> {
        self.writes.lock().unwrap().push(RecordedWrite {
            key: key.to_string(),
            bytes,
            content_type: content_type.to_string(),
        });
        Ok(())
    }

    fn describe(&self) -> String {
        "recording sink".to_string()
    }
}
