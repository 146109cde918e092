// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File buffer provider: content snapshots and the single authorized write-back.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tidy_core::FileId;

#[derive(Debug, Error)]
pub enum BufferError {
    #[error("no buffer for {}", path.display())]
    NotFound { path: PathBuf },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Content of a buffer at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub content: String,
    /// Language classifier known to the buffer owner, if any
    pub classifier: Option<String>,
}

impl Snapshot {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into(), classifier: None }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }
}

/// Adapter for reading and writing file buffers
#[async_trait]
pub trait BufferProvider: Clone + Send + Sync + 'static {
    async fn snapshot(&self, file: &FileId) -> Result<Snapshot, BufferError>;

    /// Replace the buffer's content.
    async fn apply(&self, file: &FileId, content: &str) -> Result<(), BufferError>;
}

/// Buffers backed directly by files on disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsBuffers;

impl FsBuffers {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(file: &FileId, source: std::io::Error) -> BufferError {
    if source.kind() == std::io::ErrorKind::NotFound {
        BufferError::NotFound { path: file.path().to_path_buf() }
    } else {
        BufferError::Io { path: file.path().to_path_buf(), source }
    }
}

#[async_trait]
impl BufferProvider for FsBuffers {
    async fn snapshot(&self, file: &FileId) -> Result<Snapshot, BufferError> {
        let content =
            tokio::fs::read_to_string(file.path()).await.map_err(|e| io_error(file, e))?;
        Ok(Snapshot::new(content))
    }

    async fn apply(&self, file: &FileId, content: &str) -> Result<(), BufferError> {
        // Write a sibling file and rename over the target so readers never see a partial write
        let path = file.path();
        let mut staging = path.as_os_str().to_owned();
        staging.push(".tidy-tmp");
        let staging = PathBuf::from(staging);

        tokio::fs::write(&staging, content).await.map_err(|e| io_error(file, e))?;
        if let Ok(metadata) = tokio::fs::metadata(path).await {
            let _ = tokio::fs::set_permissions(&staging, metadata.permissions()).await;
        }
        if let Err(e) = tokio::fs::rename(&staging, path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(io_error(file, e));
        }
        tracing::debug!(file = %path.display(), bytes = content.len(), "wrote buffer");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{BufferError, BufferProvider, Snapshot};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tidy_core::FileId;

    #[derive(Default)]
    struct MemoryState {
        buffers: HashMap<FileId, Snapshot>,
        writes: Vec<(FileId, String)>,
    }

    /// In-memory buffers that record every write-back
    #[derive(Clone, Default)]
    pub struct MemoryBuffers {
        inner: Arc<Mutex<MemoryState>>,
    }

    impl MemoryBuffers {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&self, file: impl Into<FileId>, snapshot: Snapshot) {
            self.inner.lock().buffers.insert(file.into(), snapshot);
        }

        /// Simulate an edit without recording a write-back.
        pub fn edit(&self, file: &FileId, content: impl Into<String>) {
            if let Some(snapshot) = self.inner.lock().buffers.get_mut(file) {
                snapshot.content = content.into();
            }
        }

        pub fn content(&self, file: &FileId) -> Option<String> {
            self.inner.lock().buffers.get(file).map(|s| s.content.clone())
        }

        /// All write-backs, in order
        pub fn writes(&self) -> Vec<(FileId, String)> {
            self.inner.lock().writes.clone()
        }
    }

    #[async_trait]
    impl BufferProvider for MemoryBuffers {
        async fn snapshot(&self, file: &FileId) -> Result<Snapshot, BufferError> {
            self.inner
                .lock()
                .buffers
                .get(file)
                .cloned()
                .ok_or_else(|| BufferError::NotFound { path: file.path().to_path_buf() })
        }

        async fn apply(&self, file: &FileId, content: &str) -> Result<(), BufferError> {
            let mut state = self.inner.lock();
            let snapshot = state
                .buffers
                .get_mut(file)
                .ok_or_else(|| BufferError::NotFound { path: file.path().to_path_buf() })?;
            snapshot.content = content.to_string();
            state.writes.push((file.clone(), content.to_string()));
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::MemoryBuffers;

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
