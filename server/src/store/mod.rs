//! Content Store Abstraction
//!
//! This module provides an abstraction over content storage backends,
//! allowing the system to persist item bytes on local disk or in memory
//! (for tests) without affecting higher-level services.
//!
//! Keys handed to a store are assumed to have passed name validation
//! already; a store maps each key to exactly one content blob and knows
//! nothing about naming policy or request semantics.

pub mod local_store;
pub mod mock_store;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::io;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::error::StoreError;

pub use local_store::LocalFileStore;
pub use mock_store::MockContentStore;

/// Chunk size used when streaming stored content back to a reader.
pub const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Trait defining the content storage interface.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Check whether any content is stored under `key`.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Store `content` under `key`, replacing any previous content.
    ///
    /// The write is all-or-nothing: a reader never observes a mix of old
    /// and new bytes, and a failed write leaves the previous content (or
    /// absence) intact.
    async fn put(&self, key: &str, content: Bytes) -> Result<(), StoreError>;

    /// Open the content stored under `key` for reading.
    ///
    /// Returns [`StoreError::Missing`] when nothing is stored under `key`.
    async fn get(&self, key: &str) -> Result<ItemContent, StoreError>;

    /// Remove the content stored under `key`.
    ///
    /// Returns [`StoreError::Missing`] when nothing is stored under `key`.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Readable content handle returned by [`ContentStore::get`].
///
/// Carries the exact content length and a byte stream that yields the
/// content in chunks. The handle stays valid even if the item is replaced
/// or removed while the stream is being consumed; it always yields the
/// content as it was when the handle was opened.
pub struct ItemContent {
    len: u64,
    stream: BoxStream<'static, io::Result<Bytes>>,
}

impl ItemContent {
    /// Wraps an open file handle of known length.
    pub fn from_file(file: File, len: u64) -> Self {
        Self {
            len,
            stream: ReaderStream::with_capacity(file, READ_CHUNK_SIZE).boxed(),
        }
    }

    /// Wraps an in-memory buffer.
    pub fn from_bytes(content: Bytes) -> Self {
        Self {
            len: content.len() as u64,
            stream: stream::iter([Ok(content)]).boxed(),
        }
    }

    /// Exact content length in bytes. Zero-length content is legal.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Consumes the handle, yielding the chunk stream.
    pub fn into_stream(self) -> BoxStream<'static, io::Result<Bytes>> {
        self.stream
    }

    /// Drains the stream into a single buffer. Test and small-read helper;
    /// request handlers stream chunks instead of collecting them.
    pub async fn into_bytes(self) -> io::Result<Bytes> {
        let chunks: Vec<Bytes> = self.stream.try_collect().await?;
        Ok(chunks.concat().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn from_bytes_reports_length_and_roundtrips() {
        let content = ItemContent::from_bytes(Bytes::from_static(b"hello world"));
        assert_eq!(content.len(), 11);
        assert!(!content.is_empty());
        assert_eq!(content.into_bytes().await.unwrap().as_ref(), b"hello world");
    }

    #[tokio::test]
    async fn zero_length_content_is_representable() {
        let content = ItemContent::from_bytes(Bytes::new());
        assert_eq!(content.len(), 0);
        assert!(content.is_empty());
        assert!(content.into_bytes().await.unwrap().is_empty());
    }
}
