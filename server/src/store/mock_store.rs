//! Mock implementation of the content store for testing.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::error::StoreError;
use crate::store::{ContentStore, ItemContent};

/// In-memory content store. Snapshots content on read, so handles stay
/// valid after the item is replaced or removed, matching disk semantics.
pub struct MockContentStore {
    items: Mutex<HashMap<String, Bytes>>,
    op_count: AtomicU64,
}

impl MockContentStore {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            op_count: AtomicU64::new(0),
        }
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check for an item without counting as a store operation.
    pub fn contains(&self, key: &str) -> bool {
        self.items.lock().unwrap().contains_key(key)
    }

    /// Remove all items.
    pub fn clear(&self) {
        self.items.lock().unwrap().clear();
    }

    /// Total operations served, across all trait methods.
    pub fn op_count(&self) -> u64 {
        self.op_count.load(Ordering::Relaxed)
    }

    fn record_op(&self) {
        self.op_count.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for MockContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.record_op();
        Ok(self.items.lock().unwrap().contains_key(key))
    }

    async fn put(&self, key: &str, content: Bytes) -> Result<(), StoreError> {
        self.record_op();
        self.items.lock().unwrap().insert(key.to_string(), content);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<ItemContent, StoreError> {
        self.record_op();
        let items = self.items.lock().unwrap();
        match items.get(key) {
            Some(content) => Ok(ItemContent::from_bytes(content.clone())),
            None => Err(StoreError::Missing),
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.record_op();
        match self.items.lock().unwrap().remove(key) {
            Some(_) => Ok(()),
            None => Err(StoreError::Missing),
        }
    }
}
