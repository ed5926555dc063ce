//! Storage service layer that enforces request semantics over the raw store.
//!
//! The service owns the decision logic the store is too low-level to hold:
//! names are validated before anything touches the backend, create and
//! update are told apart by a presence check, and every mutation runs
//! under that name's lock so overlapping requests resolve to a clean
//! sequential order.

use bytes::Bytes;
use log::{error, info, warn};
use std::sync::Arc;

use crate::error::{Operation, StorageError, StoreError};
use crate::name;
use crate::service::key_locks::KeyLocks;
use crate::store::{ContentStore, ItemContent};

/// Storage service with injected content store backend.
pub struct StorageService {
    store: Arc<dyn ContentStore>,
    locks: KeyLocks,
}

impl StorageService {
    /// Create a new storage service over the given backend.
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            locks: KeyLocks::new(),
        }
    }

    /// Store a new item. Fails with [`StorageError::AlreadyExists`] when an
    /// item of that name is present; the stored content is left untouched.
    pub async fn create(&self, name: &str, content: Bytes) -> Result<(), StorageError> {
        check_name(name)?;
        let _guard = self.locks.acquire(name).await;

        if self.exists_in_store("create", name).await? {
            warn!("item already exists: {}", name);
            return Err(StorageError::already_exists(name));
        }

        let len = content.len();
        self.store
            .put(name, content)
            .await
            .map_err(|err| store_failure("create", name, err))?;

        info!("created item {} ({} bytes)", name, len);
        Ok(())
    }

    /// Open an existing item for reading.
    ///
    /// The returned handle carries the exact length and a chunk stream;
    /// the per-name lock is released when this call returns, before the
    /// caller consumes a single byte, so slow readers never hold up
    /// writers of the same name. The handle itself stays valid even if
    /// the item is replaced or deleted while it is being drained.
    pub async fn read(&self, name: &str) -> Result<ItemContent, StorageError> {
        check_name(name)?;
        let _guard = self.locks.acquire(name).await;

        match self.store.get(name).await {
            Ok(content) => {
                info!("opened item {} for reading ({} bytes)", name, content.len());
                Ok(content)
            }
            Err(StoreError::Missing) => {
                warn!("item not found: {}", name);
                Err(StorageError::not_found(name, Operation::Read))
            }
            Err(err) => Err(store_failure("read", name, err)),
        }
    }

    /// Replace the content of an existing item. Fails with
    /// [`StorageError::NotFound`] when no item of that name is present;
    /// update never creates an item.
    pub async fn update(&self, name: &str, content: Bytes) -> Result<(), StorageError> {
        check_name(name)?;
        let _guard = self.locks.acquire(name).await;

        if !self.exists_in_store("update", name).await? {
            warn!("item not found: {}", name);
            return Err(StorageError::not_found(name, Operation::Update));
        }

        let len = content.len();
        self.store
            .put(name, content)
            .await
            .map_err(|err| store_failure("update", name, err))?;

        info!("updated item {} ({} bytes)", name, len);
        Ok(())
    }

    /// Remove an existing item. Fails with [`StorageError::NotFound`] when
    /// no item of that name is present.
    pub async fn delete(&self, name: &str) -> Result<(), StorageError> {
        check_name(name)?;
        let _guard = self.locks.acquire(name).await;

        match self.store.remove(name).await {
            Ok(()) => {
                info!("deleted item {}", name);
                Ok(())
            }
            Err(StoreError::Missing) => {
                warn!("item not found: {}", name);
                Err(StorageError::not_found(name, Operation::Delete))
            }
            Err(err) => Err(store_failure("delete", name, err)),
        }
    }

    async fn exists_in_store(&self, op: &str, name: &str) -> Result<bool, StorageError> {
        self.store
            .exists(name)
            .await
            .map_err(|err| store_failure(op, name, err))
    }
}

fn check_name(name: &str) -> Result<(), StorageError> {
    name::validate(name).map_err(|err| {
        warn!("rejected invalid item name {:?}", name);
        err
    })
}

/// Logs the backend failure server-side and folds it into the opaque
/// classification handed to callers.
fn store_failure(op: &str, name: &str, err: StoreError) -> StorageError {
    error!("{} failed for item {}: {}", op, name, err);
    StorageError::Store(err)
}
