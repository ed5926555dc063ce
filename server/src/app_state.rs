//! Application State Management
//!
//! This module provides the application state that contains all services
//! and their dependencies, following the dependency injection pattern.

use log::info;
use std::sync::Arc;

use crate::config::{AppConfig, StorageBackend};
use crate::error::StoreError;
use crate::service::StorageService;
use crate::store::{ContentStore, LocalFileStore, MockContentStore};

/// Application state containing the storage service and its dependencies
#[derive(Clone)]
pub struct AppState {
    pub storage_service: Arc<StorageService>,
    pub config: AppConfig,
}

impl AppState {
    /// Create application state from configuration
    pub fn from_config(config: AppConfig) -> Result<Self, StoreError> {
        let store: Arc<dyn ContentStore> = match config.storage.backend {
            StorageBackend::Local => {
                info!("using local storage backend rooted at {}", config.storage.root);
                Arc::new(LocalFileStore::open(&config.storage.root)?)
            }
            StorageBackend::Mock => {
                info!("using mock storage backend");
                Arc::new(MockContentStore::new())
            }
        };

        Ok(Self {
            storage_service: Arc::new(StorageService::new(store)),
            config,
        })
    }

    /// Create application state for testing with the mock backend
    pub fn new_for_testing() -> Self {
        Self {
            storage_service: Arc::new(StorageService::new(Arc::new(MockContentStore::new()))),
            config: AppConfig::default(),
        }
    }
}
