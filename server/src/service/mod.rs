//! Service layer: request semantics over the content store.

pub mod key_locks;
pub mod storage_service;


pub use key_locks::KeyLocks;
pub use storage_service::StorageService;
