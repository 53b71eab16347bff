//! Storage Module
//!
//! Durable string-keyed stores backing the persisted cache tier.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageError;

// == Durable Store ==
/// Synchronous string-keyed store that may outlive the process.
///
/// Implementations are shared with unrelated data: callers own only the keys
/// they write.
pub trait DurableStore: Send {
    /// Returns the raw value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Returns whether it was present.
    fn remove_item(&mut self, key: &str) -> Result<bool, StorageError>;

    /// Lists every key in the store.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Type-erased store, so hosts can pick a backend at runtime.
pub type SharedStore = Box<dyn DurableStore>;

impl<S: DurableStore + ?Sized> DurableStore for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<bool, StorageError> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }
}
