//! Durable key-value mirror for cart state.
//!
//! The storefront keeps the cart in memory and mirrors it, as a JSON string,
//! into a string-keyed store so it survives a reload. Two backends:
//!
//! - [`MemoryStore`] - in-process map with an optional byte quota
//! - [`FileStore`] - one JSON file per key under a data directory

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Storage keys used by the storefront.
pub mod keys {
    /// Key for the serialized cart line items.
    pub const CART: &str = "valoisa_cart";
}

/// A string-keyed, string-valued durable store.
///
/// Implementations must be cheap to call from a single event handler; all
/// methods are synchronous.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be modified.
    fn remove(&self, key: &str) -> Result<()>;
}
