//! Error types for the storefront.
//!
//! None of these escape a cart mutation: the cart manager turns them into
//! outcome values and log events so the view always stays usable.

use thiserror::Error;

/// Durable mirror operation failed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("Storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Writing the value would exceed the store's capacity.
    #[error("Storage quota exceeded: need {needed} bytes, limit is {limit}")]
    QuotaExceeded {
        /// Bytes the store would hold after the write.
        needed: usize,
        /// Configured capacity in bytes.
        limit: usize,
    },

    /// Storage has been turned off (e.g., private browsing mode).
    #[error("Storage is disabled")]
    Disabled,

    /// Key cannot be mapped onto the backing store.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// A previous writer panicked while holding the store lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Result type alias for `StorageError`.
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::QuotaExceeded {
            needed: 10,
            limit: 4,
        };
        assert_eq!(
            err.to_string(),
            "Storage quota exceeded: need 10 bytes, limit is 4"
        );

        let err = StorageError::InvalidKey("../etc".to_string());
        assert_eq!(err.to_string(), "Invalid storage key: ../etc");
    }
}
