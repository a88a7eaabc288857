//! Key-value storage backends
//!
//! The donation pages persist their state in a small string-keyed store. [`KeyValueStorage`] is
//! the seam the [`Store`](crate::store::Store) sits on, so the same cart logic runs against an
//! in-memory map or a directory of JSON files.

use std::{fmt::Debug, io};

use thiserror::Error;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage backend errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage has been disabled (for example by browser privacy settings).
    #[error("storage is unavailable")]
    Unavailable,

    /// Writing the value would exceed the storage quota.
    #[error("writing {key} needs {needed} bytes but the quota is {quota}")]
    QuotaExceeded {
        /// Key being written.
        key: String,

        /// Bytes the store would hold after the write.
        needed: usize,

        /// Maximum bytes allowed.
        quota: usize,
    },

    /// Underlying filesystem error.
    #[error("storage i/o error")]
    Io(#[from] io::Error),
}

/// A durable string-keyed store.
pub trait KeyValueStorage: Debug + Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
