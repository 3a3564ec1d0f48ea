// SPDX-License-Identifier: Apache-2.0
//! Config storage port and the typed service built on top of it.
//!
//! Mirrors the teacher's `echo-app-core::config` split: a [`ConfigStore`] trait for raw
//! byte-blob persistence, and a [`ConfigService`] that (de)serializes typed values through
//! `serde_json` on top of whatever store an embedder plugs in.

use serde::{de::DeserializeOwned, Serialize};

/// Everything that can go wrong loading or saving a config blob.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested key has no stored value.
    #[error("not found")]
    NotFound,
    /// Underlying filesystem I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The stored bytes did not deserialize as the requested type.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Anything else (e.g. platform config directory could not be resolved).
    #[error("{0}")]
    Other(String),
}

/// Storage port for raw config blobs, keyed by logical name.
///
/// Implementations are free to store however they like (a file per key, a single file, a
/// database row); `fossilize-config` itself only ships [`crate::FsConfigStore`].
pub trait ConfigStore {
    /// Loads the raw bytes for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `key` has never been saved.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;

    /// Persists `data` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] on a storage failure.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Serializes typed values as JSON and delegates the bytes to a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wraps `store` in a typed service.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Unwraps the service, returning the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Loads and deserializes the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key has never been saved — a missing key is not an error at
    /// this layer, only [`ConfigStore::load_raw`]'s `NotFound` variant means that.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serde`] if the stored bytes don't deserialize as `T`, or any other
    /// error the underlying store reports.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(ConfigError::NotFound) => Ok(None),
            Err(other) => Err(other),
        }
    }

    /// Serializes `value` and persists it under `key`.
    ///
    /// # Errors
    ///
    /// Propagates whatever the underlying store's [`ConfigStore::save_raw`] reports.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}
