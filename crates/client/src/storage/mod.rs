//! Durable client storage seam.
//!
//! The session store persists tokens and the cached user through this
//! trait. In the browser build the implementation wraps `localStorage`; in
//! tests and native builds [`MemoryStore`] stands in. Storage is string
//! key-value only, matching the browser contract.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

/// Storage keys for authentication data.
pub mod keys {
    /// Key for the short-lived bearer access token.
    pub const ACCESS_TOKEN: &str = "accessToken";

    /// Key for the long-lived refresh token.
    pub const REFRESH_TOKEN: &str = "refreshToken";

    /// Key for the JSON-serialized cached user record.
    pub const USER: &str = "user";
}

/// Errors that can occur reading or writing durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store rejected the operation (quota, security policy).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String key-value storage surviving page reloads.
///
/// Implementations must be cheap to call; the session store reads on
/// startup and writes on every auth transition.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Normalize a raw stored value into a usable one.
///
/// Browser storage only holds strings, and historical bugs have written the
/// literals `"undefined"` and `"null"` into the token keys. Those, and
/// blank strings, are absent values rather than credentials.
#[must_use]
pub fn sanitize(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "undefined" || trimmed == "null" {
        None
    } else {
        Some(value)
    }
}

/// In-memory [`KeyValueStore`] used in tests and native builds.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with entries, for hydration tests.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().expect("storage lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().expect("storage lock poisoned");
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().expect("storage lock poisoned");
        entries.remove(key);
        Ok(())
    }
}
