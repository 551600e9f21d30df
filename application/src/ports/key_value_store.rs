//! Local persistence port
//!
//! A synchronous key-value string store scoped by user-visible keys. The
//! production adapter is file-backed with a capacity quota; tests use an
//! in-memory map.

use thiserror::Error;

/// Errors from the persistence adapter
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The write would exceed the configured storage capacity.
    #[error("Storage quota exceeded")]
    QuotaExceeded,

    #[error("Storage error: {0}")]
    Io(String),
}

/// Synchronous key-value string storage.
///
/// Writes block the calling turn briefly; there is no transactional
/// guarantee beyond catch-and-continue at the call site. A failed `set`
/// must leave the previous value for the key readable.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str);
}

/// In-memory adapter: a map behind a mutex with an optional byte quota on
/// total stored size. Primarily for tests.
#[derive(Default)]
pub struct InMemoryStore {
    entries: std::sync::Mutex<std::collections::HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(quota) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(StoreError::QuotaExceeded);
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}
