//! File-backed key-value store.
//!
//! Each key maps to one file under the storage directory. A configurable
//! byte quota caps the total stored size, standing in for the storage
//! capacity limits of a browser origin: a write that would overflow fails
//! with `QuotaExceeded` and leaves the previous value intact, so the
//! session store can evict and retry.

use palaver_application::{KeyValueStore, StoreError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Key-value adapter persisting each entry as a file.
pub struct FileKeyValueStore {
    dir: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileKeyValueStore {
    /// Open (and create) the storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            quota_bytes: None,
        })
    }

    /// Cap the total stored bytes across all keys.
    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(sanitize(key))
    }

    /// Total size of every entry except `exclude`.
    fn stored_bytes_excluding(&self, exclude: &Path) -> u64 {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return 0;
        };
        entries
            .flatten()
            .filter(|e| e.path() != exclude)
            .filter_map(|e| e.metadata().ok())
            .filter(|m| m.is_file())
            .map(|m| m.len())
            .sum()
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if let Some(quota) = self.quota_bytes {
            let projected = self.stored_bytes_excluding(&path) + value.len() as u64;
            if projected > quota {
                return Err(StoreError::QuotaExceeded);
            }
        }

        // Write-then-rename keeps the previous value readable if the
        // write itself fails partway.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value).map_err(|e| StoreError::Io(e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::Io(e.to_string()))
    }

    fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("could not remove {}: {}", path.display(), e);
            }
        }
    }
}

/// Keep keys filesystem-safe; anything outside [A-Za-z0-9._-] becomes '_'.
fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap();

        assert!(store.get("currentUser").is_none());
        store.set("currentUser", "ada").unwrap();
        assert_eq!(store.get("currentUser").as_deref(), Some("ada"));

        store.set("currentUser", "brin").unwrap();
        assert_eq!(store.get("currentUser").as_deref(), Some("brin"));

        store.remove("currentUser");
        assert!(store.get("currentUser").is_none());
        // Removing again is fine
        store.remove("currentUser");
    }

    #[test]
    fn test_keys_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap();

        store.set("chatHistory_a/b", "x").unwrap();
        assert_eq!(store.get("chatHistory_a/b").as_deref(), Some("x"));
        assert!(dir.path().join("chatHistory_a_b").exists());
    }

    #[test]
    fn test_quota_rejects_overflow_and_keeps_old_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap().with_quota(24);

        store.set("a", "0123456789").unwrap();
        store.set("b", "0123456789").unwrap();

        // A third entry would push the total past the quota
        assert_eq!(
            store.set("c", "0123456789"),
            Err(StoreError::QuotaExceeded)
        );
        assert!(store.get("c").is_none());

        // Replacing an existing entry within the cap still works
        store.set("a", "01234567890123").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("01234567890123"));

        // Growing an existing entry past the cap fails and keeps the old value
        assert_eq!(
            store.set("a", &"x".repeat(20)),
            Err(StoreError::QuotaExceeded)
        );
        assert_eq!(store.get("a").as_deref(), Some("01234567890123"));
    }
}
