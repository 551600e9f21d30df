//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default history quota: 5 MiB, the classic per-origin browser budget.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory for persisted history (default: platform data dir).
    pub dir: Option<PathBuf>,
    /// Directory for generated images and documents.
    pub artifacts_dir: Option<PathBuf>,
    /// Capacity cap across all persisted entries, in bytes.
    pub quota_bytes: u64,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            artifacts_dir: None,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

impl FileStorageConfig {
    /// The effective storage directory.
    pub fn resolve_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => dir.clone(),
            None => data_root().join("storage"),
        }
    }

    /// The effective artifacts directory.
    pub fn resolve_artifacts_dir(&self) -> PathBuf {
        match &self.artifacts_dir {
            Some(dir) => dir.clone(),
            None => data_root().join("artifacts"),
        }
    }
}

fn data_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("palaver")
}
