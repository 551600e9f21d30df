//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write machine-readable turn transcripts (JSONL).
    pub transcript: bool,
    /// Transcript directory (default: platform data dir).
    pub transcript_dir: Option<PathBuf>,
    /// Mirror tracing output to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl FileLoggingConfig {
    pub fn resolve_transcript_dir(&self) -> PathBuf {
        match &self.transcript_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("palaver")
                .join("transcripts"),
        }
    }
}
