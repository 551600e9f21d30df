//! Infrastructure layer for palaver
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gemini;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileLoggingConfig, FileProviderConfig, FileReplConfig,
    FileStorageConfig,
};
pub use gemini::{GeminiError, GeminiGateway, GeminiSettings};
pub use logging::JsonlTranscriptLogger;
pub use storage::FileKeyValueStore;
