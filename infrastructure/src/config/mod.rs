//! Configuration loading and raw TOML data types

pub mod file_config;
pub mod loader;

pub use file_config::{
    DEFAULT_QUOTA_BYTES, FileConfig, FileLoggingConfig, FileProviderConfig, FileReplConfig,
    FileStorageConfig,
};
pub use loader::ConfigLoader;
