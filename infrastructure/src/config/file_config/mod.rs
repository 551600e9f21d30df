//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod provider;
mod repl;
mod storage;

pub use logging::FileLoggingConfig;
pub use provider::FileProviderConfig;
pub use repl::FileReplConfig;
pub use storage::{DEFAULT_QUOTA_BYTES, FileStorageConfig};

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Hosted-API provider settings
    pub provider: FileProviderConfig,
    /// History persistence settings
    pub storage: FileStorageConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Logging settings
    pub logging: FileLoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.provider.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.storage.quota_bytes, DEFAULT_QUOTA_BYTES);
        assert!(config.repl.save_history);
        assert!(!config.logging.transcript);
    }

    #[test]
    fn test_partial_toml_merges_with_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [provider]
            chat_model = "gemini-2.5-pro"

            [storage]
            quota_bytes = 1024
            "#,
        )
        .unwrap();

        assert_eq!(config.provider.chat_model, "gemini-2.5-pro");
        assert_eq!(config.provider.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.storage.quota_bytes, 1024);
        assert!(config.repl.show_spinner);
    }
}
