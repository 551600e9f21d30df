//! Provider configuration from TOML (`[provider]` section)

use crate::gemini::{GeminiError, GeminiSettings};
use palaver_domain::Model;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hosted-API provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended — use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the API.
    pub base_url: String,
    /// Model for streamed chat turns.
    pub chat_model: String,
    /// Model for image-generation turns.
    pub image_model: String,
    /// Timeout for single-shot calls, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            chat_model: Model::default_chat().to_string(),
            image_model: Model::default_image().to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl FileProviderConfig {
    /// Resolve the API key: the env var wins, then the config value.
    ///
    /// A missing key is a startup error; no turn ever starts without it.
    pub fn resolve_api_key(&self) -> Result<String, GeminiError> {
        if let Ok(key) = std::env::var(&self.api_key_env) {
            if !key.is_empty() {
                return Ok(key);
            }
        }
        match &self.api_key {
            Some(key) if !key.is_empty() => Ok(key.clone()),
            _ => Err(GeminiError::MissingApiKey(self.api_key_env.clone())),
        }
    }

    /// Build gateway settings, resolving the API key.
    pub fn to_settings(&self) -> Result<GeminiSettings, GeminiError> {
        Ok(GeminiSettings {
            api_key: self.resolve_api_key()?,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }

    pub fn chat_model(&self) -> Model {
        self.chat_model.parse().unwrap_or_default()
    }

    pub fn image_model(&self) -> Model {
        self.image_model.parse().unwrap_or_else(|_| Model::default_image())
    }
}
