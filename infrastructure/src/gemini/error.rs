//! Error types for the Gemini adapter

use palaver_application::GatewayError;
use thiserror::Error;

/// Result type alias for Gemini operations
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors that can occur when talking to the Gemini REST API
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {error}\nRaw frame: {raw}")]
    Parse { error: String, raw: String },

    #[error("Response contained no text content")]
    EmptyResponse,

    #[error("Response contained no inline image part")]
    MissingImage,

    #[error("Missing API key: set {0} or [provider].api_key")]
    MissingApiKey(String),
}

impl From<GeminiError> for GatewayError {
    fn from(e: GeminiError) -> Self {
        match e {
            GeminiError::Transport(_) => GatewayError::ConnectionError(e.to_string()),
            GeminiError::Api { .. } => GatewayError::RequestFailed(e.to_string()),
            GeminiError::Serialization(_)
            | GeminiError::Parse { .. }
            | GeminiError::EmptyResponse
            | GeminiError::MissingImage => GatewayError::InvalidResponse(e.to_string()),
            GeminiError::MissingApiKey(_) => GatewayError::Other(e.to_string()),
        }
    }
}
