//! Decoded results of single-shot generation calls.
//!
//! The hosted API returns a list of content parts whose shape depends on
//! the requested modalities. [`GenerationOutput`] is the tagged union that
//! the gateway decodes those parts into exactly once, at the boundary —
//! nothing downstream inspects raw response JSON.

use crate::session::entities::InlineImage;
use serde::{Deserialize, Serialize};

/// Result of a non-streamed generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationOutput {
    /// Plain text response (scene and app document generation).
    Text(String),
    /// The first inline-image part of the response (image generation).
    Image(InlineImage),
}

impl GenerationOutput {
    /// Returns the text if this is a `Text` output.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            GenerationOutput::Text(s) => Some(s),
            GenerationOutput::Image(_) => None,
        }
    }

    /// Returns the image payload if this is an `Image` output.
    pub fn as_image(&self) -> Option<&InlineImage> {
        match self {
            GenerationOutput::Image(image) => Some(image),
            GenerationOutput::Text(_) => None,
        }
    }

    /// Short tag for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationOutput::Text(_) => "text",
            GenerationOutput::Image(_) => "image",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_accessors() {
        let output = GenerationOutput::Text("<html></html>".to_string());
        assert_eq!(output.as_text(), Some("<html></html>"));
        assert!(output.as_image().is_none());
        assert_eq!(output.kind(), "text");
    }

    #[test]
    fn test_image_accessors() {
        let output = GenerationOutput::Image(InlineImage {
            data: "aGVsbG8=".to_string(),
            mime_type: "image/png".to_string(),
        });
        assert!(output.as_text().is_none());
        assert_eq!(output.as_image().unwrap().mime_type, "image/png");
        assert_eq!(output.kind(), "image");
    }
}
